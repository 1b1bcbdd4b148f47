//! Terminal tables for collections and reports.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use mcm_ingest::DroppedRow;
use mcm_model::{
    DataType, FieldDescriptor, FieldRef, FieldSchema, ID_DISPLAY_NAME, Song, SortDirection,
    SortField, SortRules,
};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

/// Schema fields with their headers and types.
pub fn fields_table(schema: &FieldSchema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Field"),
        header_cell("Display Name"),
        header_cell("CSV Header"),
        header_cell("Type"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, field) in schema.fields().iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(field.name()),
            Cell::new(&field.display_name),
            Cell::new(&field.csv_header_name),
            dim_cell(field.data_type()),
        ]);
    }
    table
}

/// Songs in the given order, with sort markers on sorted columns.
pub fn songs_table(schema: &FieldSchema, songs: &[Song], rules: &SortRules) -> Table {
    let mut table = Table::new();
    let mut header = vec![sorted_header(ID_DISPLAY_NAME, SortField::Id, rules)];
    header.extend(
        schema
            .fields()
            .iter()
            .map(|field| sorted_header(&field.display_name, field.key.into(), rules)),
    );
    table.set_header(header);
    apply_table_style(&mut table);

    align_column(&mut table, 0, CellAlignment::Right);
    for (index, field) in schema.fields().iter().enumerate() {
        match field.data_type() {
            DataType::Number => align_column(&mut table, index + 1, CellAlignment::Right),
            DataType::Boolean => align_column(&mut table, index + 1, CellAlignment::Center),
            DataType::String => {}
        }
    }

    for song in songs {
        let mut row = vec![dim_cell(song.id)];
        row.extend(schema.fields().iter().map(|field| value_cell(song, field)));
        table.add_row(row);
    }
    table
}

/// Rows skipped while decoding.
pub fn dropped_table(dropped: &[DroppedRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Row"), header_cell("Reason")]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for row in dropped {
        table.add_row(vec![
            Cell::new(row.row_number),
            Cell::new(&row.reason).fg(Color::Yellow),
        ]);
    }
    table
}

fn value_cell(song: &Song, field: &FieldDescriptor) -> Cell {
    match song.field(field.key) {
        FieldRef::Text(text) => Cell::new(text),
        FieldRef::Number(value) if value.is_nan() => dim_cell("-"),
        FieldRef::Number(value) => Cell::new(value),
        FieldRef::Boolean(true) => Cell::new("yes").fg(Color::Green),
        FieldRef::Boolean(false) => dim_cell("no"),
    }
}

fn sorted_header(label: &str, field: SortField, rules: &SortRules) -> Cell {
    let Some(position) = rules.iter().position(|rule| rule.field == field) else {
        return header_cell(label);
    };
    let arrow = match rules.rules()[position].direction {
        SortDirection::Ascending => '▲',
        SortDirection::Descending => '▼',
    };
    // Priority 1 is the primary key, which is the last rule.
    let priority = rules.len() - position;
    header_cell(&format!("{label} {arrow}{priority}"))
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcm_model::{FieldKey, SortRule};

    #[test]
    fn test_fields_table_lists_every_field() {
        let schema = FieldSchema::music_collection();
        let rendered = fields_table(&schema).to_string();
        assert!(rendered.contains("new_file_name"));
        assert!(rendered.contains("Album Artist"));
        assert!(rendered.contains("boolean"));
    }

    #[test]
    fn test_sort_markers_show_priority() {
        let rules = SortRules::from_rules(vec![
            SortRule::ascending(FieldKey::Artist),
            SortRule::descending(FieldKey::Date),
        ]);
        let mut table = songs_table(&FieldSchema::music_collection(), &[], &rules);
        table.set_content_arrangement(ContentArrangement::Disabled);
        let rendered = table.to_string();
        assert!(rendered.contains("Artist ▲2"));
        assert!(rendered.contains("Date ▼1"));
    }

    #[test]
    fn test_dropped_table_shows_reason() {
        let dropped = vec![DroppedRow {
            row_number: 4,
            reason: mcm_ingest::RowError::FieldCount {
                expected: 14,
                found: 3,
            },
        }];
        let rendered = dropped_table(&dropped).to_string();
        assert!(rendered.contains('4'));
        assert!(rendered.contains("14"));
    }
}
