//! Field schema for music collection CSV files.
//!
//! The schema is an ordered list of [`FieldDescriptor`]s. Its order is the
//! canonical CSV column order, and header validation compares against it
//! position by position.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Internal name of the synthetic record id. Never written to CSV.
pub const ID_FIELD_NAME: &str = "id";

/// Display name of the synthetic record id.
pub const ID_DISPLAY_NAME: &str = "ID";

/// Declared data type of a song field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Free text, stored as-is.
    String,
    /// Numeric value; may hold NaN when the source cell was not a number.
    Number,
    /// Flag stored as `0`/`1` in CSV.
    Boolean,
}

impl DataType {
    /// Lowercase name of the type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of song fields, listed in canonical CSV order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Active,
    Date,
    Day,
    Title,
    NewFileName,
    OriginalFileName,
    OriginalFilePath,
    FileExtension,
    Artist,
    Album,
    AlbumArtist,
    TrackNumber,
    TrackTotal,
    Duration,
}

impl FieldKey {
    /// Number of song fields.
    pub const COUNT: usize = 14;

    /// Every field, in canonical CSV order.
    pub const ALL: [FieldKey; Self::COUNT] = [
        Self::Active,
        Self::Date,
        Self::Day,
        Self::Title,
        Self::NewFileName,
        Self::OriginalFileName,
        Self::OriginalFilePath,
        Self::FileExtension,
        Self::Artist,
        Self::Album,
        Self::AlbumArtist,
        Self::TrackNumber,
        Self::TrackTotal,
        Self::Duration,
    ];

    /// Internal field name. Doubles as the default CSV header name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Date => "date",
            Self::Day => "day",
            Self::Title => "title",
            Self::NewFileName => "new_file_name",
            Self::OriginalFileName => "original_file_name",
            Self::OriginalFilePath => "original_file_path",
            Self::FileExtension => "file_extension",
            Self::Artist => "artist",
            Self::Album => "album",
            Self::AlbumArtist => "album_artist",
            Self::TrackNumber => "track_number",
            Self::TrackTotal => "track_total",
            Self::Duration => "duration",
        }
    }

    /// Human-readable column label.
    pub const fn default_display_name(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Date => "Date",
            Self::Day => "Day",
            Self::Title => "Title",
            Self::NewFileName => "New File Name",
            Self::OriginalFileName => "Original File Name",
            Self::OriginalFilePath => "Original File Path",
            Self::FileExtension => "File Extension",
            Self::Artist => "Artist",
            Self::Album => "Album",
            Self::AlbumArtist => "Album Artist",
            Self::TrackNumber => "Track Number",
            Self::TrackTotal => "Track Total",
            Self::Duration => "Duration",
        }
    }

    /// Declared data type of the field.
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Active => DataType::Boolean,
            Self::TrackNumber | Self::TrackTotal | Self::Duration => DataType::Number,
            _ => DataType::String,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.name() == trimmed)
            .ok_or_else(|| ModelError::UnknownField(trimmed.to_string()))
    }
}

/// Describes one song field: its key, display label, and CSV header name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: FieldKey,
    pub display_name: String,
    pub csv_header_name: String,
}

impl FieldDescriptor {
    /// Creates a descriptor using the field's default label and header.
    pub fn standard(key: FieldKey) -> Self {
        Self {
            key,
            display_name: key.default_display_name().to_string(),
            csv_header_name: key.name().to_string(),
        }
    }

    /// Internal field name.
    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    /// Declared data type.
    pub fn data_type(&self) -> DataType {
        self.key.data_type()
    }
}

/// Ordered set of field descriptors.
///
/// Every [`FieldKey`] appears exactly once and header names are unique, so a
/// row decoded against the schema always yields a complete song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    fields: Vec<FieldDescriptor>,
}

impl FieldSchema {
    /// Builds a schema from descriptors in column order.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self> {
        let mut seen_keys = HashSet::new();
        let mut seen_headers = HashSet::new();
        for descriptor in &fields {
            if !seen_keys.insert(descriptor.key) {
                return Err(ModelError::DuplicateField(descriptor.key));
            }
            if !seen_headers.insert(descriptor.csv_header_name.as_str()) {
                return Err(ModelError::DuplicateHeader(
                    descriptor.csv_header_name.clone(),
                ));
            }
        }
        if let Some(missing) = FieldKey::ALL.iter().find(|key| !seen_keys.contains(*key)) {
            return Err(ModelError::MissingField(*missing));
        }
        Ok(Self { fields })
    }

    /// The music collection file layout.
    pub fn music_collection() -> Self {
        Self {
            fields: FieldKey::ALL
                .iter()
                .copied()
                .map(FieldDescriptor::standard)
                .collect(),
        }
    }

    /// Descriptors in canonical column order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of CSV columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a validated schema; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Expected header row, in column order.
    pub fn header_row(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(|descriptor| descriptor.csv_header_name.as_str())
            .collect()
    }

    /// Returns true if `header` matches the expected header exactly,
    /// position for position.
    pub fn matches_header<S: AsRef<str>>(&self, header: &[S]) -> bool {
        header.len() == self.fields.len()
            && header
                .iter()
                .zip(&self.fields)
                .all(|(cell, descriptor)| cell.as_ref() == descriptor.csv_header_name)
    }

    /// Descriptor for a field key.
    pub fn descriptor(&self, key: FieldKey) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|descriptor| descriptor.key == key)
    }

    /// Descriptor by internal field name.
    pub fn find(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|descriptor| descriptor.name() == name)
    }

    /// Display label for a field name.
    ///
    /// Unknown names fall back to title case with underscores as spaces.
    pub fn display_name(&self, name: &str) -> String {
        if name == ID_FIELD_NAME {
            return ID_DISPLAY_NAME.to_string();
        }
        match self.find(name) {
            Some(descriptor) => descriptor.display_name.clone(),
            None => title_case(&name.replace('_', " ")),
        }
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::music_collection()
    }
}

fn title_case(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_row_order() {
        let schema = FieldSchema::music_collection();
        assert_eq!(
            schema.header_row(),
            vec![
                "active",
                "date",
                "day",
                "title",
                "new_file_name",
                "original_file_name",
                "original_file_path",
                "file_extension",
                "artist",
                "album",
                "album_artist",
                "track_number",
                "track_total",
                "duration",
            ]
        );
    }

    #[test]
    fn test_matches_header_is_order_sensitive() {
        let schema = FieldSchema::music_collection();
        let mut header: Vec<&str> = schema.header_row();
        assert!(schema.matches_header(&header));

        header.swap(0, 1);
        assert!(!schema.matches_header(&header));

        header.swap(0, 1);
        header.pop();
        assert!(!schema.matches_header(&header));
    }

    #[test]
    fn test_new_rejects_duplicate_field() {
        let mut fields: Vec<_> = FieldKey::ALL.map(FieldDescriptor::standard).to_vec();
        fields.push(FieldDescriptor::standard(FieldKey::Title));
        assert_eq!(
            FieldSchema::new(fields),
            Err(ModelError::DuplicateField(FieldKey::Title))
        );
    }

    #[test]
    fn test_new_rejects_missing_field() {
        let fields: Vec<_> = FieldKey::ALL
            .iter()
            .copied()
            .filter(|key| *key != FieldKey::Duration)
            .map(FieldDescriptor::standard)
            .collect();
        assert_eq!(
            FieldSchema::new(fields),
            Err(ModelError::MissingField(FieldKey::Duration))
        );
    }

    #[test]
    fn test_new_rejects_duplicate_header() {
        let mut fields: Vec<_> = FieldKey::ALL.map(FieldDescriptor::standard).to_vec();
        fields[1].csv_header_name = "active".to_string();
        assert_eq!(
            FieldSchema::new(fields),
            Err(ModelError::DuplicateHeader("active".to_string()))
        );
    }

    #[test]
    fn test_custom_order_is_kept() {
        let mut fields: Vec<_> = FieldKey::ALL.map(FieldDescriptor::standard).to_vec();
        fields.reverse();
        let schema = FieldSchema::new(fields).unwrap();
        assert_eq!(schema.header_row()[0], "duration");
    }

    #[test]
    fn test_display_name_fallback() {
        let schema = FieldSchema::music_collection();
        assert_eq!(schema.display_name("album_artist"), "Album Artist");
        assert_eq!(schema.display_name("id"), "ID");
        assert_eq!(schema.display_name("release_YEAR"), "Release Year");
    }

    #[test]
    fn test_field_key_from_str() {
        assert_eq!("new_file_name".parse::<FieldKey>(), Ok(FieldKey::NewFileName));
        assert!("genre".parse::<FieldKey>().is_err());
    }

    #[test]
    fn test_data_types() {
        assert_eq!(FieldKey::Active.data_type(), DataType::Boolean);
        assert_eq!(FieldKey::Duration.data_type(), DataType::Number);
        assert_eq!(FieldKey::Artist.data_type(), DataType::String);
    }
}
