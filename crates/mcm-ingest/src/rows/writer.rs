//! CSV line writing.

use crate::error::{IngestError, Result};

/// Writes rows as CSV lines joined by `\n`, without a trailing newline.
///
/// Cells containing the delimiter, quotes, or line breaks are quoted with
/// inner quotes doubled.
pub fn write_rows<I, R, S>(rows: I) -> Result<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| IngestError::CsvWrite {
        message: e.error().to_string(),
    })?;
    let mut text = String::from_utf8(bytes).map_err(|e| IngestError::CsvWrite {
        message: e.to_string(),
    })?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
