//! CSV row reading and writing.

mod reader;
mod writer;

pub use reader::{
    MAX_CSV_FILE_SIZE, RawRow, check_file_size_with_limit, read_csv_text, read_rows,
    text_from_bytes,
};
pub use writer::write_rows;
