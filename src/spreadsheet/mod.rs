//! Spreadsheet input and output.
//!
//! Uploaded workbooks are read into a header-addressed [`Table`] and result
//! tables are written back out as `.xlsx` buffers.

mod reader;
mod value;
mod writer;

pub use reader::{Table, read_table};
pub use value::{CellValue, excel_serial_to_date, parse_date_text, parse_time_text};
pub use writer::{SheetData, write_workbook};
