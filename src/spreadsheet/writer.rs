//! Writing result workbooks.

use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::error::{EngineError, EngineResult};

use super::value::CellValue;

/// One sheet of a result workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    /// The sheet name (at most 31 characters).
    pub name: String,
    /// Header cells, written in bold on the first row.
    pub headers: Vec<String>,
    /// Data rows.
    pub rows: Vec<Vec<CellValue>>,
}

fn write_error(e: XlsxError) -> EngineError {
    EngineError::SpreadsheetWrite {
        message: e.to_string(),
    }
}

/// Writes one or more sheets to an in-memory `.xlsx` file.
///
/// Numbers stay numeric; dates keep their serial with a `dd/mm/yyyy` format
/// and bare times of day an `hh:mm` format.
pub fn write_workbook(sheets: &[SheetData]) -> EngineResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let time_format = Format::new().set_num_format("hh:mm");

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name).map_err(write_error)?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, header, &header_format)
                .map_err(write_error)?;
            let width = (header.chars().count() + 2).clamp(10, 40) as f64;
            worksheet
                .set_column_width(col as u16, width)
                .map_err(write_error)?;
        }

        for (idx, row) in sheet.rows.iter().enumerate() {
            let row_num = (idx + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                let col = col as u16;
                match cell {
                    CellValue::Empty => {}
                    CellValue::Text(text) => {
                        worksheet
                            .write_string(row_num, col, text)
                            .map_err(write_error)?;
                    }
                    CellValue::Number(n) => {
                        worksheet
                            .write_number(row_num, col, *n)
                            .map_err(write_error)?;
                    }
                    CellValue::Bool(b) => {
                        worksheet
                            .write_boolean(row_num, col, *b)
                            .map_err(write_error)?;
                    }
                    CellValue::DateTime(serial) => {
                        // serials below one day are bare times of day
                        let format = if *serial < 1.0 { &time_format } else { &date_format };
                        worksheet
                            .write_number_with_format(row_num, col, *serial, format)
                            .map_err(write_error)?;
                    }
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(write_error)
}
