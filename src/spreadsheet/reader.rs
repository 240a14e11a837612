//! Reading uploaded workbooks.
//!
//! Workbooks are opened from memory with `calamine`, which auto-detects the
//! format (`.xlsx`, `.xlsm`, `.xls`, `.ods`). The first non-empty row of the
//! sheet is the header row.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

use super::value::CellValue;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// A sheet read into memory: a header row and the data rows beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// The name of the sheet the table was read from.
    pub sheet_name: String,
    /// Header cells, trimmed.
    pub headers: Vec<String>,
    /// Data rows. Rows may be shorter than the header row.
    pub rows: Vec<Vec<CellValue>>,
    /// 1-based sheet row number of the header row.
    header_row: usize,
}

impl Table {
    /// Builds a table directly from headers and rows; the header is assumed on sheet row 1.
    pub fn new(sheet_name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            headers,
            rows,
            header_row: 1,
        }
    }

    /// Finds a column by header name.
    ///
    /// Exact matches win; otherwise a case-insensitive match is accepted.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .or_else(|| {
                let lower = name.to_lowercase();
                self.headers.iter().position(|h| h.to_lowercase() == lower)
            })
    }

    /// Resolves every requested column, reporting all missing ones at once.
    pub fn require_columns(&self, names: &[&str]) -> EngineResult<Vec<usize>> {
        let mut found = Vec::with_capacity(names.len());
        let mut missing = Vec::new();

        for name in names {
            match self.column_index(name) {
                Some(idx) => found.push(idx),
                None => missing.push((*name).to_string()),
            }
        }

        if missing.is_empty() {
            Ok(found)
        } else {
            Err(EngineError::MissingColumns { columns: missing })
        }
    }

    /// Returns the cell at a data row and column, or an empty cell when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Returns the 1-based sheet row number for a data row index.
    pub fn sheet_row(&self, row: usize) -> usize {
        self.header_row + row + 1
    }

    /// Returns true when every cell in the data row is blank.
    pub fn is_blank_row(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .is_none_or(|cells| cells.iter().all(CellValue::is_blank))
    }

    /// Reads a cell as display text.
    pub fn text(&self, row: usize, col: usize) -> String {
        self.cell(row, col).as_text()
    }

    /// Reads a cell as a decimal, failing on non-numeric text.
    pub fn decimal(&self, row: usize, col: usize) -> EngineResult<Option<Decimal>> {
        self.cell(row, col).as_decimal().map_err(|text| {
            EngineError::invalid_cell(
                self.sheet_row(row),
                &self.headers[col],
                format!("'{}' is not a number", text),
            )
        })
    }

    /// Reads a cell as a decimal, treating blank cells as zero.
    pub fn decimal_or_zero(&self, row: usize, col: usize) -> EngineResult<Decimal> {
        Ok(self.decimal(row, col)?.unwrap_or(Decimal::ZERO))
    }

    /// Reads a cell as a date; unparseable values are `None`.
    pub fn date(&self, row: usize, col: usize) -> Option<NaiveDate> {
        self.cell(row, col).as_date()
    }

    /// Reads a cell as a time of day, failing on text that is not a time.
    pub fn time(&self, row: usize, col: usize) -> EngineResult<Option<NaiveTime>> {
        self.cell(row, col).as_time().map_err(|text| {
            EngineError::invalid_cell(
                self.sheet_row(row),
                &self.headers[col],
                format!("'{}' is not a time of day", text),
            )
        })
    }
}

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Empty,
    }
}

/// Reads a sheet from an uploaded workbook.
///
/// With `Some(name)` the named sheet must exist; with `None` the first sheet is used.
///
/// # Errors
///
/// - `SpreadsheetRead` when the bytes are not a readable workbook
/// - `SheetNotFound` when the named sheet does not exist
/// - `EmptySheet` when the workbook has no sheets or the sheet has no header row
pub fn read_table(bytes: &[u8], sheet: Option<&str>) -> EngineResult<Table> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| EngineError::SpreadsheetRead {
            message: e.to_string(),
        })?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|s| s.as_str() == name)
            .or_else(|| sheet_names.iter().find(|s| s.eq_ignore_ascii_case(name)))
            .cloned()
            .ok_or_else(|| EngineError::SheetNotFound {
                sheet: name.to_string(),
            })?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| EngineError::EmptySheet {
                sheet: "<workbook>".to_string(),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| EngineError::SpreadsheetRead {
            message: e.to_string(),
        })?;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut grid = range.rows().map(|r| {
        // Pad to absolute column positions so column letters stay meaningful.
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(r.iter().map(convert_cell));
        cells
    });

    let header_cells = grid.next().ok_or_else(|| EngineError::EmptySheet {
        sheet: sheet_name.clone(),
    })?;
    let headers: Vec<String> = header_cells.iter().map(CellValue::as_text).collect();
    if headers.iter().all(String::is_empty) {
        return Err(EngineError::EmptySheet { sheet: sheet_name });
    }

    let mut rows: Vec<Vec<CellValue>> = grid.collect();
    while rows
        .last()
        .is_some_and(|r| r.iter().all(CellValue::is_blank))
    {
        rows.pop();
    }

    Ok(Table {
        sheet_name,
        headers,
        rows,
        header_row: start_row as usize + 1,
    })
}
