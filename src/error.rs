//! Error types for the payroll engine.
//!
//! Every failure while loading configuration, reading workbooks, applying
//! payroll formulas or producing documents is an [`EngineError`]. The HTTP
//! layer maps each variant to a status code and error code.

use thiserror::Error;

/// Errors raised by the payroll engine.
///
/// # Example
///
/// ```
/// use planilla_engine::error::EngineError;
///
/// let error = EngineError::invalid_cell(7, "Dias_Mes", "must be greater than zero");
/// assert_eq!(
///     error.to_string(),
///     "Invalid value in row 7, column 'Dias_Mes': must be greater than zero"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The YAML configuration file does not exist.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was looked up.
        path: String,
    },

    /// The configuration file is not valid YAML for [`crate::config::AppConfig`].
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// Path of the rejected file.
        path: String,
        /// Parser message.
        message: String,
    },

    /// The uploaded workbook could not be opened or decoded.
    #[error("Failed to read spreadsheet: {message}")]
    SpreadsheetRead {
        /// A description of the read error.
        message: String,
    },

    /// A result workbook could not be written.
    #[error("Failed to write spreadsheet: {message}")]
    SpreadsheetWrite {
        /// A description of the write error.
        message: String,
    },

    /// The requested sheet does not exist in the workbook.
    #[error("Sheet '{sheet}' not found in workbook")]
    SheetNotFound {
        /// The sheet name that was requested.
        sheet: String,
    },

    /// The workbook or sheet contains no usable data.
    #[error("Sheet '{sheet}' contains no data")]
    EmptySheet {
        /// The sheet that was empty.
        sheet: String,
    },

    /// One or more required columns are missing from the header row.
    #[error("Missing columns: {}", columns.join(", "))]
    MissingColumns {
        /// The missing column names, in the order they were requested.
        columns: Vec<String>,
    },

    /// A cell holds a value the formulas cannot work with.
    #[error("Invalid value in row {row}, column '{column}': {message}")]
    InvalidCell {
        /// The 1-based spreadsheet row (the header is row 1).
        row: usize,
        /// The column header.
        column: String,
        /// A description of what made the cell invalid.
        message: String,
    },

    /// The upload itself was unusable (no file, wrong type, bad form field).
    #[error("Invalid upload: {message}")]
    InvalidUpload {
        /// A description of the problem.
        message: String,
    },

    /// The request body exceeded `limits.max_upload_bytes`.
    #[error("Upload too large: {message}")]
    UploadTooLarge {
        /// A description of the limit that was hit.
        message: String,
    },

    /// A batch would produce more documents than the store can hold at once.
    #[error("Batch of {documents} documents exceeds the store capacity of {capacity}")]
    BatchTooLarge {
        /// Documents the batch would store.
        documents: usize,
        /// Configured `store.capacity`.
        capacity: usize,
    },

    /// A PDF document could not be rendered.
    #[error("Failed to render PDF: {message}")]
    PdfRender {
        /// A description of the render error.
        message: String,
    },

    /// A PDF could not be password protected.
    #[error("Failed to protect '{file}': {message}")]
    PdfProtect {
        /// The original file name.
        file: String,
        /// A description of the failure.
        message: String,
    },

    /// No stored document exists for the given id (never created, evicted or expired).
    #[error("Document not found or expired: {id}")]
    DocumentNotFound {
        /// The requested document id.
        id: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidCell`] error.
    pub fn invalid_cell(row: usize, column: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidCell {
            row,
            column: column.to_string(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
