//! HTTP API module for the payroll engine.
//!
//! This module provides the upload endpoints for the ESSALUD, work-hours,
//! payslip, profit-sharing and PDF-protection workflows, plus the download
//! endpoint for generated documents.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{EXCEL_EXTENSIONS, PDF_EXTENSIONS, UploadForm, UploadedFile, extension_allowed};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
