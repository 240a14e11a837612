//! Response types for the payroll API.
//!
//! This module defines the error body every endpoint returns on failure, the
//! mapping from [`EngineError`] to HTTP statuses, the JSON listings of
//! generated documents and the file attachment responses.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::store::StoreStats;

/// Content type of `.xlsx` downloads.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Content type of PDF downloads.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// No file was uploaded under `field`, or it was empty.
    pub fn no_file(field: &str) -> Self {
        Self::with_details(
            "NO_FILE",
            "No file was uploaded",
            format!("Send the file in the multipart field '{}'", field),
        )
    }

    /// The uploaded file has an extension the endpoint does not accept.
    pub fn invalid_file_type(file_name: &str, allowed: &[&str]) -> Self {
        Self::with_details(
            "INVALID_FILE_TYPE",
            format!("Unsupported file type: {}", file_name),
            format!("Accepted extensions: {}", allowed.join(", ")),
        )
    }

    /// A form field is missing or holds an unusable value.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::with_details(
            "INVALID_FIELD",
            message,
            format!("Check the form field '{}'", field),
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A `400 Bad Request` with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        json_response(self.status, &self.error)
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::SpreadsheetRead { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_SPREADSHEET",
                    message,
                    "The file could not be opened as an Excel workbook",
                ),
            ),
            EngineError::SpreadsheetWrite { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("SPREADSHEET_WRITE_ERROR", message),
            ),
            EngineError::SheetNotFound { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "SHEET_NOT_FOUND",
                    message,
                    "Check the 'nombre_hoja' field",
                ),
            ),
            EngineError::EmptySheet { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("EMPTY_SHEET", message),
            ),
            EngineError::MissingColumns { columns } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details("MISSING_COLUMNS", message, columns.join(", ")),
            ),
            EngineError::InvalidCell { row, column, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_CELL",
                    message,
                    format!("Row {}, column '{}'", row, column),
                ),
            ),
            EngineError::InvalidUpload { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_UPLOAD", message),
            ),
            EngineError::UploadTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiError::new("UPLOAD_TOO_LARGE", message),
            ),
            EngineError::BatchTooLarge { capacity, .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ApiError::with_details(
                    "BATCH_TOO_LARGE",
                    message,
                    format!("Split the upload into batches of at most {} documents", capacity),
                ),
            ),
            EngineError::PdfRender { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("PDF_RENDER_ERROR", message),
            ),
            EngineError::PdfProtect { file, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details("PDF_PROTECT_ERROR", message, file),
            ),
            EngineError::DocumentNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ApiError::with_details(
                    "DOCUMENT_NOT_FOUND",
                    message,
                    "Generated documents are kept in memory for a limited time",
                ),
            ),
            EngineError::CalculationError { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

/// Serializes `body` as a JSON response.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// A `Content-Disposition` value that survives non-ASCII file names.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}

/// A file download.
pub fn attachment_response(bytes: Vec<u8>, file_name: &str, content_type: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(file_name)),
        ],
        bytes,
    )
        .into_response()
}

/// The download URL of a stored document.
pub fn document_url(id: Uuid, file_name: &str) -> String {
    format!("/documents/{}/{}", id, urlencoding::encode(file_name))
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `ok`.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Document store occupancy.
    pub store: StoreStats,
}

/// One generated payslip.
#[derive(Debug, Clone, Serialize)]
pub struct PayslipListing {
    /// Worker name.
    pub nombre: String,
    /// Worker DNI.
    pub dni: String,
    /// Period as `MM/YYYY`.
    pub periodo: String,
    /// Net pay.
    pub neto_pagar: Decimal,
    /// Net pay in words.
    pub neto_pagar_letras: String,
    /// Stored document id.
    pub id: Uuid,
    /// Download name.
    pub nombre_archivo: String,
    /// Download URL.
    pub url: String,
}

/// Response body for `POST /payslips`.
#[derive(Debug, Clone, Serialize)]
pub struct PayslipBatchResponse {
    /// Number of payslips generated.
    pub total: usize,
    /// One entry per payslip, in sheet order.
    pub boletas: Vec<PayslipListing>,
}

/// One generated profit-sharing certificate.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateListing {
    /// Worker name.
    pub nombre: String,
    /// Worker DNI.
    pub dni: String,
    /// Share by days worked.
    pub por_dias: Decimal,
    /// Share by remuneration.
    pub por_remuneracion: Decimal,
    /// Gross share.
    pub total: Decimal,
    /// Share after withholding.
    pub neto_pagar: Decimal,
    /// Net share in words.
    pub neto_pagar_letras: String,
    /// Stored document id.
    pub id: Uuid,
    /// Download name.
    pub nombre_archivo: String,
    /// Download URL.
    pub url: String,
}

/// Response body for `POST /profit-sharing`.
#[derive(Debug, Clone, Serialize)]
pub struct CertificateBatchResponse {
    /// Fiscal year.
    pub ejercicio: i32,
    /// Amount distributed.
    pub monto_utilidades: Decimal,
    /// Sum of days worked.
    pub total_dias: Decimal,
    /// Sum of computable remuneration.
    pub total_remuneraciones: Decimal,
    /// One entry per worker, in sheet order.
    pub certificados: Vec<CertificateListing>,
}

/// Outcome of one file of a protection batch.
#[derive(Debug, Clone, Serialize)]
pub struct ProtectionListing {
    /// Uploaded file name.
    pub archivo: String,
    /// Whether the file was protected.
    pub exito: bool,
    /// Password that opens the protected file.
    #[serde(rename = "contraseña", skip_serializing_if = "Option::is_none")]
    pub contrasena: Option<String>,
    /// Stored document id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Download URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Why the file was not protected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
}

/// Response body for `POST /pdf-protector`.
#[derive(Debug, Clone, Serialize)]
pub struct ProtectionBatchResponse {
    /// Files protected.
    pub protegidos: usize,
    /// Files that could not be protected.
    pub fallidos: usize,
    /// Per-file outcomes, in upload order.
    pub resultados: Vec<ProtectionListing>,
    /// Uploads skipped before protection (wrong extension).
    pub advertencias: Vec<String>,
}
