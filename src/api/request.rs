//! Request parsing for the payroll API.
//!
//! Every workflow endpoint takes a `multipart/form-data` upload. The form is
//! read completely into an [`UploadForm`] before any processing starts.

use std::collections::HashMap;

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;

use crate::error::{EngineError, EngineResult};

use super::response::{ApiError, ApiErrorResponse};

/// Extensions accepted by the Excel endpoints.
pub const EXCEL_EXTENSIONS: [&str; 2] = ["xlsx", "xls"];

/// Extensions accepted by the PDF protector.
pub const PDF_EXTENSIONS: [&str; 1] = ["pdf"];

/// Body-limit failures keep their own variant so they surface as 413.
fn upload_error(error: MultipartError) -> EngineError {
    let message = error.body_text();
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        EngineError::UploadTooLarge { message }
    } else {
        EngineError::InvalidUpload { message }
    }
}

/// A file part of a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// The client-side file name.
    pub file_name: String,
    /// The file contents.
    pub bytes: Vec<u8>,
}

/// A fully read multipart form.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    files: Vec<(String, UploadedFile)>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Reads every part of the form.
    ///
    /// Parts with a file name are files; all other parts are text fields.
    pub async fn read(mut multipart: Multipart) -> EngineResult<Self> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(upload_error)?
        {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);
            match file_name {
                Some(file_name) => {
                    let bytes = field.bytes().await.map_err(upload_error)?;
                    form.push_file(name, file_name, bytes.to_vec());
                }
                None => {
                    let text = field.text().await.map_err(upload_error)?;
                    form.fields.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    /// Adds a file part.
    pub fn push_file(&mut self, field: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) {
        self.files.push((
            field.into(),
            UploadedFile {
                file_name: file_name.into(),
                bytes,
            },
        ));
    }

    /// Adds a text part.
    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Every non-empty file uploaded under `field`, in upload order.
    pub fn files(&self, field: &str) -> Vec<&UploadedFile> {
        self.files
            .iter()
            .filter(|(name, file)| name == field && !file.file_name.is_empty() && !file.bytes.is_empty())
            .map(|(_, file)| file)
            .collect()
    }

    /// The trimmed value of a text field; blank values count as absent.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// A checkbox: present and not `false`/`0`/`off`.
    pub fn flag(&self, name: &str) -> bool {
        match self.text(name) {
            Some(value) => !matches!(value.to_lowercase().as_str(), "false" | "0" | "off" | "no"),
            None => self.fields.contains_key(name),
        }
    }

    /// The single file of an Excel endpoint, validated for presence and extension.
    pub fn require_file(&self, field: &str, allowed: &[&str]) -> Result<&UploadedFile, ApiErrorResponse> {
        let file = self
            .files(field)
            .into_iter()
            .next()
            .ok_or_else(|| ApiErrorResponse::bad_request(ApiError::no_file(field)))?;
        if !extension_allowed(&file.file_name, allowed) {
            return Err(ApiErrorResponse::bad_request(ApiError::invalid_file_type(
                &file.file_name,
                allowed,
            )));
        }
        Ok(file)
    }
}

/// True when the file name ends in one of `allowed` (case-insensitive).
pub fn extension_allowed(file_name: &str, allowed: &[&str]) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
