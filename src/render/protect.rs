//! PDF password protection.
//!
//! Uploaded PDFs are re-saved with the standard security handler (RC4, 128-bit
//! key). A batch protects every file independently so that one broken upload
//! never prevents the others from being protected.

use std::sync::LazyLock;

use lopdf::{Document, EncryptionState, EncryptionVersion, Object, Permissions, StringFormat};
use regex::Regex;
use regex::bytes::Regex as BytesRegex;
use serde::Serialize;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Key length of the standard security handler, in bits.
pub const KEY_LENGTH_BITS: usize = 128;

const ALREADY_PROTECTED: &str = "PDF is already password protected";

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit run pattern is valid"));

/// An `/Encrypt` trailer entry: an indirect reference or an inline dictionary.
static ENCRYPT_ENTRY: LazyLock<BytesRegex> = LazyLock::new(|| {
    BytesRegex::new(r"/Encrypt\s*(?:\d+\s+\d+\s+R|<<)").expect("encrypt entry pattern is valid")
});

/// Where each file's password comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordSource {
    /// The first run of 8 to 12 digits in the file name (typically a DNI).
    FileName,
    /// The same password for every file.
    Manual(String),
}

/// Extracts a password from a file name: the first run of 8 to 12 digits.
///
/// # Example
///
/// ```
/// use planilla_engine::render::password_from_file_name;
///
/// assert_eq!(password_from_file_name("BOLETA_45678912_03_2024.pdf").as_deref(), Some("45678912"));
/// assert_eq!(password_from_file_name("reporte_2024.pdf"), None);
/// ```
pub fn password_from_file_name(file_name: &str) -> Option<String> {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    DIGIT_RUN
        .find_iter(stem)
        .map(|m| m.as_str())
        .find(|digits| (8..=12).contains(&digits.len()))
        .map(str::to_string)
}

fn protect_error(file: &str, message: impl std::fmt::Display) -> EngineError {
    EngineError::PdfProtect {
        file: file.to_string(),
        message: message.to_string(),
    }
}

fn is_encrypted(doc: &Document) -> bool {
    doc.is_encrypted() || doc.trailer.get(b"Encrypt").is_ok()
}

fn ensure_document_id(doc: &mut Document) {
    if doc.trailer.get(b"ID").is_ok() {
        return;
    }
    let id = Uuid::new_v4().as_bytes().to_vec();
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(id.clone(), StringFormat::Hexadecimal),
            Object::String(id, StringFormat::Hexadecimal),
        ]),
    );
}

/// Password-protects a PDF.
///
/// The owner password falls back to the user password when it is `None`.
///
/// # Errors
///
/// Returns `PdfProtect` when the bytes are not a readable PDF, when the PDF is
/// already encrypted, or when encryption fails.
pub fn protect_pdf(
    file_name: &str,
    bytes: &[u8],
    user_password: &str,
    owner_password: Option<&str>,
) -> EngineResult<Vec<u8>> {
    if !bytes.starts_with(b"%PDF") {
        return Err(protect_error(file_name, "file is not a PDF document"));
    }

    let mut doc = Document::load_mem(bytes).map_err(|e| {
        // encrypted files may fail to load without their password
        if ENCRYPT_ENTRY.is_match(bytes) {
            protect_error(file_name, ALREADY_PROTECTED)
        } else {
            protect_error(file_name, format!("unreadable PDF: {}", e))
        }
    })?;
    if is_encrypted(&doc) {
        return Err(protect_error(file_name, ALREADY_PROTECTED));
    }
    ensure_document_id(&mut doc);

    let version = EncryptionVersion::V2 {
        document: &doc,
        owner_password: owner_password.unwrap_or(user_password),
        user_password,
        key_length: KEY_LENGTH_BITS,
        permissions: Permissions::all(),
    };
    let state = EncryptionState::try_from(version).map_err(|e| protect_error(file_name, e))?;
    doc.encrypt(&state).map_err(|e| protect_error(file_name, e))?;

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| protect_error(file_name, e))?;
    Ok(output)
}

/// A successfully protected file.
#[derive(Debug, Clone, Serialize)]
pub struct ProtectedPdf {
    /// The password that opens the file.
    pub password: String,
    /// The protected bytes.
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// The outcome for one file of a batch.
#[derive(Debug, Clone)]
pub struct ProtectionOutcome {
    /// The uploaded file name.
    pub file_name: String,
    /// The protected file, or the reason it could not be protected.
    pub result: Result<ProtectedPdf, String>,
}

impl ProtectionOutcome {
    /// True when the file was protected.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Protects every file of a batch independently.
///
/// Outcomes are returned in upload order.
pub fn protect_batch(
    files: &[(String, Vec<u8>)],
    source: &PasswordSource,
    owner_password: Option<&str>,
) -> Vec<ProtectionOutcome> {
    files
        .iter()
        .map(|(file_name, bytes)| {
            let password = match source {
                PasswordSource::Manual(password) => Some(password.clone()),
                PasswordSource::FileName => password_from_file_name(file_name),
            };
            let result = match password {
                None => Err("no password of 8 to 12 digits found in the file name".to_string()),
                Some(password) if password.is_empty() => Err("password is empty".to_string()),
                Some(password) => protect_pdf(file_name, bytes, &password, owner_password)
                    .map(|bytes| ProtectedPdf { password, bytes })
                    .map_err(|e| match e {
                        EngineError::PdfProtect { message, .. } => message,
                        other => other.to_string(),
                    }),
            };
            ProtectionOutcome {
                file_name: file_name.clone(),
                result,
            }
        })
        .collect()
}
