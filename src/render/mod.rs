//! PDF output.
//!
//! Payslips and profit-sharing certificates are drawn at fixed coordinates on
//! a single Letter page. Uploaded PDFs can be password protected in batches.

mod canvas;
mod certificate;
mod metrics;
mod payslip;
mod protect;

pub use canvas::{Canvas, Font, PAGE_HEIGHT, PAGE_WIDTH};
pub use certificate::render_certificate;
pub use metrics::string_width;
pub use payslip::{money, render_payslip};
pub use protect::{
    KEY_LENGTH_BITS, PasswordSource, ProtectedPdf, ProtectionOutcome, password_from_file_name,
    protect_batch, protect_pdf,
};
