//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// The interface to bind.
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

/// Request limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
}

/// Settings for the generated-document store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Maximum number of documents kept at once.
    pub capacity: usize,
    /// Seconds a document stays downloadable after it was generated.
    pub ttl_seconds: u64,
}

/// Employer data printed on payslips and certificates.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyConfig {
    /// Legal name (razón social).
    pub name: String,
    /// Registered address (domicilio fiscal).
    pub address: String,
    /// Taxpayer number (R.U.C.).
    pub ruc: String,
}

/// ESSALUD contribution constants.
#[derive(Debug, Clone, Deserialize)]
pub struct EssaludConfig {
    /// Contribution rate applied to the remuneration (0.09).
    pub rate: Decimal,
    /// Minimum monthly remuneration used as the contribution floor.
    pub minimum_remuneration: Decimal,
    /// Monthly base spread over the month days when the worker had subsidy days.
    pub subsidy_daily_base: Decimal,
}

/// Work-hour thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkHoursConfig {
    /// Ordinary hours per day; anything above is overtime.
    pub daily_threshold_hours: Decimal,
    /// Overtime hours paid at the first (25%) tier.
    pub overtime_first_tier_hours: Decimal,
}

/// Pension deduction rates.
#[derive(Debug, Clone, Deserialize)]
pub struct PensionConfig {
    /// Rate for the public system (ONP).
    pub onp_rate: Decimal,
    /// Total deduction rate per AFP, keyed by lowercase AFP name.
    pub afp: HashMap<String, Decimal>,
}

/// PDF protection settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PdfConfig {
    /// Owner password for protected PDFs. Empty means "same as the user password".
    #[serde(default)]
    pub owner_password: String,
}

/// The complete application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Request limits.
    pub limits: LimitsConfig,
    /// Document store settings.
    pub store: StoreConfig,
    /// Employer data.
    pub company: CompanyConfig,
    /// ESSALUD constants.
    pub essalud: EssaludConfig,
    /// Work-hour thresholds.
    pub work_hours: WorkHoursConfig,
    /// Pension deduction rates.
    pub pension: PensionConfig,
    /// PDF protection settings.
    #[serde(default)]
    pub pdf: PdfConfig,
}
