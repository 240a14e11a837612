//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{AppConfig, CompanyConfig, EssaludConfig, WorkHoursConfig};

/// Loads and provides access to the engine configuration.
///
/// # Example
///
/// ```no_run
/// use planilla_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/planilla.yaml").unwrap();
/// println!("Company: {}", loader.company().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// Returns `ConfigNotFound` when the file cannot be read and
    /// `ConfigParseError` when it is not valid YAML for [`AppConfig`].
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::from_yaml_str(&content).map_err(|e| match e {
            EngineError::ConfigParseError { message, .. } => EngineError::ConfigParseError {
                path: path_str,
                message,
            },
            other => other,
        })
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        let config: AppConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        Self::from_config(config)
    }

    /// Wraps an already-built configuration after validating it.
    pub fn from_config(config: AppConfig) -> EngineResult<Self> {
        if config.store.capacity == 0 {
            return Err(EngineError::ConfigParseError {
                path: "store.capacity".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if config.essalud.rate <= Decimal::ZERO {
            return Err(EngineError::ConfigParseError {
                path: "essalud.rate".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(Self { config })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the employer data.
    pub fn company(&self) -> &CompanyConfig {
        &self.config.company
    }

    /// Returns the ESSALUD constants.
    pub fn essalud(&self) -> &EssaludConfig {
        &self.config.essalud
    }

    /// Returns the work-hour thresholds.
    pub fn work_hours(&self) -> &WorkHoursConfig {
        &self.config.work_hours
    }

    /// Gets the deduction rate for a pension system as written on a spreadsheet.
    ///
    /// Accepts `ONP` or `AFP <name>` (also a bare AFP name), case-insensitively.
    /// Returns `None` for systems that are not configured.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use planilla_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/planilla.yaml")?;
    /// let rate = loader.pension_rate("AFP Integra");
    /// assert!(rate.is_some());
    /// # Ok::<(), planilla_engine::error::EngineError>(())
    /// ```
    pub fn pension_rate(&self, system: &str) -> Option<Decimal> {
        let normalized = system.trim().to_lowercase();
        if normalized == "onp" || normalized == "snp" {
            return Some(self.config.pension.onp_rate);
        }

        let name = normalized
            .strip_prefix("afp")
            .map(str::trim)
            .unwrap_or(normalized.as_str());
        self.config.pension.afp.get(name).copied()
    }

    /// Returns the owner password used when protecting PDFs, if one is configured.
    pub fn pdf_owner_password(&self) -> Option<&str> {
        let password = self.config.pdf.owner_password.as_str();
        (!password.is_empty()).then_some(password)
    }
}
