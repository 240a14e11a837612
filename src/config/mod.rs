//! Configuration module for the payroll engine.
//!
//! This module provides types and functionality for loading the engine
//! configuration from YAML: server and upload limits, document store sizing,
//! employer data and the statutory rates used by the formulas.
//!
//! # Example
//!
//! ```no_run
//! use planilla_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/planilla.yaml").unwrap();
//! println!("ESSALUD rate: {}", loader.essalud().rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AppConfig, CompanyConfig, EssaludConfig, LimitsConfig, PdfConfig, PensionConfig,
    ServerConfig, StoreConfig, WorkHoursConfig,
};
