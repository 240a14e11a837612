//! Payroll support engine for Peruvian payroll workflows
//!
//! This crate reads employee workbooks and applies the statutory formulas for
//! ESSALUD contributions, work hours and overtime, payslips (boletas de pago)
//! and profit-sharing certificates (utilidades). Results come back as Excel
//! workbooks or as PDFs held in a bounded in-memory store until downloaded.
//! Uploaded PDFs can also be password protected in batches.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod processing;
pub mod render;
pub mod spreadsheet;
pub mod store;
