//! # qcdash Common Library
//!
//! Shared code for the quality compliance dashboard including:
//! - Record models and database initialization
//! - KPI aggregation over project record sets
//! - Compliance area scoring
//! - Configuration loading and root folder resolution
//! - Time utilities

pub mod areas;
pub mod config;
pub mod db;
pub mod error;
pub mod kpi;
pub mod time;

pub use error::{Error, Result};
pub use kpi::{KpiSettings, KpiSummary, RecordSets};
