//! HTTP API handlers for qcdash-server

pub mod areas;
pub mod audits;
pub mod buildinfo;
pub mod capas;
pub mod dashboard;
pub mod documents;
pub mod error;
pub mod findings;
pub mod health;
pub mod metrics;
pub mod projects;
pub mod training;
pub mod types;

pub use buildinfo::get_build_info;
pub use error::ApiError;
pub use health::health_routes;
