//! Newsroom Common Library
//!
//! Shared code for the Newsroom API including:
//! - Database models, query construction and the repository
//! - Error types and the HTTP error normalizer
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;

// Re-export commonly used types
pub use errors::{AppError, Result};
pub use config::AppConfig;
pub use db::{DbPool, Repository};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
