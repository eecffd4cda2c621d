//! Shared utilities, configuration, and error handling for Keepsake
//!
//! This crate provides common functionality used across the Keepsake services:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP mapping
//! - Request extractors

pub mod config;
pub mod error;
pub mod extractors;
pub mod state;
pub mod store;

pub use config::{Config, LineLimitsConfig, LogFormat};
pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};
pub use state::StateError;
pub use store::StoreError;
