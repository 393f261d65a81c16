//! Core error type.
//!
//! Sub-crates define their own error enums and either convert into the
//! simulation-level error via `From` impls or wrap this one as a variant.

use thiserror::Error;

use crate::config::ConfigKey;

/// Errors produced by `agv-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid value {value} for config key {key}")]
    InvalidConfigValue { key: ConfigKey, value: f64 },
}

/// Shorthand result type for `agv-core`.
pub type CoreResult<T> = Result<T, CoreError>;
