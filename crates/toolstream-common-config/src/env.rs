//! Environment variable handling.

use crate::types::ToolstreamConfig;
use std::env;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },
}

/// Environment variable names.
pub mod vars {
    pub const TOOLSTREAM_MAX_STREAMS: &str = "TOOLSTREAM_MAX_STREAMS";
    pub const TOOLSTREAM_MAX_ARGUMENT_BYTES: &str = "TOOLSTREAM_MAX_ARGUMENT_BYTES";
    pub const TOOLSTREAM_MAX_DEPTH: &str = "TOOLSTREAM_MAX_DEPTH";
}

/// Typed access to environment variables.
pub struct Environment;

impl Environment {
    /// Get an optional string variable.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok()
    }

    /// Get an integer variable.
    pub fn get_int<T: std::str::FromStr>(var: &str) -> Result<Option<T>, EnvError> {
        match env::var(var) {
            Ok(v) => v.trim().parse().map(Some).map_err(|_| EnvError::InvalidValue {
                var: var.to_string(),
                message: format!("expected integer, got {v:?}"),
            }),
            Err(_) => Ok(None),
        }
    }

    /// Apply `TOOLSTREAM_*` overrides on top of `config`.
    pub fn apply_overrides(config: &mut ToolstreamConfig) -> Result<(), EnvError> {
        if let Some(max_streams) = Self::get_int(vars::TOOLSTREAM_MAX_STREAMS)? {
            config.store.max_streams = Some(max_streams);
        }
        if let Some(max_bytes) = Self::get_int(vars::TOOLSTREAM_MAX_ARGUMENT_BYTES)? {
            config.store.max_argument_bytes = Some(max_bytes);
        }
        if let Some(max_depth) = Self::get_int(vars::TOOLSTREAM_MAX_DEPTH)? {
            config.parser.max_depth = max_depth;
        }
        Ok(())
    }
}
