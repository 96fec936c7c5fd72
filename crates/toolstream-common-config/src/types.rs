//! Configuration types.

use serde::{Deserialize, Serialize};

/// Default parser nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolstreamConfig {
    /// Tool-call store limits.
    pub store: StoreConfig,
    /// Incremental parser settings.
    pub parser: ParserConfig,
}

/// Limits applied by the tool-call store.
///
/// `None` means unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of concurrent tool-call streams.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_streams: Option<usize>,
    /// Maximum accumulated argument text per stream, in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_argument_bytes: Option<usize>,
}

/// Incremental parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum nesting depth of argument documents.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
