//! Store errors.

use std::fmt;
use toolstream_json::JsonStreamError;

/// A field that must be present on the first chunk of a tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkField {
    /// `id`
    Id,
    /// `function.name`
    FunctionName,
}

impl fmt::Display for ChunkField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("a tool call id"),
            Self::FunctionName => f.write_str("a function name"),
        }
    }
}

/// A configured store limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Maximum number of concurrent streams.
    Streams {
        /// Configured maximum.
        max: usize,
    },
    /// Maximum argument text per stream.
    ArgumentBytes {
        /// Configured maximum.
        max: usize,
    },
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Streams { max } => write!(f, "the limit of {max} concurrent tool calls"),
            Self::ArgumentBytes { max } => write!(f, "the limit of {max} argument bytes"),
        }
    }
}

/// Errors raised while applying a chunk.
///
/// A failing call leaves the store exactly as it was before the call.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The first chunk for an index lacked a required field.
    #[error("expected the initial chunk for tool call index {index} to have {field}")]
    InvalidChunk {
        /// The missing field.
        field: ChunkField,
        /// Tool call index.
        index: u32,
    },

    /// A parser is already bound to the index.
    #[error("a parser for tool call index {index} already exists")]
    DuplicateParser {
        /// Tool call index.
        index: u32,
    },

    /// The argument text cannot continue a JSON document.
    #[error("invalid JSON in arguments for tool call index {index}: {source}")]
    Parse {
        /// Tool call index.
        index: u32,
        /// Parser error.
        #[source]
        source: JsonStreamError,
    },

    /// Applying the chunk would exceed a configured limit.
    #[error("tool call index {index} exceeds {limit}")]
    LimitExceeded {
        /// Tool call index.
        index: u32,
        /// The limit that was hit.
        limit: Limit,
    },
}

impl StoreError {
    /// Tool call index the error refers to.
    pub fn index(&self) -> u32 {
        match self {
            Self::InvalidChunk { index, .. }
            | Self::DuplicateParser { index }
            | Self::Parse { index, .. }
            | Self::LimitExceeded { index, .. } => *index,
        }
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
