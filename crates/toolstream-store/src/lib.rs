//! Streaming tool-call assembly for LLM chat completions.
//!
//! Models stream tool calls as chunks keyed by index, each carrying fragments
//! of the id, function name and JSON-encoded arguments.
//! [`ToolCallStreamStore`] decodes the arguments incrementally so callers can
//! show and act on them while they arrive, and publishes an immutable
//! [`Snapshot`] after every change.
//!
//! [`ChatStreamAssembler`] routes whole completion chunks to the tool-call
//! store and to [`TextStreamStore`]s for message and reasoning text.

#![warn(missing_docs)]

mod assembler;
mod chunk;
mod completion;
mod error;
mod notify;
mod store;
mod stream;
mod text;

pub use assembler::ChatStreamAssembler;
pub use chunk::{FunctionDelta, ToolCallChunk, ToolCallKind};
pub use completion::{
    is_content_chunk, is_reasoning_chunk, is_tool_call_chunk, ChatCompletionChunk, ChunkChoice,
    ChunkDelta,
};
pub use error::{ChunkField, Limit, Result, StoreError};
pub use notify::{Subscribers, Subscription};
pub use store::{ParserFactory, Snapshot, ToolCallStreamStore};
pub use stream::{ChatCompletionMessageToolCall, StreamFunction, ToolCallStream, WireFunction};

// Re-export common types
pub use serde_json::Value as JsonValue;
pub use toolstream_common_config::StoreConfig;
pub use toolstream_json::{IncrementalParser, JsonStreamError, ParseEvent};
