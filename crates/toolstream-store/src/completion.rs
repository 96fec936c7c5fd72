//! Streamed chat completion chunks and their classification.

use crate::chunk::ToolCallChunk;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One server-sent chunk of a streamed chat completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    /// Completion id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Model that produced the chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Choices carried by the chunk, usually exactly one.
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    /// Token usage, sent on the final chunk when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<JsonValue>,
}

/// A choice within a [`ChatCompletionChunk`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkChoice {
    /// Choice index.
    #[serde(default)]
    pub index: u32,
    /// Incremental message content.
    #[serde(default)]
    pub delta: ChunkDelta,
    /// Why generation stopped, on the last chunk of the choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Incremental assistant message content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkDelta {
    /// Message role, on the first chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Text fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Reasoning text fragment from models served with a reasoning parser.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,
    /// Tool call fragments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallChunk>>,
}

impl ChatCompletionChunk {
    /// Decode a chunk from the JSON payload of one stream event.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Delta of the first choice.
    pub fn first_delta(&self) -> Option<&ChunkDelta> {
        self.choices.first().map(|choice| &choice.delta)
    }
}

/// Whether the chunk carries message text.
///
/// Empty content still counts. A usage-only chunk with no choices is treated
/// as content.
pub fn is_content_chunk(chunk: &ChatCompletionChunk) -> bool {
    if chunk.usage.is_some() && chunk.choices.is_empty() {
        return true;
    }
    chunk
        .first_delta()
        .map_or(false, |delta| delta.content.is_some())
}

/// Whether the chunk carries reasoning text.
pub fn is_reasoning_chunk(chunk: &ChatCompletionChunk) -> bool {
    if chunk.usage.is_some() {
        return false;
    }
    chunk
        .first_delta()
        .map_or(false, |delta| delta.reasoning_content.is_some())
}

/// Whether the chunk carries tool call fragments.
pub fn is_tool_call_chunk(chunk: &ChatCompletionChunk) -> bool {
    chunk
        .first_delta()
        .map_or(false, |delta| delta.tool_calls.is_some())
}
