//! Streamed tool-call chunks as delivered by the completion API.

use serde::{Deserialize, Serialize};

/// Kind of tool call. Only functions exist on the wire today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCallKind {
    /// A function call.
    #[default]
    Function,
}

/// Function fields of a chunk, each a fragment of the full value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDelta {
    /// Name fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Fragment of the JSON-encoded arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

/// One incremental update for the tool call at `index`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallChunk {
    /// Position of the tool call within the current turn.
    pub index: u32,
    /// Tool call id, required on the first chunk for an index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Tool call kind.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ToolCallKind>,
    /// Function fragments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionDelta>,
}

impl ToolCallChunk {
    /// Create an empty chunk for `index`.
    pub fn new(index: u32) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Create the opening chunk of a function call.
    pub fn start(index: u32, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(index)
            .with_id(id)
            .with_kind(ToolCallKind::Function)
            .with_name(name)
    }

    /// Create a chunk carrying only an argument fragment.
    pub fn arguments(index: u32, fragment: impl Into<String>) -> Self {
        Self::new(index).with_arguments(fragment)
    }

    /// Set the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the kind.
    pub fn with_kind(mut self, kind: ToolCallKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the name fragment.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.function.get_or_insert_with(FunctionDelta::default).name = Some(name.into());
        self
    }

    /// Set the argument fragment.
    pub fn with_arguments(mut self, fragment: impl Into<String>) -> Self {
        self.function.get_or_insert_with(FunctionDelta::default).arguments = Some(fragment.into());
        self
    }

    /// Non-empty id, if any.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Name fragment, if any.
    pub fn name(&self) -> Option<&str> {
        self.function.as_ref()?.name.as_deref()
    }

    /// Argument fragment, if any.
    pub fn argument_fragment(&self) -> Option<&str> {
        self.function.as_ref()?.arguments.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_openai_delta() {
        let chunk: ToolCallChunk = serde_json::from_str(
            r#"{"index":0,"id":"call_abc","type":"function","function":{"name":"get_weather","arguments":""}}"#,
        )
        .unwrap();

        assert_eq!(chunk, ToolCallChunk::start(0, "call_abc", "get_weather").with_arguments(""));
        assert_eq!(chunk.id(), Some("call_abc"));
        assert_eq!(chunk.name(), Some("get_weather"));
        assert_eq!(chunk.argument_fragment(), Some(""));
    }

    #[test]
    fn test_decode_continuation_delta() {
        let chunk: ToolCallChunk =
            serde_json::from_str(r#"{"index":1,"function":{"arguments":"{\"lo"}}"#).unwrap();

        assert_eq!(chunk, ToolCallChunk::arguments(1, r#"{"lo"#));
        assert_eq!(chunk.id(), None);
        assert_eq!(chunk.name(), None);
    }

    #[test]
    fn test_empty_id_counts_as_missing() {
        let chunk = ToolCallChunk::new(0).with_id("");
        assert_eq!(chunk.id(), None);
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let json = serde_json::to_value(ToolCallChunk::arguments(2, "}")).unwrap();
        assert_eq!(json, serde_json::json!({"index": 2, "function": {"arguments": "}"}}));
    }
}
