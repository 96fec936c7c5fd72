//! Assembled tool-call state and its wire form.

use crate::chunk::ToolCallKind;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Accumulated state of one tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallStream {
    /// Position of the tool call within the turn.
    pub index: u32,
    /// Tool call id from the first chunk.
    pub id: String,
    /// Tool call kind.
    #[serde(rename = "type")]
    pub kind: ToolCallKind,
    /// Function name and decoded arguments.
    pub function: StreamFunction,
}

/// Function half of a [`ToolCallStream`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamFunction {
    /// Concatenated name fragments.
    pub name: String,
    /// Best-known decoded arguments.
    pub arguments: JsonValue,
    /// Whether the argument document is still incomplete.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub partial: bool,
}

impl ToolCallStream {
    pub(crate) fn new(index: u32, id: &str, name: &str) -> Self {
        Self {
            index,
            id: id.to_string(),
            kind: ToolCallKind::Function,
            function: StreamFunction {
                name: name.to_string(),
                arguments: JsonValue::Object(Default::default()),
                partial: true,
            },
        }
    }

    /// Whether the argument document is complete.
    pub fn is_complete(&self) -> bool {
        !self.function.partial
    }

    /// Canonical wire form. See [`ChatCompletionMessageToolCall`].
    pub fn to_wire(&self) -> ChatCompletionMessageToolCall {
        ChatCompletionMessageToolCall {
            id: self.id.clone(),
            kind: self.kind,
            function: WireFunction {
                name: self.function.name.clone(),
                arguments: self.function.arguments.to_string(),
            },
        }
    }
}

/// A tool call in the form the completion API and tool dispatch expect.
///
/// `arguments` is the compact re-serialization of the decoded value, not the
/// original fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionMessageToolCall {
    /// Tool call id.
    pub id: String,
    /// Always `"function"`.
    #[serde(rename = "type")]
    pub kind: ToolCallKind,
    /// Function name and JSON-encoded arguments.
    pub function: WireFunction,
}

/// Function half of a [`ChatCompletionMessageToolCall`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireFunction {
    /// Function name.
    pub name: String,
    /// JSON-encoded arguments.
    pub arguments: String,
}

impl ChatCompletionMessageToolCall {
    /// Parse the arguments as JSON.
    pub fn parse_arguments(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::from_str(&self.function.arguments)
    }

    /// Parse arguments into a specific type.
    pub fn parse_arguments_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.function.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weather_call() -> ToolCallStream {
        let mut stream = ToolCallStream::new(0, "call_123", "get_weather");
        stream.function.arguments = json!({"location": "Paris", "days": 3});
        stream.function.partial = false;
        stream
    }

    #[test]
    fn test_new_stream_is_partial_with_empty_arguments() {
        let stream = ToolCallStream::new(4, "call_9", "search");
        assert_eq!(stream.function.arguments, json!({}));
        assert!(stream.function.partial);
        assert!(!stream.is_complete());
    }

    #[test]
    fn test_wire_form() {
        let wire = serde_json::to_string_pretty(&weather_call().to_wire()).unwrap();
        insta::assert_snapshot!(wire, @r###"
        {
          "id": "call_123",
          "type": "function",
          "function": {
            "name": "get_weather",
            "arguments": "{\"location\":\"Paris\",\"days\":3}"
          }
        }
        "###);
    }

    #[test]
    fn test_wire_arguments_round_trip() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Weather {
            location: String,
            days: u32,
        }

        let stream = weather_call();
        let wire = stream.to_wire();
        assert_eq!(wire.parse_arguments().unwrap(), stream.function.arguments);
        assert_eq!(
            wire.parse_arguments_as::<Weather>().unwrap(),
            Weather {
                location: "Paris".to_string(),
                days: 3
            }
        );
    }

    #[test]
    fn test_partial_flag_is_omitted_once_complete() {
        let json = serde_json::to_value(weather_call()).unwrap();
        assert!(json["function"].get("partial").is_none());

        let json = serde_json::to_value(ToolCallStream::new(0, "a", "b")).unwrap();
        assert_eq!(json["function"]["partial"], json!(true));
    }
}
