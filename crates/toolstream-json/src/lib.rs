//! Incremental JSON parsing for streamed tool-call arguments.
//!
//! Language models deliver tool-call arguments as a JSON document cut into
//! arbitrary text fragments. [`JsonStreamParser`] consumes those fragments as
//! they arrive and reports the best-known decoded value after every value
//! boundary, so callers can render arguments before the document closes.
//!
//! Consumers should depend on the [`IncrementalParser`] trait rather than the
//! concrete parser.
//!
//! ```
//! use toolstream_json::{IncrementalParser, JsonStreamParser, ParseEvent};
//! use serde_json::json;
//!
//! let mut parser = JsonStreamParser::new();
//! let events = parser.feed_collect(r#"{"city":"Par"#).unwrap();
//! assert_eq!(events, vec![ParseEvent::Value(json!({"city": "Par"}))]);
//!
//! let events = parser.feed_collect(r#"is"}"#).unwrap();
//! assert_eq!(events.last(), Some(&ParseEvent::End(json!({"city": "Paris"}))));
//! ```

#![warn(missing_docs)]

mod error;
mod number;
mod parser;

pub use error::{JsonStreamError, Result};
pub use parser::{
    IncrementalParser, JsonStreamParser, ParseEvent, ParserOptions, DEFAULT_MAX_DEPTH,
};

// Re-export common types
pub use serde_json::Value as JsonValue;
