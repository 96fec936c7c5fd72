//! Incremental JSON parser.
//!
//! The parser keeps an explicit stack of open containers plus the scalar token
//! currently being read, so a document can be fed in fragments of any width,
//! down to a single character, and resumed exactly where the previous fragment
//! stopped.
//!
//! # Emission cadence
//!
//! [`ParseEvent::Value`] carries the best-known value of the whole document
//! and is only emitted when that value differs from the last one emitted:
//!
//! - when a scalar completes at any depth or a container closes,
//! - once at the end of every [`IncrementalParser::feed`] call, covering
//!   growing strings and freshly opened containers.
//!
//! [`ParseEvent::End`] follows the event that completed the top-level
//! document.
//!
//! # Partial values
//!
//! - Strings are exposed up to the last fully decoded character. An unfinished
//!   escape or an unpaired high surrogate is held back.
//! - Numbers are exposed once their text is a valid number (`12`, `1.5`) and
//!   held back in intermediate states (`-`, `1.`, `1e`).
//! - Literals (`true`, `false`, `null`) appear only once fully read.
//! - Object members appear once their value has started.
//! - Containers appear as soon as they open.
//!
//! A top-level number has no closing delimiter. The document counts as
//! complete whenever the number text is valid, and a further digit re-opens it
//! (`1` then `0` yields `End(1)` then `End(10)`). Whitespace after the number,
//! or [`IncrementalParser::finish`], seals it.

use crate::error::{JsonStreamError, Result};
use crate::number::{NumberState, NumberToken};
use serde_json::{Map, Value};

/// Default nesting limit, matching serde_json's recursion limit.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Parser tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum number of simultaneously open containers.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Notification produced while feeding text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseEvent {
    /// The best-known value of the top-level document changed.
    Value(Value),
    /// The top-level document is syntactically complete.
    End(Value),
}

impl ParseEvent {
    /// The value carried by the event.
    pub fn value(&self) -> &Value {
        match self {
            Self::Value(value) | Self::End(value) => value,
        }
    }

    /// Whether this event marks the end of the document.
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End(_))
    }
}

/// A streaming JSON parser that accepts text in arbitrary fragments.
pub trait IncrementalParser: Send {
    /// Consume a fragment, passing every resulting event to `sink` in order.
    ///
    /// Once an error is returned the parser is poisoned and every later call
    /// returns the same error.
    fn feed(&mut self, text: &str, sink: &mut dyn FnMut(ParseEvent)) -> Result<()>;

    /// Signal end of input, returning the final value.
    fn finish(&mut self) -> Result<Value>;

    /// Whether the text fed so far forms a complete document.
    fn is_complete(&self) -> bool;

    /// Best-known decoded value so far, `None` before any value has started.
    fn current_value(&self) -> Option<Value>;

    /// Total bytes consumed since construction.
    fn bytes_consumed(&self) -> usize;

    /// Feed a fragment and collect its events.
    fn feed_collect(&mut self, text: &str) -> Result<Vec<ParseEvent>> {
        let mut events = Vec::new();
        self.feed(text, &mut |event| events.push(event))?;
        Ok(events)
    }
}

/// What the parser will accept next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Value,
    ValueOrArrayEnd,
    KeyOrObjectEnd,
    Key,
    Colon,
    ObjectCommaOrEnd,
    ArrayCommaOrEnd,
    Nothing,
}

impl Expect {
    fn describe(self) -> &'static str {
        match self {
            Self::Value => "a value",
            Self::ValueOrArrayEnd => "a value or ']'",
            Self::KeyOrObjectEnd => "a key or '}'",
            Self::Key => "a key",
            Self::Colon => "':'",
            Self::ObjectCommaOrEnd => "',' or '}'",
            Self::ArrayCommaOrEnd => "',' or ']'",
            Self::Nothing => "end of input",
        }
    }
}

#[derive(Debug)]
enum Frame {
    Object {
        map: Map<String, Value>,
        key: Option<String>,
        expect: Expect,
    },
    Array {
        items: Vec<Value>,
        expect: Expect,
    },
}

impl Frame {
    fn expect(&self) -> Expect {
        match self {
            Self::Object { expect, .. } | Self::Array { expect, .. } => *expect,
        }
    }

    fn set_expect(&mut self, next: Expect) {
        match self {
            Self::Object { expect, .. } | Self::Array { expect, .. } => *expect = next,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Self::Object { map, .. } => Value::Object(map),
            Self::Array { items, .. } => Value::Array(items),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    None,
    Backslash,
    Unicode { digits: u8, code: u32 },
}

#[derive(Debug)]
struct StringToken {
    buf: String,
    is_key: bool,
    escape: Escape,
    high_surrogate: Option<u32>,
}

impl StringToken {
    fn new(is_key: bool) -> Self {
        Self {
            buf: String::new(),
            is_key,
            escape: Escape::None,
            high_surrogate: None,
        }
    }
}

#[derive(Debug)]
struct LiteralToken {
    text: &'static str,
    matched: usize,
    value: Value,
}

#[derive(Debug, Default)]
enum Token {
    #[default]
    None,
    Str(StringToken),
    Num(NumberToken),
    Lit(LiteralToken),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Running,
    Done,
}

/// The built-in [`IncrementalParser`].
#[derive(Debug)]
pub struct JsonStreamParser {
    options: ParserOptions,
    stack: Vec<Frame>,
    token: Token,
    phase: Phase,
    root: Option<Value>,
    last_emitted: Option<Value>,
    end_announced: bool,
    offset: usize,
    failed: Option<JsonStreamError>,
}

impl Default for JsonStreamParser {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonStreamParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::with_options(ParserOptions::default())
    }

    /// Create a parser with the given options.
    pub fn with_options(options: ParserOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            token: Token::None,
            phase: Phase::Start,
            root: None,
            last_emitted: None,
            end_announced: false,
            offset: 0,
            failed: None,
        }
    }

    /// Options this parser was built with.
    pub fn options(&self) -> ParserOptions {
        self.options
    }

    fn step(&mut self, c: char, sink: &mut dyn FnMut(ParseEvent)) -> Result<()> {
        match std::mem::take(&mut self.token) {
            Token::None => self.structural(c, sink),
            Token::Str(token) => self.string_char(token, c, sink),
            Token::Num(token) => self.number_char(token, c, sink),
            Token::Lit(token) => self.literal_char(token, c, sink),
        }
    }

    fn expect(&self) -> Expect {
        match self.stack.last() {
            Some(frame) => frame.expect(),
            None if self.phase == Phase::Done => Expect::Nothing,
            None => Expect::Value,
        }
    }

    fn set_expect(&mut self, next: Expect) {
        if let Some(frame) = self.stack.last_mut() {
            frame.set_expect(next);
        }
    }

    fn unexpected(&self, ch: char, expect: Expect) -> JsonStreamError {
        JsonStreamError::UnexpectedCharacter {
            ch,
            offset: self.offset,
            expected: expect.describe(),
        }
    }

    fn structural(&mut self, c: char, sink: &mut dyn FnMut(ParseEvent)) -> Result<()> {
        if matches!(c, ' ' | '\t' | '\n' | '\r') {
            return Ok(());
        }

        let expect = self.expect();
        match (expect, c) {
            (Expect::Nothing, _) => Err(JsonStreamError::TrailingCharacters {
                ch: c,
                offset: self.offset,
            }),
            (Expect::ValueOrArrayEnd, ']') => self.close(sink),
            (Expect::Value | Expect::ValueOrArrayEnd, _) => self.begin_value(c, expect),
            (Expect::KeyOrObjectEnd | Expect::Key, '"') => {
                self.token = Token::Str(StringToken::new(true));
                Ok(())
            }
            (Expect::KeyOrObjectEnd | Expect::ObjectCommaOrEnd, '}') => self.close(sink),
            (Expect::Colon, ':') => {
                self.set_expect(Expect::Value);
                Ok(())
            }
            (Expect::ObjectCommaOrEnd, ',') => {
                self.set_expect(Expect::Key);
                Ok(())
            }
            (Expect::ArrayCommaOrEnd, ',') => {
                self.set_expect(Expect::Value);
                Ok(())
            }
            (Expect::ArrayCommaOrEnd, ']') => self.close(sink),
            _ => Err(self.unexpected(c, expect)),
        }
    }

    fn begin_value(&mut self, c: char, expect: Expect) -> Result<()> {
        self.phase = Phase::Running;
        match c {
            '{' => self.open(Frame::Object {
                map: Map::new(),
                key: None,
                expect: Expect::KeyOrObjectEnd,
            }),
            '[' => self.open(Frame::Array {
                items: Vec::new(),
                expect: Expect::ValueOrArrayEnd,
            }),
            '"' => {
                self.token = Token::Str(StringToken::new(false));
                Ok(())
            }
            't' => self.begin_literal("true", Value::Bool(true)),
            'f' => self.begin_literal("false", Value::Bool(false)),
            'n' => self.begin_literal("null", Value::Null),
            c => match NumberState::start(c) {
                Some(state) => {
                    self.token = Token::Num(NumberToken::new(c, state));
                    Ok(())
                }
                None => Err(self.unexpected(c, expect)),
            },
        }
    }

    fn begin_literal(&mut self, text: &'static str, value: Value) -> Result<()> {
        self.token = Token::Lit(LiteralToken {
            text,
            matched: 1,
            value,
        });
        Ok(())
    }

    fn open(&mut self, frame: Frame) -> Result<()> {
        if self.stack.len() >= self.options.max_depth {
            return Err(JsonStreamError::DepthLimitExceeded {
                max_depth: self.options.max_depth,
                offset: self.offset,
            });
        }
        self.stack.push(frame);
        Ok(())
    }

    fn close(&mut self, sink: &mut dyn FnMut(ParseEvent)) -> Result<()> {
        match self.stack.pop() {
            Some(frame) => self.complete_value(frame.into_value(), sink),
            None => Err(self.unexpected('}', Expect::Value)),
        }
    }

    fn string_char(
        &mut self,
        mut token: StringToken,
        c: char,
        sink: &mut dyn FnMut(ParseEvent),
    ) -> Result<()> {
        match token.escape {
            Escape::Backslash => {
                let decoded = match c {
                    '"' => '"',
                    '\\' => '\\',
                    '/' => '/',
                    'b' => '\u{8}',
                    'f' => '\u{c}',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'u' => {
                        token.escape = Escape::Unicode { digits: 0, code: 0 };
                        self.token = Token::Str(token);
                        return Ok(());
                    }
                    _ => {
                        return Err(JsonStreamError::InvalidEscape {
                            ch: c,
                            offset: self.offset,
                        })
                    }
                };
                if token.high_surrogate.is_some() {
                    return Err(JsonStreamError::InvalidUnicode {
                        offset: self.offset,
                    });
                }
                token.buf.push(decoded);
                token.escape = Escape::None;
            }
            Escape::Unicode { digits, code } => {
                let digit = c.to_digit(16).ok_or(JsonStreamError::InvalidEscape {
                    ch: c,
                    offset: self.offset,
                })?;
                let code = code * 16 + digit;
                if digits < 3 {
                    token.escape = Escape::Unicode {
                        digits: digits + 1,
                        code,
                    };
                } else {
                    token.escape = Escape::None;
                    self.push_code_unit(&mut token, code)?;
                }
            }
            Escape::None => {
                if token.high_surrogate.is_some() && c != '\\' {
                    return Err(JsonStreamError::InvalidUnicode {
                        offset: self.offset,
                    });
                }
                match c {
                    '"' => return self.finish_string(token, sink),
                    '\\' => token.escape = Escape::Backslash,
                    c if c < '\u{20}' => {
                        return Err(JsonStreamError::ControlCharacter {
                            offset: self.offset,
                        })
                    }
                    c => token.buf.push(c),
                }
            }
        }
        self.token = Token::Str(token);
        Ok(())
    }

    fn push_code_unit(&self, token: &mut StringToken, code: u32) -> Result<()> {
        let invalid = JsonStreamError::InvalidUnicode {
            offset: self.offset,
        };
        match code {
            0xD800..=0xDBFF => {
                if token.high_surrogate.is_some() {
                    return Err(invalid);
                }
                token.high_surrogate = Some(code);
            }
            0xDC00..=0xDFFF => {
                let high = token.high_surrogate.take().ok_or(invalid.clone())?;
                let scalar = 0x10000 + ((high - 0xD800) << 10) + (code - 0xDC00);
                token.buf.push(char::from_u32(scalar).ok_or(invalid)?);
            }
            _ => {
                if token.high_surrogate.is_some() {
                    return Err(invalid);
                }
                token.buf.push(char::from_u32(code).ok_or(invalid)?);
            }
        }
        Ok(())
    }

    fn finish_string(
        &mut self,
        token: StringToken,
        sink: &mut dyn FnMut(ParseEvent),
    ) -> Result<()> {
        if !token.is_key {
            return self.complete_value(Value::String(token.buf), sink);
        }
        if let Some(Frame::Object { key, expect, .. }) = self.stack.last_mut() {
            *key = Some(token.buf);
            *expect = Expect::Colon;
        }
        Ok(())
    }

    fn number_char(
        &mut self,
        mut token: NumberToken,
        c: char,
        sink: &mut dyn FnMut(ParseEvent),
    ) -> Result<()> {
        if let Some(next) = token.state.next(c) {
            token.text.push(c);
            token.state = next;
            self.token = Token::Num(token);
            return Ok(());
        }

        let leading_zero = token.state == NumberState::Zero && c.is_ascii_digit();
        let value = match token.value() {
            Some(value) if !leading_zero => value,
            _ => {
                token.text.push(c);
                return Err(JsonStreamError::InvalidNumber {
                    text: token.text,
                    offset: self.offset,
                });
            }
        };
        self.complete_value(value, sink)?;
        self.structural(c, sink)
    }

    fn literal_char(
        &mut self,
        mut token: LiteralToken,
        c: char,
        sink: &mut dyn FnMut(ParseEvent),
    ) -> Result<()> {
        if token.text[token.matched..].chars().next() != Some(c) {
            return Err(JsonStreamError::UnexpectedCharacter {
                ch: c,
                offset: self.offset,
                expected: token.text,
            });
        }
        token.matched += 1;
        if token.matched == token.text.len() {
            return self.complete_value(token.value, sink);
        }
        self.token = Token::Lit(token);
        Ok(())
    }

    fn complete_value(&mut self, value: Value, sink: &mut dyn FnMut(ParseEvent)) -> Result<()> {
        match self.stack.last_mut() {
            None => {
                self.root = Some(value);
                self.phase = Phase::Done;
                self.emit_value(sink);
                self.announce_end(sink);
            }
            Some(Frame::Object { map, key, expect }) => {
                if let Some(key) = key.take() {
                    map.insert(key, value);
                }
                *expect = Expect::ObjectCommaOrEnd;
                self.emit_value(sink);
            }
            Some(Frame::Array { items, expect }) => {
                items.push(value);
                *expect = Expect::ArrayCommaOrEnd;
                self.emit_value(sink);
            }
        }
        Ok(())
    }

    fn emit_value(&mut self, sink: &mut dyn FnMut(ParseEvent)) {
        let snapshot = self.snapshot();
        if snapshot.is_some() && snapshot != self.last_emitted {
            if let Some(value) = &snapshot {
                sink(ParseEvent::Value(value.clone()));
            }
            self.last_emitted = snapshot;
            self.end_announced = false;
        }
    }

    fn announce_end(&mut self, sink: &mut dyn FnMut(ParseEvent)) {
        if self.end_announced {
            return;
        }
        if let Some(value) = self.snapshot() {
            sink(ParseEvent::End(value));
            self.end_announced = true;
        }
    }

    fn flush(&mut self, sink: &mut dyn FnMut(ParseEvent)) {
        let was_announced = self.end_announced;
        self.emit_value(sink);

        let complete = self.is_complete();
        if was_announced && self.end_announced && !complete {
            // A top-level number went from valid to an intermediate state.
            if let Some(value) = &self.last_emitted {
                sink(ParseEvent::Value(value.clone()));
            }
            self.end_announced = false;
        }
        if complete {
            self.announce_end(sink);
        }
    }

    fn partial_scalar(&self) -> Option<Value> {
        match &self.token {
            Token::Str(token) if !token.is_key => Some(Value::String(token.buf.clone())),
            Token::Num(token) => token.value(),
            _ => None,
        }
    }

    fn snapshot(&self) -> Option<Value> {
        if self.phase == Phase::Done {
            return self.root.clone();
        }
        let mut child = self.partial_scalar();
        for frame in self.stack.iter().rev() {
            child = Some(match frame {
                Frame::Object { map, key, .. } => {
                    let mut map = map.clone();
                    if let (Some(key), Some(value)) = (key, child) {
                        map.insert(key.clone(), value);
                    }
                    Value::Object(map)
                }
                Frame::Array { items, .. } => {
                    let mut items = items.clone();
                    items.extend(child);
                    Value::Array(items)
                }
            });
        }
        child
    }

    fn top_level_number(&self) -> Option<Value> {
        match &self.token {
            Token::Num(token) if self.stack.is_empty() => token.value(),
            _ => None,
        }
    }
}

impl IncrementalParser for JsonStreamParser {
    fn feed(&mut self, text: &str, sink: &mut dyn FnMut(ParseEvent)) -> Result<()> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        for c in text.chars() {
            if let Err(err) = self.step(c, sink) {
                tracing::debug!(error = %err, "json stream rejected input");
                self.failed = Some(err.clone());
                return Err(err);
            }
            self.offset += c.len_utf8();
        }
        self.flush(sink);
        Ok(())
    }

    fn finish(&mut self) -> Result<Value> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        if let Some(value) = self.top_level_number() {
            self.token = Token::None;
            self.root = Some(value);
            self.phase = Phase::Done;
        }
        if self.phase == Phase::Done {
            if let Some(value) = &self.root {
                return Ok(value.clone());
            }
        }
        let err = JsonStreamError::UnexpectedEnd {
            offset: self.offset,
        };
        self.failed = Some(err.clone());
        Err(err)
    }

    fn is_complete(&self) -> bool {
        self.failed.is_none() && (self.phase == Phase::Done || self.top_level_number().is_some())
    }

    fn current_value(&self) -> Option<Value> {
        self.snapshot()
    }

    fn bytes_consumed(&self) -> usize {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    fn feed_chars(parser: &mut JsonStreamParser, text: &str) -> Vec<ParseEvent> {
        let mut events = Vec::new();
        for c in text.chars() {
            events.extend(parser.feed_collect(&c.to_string()).unwrap());
        }
        events
    }

    #[test_case(json!("test json string") ; "string")]
    #[test_case(json!(100000000) ; "number")]
    #[test_case(json!(null) ; "null")]
    #[test_case(json!(true) ; "true")]
    #[test_case(json!(false) ; "false")]
    #[test_case(json!({"key": "value"}) ; "object")]
    #[test_case(json!({"abc": "def", "bd": {"nested": "efg", "deeper": {"more": [1, 2, 3]}}}) ; "nested object")]
    #[test_case(json!({"nested": [1, 2, 3, {"obj": "val"}], "hello": "world"}) ; "array in object")]
    #[test_case(json!(["abc", "def", "efg"]) ; "array")]
    #[test_case(json!([]) ; "empty array")]
    #[test_case(json!({}) ; "empty object")]
    fn test_char_by_char_decodes(expected: Value) {
        let text = serde_json::to_string(&expected).unwrap();
        let mut parser = JsonStreamParser::new();
        let events = feed_chars(&mut parser, &text);

        assert!(parser.is_complete());
        assert_eq!(parser.current_value(), Some(expected.clone()));
        assert_eq!(events.last(), Some(&ParseEvent::End(expected.clone())));
        assert_eq!(parser.finish().unwrap(), expected);
    }

    #[test]
    fn test_partial_string_is_truncated() {
        let mut parser = JsonStreamParser::new();
        let events = parser.feed_collect(r#"{"a":"b"#).unwrap();
        assert_eq!(events, vec![ParseEvent::Value(json!({"a": "b"}))]);
        assert!(!parser.is_complete());

        let events = parser.feed_collect("cd").unwrap();
        assert_eq!(events, vec![ParseEvent::Value(json!({"a": "bcd"}))]);
    }

    #[test]
    fn test_pending_key_is_withheld() {
        let mut parser = JsonStreamParser::new();
        parser.feed_collect(r#"{"ke"#).unwrap();
        assert_eq!(parser.current_value(), Some(json!({})));

        parser.feed_collect(r#"y":"#).unwrap();
        assert_eq!(parser.current_value(), Some(json!({})));

        parser.feed_collect(r#" "v"#).unwrap();
        assert_eq!(parser.current_value(), Some(json!({"key": "v"})));
    }

    #[test]
    fn test_intermediate_numbers_are_withheld() {
        let mut parser = JsonStreamParser::new();
        parser.feed_collect("[1.").unwrap();
        assert_eq!(parser.current_value(), Some(json!([])));

        parser.feed_collect("5").unwrap();
        assert_eq!(parser.current_value(), Some(json!([1.5])));

        parser.feed_collect(",-").unwrap();
        assert_eq!(parser.current_value(), Some(json!([1.5])));
    }

    #[test]
    fn test_partial_literal_is_withheld() {
        let mut parser = JsonStreamParser::new();
        parser.feed_collect(r#"{"ok":tr"#).unwrap();
        assert_eq!(parser.current_value(), Some(json!({})));

        parser.feed_collect("ue}").unwrap();
        assert_eq!(parser.current_value(), Some(json!({"ok": true})));
        assert!(parser.is_complete());
    }

    #[test]
    fn test_escapes_split_across_fragments() {
        let mut parser = JsonStreamParser::new();
        parser.feed_collect(r#"["caf\"#).unwrap();
        assert_eq!(parser.current_value(), Some(json!(["caf"])));

        parser.feed_collect(r#"u00"#).unwrap();
        assert_eq!(parser.current_value(), Some(json!(["caf"])));

        parser.feed_collect(r#"e9 \n\"q\""]"#).unwrap();
        assert_eq!(parser.current_value(), Some(json!(["café \n\"q\""])));
        assert!(parser.is_complete());
    }

    #[test]
    fn test_surrogate_pair() {
        let mut parser = JsonStreamParser::new();
        parser.feed_collect(r#""\ud83d"#).unwrap();
        assert_eq!(parser.current_value(), Some(json!("")));

        parser.feed_collect(r#"\ude00""#).unwrap();
        assert_eq!(parser.current_value(), Some(json!("😀")));
    }

    #[test]
    fn test_raw_multibyte_text() {
        let mut parser = JsonStreamParser::new();
        let events = parser.feed_collect(r#"{"city":"Zürich 東京"}"#).unwrap();
        assert_eq!(events, vec![
            ParseEvent::Value(json!({"city": "Zürich 東京"})),
            ParseEvent::End(json!({"city": "Zürich 東京"})),
        ]);
        assert_eq!(parser.bytes_consumed(), r#"{"city":"Zürich 東京"}"#.len());
    }

    #[test]
    fn test_event_cadence_for_object_closed_in_second_fragment() {
        let mut parser = JsonStreamParser::new();

        let events = parser.feed_collect(r#"{"msg":"hello""#).unwrap();
        assert_eq!(events, vec![ParseEvent::Value(json!({"msg": "hello"}))]);

        let events = parser.feed_collect("}").unwrap();
        assert_eq!(events, vec![ParseEvent::End(json!({"msg": "hello"}))]);
    }

    #[test]
    fn test_value_boundaries_within_one_fragment() {
        let mut parser = JsonStreamParser::new();
        let events = parser.feed_collect(r#"{"a":1,"b":[true,"x"],"c":nu"#).unwrap();
        assert_eq!(events, vec![
            ParseEvent::Value(json!({"a": 1})),
            ParseEvent::Value(json!({"a": 1, "b": [true]})),
            ParseEvent::Value(json!({"a": 1, "b": [true, "x"]})),
        ]);
    }

    #[test]
    fn test_opened_container_is_reported() {
        let mut parser = JsonStreamParser::new();
        let events = parser.feed_collect("{").unwrap();
        assert_eq!(events, vec![ParseEvent::Value(json!({}))]);

        let events = parser.feed_collect("  ").unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_top_level_number_reopens() {
        let mut parser = JsonStreamParser::new();
        assert_eq!(parser.feed_collect("1").unwrap(), vec![
            ParseEvent::Value(json!(1)),
            ParseEvent::End(json!(1)),
        ]);
        assert_eq!(parser.feed_collect("0").unwrap(), vec![
            ParseEvent::Value(json!(10)),
            ParseEvent::End(json!(10)),
        ]);
        assert_eq!(parser.feed_collect(".").unwrap(), vec![ParseEvent::Value(json!(10))]);
        assert!(!parser.is_complete());
        assert_eq!(parser.feed_collect("5").unwrap(), vec![
            ParseEvent::Value(json!(10.5)),
            ParseEvent::End(json!(10.5)),
        ]);

        // Whitespace seals the number without repeating the end event.
        assert!(parser.feed_collect(" ").unwrap().is_empty());
        assert!(matches!(
            parser.feed_collect("1"),
            Err(JsonStreamError::TrailingCharacters { ch: '1', .. })
        ));
    }

    #[test]
    fn test_whitespace_after_document() {
        let mut parser = JsonStreamParser::new();
        parser.feed_collect("{}").unwrap();
        assert!(parser.feed_collect(" \n\t").unwrap().is_empty());
        assert!(parser.is_complete());
    }

    #[test]
    fn test_invalid_token_after_bracket() {
        let mut parser = JsonStreamParser::new();
        let err = parser.feed_collect("[bad").unwrap_err();
        assert_eq!(
            err,
            JsonStreamError::UnexpectedCharacter {
                ch: 'b',
                offset: 1,
                expected: "a value or ']'",
            }
        );
    }

    #[test_case("{}x", 2 ; "trailing characters")]
    #[test_case("[01]", 2 ; "leading zero")]
    #[test_case("[1.]", 3 ; "dangling dot")]
    #[test_case("\"a\u{1}\"", 2 ; "control character")]
    #[test_case(r#""\x""#, 2 ; "bad escape")]
    #[test_case(r#""\ude00""#, 6 ; "lone low surrogate")]
    #[test_case(r#""\ud83dx""#, 7 ; "unpaired high surrogate")]
    #[test_case("[tru]", 4 ; "broken literal")]
    #[test_case(r#"{"a" 1}"#, 5 ; "missing colon")]
    #[test_case("[1 2]", 3 ; "missing comma")]
    #[test_case("{,}", 1 ; "comma before key")]
    fn test_rejects_invalid_input(text: &str, offset: usize) {
        let mut parser = JsonStreamParser::new();
        let err = parser.feed_collect(text).unwrap_err();
        assert_eq!(err.offset(), offset);
    }

    #[test]
    fn test_error_poisons_parser() {
        let mut parser = JsonStreamParser::new();
        let err = parser.feed_collect("[x").unwrap_err();
        assert_eq!(parser.feed_collect("1]").unwrap_err(), err);
        assert_eq!(parser.finish().unwrap_err(), err);
        assert!(!parser.is_complete());
    }

    #[test]
    fn test_depth_limit() {
        let mut parser = JsonStreamParser::with_options(ParserOptions { max_depth: 2 });
        parser.feed_collect("[[").unwrap();
        let err = parser.feed_collect("[").unwrap_err();
        assert_eq!(
            err,
            JsonStreamError::DepthLimitExceeded {
                max_depth: 2,
                offset: 2,
            }
        );
    }

    #[test]
    fn test_finish_incomplete_document() {
        let mut parser = JsonStreamParser::new();
        parser.feed_collect(r#"{"a":"#).unwrap();
        assert_eq!(
            parser.finish().unwrap_err(),
            JsonStreamError::UnexpectedEnd { offset: 5 }
        );
    }

    #[test]
    fn test_finish_seals_top_level_number() {
        let mut parser = JsonStreamParser::new();
        parser.feed_collect("-2.5e3").unwrap();
        assert_eq!(parser.finish().unwrap(), json!(-2500.0));
        assert!(parser.feed_collect("1").is_err());
    }

    #[test]
    fn test_no_value_before_input() {
        let mut parser = JsonStreamParser::new();
        assert_eq!(parser.current_value(), None);
        assert!(parser.feed_collect("").unwrap().is_empty());
        assert!(parser.feed_collect("  ").unwrap().is_empty());
        assert!(!parser.is_complete());
    }
}
