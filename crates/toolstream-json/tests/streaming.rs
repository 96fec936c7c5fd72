//! Property tests for fragment-independent parsing.

use proptest::prelude::*;
use serde_json::{json, Value};
use toolstream_json::{IncrementalParser, JsonStreamParser, ParseEvent};
use toolstream_test_utils::{arb_json_value, assert_err, assert_ok, split_at_chars, split_chars};

fn feed_all(fragments: &[String]) -> (JsonStreamParser, Vec<ParseEvent>) {
    let mut parser = JsonStreamParser::new();
    let mut events = Vec::new();
    for fragment in fragments {
        events.extend(assert_ok!(parser.feed_collect(fragment)));
    }
    (parser, events)
}

proptest! {
    #[test]
    fn test_any_split_decodes_the_document(
        value in arb_json_value(),
        cuts in prop::collection::vec(any::<usize>(), 0..12),
    ) {
        let text = serde_json::to_string(&value).unwrap();
        let (mut parser, events) = feed_all(&split_at_chars(&text, &cuts));

        prop_assert_eq!(assert_ok!(parser.finish()), value.clone());
        let ends: Vec<_> = events.iter().filter(|e| e.is_end()).collect();
        prop_assert!(!ends.is_empty());
        prop_assert_eq!(ends.last().map(|e| e.value()), Some(&value));
    }

    #[test]
    fn test_pretty_printed_documents(value in arb_json_value()) {
        let text = serde_json::to_string_pretty(&value).unwrap();
        let (mut parser, _) = feed_all(&split_chars(&text));
        prop_assert_eq!(assert_ok!(parser.finish()), value);
    }

    #[test]
    fn test_consecutive_values_differ(value in arb_json_value()) {
        // A bare top-level number repeats its value when it re-opens.
        let text = serde_json::to_string(&json!([value])).unwrap();
        let (_, events) = feed_all(&split_chars(&text));

        let values: Vec<&Value> = events
            .iter()
            .filter(|e| !e.is_end())
            .map(ParseEvent::value)
            .collect();
        for pair in values.windows(2) {
            prop_assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_bytes_consumed_matches_input(
        value in arb_json_value(),
        cuts in prop::collection::vec(any::<usize>(), 0..6),
    ) {
        let text = serde_json::to_string(&value).unwrap();
        let (parser, _) = feed_all(&split_at_chars(&text, &cuts));
        prop_assert_eq!(parser.bytes_consumed(), text.len());
    }
}

#[test]
fn test_object_members_appear_in_order() {
    let text = r#"{"location": "Paris", "unit": "celsius", "days": [1, 2]}"#;
    let (_, events) = feed_all(&split_chars(text));

    let values: Vec<Value> = events
        .into_iter()
        .filter(|e| !e.is_end())
        .map(|e| e.value().clone())
        .collect();
    assert_eq!(values.first(), Some(&json!({})));
    assert!(values.contains(&json!({"location": "Par"})));
    assert!(values.contains(&json!({"location": "Paris", "unit": "celsius", "days": [1]})));
    assert_eq!(
        values.last(),
        Some(&json!({"location": "Paris", "unit": "celsius", "days": [1, 2]}))
    );
}

#[test]
fn test_truncated_document_fails_to_finish() {
    let (mut parser, _) = feed_all(&split_chars(r#"{"a": [1, 2"#));
    assert!(!parser.is_complete());
    assert_eq!(parser.current_value(), Some(json!({"a": [1, 2]})));
    assert_err!(parser.finish());
}

#[test]
fn test_parser_is_usable_as_trait_object() {
    let mut parser: Box<dyn IncrementalParser> = Box::new(JsonStreamParser::new());
    let mut seen = Vec::new();
    assert_ok!(parser.feed("[true]", &mut |event| seen.push(event)));
    assert_eq!(
        seen,
        vec![ParseEvent::Value(json!([true])), ParseEvent::End(json!([true]))]
    );
}
