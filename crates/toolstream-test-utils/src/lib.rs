//! Test utilities for Toolstream crates.

use proptest::prelude::*;
use serde_json::{Map, Number, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Split `text` into fragments at the given character positions.
///
/// Positions are taken modulo the character count, sorted and deduplicated, so
/// any list of indices produces a valid split that never cuts a UTF-8
/// sequence.
pub fn split_at_chars(text: &str, cuts: &[usize]) -> Vec<String> {
    let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    if boundaries.is_empty() {
        return vec![String::new()];
    }

    let mut points: Vec<usize> = cuts
        .iter()
        .map(|cut| boundaries[cut % boundaries.len()])
        .filter(|&byte| byte > 0)
        .collect();
    points.sort_unstable();
    points.dedup();

    let mut fragments = Vec::with_capacity(points.len() + 1);
    let mut start = 0;
    for point in points {
        fragments.push(text[start..point].to_string());
        start = point;
    }
    fragments.push(text[start..].to_string());
    fragments
}

/// One fragment per character.
pub fn split_chars(text: &str) -> Vec<String> {
    text.chars().map(|c| c.to_string()).collect()
}

/// Counts invocations of a subscriber callback.
#[derive(Debug, Clone, Default)]
pub struct CallCounter {
    count: Arc<AtomicUsize>,
}

impl CallCounter {
    /// Create a counter starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that increments this counter.
    pub fn callback(&self) -> impl Fn() + Send + Sync + 'static {
        let count = Arc::clone(&self.count);
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Number of invocations so far.
    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// Strategy for arbitrary JSON documents.
///
/// Floats are multiples of 1/8 so that their shortest text form decodes back to
/// the same `f64`.
pub fn arb_json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        (-1_000_000i64..1_000_000).prop_filter_map("non-finite", |n| {
            Number::from_f64(n as f64 / 8.0).map(Value::Number)
        }),
        "\\PC*".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

/// Strategy for arbitrary JSON objects, the shape of tool-call arguments.
pub fn arb_json_object() -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-z]{1,6}", arb_json_value()), 0..5)
        .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>()))
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
