//! Streamed assistant text.

use crate::notify::{Subscribers, Subscription};
use parking_lot::RwLock;
use std::sync::Arc;

/// Accumulates streamed message text and notifies on every change.
#[derive(Debug)]
pub struct TextStreamStore {
    text: RwLock<Arc<str>>,
    subscribers: Subscribers,
}

impl Default for TextStreamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TextStreamStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            text: RwLock::new(Arc::from("")),
            subscribers: Subscribers::new(),
        }
    }

    /// Replace the text. Notifies only when the value changes.
    pub fn set_text(&self, value: &str) {
        {
            let mut text = self.text.write();
            if &**text == value {
                return;
            }
            *text = Arc::from(value);
        }
        self.subscribers.notify();
    }

    /// Append a chunk. Empty chunks are ignored.
    pub fn append_text(&self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        {
            let mut text = self.text.write();
            let mut next = String::with_capacity(text.len() + chunk.len());
            next.push_str(&text);
            next.push_str(chunk);
            *text = Arc::from(next);
        }
        self.subscribers.notify();
    }

    /// Reset to the empty string.
    pub fn clear(&self) {
        self.set_text("");
    }

    /// Current text.
    pub fn snapshot(&self) -> Arc<str> {
        Arc::clone(&self.text.read())
    }

    /// Register a callback invoked after every change.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        self.subscribers.subscribe(callback)
    }
}
