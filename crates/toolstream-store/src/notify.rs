//! Synchronous change notification.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Table {
    next_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

/// A set of zero-argument callbacks invoked on every committed change.
///
/// Callbacks run in subscription order with no lock held, so they may read
/// the owning store. A callback removed while a round is in progress is not
/// invoked for the rest of that round.
#[derive(Clone, Default)]
pub struct Subscribers {
    table: Arc<Mutex<Table>>,
}

impl Subscribers {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        let mut table = self.table.lock();
        let id = table.next_id;
        table.next_id += 1;
        table.listeners.insert(id, Arc::new(callback));

        Subscription {
            id,
            table: Arc::downgrade(&self.table),
        }
    }

    /// Invoke every registered callback once.
    pub fn notify(&self) {
        let ids: Vec<u64> = self.table.lock().listeners.keys().copied().collect();
        for id in ids {
            let listener = self.table.lock().listeners.get(&id).cloned();
            if let Some(listener) = listener {
                listener();
            }
        }
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.table.lock().listeners.len()
    }

    /// Whether no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers").field("len", &self.len()).finish()
    }
}

/// Handle returned by [`Subscribers::subscribe`].
///
/// Dropping the handle keeps the callback registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    table: Weak<Mutex<Table>>,
}

impl Subscription {
    /// Remove the callback. Returns whether it was still registered.
    pub fn unsubscribe(&self) -> bool {
        match self.table.upgrade() {
            Some(table) => table.lock().listeners.remove(&self.id).is_some(),
            None => false,
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
