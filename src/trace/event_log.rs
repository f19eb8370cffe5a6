//! Append-only event store shared by every thread of one build.

use std::sync::{Mutex, MutexGuard};

use super::event::TraceEvent;

/// Ordered, thread-safe collection of [`TraceEvent`]s.
///
/// Insertion order is preserved exactly; it is not timestamp order across
/// threads. Entries are never mutated or removed.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<TraceEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event. Safe to call from any number of threads.
    pub fn append(&self, event: TraceEvent) {
        self.lock().push(event);
    }

    /// Copy of the events in append order.
    ///
    /// Only meaningful once writers have stopped.
    pub fn snapshot(&self) -> Vec<TraceEvent> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock can only interrupt a `push`, which
    // leaves the vector intact, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Vec<TraceEvent>> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
