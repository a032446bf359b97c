//! Subscriber registry and event fan-out.
//!
//! A multi-event mapping from event name to an ordered list of callback
//! subscribers. Delivery for a single event name is FIFO by subscription
//! order; there is no ordering guarantee across distinct event names.
//!
//! Two correctness properties the dismiss/re-subscribe flows depend on:
//!
//! - **Snapshot-then-iterate**: `emit` copies the subscriber list before
//!   invoking anything, so a callback that subscribes or unsubscribes during
//!   dispatch cannot affect the in-progress delivery set.
//! - **Per-callback isolation**: a panicking callback is caught and logged;
//!   the remaining callbacks still run.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cradle_core::RealtimeEvent;
use parking_lot::RwLock;
use tracing::{debug, warn};

/// Boxed subscriber callback.
pub type Callback = Arc<dyn Fn(&RealtimeEvent) + Send + Sync>;

/// Handle identifying one registration, returned by [`Dispatcher::on`].
///
/// Closures are not comparable, so the registry's set semantics are carried
/// by these ids: every registration is distinct, and removing an id that is
/// no longer present is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Entry {
    id: u64,
    callback: Callback,
}

/// Event-name → subscriber fan-out.
#[derive(Default)]
pub struct Dispatcher {
    next_id: AtomicU64,
    channels: RwLock<HashMap<String, Vec<Entry>>>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for the given event name.
    ///
    /// Callbacks fire in registration order, synchronously on the emitting
    /// context.
    pub fn on<F>(&self, event: &str, callback: F) -> Subscription
    where
        F: Fn(&RealtimeEvent) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut channels = self.channels.write();
        channels.entry(event.to_owned()).or_default().push(Entry {
            id,
            callback: Arc::new(callback),
        });
        Subscription(id)
    }

    /// Remove a registration. Removing one that is not present is a no-op.
    pub fn off(&self, event: &str, subscription: Subscription) {
        let mut channels = self.channels.write();
        if let Some(entries) = channels.get_mut(event) {
            entries.retain(|entry| entry.id != subscription.0);
            if entries.is_empty() {
                let _ = channels.remove(event);
            }
        }
    }

    /// Deliver an event to every subscriber registered under `event`.
    ///
    /// The subscriber list is snapshotted before iteration and each callback
    /// is isolated: one panicking subscriber cannot starve the rest.
    pub fn emit(&self, event: &str, payload: &RealtimeEvent) {
        let snapshot: Vec<Callback> = {
            let channels = self.channels.read();
            match channels.get(event) {
                Some(entries) => entries.iter().map(|e| Arc::clone(&e.callback)).collect(),
                None => return,
            }
        };

        debug!(event, subscribers = snapshot.len(), "dispatching event");
        for callback in snapshot {
            if catch_unwind(AssertUnwindSafe(|| callback(payload))).is_err() {
                warn!(event, "subscriber panicked during dispatch");
            }
        }
    }

    /// Number of live registrations for an event name.
    #[must_use]
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.channels.read().get(event).map_or(0, Vec::len)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
