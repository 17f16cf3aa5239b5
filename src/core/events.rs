//! Observer registry and the events a root publishes.

use super::state::StateId;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Handle returned by [`EventHub::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(u64);

/// Subscriber callback.
pub type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Registry<E> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<E>)>,
}

/// Cloneable handle over a shared list of subscribers.
///
/// Clones share the same list. [`emit`](Self::emit) takes a snapshot of the
/// list before calling anyone, so listeners may subscribe or unsubscribe
/// (themselves included) while being notified; such changes take effect
/// from the next emit.
///
/// # Example
///
/// ```rust
/// use switchboard::core::EventHub;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let hub: EventHub<u32> = EventHub::new();
/// let total = Arc::new(AtomicUsize::new(0));
///
/// let sink = Arc::clone(&total);
/// let id = hub.subscribe(move |n| {
///     sink.fetch_add(*n as usize, Ordering::SeqCst);
/// });
///
/// hub.emit(&3);
/// assert!(hub.unsubscribe(id));
/// hub.emit(&4);
///
/// assert_eq!(total.load(Ordering::SeqCst), 3);
/// ```
pub struct EventHub<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> EventHub<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.subscribe_shared(Arc::new(listener))
    }

    pub fn subscribe_shared(&self, listener: Listener<E>) -> SubscriptionId {
        let mut registry = self.registry.lock();
        let id = SubscriptionId(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push((id, listener));
        id
    }

    /// Remove a subscriber. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.lock();
        let before = registry.listeners.len();
        registry.listeners.retain(|(existing, _)| *existing != id);
        registry.listeners.len() != before
    }

    /// Notify every current subscriber in subscription order.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = {
            let registry = self.registry.lock();
            registry
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };

        for listener in snapshot {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.registry.lock().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.registry.lock().listeners.clear();
    }
}

impl<E> Clone for EventHub<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventHub<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("subscribers", &self.len())
            .finish()
    }
}

/// Published after a transition when the caller asked for notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    pub root_id: Uuid,
    /// Name of the root that changed.
    pub root: String,
    /// Previous index, `None` if it did not name a valid state.
    pub from: Option<usize>,
    pub to: usize,
    pub state: StateId,
    /// Name of the state now current.
    pub state_name: String,
    pub at: DateTime<Utc>,
}

/// Published on every click, whether or not the click switched state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Click {
    pub root_id: Uuid,
    pub root: String,
    /// Whether the click changed the current state.
    pub switched: bool,
    pub current: usize,
    pub at: DateTime<Utc>,
}
