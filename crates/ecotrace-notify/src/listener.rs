//! Listener registry — subscribe/unsubscribe fan-out for notification
//! batches.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use ecotrace_entity::notification::Notification;

/// Handle returned by [`ListenerRegistry::subscribe`]; pass it back to
/// unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Callback invoked with each delivered notification batch.
pub type Listener = Box<dyn Fn(&[Notification]) + Send + Sync>;

/// Registry of active listeners.
///
/// Delivery is synchronous: every registered listener sees every batch
/// exactly once per delivery, in no particular order.
#[derive(Default)]
pub struct ListenerRegistry {
    /// Listener id → callback.
    listeners: DashMap<u64, Listener>,
    /// Next listener id.
    next_id: AtomicU64,
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ListenerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener and returns its handle.
    pub fn subscribe(&self, listener: Listener) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.insert(id, listener);
        ListenerId(id)
    }

    /// Removes a listener. Removing twice is a no-op.
    pub fn unsubscribe(&self, id: ListenerId) {
        self.listeners.remove(&id.0);
    }

    /// Delivers a batch to every registered listener.
    pub fn deliver(&self, batch: &[Notification]) {
        for entry in self.listeners.iter() {
            (entry.value())(batch);
        }
    }

    /// Number of active listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_every_listener_sees_each_batch_once() {
        let registry = ListenerRegistry::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&first);
        registry.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let counter = Arc::clone(&second);
        registry.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        registry.deliver(&[]);
        registry.deliver(&[]);

        assert_eq!(first.load(Ordering::SeqCst), 2);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery_and_is_idempotent() {
        let registry = ListenerRegistry::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let id = registry.subscribe(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        registry.deliver(&[]);
        registry.unsubscribe(id);
        registry.unsubscribe(id);
        registry.deliver(&[]);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }
}
