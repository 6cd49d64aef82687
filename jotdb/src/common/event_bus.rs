use crate::collection::{CollectionEventInfo, CollectionEventListener};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle returned by `subscribe`, used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberRef {
    id: u64,
}

/// Ordered registry of collection event listeners.
///
/// Listeners are invoked one after another in registration order on the
/// publishing thread. A listener that returns an error or panics is logged
/// and skipped; the remaining listeners still receive the event.
#[derive(Clone, Default)]
pub struct JotEventBus {
    inner: Arc<JotEventBusInner>,
}

#[derive(Default)]
struct JotEventBusInner {
    listeners: Mutex<Vec<(SubscriberRef, CollectionEventListener)>>,
    next_id: AtomicU64,
}

impl JotEventBus {
    pub fn new() -> Self {
        JotEventBus::default()
    }

    /// Registers a listener and returns its subscriber reference.
    pub fn register(&self, listener: CollectionEventListener) -> SubscriberRef {
        let subscriber = SubscriberRef {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
        };
        self.inner.listeners.lock().push((subscriber, listener));
        subscriber
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn deregister(&self, subscriber: SubscriberRef) -> bool {
        let mut listeners = self.inner.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(s, _)| *s != subscriber);
        before != listeners.len()
    }

    pub fn has_listeners(&self) -> bool {
        !self.inner.listeners.lock().is_empty()
    }

    /// Delivers `event` to every registered listener.
    pub fn publish(&self, event: CollectionEventInfo) {
        // listeners may subscribe or unsubscribe from within a callback
        let listeners: Vec<CollectionEventListener> = self
            .inner
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();

        for listener in listeners {
            let result = catch_unwind(AssertUnwindSafe(|| listener.handle(event.clone())));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log::error!("Event listener failed: {}", e),
                Err(_) => log::error!("Event listener panicked while handling {:?}", event.event_type()),
            }
        }
    }

    /// Delivers the events in order.
    pub fn publish_all(&self, events: Vec<CollectionEventInfo>) {
        if !self.has_listeners() {
            return;
        }
        for event in events {
            self.publish(event);
        }
    }
}
