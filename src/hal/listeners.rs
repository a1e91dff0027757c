// src/hal/listeners.rs
//! Subscriber lists for the sample and prediction streams

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Callback receiving every emitted sample
pub type SampleListener = Arc<dyn Fn(&crate::hal::EegSample) + Send + Sync>;

/// Callback receiving every emitted prediction
pub type PredictionListener = Arc<dyn Fn(&crate::hal::Prediction) + Send + Sync>;

/// Handle returned on registration, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Ordered listener list for one event stream.
///
/// Dispatch works on a snapshot taken under the lock, so listeners may
/// register or unregister (themselves included) from inside a callback. A
/// listener removed mid-dispatch can still see the event being dispatched.
pub struct ListenerRegistry<E: ?Sized> {
    stream: &'static str,
    next_id: AtomicU64,
    entries: Mutex<Vec<(ListenerId, Arc<dyn Fn(&E) + Send + Sync>)>>,
}

impl<E: ?Sized> ListenerRegistry<E> {
    pub fn new(stream: &'static str) -> Self {
        Self {
            stream,
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, listener: Arc<dyn Fn(&E) + Send + Sync>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push((id, listener));
        id
    }

    /// Returns whether `id` was registered
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Deliver `event` to every listener in registration order.
    ///
    /// A panicking listener is logged and skipped; the remaining listeners
    /// still run. Returns the number of listeners that panicked.
    pub fn dispatch(&self, event: &E) -> usize {
        let snapshot: Vec<_> = self.entries.lock().iter().cloned().collect();

        let mut failures = 0;
        for (id, listener) in snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                failures += 1;
                warn!(stream = self.stream, listener = id.0, "listener panicked, skipping");
            }
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_dispatch_in_registration_order() {
        let registry = ListenerRegistry::<u32>::new("test");
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            registry.add(Arc::new(move |_: &u32| order.lock().push(tag)));
        }

        registry.dispatch(&1);
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_removed_listener_not_called() {
        let registry = ListenerRegistry::<u32>::new("test");
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let id = registry.add(Arc::new(move |_: &u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        registry.add(Arc::new(|_: &u32| {}));

        registry.dispatch(&1);
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        registry.dispatch(&2);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_panicking_listener_isolated() {
        let registry = ListenerRegistry::<u32>::new("test");
        let hits = Arc::new(AtomicUsize::new(0));

        registry.add(Arc::new(|_: &u32| panic!("bad consumer")));
        let counter = Arc::clone(&hits);
        registry.add(Arc::new(move |_: &u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(registry.dispatch(&7), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_can_unsubscribe_itself() {
        let registry = Arc::new(ListenerRegistry::<u32>::new("test"));
        let slot = Arc::new(Mutex::new(None::<ListenerId>));
        let hits = Arc::new(AtomicUsize::new(0));

        let (reg, own_id, counter) = (Arc::clone(&registry), Arc::clone(&slot), Arc::clone(&hits));
        let id = registry.add(Arc::new(move |_: &u32| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *own_id.lock() {
                reg.remove(id);
            }
        }));
        *slot.lock() = Some(id);

        registry.dispatch(&1);
        registry.dispatch(&2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }
}
