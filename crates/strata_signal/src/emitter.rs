// SPDX-License-Identifier: MIT OR Apache-2.0
//! Synchronous event emitter with subscription tokens.

use parking_lot::Mutex;
use std::sync::Arc;

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Token returned by [`EventEmitter::on`] and [`EventEmitter::once`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Entry<E> {
    id: u64,
    once: bool,
    handler: Handler<E>,
}

struct Registry<E> {
    next_id: u64,
    entries: Vec<Entry<E>>,
}

/// Publish/subscribe hub for one event type.
///
/// `emit` snapshots the handlers in registration order, releases the lock and
/// then runs them, so handlers are free to subscribe, unsubscribe or emit
/// again. A handler detached during an emission still sees that emission.
pub struct EventEmitter<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for EventEmitter<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> std::fmt::Debug for EventEmitter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("handlers", &self.registry.lock().entries.len())
            .finish()
    }
}

impl<E: 'static> EventEmitter<E> {
    /// Create an emitter with no handlers
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 1,
                entries: Vec::new(),
            })),
        }
    }

    fn register(&self, once: bool, handler: Handler<E>) -> Subscription {
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Entry { id, once, handler });
        Subscription(id)
    }

    /// Attach a handler that runs on every emission
    pub fn on<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.register(false, Arc::new(handler))
    }

    /// Attach a handler for the next emission only.
    ///
    /// The handler is detached before it runs.
    pub fn once<F>(&self, handler: F) -> Subscription
    where
        F: FnOnce(&E) + Send + 'static,
    {
        let slot = Mutex::new(Some(handler));
        self.register(
            true,
            Arc::new(move |event: &E| {
                if let Some(handler) = slot.lock().take() {
                    handler(event);
                }
            }),
        )
    }

    /// Detach a handler. Returns `false` if it was already gone.
    pub fn off(&self, subscription: Subscription) -> bool {
        let mut registry = self.registry.lock();
        let before = registry.entries.len();
        registry.entries.retain(|entry| entry.id != subscription.0);
        registry.entries.len() != before
    }

    /// Deliver an event to every attached handler
    pub fn emit(&self, event: &E) {
        let handlers: Vec<Handler<E>> = {
            let mut registry = self.registry.lock();
            let handlers = registry
                .entries
                .iter()
                .map(|entry| Arc::clone(&entry.handler))
                .collect();
            registry.entries.retain(|entry| !entry.once);
            handlers
        };

        for handler in handlers {
            handler(event);
        }
    }

    /// Number of attached handlers
    pub fn handler_count(&self) -> usize {
        self.registry.lock().entries.len()
    }

    /// Detach every handler
    pub fn clear(&self) {
        self.registry.lock().entries.clear();
    }
}

impl<E: 'static> Default for EventEmitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_on_and_off() {
        let emitter = EventEmitter::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let subscription = emitter.on(move |value: &i32| sink.lock().push(*value));

        emitter.emit(&1);
        emitter.emit(&2);
        assert!(emitter.off(subscription));
        assert!(!emitter.off(subscription));
        emitter.emit(&3);

        assert_eq!(*seen.lock(), vec![1, 2]);
        assert_eq!(emitter.handler_count(), 0);
    }

    #[test]
    fn test_once_fires_a_single_time() {
        let emitter = EventEmitter::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        emitter.once(move |_: &()| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        emitter.emit(&());
        emitter.emit(&());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(emitter.handler_count(), 0);
    }

    #[test]
    fn test_once_survives_reentrant_emit() {
        let emitter = EventEmitter::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let inner = emitter.clone();
        emitter.once(move |_: &()| {
            counter.fetch_add(1, Ordering::SeqCst);
            inner.emit(&());
        });

        emitter.emit(&());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_can_detach_itself() {
        let emitter: EventEmitter<u8> = EventEmitter::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let token = Arc::new(Mutex::new(None));

        let counter = Arc::clone(&calls);
        let inner = emitter.clone();
        let own_token = Arc::clone(&token);
        let subscription = emitter.on(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            if let Some(subscription) = own_token.lock().take() {
                inner.off(subscription);
            }
        });
        *token.lock() = Some(subscription);

        emitter.emit(&0);
        emitter.emit(&0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let emitter = EventEmitter::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            emitter.on(move |_: &()| order.lock().push(label));
        }

        emitter.emit(&());
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }
}
