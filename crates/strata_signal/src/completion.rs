// SPDX-License-Identifier: MIT OR Apache-2.0
//! Single-settlement completion signals.

use crate::error::{Result, SignalError};
use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

type DoneCallback<T> = Box<dyn FnOnce(&T) + Send>;
type FailCallback = Box<dyn FnOnce(&SignalError) + Send>;

/// Current outcome of a signal
enum Settlement<T> {
    Pending,
    Resolved(T),
    Rejected(SignalError),
}

struct Shared<T> {
    settlement: Settlement<T>,
    on_done: Vec<DoneCallback<T>>,
    on_fail: Vec<FailCallback>,
    wakers: Vec<Waker>,
}

/// A value that becomes available once, or fails once.
///
/// Cloning a signal yields another handle to the same settlement. Callbacks
/// registered with [`done`](Self::done) or [`fail`](Self::fail) after the
/// signal settled run immediately; callbacks for the outcome that did not
/// happen are dropped without running.
pub struct CompletionSignal<T> {
    shared: Arc<Mutex<Shared<T>>>,
}

impl<T> Clone for CompletionSignal<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for CompletionSignal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.shared.lock().settlement {
            Settlement::Pending => "pending",
            Settlement::Resolved(_) => "resolved",
            Settlement::Rejected(_) => "rejected",
        };
        f.debug_struct("CompletionSignal")
            .field("state", &state)
            .finish()
    }
}

impl<T: Clone + Send + 'static> CompletionSignal<T> {
    /// Create a pending signal
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                settlement: Settlement::Pending,
                on_done: Vec::new(),
                on_fail: Vec::new(),
                wakers: Vec::new(),
            })),
        }
    }

    /// Create a signal that is already resolved
    pub fn resolved(value: T) -> Self {
        let signal = Self::new();
        signal.shared.lock().settlement = Settlement::Resolved(value);
        signal
    }

    /// Create a signal that is already rejected
    pub fn rejected(reason: impl Into<String>) -> Self {
        let signal = Self::new();
        signal.shared.lock().settlement = Settlement::Rejected(SignalError::rejected(reason));
        signal
    }

    /// Resolve the signal with a value.
    ///
    /// Fails with [`SignalError::AlreadySettled`] if the signal was already
    /// resolved or rejected.
    pub fn resolve(&self, value: T) -> Result<()> {
        let (callbacks, wakers) = {
            let mut shared = self.shared.lock();
            if !matches!(shared.settlement, Settlement::Pending) {
                return Err(SignalError::AlreadySettled);
            }
            shared.settlement = Settlement::Resolved(value.clone());
            shared.on_fail.clear();
            (
                std::mem::take(&mut shared.on_done),
                std::mem::take(&mut shared.wakers),
            )
        };

        for callback in callbacks {
            callback(&value);
        }
        wakers.into_iter().for_each(Waker::wake);
        Ok(())
    }

    /// Reject the signal with a reason
    pub fn reject(&self, reason: impl Into<String>) -> Result<()> {
        self.reject_with(SignalError::rejected(reason))
    }

    /// Reject the signal with an existing error, keeping its reason
    pub fn reject_with(&self, error: SignalError) -> Result<()> {
        let (callbacks, wakers) = {
            let mut shared = self.shared.lock();
            if !matches!(shared.settlement, Settlement::Pending) {
                return Err(SignalError::AlreadySettled);
            }
            shared.settlement = Settlement::Rejected(error.clone());
            shared.on_done.clear();
            (
                std::mem::take(&mut shared.on_fail),
                std::mem::take(&mut shared.wakers),
            )
        };

        for callback in callbacks {
            callback(&error);
        }
        wakers.into_iter().for_each(Waker::wake);
        Ok(())
    }

    /// Register a callback for resolution
    pub fn done<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(&T) + Send + 'static,
    {
        let value = {
            let mut guard = self.shared.lock();
            let shared = &mut *guard;
            match &shared.settlement {
                Settlement::Pending => {
                    shared.on_done.push(Box::new(callback));
                    return self;
                }
                Settlement::Resolved(value) => value.clone(),
                Settlement::Rejected(_) => return self,
            }
        };
        callback(&value);
        self
    }

    /// Register a callback for rejection
    pub fn fail<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(&SignalError) + Send + 'static,
    {
        let error = {
            let mut guard = self.shared.lock();
            let shared = &mut *guard;
            match &shared.settlement {
                Settlement::Pending => {
                    shared.on_fail.push(Box::new(callback));
                    return self;
                }
                Settlement::Rejected(error) => error.clone(),
                Settlement::Resolved(_) => return self,
            }
        };
        callback(&error);
        self
    }

    /// Register a callback that runs on either outcome
    pub fn always<F>(&self, callback: F) -> &Self
    where
        F: FnOnce() + Send + 'static,
    {
        let slot = Arc::new(Mutex::new(Some(callback)));
        let on_fail = Arc::clone(&slot);
        self.done(move |_| {
            if let Some(callback) = slot.lock().take() {
                callback();
            }
        });
        self.fail(move |_| {
            if let Some(callback) = on_fail.lock().take() {
                callback();
            }
        })
    }

    /// Derive a signal carrying a transformed value.
    ///
    /// Rejection of `self` rejects the derived signal with the same error.
    pub fn map<U, F>(&self, transform: F) -> CompletionSignal<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(&T) -> U + Send + 'static,
    {
        let derived = CompletionSignal::new();
        let on_done = derived.clone();
        let on_fail = derived.clone();
        // The derived signal is only ever settled from these two callbacks.
        self.done(move |value| {
            let _ = on_done.resolve(transform(value));
        });
        self.fail(move |error| {
            let _ = on_fail.reject_with(error.clone());
        });
        derived
    }

    /// Check whether the signal has not settled yet
    pub fn is_pending(&self) -> bool {
        matches!(self.shared.lock().settlement, Settlement::Pending)
    }

    /// Check whether the signal resolved
    pub fn is_resolved(&self) -> bool {
        matches!(self.shared.lock().settlement, Settlement::Resolved(_))
    }

    /// Check whether the signal was rejected
    pub fn is_rejected(&self) -> bool {
        matches!(self.shared.lock().settlement, Settlement::Rejected(_))
    }

    /// Get the resolved value, if any
    pub fn value(&self) -> Option<T> {
        match &self.shared.lock().settlement {
            Settlement::Resolved(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Get the rejection error, if any
    pub fn error(&self) -> Option<SignalError> {
        match &self.shared.lock().settlement {
            Settlement::Rejected(error) => Some(error.clone()),
            _ => None,
        }
    }
}

impl<T: Clone + Send + 'static> Default for CompletionSignal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Future for CompletionSignal<T> {
    type Output = Result<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut guard = self.shared.lock();
        let shared = &mut *guard;
        match &shared.settlement {
            Settlement::Resolved(value) => Poll::Ready(Ok(value.clone())),
            Settlement::Rejected(error) => Poll::Ready(Err(error.clone())),
            Settlement::Pending => {
                if !shared.wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    shared.wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

struct Gather<T> {
    values: Vec<Option<T>>,
    remaining: usize,
}

/// Combine signals into one that resolves when all of them resolve.
///
/// Values are delivered in input order. The first rejection rejects the
/// combined signal; outcomes after that are ignored. An empty input resolves
/// immediately with an empty vector.
pub fn when_all<T, I>(signals: I) -> CompletionSignal<Vec<T>>
where
    T: Clone + Send + 'static,
    I: IntoIterator<Item = CompletionSignal<T>>,
{
    let signals: Vec<_> = signals.into_iter().collect();
    let combined = CompletionSignal::new();

    if signals.is_empty() {
        let _ = combined.resolve(Vec::new());
        return combined;
    }

    let gather = Arc::new(Mutex::new(Gather {
        values: vec![None; signals.len()],
        remaining: signals.len(),
    }));

    for (index, signal) in signals.iter().enumerate() {
        let gather = Arc::clone(&gather);
        let on_done = combined.clone();
        signal.done(move |value| {
            let finished = {
                let mut gather = gather.lock();
                gather.values[index] = Some(value.clone());
                gather.remaining -= 1;
                (gather.remaining == 0).then(|| std::mem::take(&mut gather.values))
            };
            if let Some(values) = finished {
                let _ = on_done.resolve(values.into_iter().flatten().collect());
            }
        });

        let on_fail = combined.clone();
        signal.fail(move |error| {
            // Only the first rejection settles the combined signal.
            if on_fail.reject_with(error.clone()).is_ok() {
                tracing::debug!("when_all rejected: {error}");
            }
        });
    }

    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_resolve_runs_callbacks_once() {
        let signal = CompletionSignal::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        signal.done(move |value: &u32| {
            assert_eq!(*value, 7);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        signal.resolve(7).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(signal.is_resolved());
        assert_eq!(signal.value(), Some(7));
    }

    #[test]
    fn test_settles_only_once() {
        let signal = CompletionSignal::new();
        signal.resolve(1).unwrap();
        assert_eq!(signal.resolve(2), Err(SignalError::AlreadySettled));
        assert_eq!(signal.reject("late"), Err(SignalError::AlreadySettled));
        assert_eq!(signal.value(), Some(1));
    }

    #[test]
    fn test_done_after_resolution_runs_immediately() {
        let signal = CompletionSignal::resolved("ready".to_string());
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        signal.done(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reject_skips_done_callbacks() {
        let signal: CompletionSignal<u8> = CompletionSignal::new();
        let done_calls = Arc::new(AtomicUsize::new(0));
        let fail_calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&done_calls);
        signal.done(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let counter = Arc::clone(&fail_calls);
        signal.fail(move |error| {
            assert_eq!(*error, SignalError::rejected("timeout"));
            counter.fetch_add(1, Ordering::SeqCst);
        });

        signal.reject("timeout").unwrap();
        assert_eq!(done_calls.load(Ordering::SeqCst), 0);
        assert_eq!(fail_calls.load(Ordering::SeqCst), 1);
        assert!(signal.is_rejected());
    }

    #[test]
    fn test_always_runs_on_both_outcomes() {
        let calls = Arc::new(AtomicUsize::new(0));

        let resolved: CompletionSignal<()> = CompletionSignal::new();
        let counter = Arc::clone(&calls);
        resolved.always(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        resolved.resolve(()).unwrap();

        let rejected: CompletionSignal<()> = CompletionSignal::new();
        let counter = Arc::clone(&calls);
        rejected.always(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        rejected.reject("nope").unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_callback_may_reenter_signal() {
        let signal: CompletionSignal<u32> = CompletionSignal::new();
        let inner = signal.clone();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        signal.done(move |_| {
            // Registering from inside a callback runs immediately.
            let counter = Arc::clone(&counter);
            inner.done(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        });

        signal.resolve(3).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_map_propagates_value_and_error() {
        let source: CompletionSignal<u32> = CompletionSignal::new();
        let doubled = source.map(|v| v * 2);
        source.resolve(21).unwrap();
        assert_eq!(doubled.value(), Some(42));

        let failing: CompletionSignal<u32> = CompletionSignal::new();
        let unit = failing.map(|_| ());
        failing.reject("offline").unwrap();
        assert_eq!(unit.error(), Some(SignalError::rejected("offline")));
    }

    #[test]
    fn test_await_signal() {
        let signal = CompletionSignal::new();
        let resolver = signal.clone();
        std::thread::spawn(move || {
            resolver.resolve(5_u64).unwrap();
        });
        assert_eq!(block_on(signal), Ok(5));

        let rejected: CompletionSignal<u64> = CompletionSignal::rejected("broken");
        assert_eq!(block_on(rejected), Err(SignalError::rejected("broken")));
    }

    #[test]
    fn test_when_all_preserves_input_order() {
        let a = CompletionSignal::new();
        let b = CompletionSignal::new();
        let c = CompletionSignal::new();
        let all = when_all([a.clone(), b.clone(), c.clone()]);

        c.resolve(3).unwrap();
        a.resolve(1).unwrap();
        assert!(all.is_pending());

        b.resolve(2).unwrap();
        assert_eq!(all.value(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_when_all_first_failure_wins() {
        let a: CompletionSignal<u8> = CompletionSignal::new();
        let b: CompletionSignal<u8> = CompletionSignal::new();
        let all = when_all([a.clone(), b.clone()]);

        b.reject("first").unwrap();
        a.reject("second").unwrap();

        assert_eq!(all.error(), Some(SignalError::rejected("first")));
    }

    #[test]
    fn test_when_all_empty_resolves() {
        let all = when_all(Vec::<CompletionSignal<u8>>::new());
        assert_eq!(all.value(), Some(Vec::new()));
    }
}
