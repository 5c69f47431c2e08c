// SPDX-License-Identifier: MIT OR Apache-2.0
//! Completion signals and event emitters for Strata.
//!
//! Everything in Strata that finishes "later" is expressed with these two
//! primitives:
//! - [`CompletionSignal`]: settles exactly once, either resolved with a value
//!   or rejected with a reason; callbacks and `.await` both observe it
//! - [`EventEmitter`]: synchronous publish/subscribe with subscription tokens
//!   and one-shot handlers
//!
//! ## Execution model
//!
//! Callbacks and handlers run synchronously on the thread that settles the
//! signal or emits the event, and always outside internal locks, so a handler
//! may subscribe, unsubscribe, emit or settle other signals.

pub mod completion;
pub mod emitter;
pub mod error;

pub use completion::{when_all, CompletionSignal};
pub use emitter::{EventEmitter, Subscription};
pub use error::{Result, SignalError};
