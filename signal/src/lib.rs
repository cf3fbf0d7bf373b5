//! One-shot cancellation primitive.
//!
//! A [`CancelController`] owns a monotone active→cancelled transition; any
//! number of cloned [`CancelSignal`] handles observe it through flag checks,
//! one-shot observers, or an async waiter. The constructors in
//! `stopgap-compat` assemble their fallback signals from this pair, and
//! consumers thread `CancelSignal` through layered work (request handling,
//! timeouts) so everything reacts to a single cancellation event.

mod signal;

pub use signal::{CancelController, CancelSignal, CancelledError};
