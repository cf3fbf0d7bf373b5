//! Fallback async primitives for hosts without native constructors.
//!
//! Three independent, stateless constructors:
//!
//! - [`deferred`]: a pending future plus external resolve/reject handles
//! - [`timeout`]: a cancellation signal driven by a one-shot timer
//! - [`any_of`]: a cancellation signal that fires with the earliest input
//!
//! Cancellation itself comes from `stopgap-signal`; its types are
//! re-exported here so consumers need a single import path.

pub mod any;
pub mod deferred;
pub mod timeout;

pub use any::any_of;
pub use deferred::{Promise, Rejecter, Resolver, deferred};
pub use timeout::timeout;

pub use stopgap_signal::{CancelController, CancelSignal, CancelledError};
