//! Controller/signal pair for one-shot cancellation.
//!
//! The transition is monotone and idempotent: the first `cancel` wins, later
//! calls are no-ops and never re-notify. Observers registered on the signal
//! fire exactly once, in registration order, and are dropped after firing.
//!
//! Callbacks and waiter wakeups always run with the state lock released, so
//! an observer may re-enter the same controller (a redundant `cancel`)
//! without deadlocking.

use std::fmt;
use std::mem;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::Notify;
use tracing::trace;

/// Error returned by [`CancelSignal::check`] once the signal has fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation was cancelled")]
pub struct CancelledError;

type Observer = Box<dyn FnOnce() + Send>;

enum State {
    /// Not yet cancelled. Observers are stored in registration order.
    Active(Vec<Observer>),
    Cancelled,
}

struct Shared {
    state: Mutex<State>,
    /// Wakes `cancelled()` waiters; notified after the state has flipped.
    notify: Notify,
}

impl Shared {
    fn is_cancelled(&self) -> bool {
        matches!(*self.state.lock().expect("signal state lock"), State::Cancelled)
    }
}

/// Owning half of the pair: the only handle that can trigger the transition.
///
/// Dropping every controller does not cancel the signal; cancellation only
/// happens through an explicit [`cancel`](CancelController::cancel).
#[derive(Clone)]
pub struct CancelController {
    shared: Arc<Shared>,
}

/// Observing half of the pair. Cheap to clone and hand across tasks.
#[derive(Clone)]
pub struct CancelSignal {
    shared: Arc<Shared>,
}

impl CancelController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::Active(Vec::new())),
                notify: Notify::new(),
            }),
        }
    }

    /// The signal observed by this controller's consumers.
    #[must_use]
    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            shared: Arc::clone(&self.shared),
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.shared.is_cancelled()
    }

    /// Trigger the active→cancelled transition.
    ///
    /// Idempotent: only the first call has any effect. Observers run in
    /// registration order, then async waiters are woken.
    pub fn cancel(&self) {
        let observers = {
            let mut state = self.shared.state.lock().expect("signal state lock");
            match mem::replace(&mut *state, State::Cancelled) {
                State::Active(observers) => observers,
                State::Cancelled => return,
            }
        };
        trace!(observers = observers.len(), "cancellation signal fired");
        for observer in observers {
            observer();
        }
        self.shared.notify.notify_waiters();
    }
}

impl Default for CancelController {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelSignal {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.shared.is_cancelled()
    }

    /// Fail-fast guard for worker loops: `signal.check()?` bails out of the
    /// current unit of work once cancellation has been requested.
    pub fn check(&self) -> Result<(), CancelledError> {
        if self.is_cancelled() {
            Err(CancelledError)
        } else {
            Ok(())
        }
    }

    /// Register a one-shot observer for the cancelled transition.
    ///
    /// Observers fire exactly once, in registration order, and are dropped
    /// after firing. If the signal has already fired, `observer` runs
    /// immediately and synchronously in the caller.
    pub fn on_cancel<F>(&self, observer: F)
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut state = self.shared.state.lock().expect("signal state lock");
            if let State::Active(observers) = &mut *state {
                observers.push(Box::new(observer));
                return;
            }
        }
        // Already cancelled: run outside the lock.
        observer();
    }

    /// Wait for the cancelled transition. Resolves immediately if the
    /// signal has already fired.
    pub async fn cancelled(&self) {
        loop {
            // Create the waiter before checking the flag so a cancel
            // between the check and the await cannot be missed.
            let notified = self.shared.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

impl fmt::Debug for CancelController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelController")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelSignal")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
