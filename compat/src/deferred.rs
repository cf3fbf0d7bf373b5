//! Deferred completion: a pending future plus external settlement handles.
//!
//! Splits a computation's outcome from its construction site: whoever holds
//! the [`Resolver`] or [`Rejecter`] decides when and how the [`Promise`]
//! completes. The first settlement wins; the other handle becomes a no-op.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

/// Shared settlement slot. Taking the sender is what decides the race.
type Slot<T, E> = Arc<Mutex<Option<oneshot::Sender<Result<T, E>>>>>;

/// Pending half of a deferred unit.
///
/// Completes with exactly the value or reason passed to the winning
/// settlement handle. If both handles are dropped unsettled the promise
/// stays pending forever, like a promise whose executor never completes.
#[derive(Debug)]
pub struct Promise<T, E> {
    receiver: Option<oneshot::Receiver<Result<T, E>>>,
}

/// Success handle. Consuming: each deferred unit can resolve at most once.
#[derive(Debug)]
pub struct Resolver<T, E> {
    slot: Slot<T, E>,
}

/// Failure handle. Consuming: each deferred unit can reject at most once.
#[derive(Debug)]
pub struct Rejecter<T, E> {
    slot: Slot<T, E>,
}

/// Construct a deferred unit: a pending [`Promise`] and the two handles
/// that settle it.
///
/// Construction cannot fail and allocates nothing beyond the channel and
/// the shared settlement slot. The promise has no timeout and no implicit
/// cancellation.
#[must_use]
pub fn deferred<T, E>() -> (Promise<T, E>, Resolver<T, E>, Rejecter<T, E>) {
    let (sender, receiver) = oneshot::channel();
    let slot = Arc::new(Mutex::new(Some(sender)));
    (
        Promise {
            receiver: Some(receiver),
        },
        Resolver {
            slot: Arc::clone(&slot),
        },
        Rejecter { slot },
    )
}

impl<T, E> Resolver<T, E> {
    /// Complete the promise successfully with `value`.
    ///
    /// Returns whether this call won the settlement race; `false` means the
    /// paired [`Rejecter`] settled first and this call had no effect.
    pub fn resolve(self, value: T) -> bool {
        settle(&self.slot, Ok(value))
    }
}

impl<T, E> Rejecter<T, E> {
    /// Complete the promise with failure `reason`, passed through unchanged.
    ///
    /// Returns whether this call won the settlement race; `false` means the
    /// paired [`Resolver`] settled first and this call had no effect.
    pub fn reject(self, reason: E) -> bool {
        settle(&self.slot, Err(reason))
    }
}

fn settle<T, E>(slot: &Slot<T, E>, outcome: Result<T, E>) -> bool {
    let sender = slot.lock().expect("settlement slot lock").take();
    match sender {
        Some(sender) => {
            // A send error means the promise itself was dropped; the call
            // still won the race, there is just nobody left to observe it.
            let _ = sender.send(outcome);
            true
        }
        None => false,
    }
}

impl<T, E> Future for Promise<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Some(receiver) = this.receiver.as_mut() else {
            return Poll::Pending;
        };
        match Pin::new(receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => {
                this.receiver = None;
                Poll::Ready(outcome)
            }
            // Both settlement handles dropped without settling: remain
            // pending forever rather than surfacing a channel error.
            Poll::Ready(Err(_)) => {
                this.receiver = None;
                Poll::Pending
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
