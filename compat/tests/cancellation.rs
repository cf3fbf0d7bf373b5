//! End-to-end behavior of the constructors used together, the way a
//! request layer threads them: a deferred response raced against a
//! composite of per-request and deadline signals.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use stopgap_compat::{CancelController, any_of, deferred, timeout};

#[tokio::test(start_paused = true)]
async fn manual_cancel_beats_deadline() {
    let caller = CancelController::new();
    let combined = any_of([caller.signal(), timeout(Duration::from_secs(30))]);

    let fired = Arc::new(Mutex::new(0));
    let count = Arc::clone(&fired);
    combined.on_cancel(move || *count.lock().expect("count lock") += 1);

    caller.cancel();
    assert!(combined.is_cancelled());

    // The deadline elapsing later must not re-notify the composite.
    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(*fired.lock().expect("count lock"), 1);
}

#[tokio::test(start_paused = true)]
async fn deadline_cancels_combined_signal() {
    let caller = CancelController::new();
    let combined = any_of([caller.signal(), timeout(Duration::from_millis(50))]);

    combined.cancelled().await;
    assert!(combined.is_cancelled());
    assert!(!caller.is_cancelled());
}

#[tokio::test(start_paused = true)]
async fn deferred_response_raced_against_deadline() {
    let (response, resolver, _rejecter) = deferred::<&'static str, String>();
    let deadline = timeout(Duration::from_millis(100));

    let request = tokio::spawn(async move {
        tokio::select! {
            outcome = response => Some(outcome),
            () = deadline.cancelled() => None,
        }
    });

    resolver.resolve("200 OK");
    let outcome = request.await.expect("request task");
    assert_eq!(outcome, Some(Ok("200 OK")));
}

#[tokio::test(start_paused = true)]
async fn deadline_wins_when_response_never_settles() {
    let (response, _resolver, _rejecter) = deferred::<&'static str, String>();
    let deadline = timeout(Duration::from_millis(100));

    let outcome = tokio::select! {
        outcome = response => Some(outcome),
        () = deadline.cancelled() => None,
    };
    assert_eq!(outcome, None);
}
