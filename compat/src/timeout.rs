//! Timer-backed cancellation signals.

use std::time::Duration;

use stopgap_signal::{CancelController, CancelSignal};
use tracing::debug;

/// Return a signal that fires no earlier than `after` from now.
///
/// The timer belongs to the signal machinery: it is not exposed and cannot
/// be cancelled independently of the signal. A zero duration fires as soon
/// as the timer backend runs; there is no upper-bound latency guarantee
/// beyond the backend's scheduler precision.
///
/// With the default `rt-tokio` feature the host runtime's timer drives the
/// signal (an ambient tokio runtime is required at call time, and the
/// runtime's paused test clock is honored). Without it, a dedicated
/// sleeper thread drives each timer.
#[must_use]
pub fn timeout(after: Duration) -> CancelSignal {
    let controller = CancelController::new();
    let signal = controller.signal();
    debug!(?after, "scheduling timeout signal");
    schedule(after, controller);
    signal
}

#[cfg(feature = "rt-tokio")]
fn schedule(after: Duration, controller: CancelController) {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        controller.cancel();
    });
}

#[cfg(not(feature = "rt-tokio"))]
fn schedule(after: Duration, controller: CancelController) {
    use std::thread;

    thread::spawn(move || {
        thread::sleep(after);
        controller.cancel();
    });
}


#[cfg(all(test, feature = "rt-tokio"))]
mod tests {
    use std::time::Duration;

    use super::timeout;

    #[tokio::test(start_paused = true)]
    async fn never_fires_before_duration_elapses() {
        let signal = timeout(Duration::from_millis(100));
        assert!(!signal.is_cancelled());

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert!(!signal.is_cancelled());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(signal.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn transition_time_is_at_least_construction_plus_duration() {
        let start = tokio::time::Instant::now();
        let signal = timeout(Duration::from_millis(250));

        signal.cancelled().await;
        assert!(start.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_fires_on_first_tick() {
        let signal = timeout(Duration::ZERO);
        signal.cancelled().await;
        assert!(signal.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn each_call_produces_an_independent_signal() {
        let short = timeout(Duration::from_millis(10));
        let long = timeout(Duration::from_millis(500));

        short.cancelled().await;
        assert!(short.is_cancelled());
        assert!(!long.is_cancelled());
    }
}
