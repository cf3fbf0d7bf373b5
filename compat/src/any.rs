//! Composite cancellation: cancel when the first input cancels.

use stopgap_signal::{CancelController, CancelSignal};
use tracing::trace;

/// Combine `signals` into one signal that fires when the earliest input
/// fires.
///
/// Inputs are observed, never owned: the composite attaches one one-shot
/// observer per input and has no other effect on them. An input that is
/// already cancelled short-circuits construction — the returned signal is
/// cancelled before this function returns and no observers are attached.
/// An empty collection yields a signal that never fires. Construction
/// cannot fail regardless of input count or state.
#[must_use]
pub fn any_of<I>(signals: I) -> CancelSignal
where
    I: IntoIterator<Item = CancelSignal>,
{
    let controller = CancelController::new();
    let output = controller.signal();

    let signals: Vec<CancelSignal> = signals.into_iter().collect();
    if signals.iter().any(CancelSignal::is_cancelled) {
        trace!("composite input already cancelled, short-circuiting");
        controller.cancel();
        return output;
    }

    for signal in signals {
        let controller = controller.clone();
        signal.on_cancel(move || controller.cancel());
    }

    output
}
