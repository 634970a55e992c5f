use crate::context::EncounterContext;
use crate::mechanic::ActivationOutcome;
use crate::threshold::ThresholdCrossing;
use crate::types::{AnchorId, MechanicIndex};

/// Notification hooks for hosts that mirror encounter state (UI, logs,
/// replays). Every hook defaults to a no-op.
pub trait EncounterObserver: Send {
    /// `from` is `None` on the first phase entry.
    fn on_phase_changed(
        &mut self,
        _from: Option<usize>,
        _to: usize,
        _name: &str,
        _ctx: &EncounterContext,
    ) {
    }

    fn on_mechanic_activated(
        &mut self,
        _mechanic: MechanicIndex,
        _name: &str,
        _holders: &[AnchorId],
        _ctx: &EncounterContext,
    ) {
    }

    fn on_threshold_crossed(
        &mut self,
        _phase: &str,
        _crossing: &ThresholdCrossing,
        _outcome: &ActivationOutcome,
    ) {
    }

    fn on_always_active_toggled(&mut self, _phase: &str, _active: bool) {}
}
