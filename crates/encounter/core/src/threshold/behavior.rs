use crate::context::EncounterContext;
use crate::mechanic::ActivationBypass;
use crate::types::MechanicIndex;

use super::Direction;

/// A boundary passed by the tracked value, to be dispatched by the controller.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdCrossing {
    /// Mechanic to activate out of band.
    pub mechanic: MechanicIndex,
    pub bypass: ActivationBypass,
    /// Position of the boundary in high-to-low order.
    pub boundary_index: usize,
    pub boundary: f32,
    /// Tracked value at the evaluation that fired.
    pub value: f32,
    /// Either [`Direction::Down`] or [`Direction::Up`].
    pub direction: Direction,
    pub label: Option<String>,
}

/// Sub-phase behavior owned by an always-active phase.
///
/// Behaviors never touch mechanics directly; they report crossings and the
/// controller performs the activations.
pub trait PhaseBehavior: Send + Sync {
    fn on_enter(&mut self, ctx: &EncounterContext);

    fn on_exit(&mut self, _ctx: &EncounterContext) {}

    /// Called every frame while the owning phase is active.
    fn tick(&mut self, dt: f32, ctx: &EncounterContext) -> Vec<ThresholdCrossing>;

    fn name(&self) -> &str {
        "behavior"
    }
}
