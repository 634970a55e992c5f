//! Main phases, always-active phases and the controller that runs them.
//!
//! Main phases form an ordered list with exactly one current index. Each
//! entry applies a list of mechanic toggles; transitions move the index.
//! Always-active phases run beside the index behind their own health window
//! and condition gate.
mod always_active;
mod builder;
mod controller;
mod definition;
mod observer;
mod transition;

pub use always_active::{AlwaysActivePhase, HpWindow};
pub use builder::PhaseControllerBuilder;
pub use controller::{Phase, PhaseController};
pub use definition::{
    AlwaysActiveDef, EncounterDefinition, MechanicDef, MechanicToggle, PhaseDef, ToggleAction,
};
pub use observer::EncounterObserver;
pub use transition::{Transition, TransitionKind};
