//! Tick-driven boss encounter scripting.
//!
//! `encounter-core` runs phase-driven encounters: an ordered list of main
//! phases toggling a set of trigger mechanics, always-active sub-phases gated
//! on health windows, and threshold trackers that fire one-shot activations as
//! a value crosses evenly spaced boundaries. Everything is driven by
//! [`phase::PhaseController::tick`] on a single thread; the world is reached
//! only through the oracle traits in [`env`], and the only shared state
//! between encounters is the [`cooldown::CooldownGroupService`] table.
pub mod clock;
pub mod condition;
pub mod config;
pub mod context;
pub mod cooldown;
pub mod env;
pub mod error;
pub mod mechanic;
pub mod phase;
pub mod threshold;
pub mod types;

pub use clock::IntervalTimer;
pub use condition::{Condition, ConditionGroup, PopulationMode};
pub use config::EncounterConfig;
pub use context::{EncounterContext, RollStream};
pub use cooldown::{CooldownGroupId, CooldownGroupService, GroupIdSource, compute_group_id};
pub use env::{
    AbilityExecutor, AnimationPlayer, HealthOracle, HierarchyOracle, OracleBundle, OracleError,
    PcgRng, PopulationOracle, RayHit, RngOracle, SpatialOracle, SpawnExecutor,
};
pub use error::{BuildError, EncounterError, ErrorSeverity};
pub use mechanic::{
    ActivationBypass, ActivationEffect, ActivationOutcome, ActivationRequest, EffectSpec,
    Mechanic, MechanicKind, SelectionMode, SkipReason, TargetSource, TriggerConfig,
};
pub use phase::{
    AlwaysActiveDef, AlwaysActivePhase, EncounterDefinition, EncounterObserver, HpWindow,
    MechanicDef, Phase, PhaseController, PhaseControllerBuilder, PhaseDef, ToggleAction,
    Transition, TransitionKind,
};
pub use threshold::{
    Direction, Domain, PhaseBehavior, SegmentMode, ThresholdConfig, ThresholdCrossing,
    ThresholdTracker, TrackedValue,
};
pub use types::{AnchorId, MechanicIndex};
