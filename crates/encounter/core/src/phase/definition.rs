//! Data form of an encounter, as authored in content files.

use super::always_active::HpWindow;
use super::transition::Transition;
use crate::condition::ConditionGroup;
use crate::mechanic::{EffectSpec, TriggerConfig};
use crate::threshold::ThresholdConfig;

/// What a phase entry does to one mechanic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ToggleAction {
    #[default]
    Enable,
    Disable,
    /// Same as `Enable`: the mechanic stays (or becomes) active.
    Keep,
}

impl ToggleAction {
    pub fn enables(self) -> bool {
        !matches!(self, Self::Disable)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MechanicToggle {
    pub mechanic: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub action: ToggleAction,
}

impl MechanicToggle {
    pub fn new(mechanic: impl Into<String>, action: ToggleAction) -> Self {
        Self {
            mechanic: mechanic.into(),
            action,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MechanicDef {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger: TriggerConfig,
    pub effect: EffectSpec,
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhaseDef {
    pub name: String,
    /// Applied on entry; mechanics not listed keep their current state.
    pub toggles: Vec<MechanicToggle>,
    /// Checked in declared order; the first satisfied one wins.
    pub transitions: Vec<Transition>,
}

impl PhaseDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn toggle(mut self, mechanic: impl Into<String>, action: ToggleAction) -> Self {
        self.toggles.push(MechanicToggle::new(mechanic, action));
        self
    }

    pub fn transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AlwaysActiveDef {
    pub name: String,
    pub hp_window: HpWindow,
    pub conditions: Option<ConditionGroup>,
    /// Seconds between gate re-evaluations.
    pub eval_interval: f32,
    pub react_to_phase_entry: bool,
    pub thresholds: Vec<ThresholdConfig>,
}

impl Default for AlwaysActiveDef {
    fn default() -> Self {
        Self {
            name: String::new(),
            hp_window: HpWindow::FULL,
            conditions: None,
            eval_interval: 0.5,
            react_to_phase_entry: true,
            thresholds: Vec::new(),
        }
    }
}

/// Complete encounter: mechanics, ordered phases and always-active phases.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncounterDefinition {
    pub name: String,
    pub start_phase: usize,
    pub mechanics: Vec<MechanicDef>,
    pub phases: Vec<PhaseDef>,
    pub always_active: Vec<AlwaysActiveDef>,
}
