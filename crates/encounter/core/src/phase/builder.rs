use std::collections::HashMap;
use std::sync::Arc;

use super::always_active::AlwaysActivePhase;
use super::controller::{Phase, PhaseController};
use super::definition::{AlwaysActiveDef, EncounterDefinition, PhaseDef};
use super::observer::EncounterObserver;
use crate::clock::IntervalTimer;
use crate::config::EncounterConfig;
use crate::context::EncounterContext;
use crate::cooldown::CooldownGroupService;
use crate::error::BuildError;
use crate::mechanic::{Mechanic, MechanicKind};
use crate::threshold::ThresholdTracker;
use crate::types::MechanicIndex;

/// Assembles a [`PhaseController`], resolving mechanic names once.
pub struct PhaseControllerBuilder {
    context: EncounterContext,
    cooldowns: Option<Arc<CooldownGroupService>>,
    config: EncounterConfig,
    mechanics: Vec<Mechanic>,
    phases: Vec<PhaseDef>,
    always_active: Vec<AlwaysActiveDef>,
    prebuilt_always_active: Vec<AlwaysActivePhase>,
    observers: Vec<Box<dyn EncounterObserver>>,
    start_phase: usize,
}

impl PhaseControllerBuilder {
    pub fn new(context: EncounterContext) -> Self {
        Self {
            context,
            cooldowns: None,
            config: EncounterConfig::default(),
            mechanics: Vec::new(),
            phases: Vec::new(),
            always_active: Vec::new(),
            prebuilt_always_active: Vec::new(),
            observers: Vec::new(),
            start_phase: 0,
        }
    }

    pub fn from_definition(
        definition: EncounterDefinition,
        context: EncounterContext,
        cooldowns: Arc<CooldownGroupService>,
        config: EncounterConfig,
    ) -> Self {
        let mechanics = definition
            .mechanics
            .into_iter()
            .map(|def| Mechanic::new(def.name, def.trigger, MechanicKind::from_spec(def.effect, &config)))
            .collect();
        tracing::debug!(
            "assembling encounter '{}' ({} phases, {} always-active)",
            definition.name,
            definition.phases.len(),
            definition.always_active.len()
        );
        Self {
            cooldowns: Some(cooldowns),
            mechanics,
            phases: definition.phases,
            always_active: definition.always_active,
            start_phase: definition.start_phase,
            ..Self::new(context).config(config)
        }
    }

    /// Shares a cooldown table with other controllers. A private table is
    /// created when none is given.
    pub fn cooldowns(mut self, cooldowns: Arc<CooldownGroupService>) -> Self {
        self.cooldowns = Some(cooldowns);
        self
    }

    pub fn config(mut self, config: EncounterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn mechanic(mut self, mechanic: Mechanic) -> Self {
        self.mechanics.push(mechanic);
        self
    }

    pub fn phase(mut self, phase: PhaseDef) -> Self {
        self.phases.push(phase);
        self
    }

    pub fn always_active(mut self, def: AlwaysActiveDef) -> Self {
        self.always_active.push(def);
        self
    }

    /// Adds an always-active phase carrying custom behaviors.
    pub fn always_active_phase(mut self, phase: AlwaysActivePhase) -> Self {
        self.prebuilt_always_active.push(phase);
        self
    }

    pub fn observer(mut self, observer: Box<dyn EncounterObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn start_phase(mut self, index: usize) -> Self {
        self.start_phase = index;
        self
    }

    pub fn build(self) -> Result<PhaseController, BuildError> {
        let mut names = HashMap::with_capacity(self.mechanics.len());
        for (index, mechanic) in self.mechanics.iter().enumerate() {
            let index = MechanicIndex(index);
            if let Some(first) = names.insert(mechanic.name().to_owned(), index) {
                return Err(BuildError::DuplicateMechanic {
                    name: mechanic.name().to_owned(),
                    first,
                    second: index,
                });
            }
        }

        let phases = self
            .phases
            .into_iter()
            .map(|def| resolve_phase(def, &names))
            .collect::<Result<Vec<_>, _>>()?;

        let mut always_active = self
            .always_active
            .into_iter()
            .map(|def| resolve_always_active(def, &names, &self.config))
            .collect::<Result<Vec<_>, _>>()?;
        always_active.extend(self.prebuilt_always_active);

        let depth = self.config.max_hierarchy_depth;
        let mechanics = self
            .mechanics
            .into_iter()
            .map(|mechanic| mechanic.with_hierarchy_depth(depth))
            .collect::<Vec<_>>();

        let start_phase = if phases.is_empty() {
            0
        } else {
            self.start_phase.min(phases.len() - 1)
        };
        if start_phase != self.start_phase {
            tracing::warn!(
                "start phase {} out of range, clamped to {}",
                self.start_phase,
                start_phase
            );
        }

        tracing::info!(
            "encounter ready: {} mechanics, {} phases, {} always-active",
            mechanics.len(),
            phases.len(),
            always_active.len()
        );

        Ok(PhaseController {
            ctx: self.context,
            cooldowns: self.cooldowns.unwrap_or_default(),
            prune_timer: IntervalTimer::new(self.config.cooldown_prune_interval),
            config: self.config,
            mechanics,
            names,
            phases,
            always_active,
            observers: self.observers,
            start_phase,
            current: start_phase,
            initialized: false,
        })
    }
}

fn resolve_phase(def: PhaseDef, names: &HashMap<String, MechanicIndex>) -> Result<Phase, BuildError> {
    let toggles = def
        .toggles
        .iter()
        .map(|toggle| match names.get(&toggle.mechanic) {
            Some(index) => Ok((*index, toggle.action)),
            None => Err(BuildError::UnknownToggleMechanic {
                phase: def.name.clone(),
                mechanic: toggle.mechanic.clone(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Phase {
        name: def.name,
        toggles,
        transitions: def.transitions,
    })
}

fn resolve_always_active(
    def: AlwaysActiveDef,
    names: &HashMap<String, MechanicIndex>,
    config: &EncounterConfig,
) -> Result<AlwaysActivePhase, BuildError> {
    let mut phase = AlwaysActivePhase::new(def.name.clone(), def.hp_window, def.eval_interval)
        .reacting_to_phase_entry(def.react_to_phase_entry);
    if let Some(conditions) = def.conditions {
        phase = phase.with_conditions(conditions);
    }
    for threshold in def.thresholds {
        let Some(index) = names.get(&threshold.mechanic).copied() else {
            return Err(BuildError::UnknownBehaviorMechanic {
                phase: def.name,
                mechanic: threshold.mechanic,
            });
        };
        phase.push_behavior(Box::new(ThresholdTracker::new(
            threshold,
            index,
            config.default_max_triggers_per_tick,
        )));
    }
    Ok(phase)
}
