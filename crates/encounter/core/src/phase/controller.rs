use std::collections::HashMap;
use std::sync::Arc;

use super::always_active::AlwaysActivePhase;
use super::builder::PhaseControllerBuilder;
use super::definition::{EncounterDefinition, ToggleAction};
use super::observer::EncounterObserver;
use super::transition::Transition;
use crate::clock::IntervalTimer;
use crate::config::EncounterConfig;
use crate::context::EncounterContext;
use crate::cooldown::CooldownGroupService;
use crate::error::BuildError;
use crate::mechanic::{ActivationBypass, ActivationOutcome, Mechanic};
use crate::types::MechanicIndex;

/// A main phase with its toggles resolved to mechanic indices.
#[derive(Clone, Debug, PartialEq)]
pub struct Phase {
    pub(crate) name: String,
    pub(crate) toggles: Vec<(MechanicIndex, ToggleAction)>,
    pub(crate) transitions: Vec<Transition>,
}

impl Phase {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn toggles(&self) -> &[(MechanicIndex, ToggleAction)] {
        &self.toggles
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
}

/// Owns an encounter and drives it one tick at a time.
///
/// # Tick order
///
/// 1. context refresh (time, frame, health)
/// 2. first-tick entry of the start phase
/// 3. transitions of the current phase, first satisfied wins, at most one
/// 4. mechanics in registration order
/// 5. always-active phases, with their crossings dispatched
/// 6. periodic cooldown prune
pub struct PhaseController {
    pub(crate) ctx: EncounterContext,
    pub(crate) cooldowns: Arc<CooldownGroupService>,
    pub(crate) config: EncounterConfig,
    pub(crate) mechanics: Vec<Mechanic>,
    pub(crate) names: HashMap<String, MechanicIndex>,
    pub(crate) phases: Vec<Phase>,
    pub(crate) always_active: Vec<AlwaysActivePhase>,
    pub(crate) observers: Vec<Box<dyn EncounterObserver>>,
    pub(crate) start_phase: usize,
    pub(crate) current: usize,
    pub(crate) initialized: bool,
    pub(crate) prune_timer: IntervalTimer,
}

impl PhaseController {
    pub fn builder(context: EncounterContext) -> PhaseControllerBuilder {
        PhaseControllerBuilder::new(context)
    }

    /// Builds a controller from authored data.
    pub fn from_definition(
        definition: EncounterDefinition,
        context: EncounterContext,
        cooldowns: Arc<CooldownGroupService>,
        config: EncounterConfig,
    ) -> Result<Self, BuildError> {
        PhaseControllerBuilder::from_definition(definition, context, cooldowns, config).build()
    }

    /// Advances the encounter by `dt` seconds.
    ///
    /// The first call enters the start phase. Each call then runs, in order:
    ///
    /// ```text
    /// transitions -> main-phase mechanics -> always-active phases -> cooldown prune
    /// ```
    pub fn tick(&mut self, dt: f32) {
        self.ctx.advance(dt);

        if !self.initialized {
            let start = self.start_phase;
            self.set_phase(start);
            self.initialized = true;
        }

        self.evaluate_transitions();
        self.tick_mechanics(dt);
        self.tick_always_active(dt);

        if self.config.cooldown_prune_interval > 0.0 && self.prune_timer.advance(dt) {
            let removed = self.cooldowns.prune(self.ctx.now());
            if removed > 0 {
                tracing::trace!("pruned {} expired cooldown group(s)", removed);
            }
        }
    }

    fn evaluate_transitions(&mut self) {
        let Some(phase) = self.phases.get_mut(self.current) else {
            return;
        };
        let ctx = &self.ctx;
        let Some(index) = phase
            .transitions
            .iter()
            .position(|transition| transition.is_available() && transition.is_satisfied(ctx))
        else {
            return;
        };

        let transition = &mut phase.transitions[index];
        if transition.once {
            transition.consumed = true;
        }
        let target = transition.target;
        tracing::debug!(
            "phase '{}' transition #{} ({}) satisfied -> {}",
            phase.name,
            index,
            <&'static str>::from(transition.kind),
            target
        );
        self.set_phase(target);
    }

    fn tick_mechanics(&mut self, dt: f32) {
        for (index, mechanic) in self.mechanics.iter_mut().enumerate() {
            if let Some(ActivationOutcome::Activated { holders, .. }) =
                mechanic.tick(dt, &self.ctx, &self.cooldowns)
            {
                for observer in &mut self.observers {
                    observer.on_mechanic_activated(
                        MechanicIndex(index),
                        mechanic.name(),
                        &holders,
                        &self.ctx,
                    );
                }
            }
        }
    }

    fn tick_always_active(&mut self, dt: f32) {
        for phase in &mut self.always_active {
            let result = phase.tick(dt, &self.ctx);
            if let Some(active) = result.toggled {
                for observer in &mut self.observers {
                    observer.on_always_active_toggled(phase.name(), active);
                }
            }

            for crossing in result.crossings {
                let Some(mechanic) = self.mechanics.get_mut(crossing.mechanic.0) else {
                    tracing::warn!("crossing targets missing {}", crossing.mechanic);
                    continue;
                };
                let outcome = mechanic.activate_with(&self.ctx, &self.cooldowns, crossing.bypass);
                for observer in &mut self.observers {
                    observer.on_threshold_crossed(phase.name(), &crossing, &outcome);
                    if let ActivationOutcome::Activated { holders, .. } = &outcome {
                        observer.on_mechanic_activated(
                            crossing.mechanic,
                            mechanic.name(),
                            holders,
                            &self.ctx,
                        );
                    }
                }
            }
        }
    }

    /// Enters main phase `index`, clamped to the last phase.
    ///
    /// Every mechanic gets its phase-exit hook, then the new phase's toggles
    /// apply and every mechanic gets its phase-enter hook. Mechanics not
    /// named by the new phase keep their enabled state. Observers hear about
    /// the change last.
    ///
    /// # Arguments
    ///
    /// * `index` - Main phase to enter; values past the end select the last phase
    ///
    /// # Returns
    ///
    /// Nothing. The call is a no-op without phases or when the clamped
    /// `index` is already current.
    pub fn set_phase(&mut self, index: usize) {
        if self.phases.is_empty() {
            return;
        }
        let index = index.min(self.phases.len() - 1);
        if self.initialized && index == self.current {
            return;
        }
        let from = self.initialized.then_some(self.current);

        if from.is_some() {
            for mechanic in &mut self.mechanics {
                mechanic.on_phase_exit(&self.ctx);
            }
        }
        for (mechanic, action) in &self.phases[index].toggles {
            if let Some(mechanic) = self.mechanics.get_mut(mechanic.0) {
                mechanic.set_enabled(action.enables());
            }
        }
        self.current = index;
        self.initialized = true;
        self.ctx.mark_phase_start();
        for mechanic in &mut self.mechanics {
            mechanic.on_phase_enter(&self.ctx);
        }
        for phase in &mut self.always_active {
            if phase.reacts_to_phase_entry() {
                phase.request_reevaluation();
            }
        }

        let name = &self.phases[index].name;
        tracing::info!("entered phase {} '{}' at t={:.2}", index, name, self.ctx.now());
        for observer in &mut self.observers {
            observer.on_phase_changed(from, index, name, &self.ctx);
        }
    }

    /// Activates mechanic `name` right away, outside its timer.
    ///
    /// `None` when no mechanic has that name.
    pub fn activate_now(
        &mut self,
        name: &str,
        ignore_global: bool,
        ignore_per_target: bool,
    ) -> Option<ActivationOutcome> {
        let index = self.mechanic_index(name)?;
        self.activate_index(
            index,
            ActivationBypass::from_flags(ignore_global, ignore_per_target),
        )
    }

    pub fn activate_index(
        &mut self,
        index: MechanicIndex,
        bypass: ActivationBypass,
    ) -> Option<ActivationOutcome> {
        let mechanic = self.mechanics.get_mut(index.0)?;
        let outcome = mechanic.activate_with(&self.ctx, &self.cooldowns, bypass);
        if let ActivationOutcome::Activated { holders, .. } = &outcome {
            for observer in &mut self.observers {
                observer.on_mechanic_activated(index, mechanic.name(), holders, &self.ctx);
            }
        }
        Some(outcome)
    }

    pub fn add_observer(&mut self, observer: Box<dyn EncounterObserver>) {
        self.observers.push(observer);
    }

    /// Index of the current main phase; `None` before the first tick or
    /// without phases.
    pub fn current_phase(&self) -> Option<usize> {
        (self.initialized && !self.phases.is_empty()).then_some(self.current)
    }

    pub fn current_phase_name(&self) -> Option<&str> {
        self.current_phase()
            .and_then(|index| self.phases.get(index))
            .map(Phase::name)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn mechanics(&self) -> &[Mechanic] {
        &self.mechanics
    }

    pub fn mechanic_index(&self, name: &str) -> Option<MechanicIndex> {
        self.names.get(name).copied()
    }

    pub fn mechanic(&self, name: &str) -> Option<&Mechanic> {
        self.mechanic_index(name)
            .and_then(|index| self.mechanics.get(index.0))
    }

    pub fn mechanic_mut(&mut self, name: &str) -> Option<&mut Mechanic> {
        let index = self.mechanic_index(name)?;
        self.mechanics.get_mut(index.0)
    }

    pub fn always_active(&self) -> &[AlwaysActivePhase] {
        &self.always_active
    }

    pub fn always_active_mut(&mut self, index: usize) -> Option<&mut AlwaysActivePhase> {
        self.always_active.get_mut(index)
    }

    pub fn context(&self) -> &EncounterContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EncounterContext {
        &mut self.ctx
    }

    pub fn cooldowns(&self) -> &Arc<CooldownGroupService> {
        &self.cooldowns
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }
}

impl std::fmt::Debug for PhaseController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseController")
            .field("current", &self.current_phase())
            .field("phases", &self.phases.len())
            .field("mechanics", &self.mechanics.len())
            .field("always_active", &self.always_active)
            .field("now", &self.ctx.now())
            .finish()
    }
}
