//! Trigger mechanics: periodic, gated activations of a single effect.
//!
//! A mechanic owns its timer and per-holder bookkeeping. Each completed round
//! runs one cycle:
//!
//! 1. run condition and global cooldown group
//! 2. per-holder gates ([`gating`])
//! 3. selection and the at-least-one guarantee ([`selection`])
//! 4. the effect itself ([`MechanicKind::execute`])
//! 5. per-holder stamps and the group cooldown push
//!
//! Nothing in a cycle returns an error. A cycle that stops early reports
//! why through [`SkipReason`].

mod config;
mod gating;
mod kinds;
mod selection;

use std::collections::HashMap;

pub use config::{
    ActivationBypass, AngleGate, ForwardSource, GlobalCooldown, RangeGate, SelectionMode,
    TargetSource, TriggerConfig,
};
pub use kinds::{
    AbilityShooter, ActivationEffect, ActivationRequest, AnimationTrigger, EffectSpec,
    MechanicKind, Spawner,
};

use crate::clock::IntervalTimer;
use crate::condition::passes;
use crate::config::EncounterConfig;
use crate::context::EncounterContext;
use crate::cooldown::{CooldownGroupId, CooldownGroupService, compute_group_id};
use crate::types::AnchorId;
use selection::SelectionRules;

/// Why a cycle ended without running the effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
pub enum SkipReason {
    RunCondition,
    GlobalCooldown,
    NoEligibleTargets,
    NothingSelected,
    /// The effect had no executor or reported that nothing happened.
    EffectUnavailable,
}

/// Result of one activation attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum ActivationOutcome {
    Activated {
        holders: Vec<AnchorId>,
        target: Option<AnchorId>,
    },
    Skipped(SkipReason),
}

impl ActivationOutcome {
    pub fn is_activated(&self) -> bool {
        matches!(self, Self::Activated { .. })
    }
}

/// One ability unit that phases enable and disable.
#[derive(Debug)]
pub struct Mechanic {
    name: String,
    config: TriggerConfig,
    kind: MechanicKind,

    enabled: bool,
    scheduled: bool,
    timer: IntervalTimer,
    next_ready: HashMap<AnchorId, f32>,
    round_robin_cursor: usize,
    cached_group: Option<CooldownGroupId>,
    max_hierarchy_depth: usize,
    activations: u64,
}

impl Mechanic {
    pub fn new(name: impl Into<String>, config: TriggerConfig, kind: MechanicKind) -> Self {
        let timer = IntervalTimer::new(config.interval);
        let scheduled = config.tick_while_disabled;
        Self {
            name: name.into(),
            config,
            kind,
            enabled: false,
            scheduled,
            timer,
            next_ready: HashMap::new(),
            round_robin_cursor: 0,
            cached_group: None,
            max_hierarchy_depth: EncounterConfig::DEFAULT_MAX_HIERARCHY_DEPTH,
            activations: 0,
        }
    }

    pub fn with_hierarchy_depth(mut self, max_hierarchy_depth: usize) -> Self {
        self.max_hierarchy_depth = max_hierarchy_depth;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    pub fn kind(&self) -> &MechanicKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut MechanicKind {
        &mut self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the timer advances this tick (`enabled || tick_while_disabled`).
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Successful activations so far.
    pub fn activations(&self) -> u64 {
        self.activations
    }

    pub fn timer(&self) -> &IntervalTimer {
        &self.timer
    }

    /// Phase membership; owned by the controller.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            if enabled {
                if self.config.fire_on_enable {
                    self.timer.prime();
                }
            } else if !self.config.tick_while_disabled {
                self.timer.reset();
            }
            tracing::debug!("{}: {}", self.name, if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
        self.scheduled = enabled || self.config.tick_while_disabled;
    }

    pub fn on_phase_enter(&mut self, ctx: &EncounterContext) {
        if self.enabled && self.config.restart_on_phase_enter {
            self.timer.reset();
            if self.config.fire_on_enable {
                self.timer.prime();
            }
        }
        self.kind.on_phase_enter(ctx);
    }

    pub fn on_phase_exit(&mut self, ctx: &EncounterContext) {
        self.kind.on_phase_exit(ctx);
    }

    /// Cooldown group this mechanic pushes into, if it takes part in one.
    ///
    /// Resolved on first use and cached for the mechanic's lifetime.
    pub fn group_id(&mut self, ctx: &EncounterContext) -> Option<CooldownGroupId> {
        let global = self.config.global_cooldown?;
        if let Some(group) = self.cached_group {
            return Some(group);
        }
        let owner = self.config.owner.or(ctx.boss());
        let group = compute_group_id(
            owner,
            global.custom_anchor,
            global.custom_int,
            global.source,
            ctx.oracles().hierarchy().ok(),
            self.max_hierarchy_depth,
        );
        tracing::trace!("{}: resolved cooldown {}", self.name, group);
        self.cached_group = Some(group);
        Some(group)
    }

    /// Advances the timer and runs a cycle when a round completes.
    ///
    /// Returns `None` when no cycle was attempted this tick.
    pub fn tick(
        &mut self,
        dt: f32,
        ctx: &EncounterContext,
        cooldowns: &CooldownGroupService,
    ) -> Option<ActivationOutcome> {
        if !self.scheduled {
            return None;
        }
        if !self.enabled {
            self.timer.accumulate_saturating(dt);
            return None;
        }
        if !self.timer.advance(dt) {
            return None;
        }
        Some(self.run_cycle(ctx, cooldowns, ActivationBypass::empty(), true))
    }

    /// Runs one cycle immediately, outside the timer.
    ///
    /// Works whether or not the mechanic is enabled and skips the run
    /// condition; the global and per-holder cooldowns apply unless bypassed.
    pub fn activate_now(
        &mut self,
        ctx: &EncounterContext,
        cooldowns: &CooldownGroupService,
        ignore_global: bool,
        ignore_per_target: bool,
    ) -> ActivationOutcome {
        let bypass = ActivationBypass::from_flags(ignore_global, ignore_per_target);
        self.activate_with(ctx, cooldowns, bypass)
    }

    /// Runs one out-of-band cycle with explicit cooldown bypasses.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Encounter state the gates and effect read from
    /// * `cooldowns` - Shared global cooldown groups
    /// * `bypass` - Cooldown checks to skip for this cycle
    ///
    /// # Returns
    ///
    /// [`ActivationOutcome::Activated`] with the chosen holders and target,
    /// or [`ActivationOutcome::Skipped`] naming the first gate that failed.
    /// The interval timer is left untouched either way.
    pub fn activate_with(
        &mut self,
        ctx: &EncounterContext,
        cooldowns: &CooldownGroupService,
        bypass: ActivationBypass,
    ) -> ActivationOutcome {
        self.run_cycle(ctx, cooldowns, bypass, false)
    }

    fn run_cycle(
        &mut self,
        ctx: &EncounterContext,
        cooldowns: &CooldownGroupService,
        bypass: ActivationBypass,
        check_condition: bool,
    ) -> ActivationOutcome {
        let now = ctx.now();

        if check_condition && !passes(self.config.run_condition.as_ref(), ctx) {
            return self.skip(SkipReason::RunCondition);
        }

        let group = self.group_id(ctx);
        if let Some(group) = group
            && !bypass.contains(ActivationBypass::GLOBAL_COOLDOWN)
            && !cooldowns.is_ready(group, now)
        {
            return self.skip(SkipReason::GlobalCooldown);
        }

        let holders = self.resolve_holders(ctx);
        let target = self.resolve_target(ctx);
        let eligible = gating::eligible_holders(
            &self.config,
            &holders,
            ctx,
            target,
            &self.next_ready,
            bypass.contains(ActivationBypass::TARGET_COOLDOWN),
        );
        if eligible.is_empty() {
            return self.skip(SkipReason::NoEligibleTargets);
        }

        let rules = SelectionRules {
            mode: self.config.selection,
            chance: self.config.chance,
            max_per_activation: self.config.max_per_activation,
            guarantee_at_least_one: self.config.guarantee_at_least_one,
        };
        let chosen = selection::select(&rules, &eligible, &mut self.round_robin_cursor, ctx);
        if chosen.is_empty() {
            return self.skip(SkipReason::NothingSelected);
        }

        let request = ActivationRequest {
            mechanic: &self.name,
            holders: &chosen,
            target,
        };
        if !self.kind.execute(&request, ctx) {
            return self.skip(SkipReason::EffectUnavailable);
        }

        if self.config.per_target_cooldown > 0.0 {
            let ready_at = now + self.config.per_target_cooldown;
            for holder in &chosen {
                self.next_ready.insert(*holder, ready_at);
            }
        }
        if let Some(group) = group {
            let duration = self.kind.global_cooldown(self.config.interval);
            cooldowns.push_cooldown(group, duration, now);
        }
        self.activations += 1;

        tracing::debug!(
            "{} ({}) activated on {} holder(s) at t={:.2}",
            self.name,
            self.kind.kind_name(),
            chosen.len(),
            now
        );
        ActivationOutcome::Activated {
            holders: chosen,
            target,
        }
    }

    fn skip(&self, reason: SkipReason) -> ActivationOutcome {
        tracing::trace!("{}: skipped ({})", self.name, <&'static str>::from(reason));
        ActivationOutcome::Skipped(reason)
    }

    fn resolve_holders(&self, ctx: &EncounterContext) -> Vec<AnchorId> {
        if self.config.holders.is_empty() {
            ctx.boss().into_iter().collect()
        } else {
            self.config.holders.clone()
        }
    }

    fn resolve_target(&self, ctx: &EncounterContext) -> Option<AnchorId> {
        match self.config.target {
            TargetSource::Player => ctx.player(),
            TargetSource::Boss => ctx.boss(),
            TargetSource::Anchor(anchor) => Some(anchor),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::condition::{Condition, ConditionGroup};
    use crate::cooldown::GroupIdSource;
    use crate::env::{AbilityExecutor, OracleBundle};

    #[derive(Default)]
    struct Recorder {
        casts: Mutex<Vec<(String, AnchorId)>>,
    }

    impl Recorder {
        fn count(&self) -> usize {
            self.casts.lock().unwrap().len()
        }
    }

    impl AbilityExecutor for Recorder {
        fn execute_ability(&self, ability: &str, source: AnchorId, _target: Option<AnchorId>) -> bool {
            self.casts.lock().unwrap().push((ability.to_owned(), source));
            true
        }
    }

    const BOSS: AnchorId = AnchorId(1);
    const PLAYER: AnchorId = AnchorId(2);

    fn setup() -> (Arc<Recorder>, EncounterContext, CooldownGroupService) {
        let recorder = Arc::new(Recorder::default());
        let ctx = EncounterContext::new(OracleBundle::empty().with_abilities(recorder.clone()))
            .with_boss(BOSS)
            .with_player(PLAYER);
        (recorder, ctx, CooldownGroupService::new())
    }

    fn shooter(ability: &str, global_cooldown: Option<f32>) -> MechanicKind {
        MechanicKind::AbilityShooter(AbilityShooter {
            ability: ability.into(),
            global_cooldown,
        })
    }

    fn step(
        mechanic: &mut Mechanic,
        dt: f32,
        ctx: &mut EncounterContext,
        cooldowns: &CooldownGroupService,
    ) -> Option<ActivationOutcome> {
        ctx.advance(dt);
        mechanic.tick(dt, ctx, cooldowns)
    }

    #[test]
    fn fires_once_per_interval_with_carry() {
        let (recorder, mut ctx, cooldowns) = setup();
        let mut mechanic = Mechanic::new("bolt", TriggerConfig::default(), shooter("bolt", None));
        mechanic.set_enabled(true);

        for _ in 0..5 {
            step(&mut mechanic, 0.5, &mut ctx, &cooldowns);
        }
        // 2.5 seconds of ticks, two full rounds
        assert_eq!(recorder.count(), 2);
        assert_eq!(recorder.casts.lock().unwrap()[0], ("bolt".to_owned(), BOSS));
    }

    #[test]
    fn disabled_mechanic_saturates_then_fires_on_enable() {
        let (recorder, mut ctx, cooldowns) = setup();
        let config = TriggerConfig {
            tick_while_disabled: true,
            ..TriggerConfig::default().with_interval(2.0)
        };
        let mut mechanic = Mechanic::new("slam", config, shooter("slam", None));
        assert!(mechanic.is_scheduled());

        for _ in 0..10 {
            assert_eq!(step(&mut mechanic, 1.0, &mut ctx, &cooldowns), None);
        }
        assert_eq!(mechanic.timer().elapsed(), 2.0);

        mechanic.set_enabled(true);
        assert!(step(&mut mechanic, 0.0, &mut ctx, &cooldowns).is_some_and(|o| o.is_activated()));
        assert_eq!(step(&mut mechanic, 0.0, &mut ctx, &cooldowns), None);
        assert_eq!(recorder.count(), 1);
    }

    #[test]
    fn disabling_resets_unscheduled_timer() {
        let (_, mut ctx, cooldowns) = setup();
        let config = TriggerConfig::default().with_interval(2.0);
        let mut mechanic = Mechanic::new("bolt", config, shooter("bolt", None));
        mechanic.set_enabled(true);
        step(&mut mechanic, 1.5, &mut ctx, &cooldowns);
        mechanic.set_enabled(false);
        assert!(!mechanic.is_scheduled());
        assert_eq!(mechanic.timer().elapsed(), 0.0);
    }

    #[test]
    fn shared_group_blocks_second_mechanic() {
        let (recorder, mut ctx, cooldowns) = setup();
        let shared = GlobalCooldown {
            source: GroupIdSource::CustomInt,
            custom_anchor: None,
            custom_int: 7,
        };
        let config = TriggerConfig::default().with_global_cooldown(shared);
        let mut first = Mechanic::new("first", config.clone(), shooter("first", Some(5.0)));
        let mut second = Mechanic::new("second", config, shooter("second", None));
        first.set_enabled(true);
        second.set_enabled(true);

        ctx.advance(1.0);
        assert!(first.tick(1.0, &ctx, &cooldowns).is_some_and(|o| o.is_activated()));
        assert_eq!(
            second.tick(1.0, &ctx, &cooldowns),
            Some(ActivationOutcome::Skipped(SkipReason::GlobalCooldown))
        );
        assert_eq!(cooldowns.remaining(CooldownGroupId(7), ctx.now()), 5.0);
        assert_eq!(recorder.count(), 1);
    }

    #[test]
    fn missing_executor_leaves_no_bookkeeping() {
        let ctx = EncounterContext::new(OracleBundle::empty()).with_boss(BOSS);
        let cooldowns = CooldownGroupService::new();
        let config = TriggerConfig {
            per_target_cooldown: 3.0,
            global_cooldown: Some(GlobalCooldown::default()),
            ..TriggerConfig::default()
        };
        let mut mechanic = Mechanic::new("bolt", config, shooter("bolt", None));

        let outcome = mechanic.activate_now(&ctx, &cooldowns, false, false);
        assert_eq!(outcome, ActivationOutcome::Skipped(SkipReason::EffectUnavailable));
        assert!(cooldowns.is_empty());
        assert!(mechanic.next_ready.is_empty());
        assert_eq!(mechanic.activations(), 0);
    }

    #[test]
    fn activate_now_skips_run_condition_and_honours_holder_cooldown() {
        let (recorder, ctx, cooldowns) = setup();
        let config = TriggerConfig {
            per_target_cooldown: 10.0,
            run_condition: Some(ConditionGroup::all(vec![Condition::HpBelow { percent: 10.0 }])),
            ..TriggerConfig::default()
        };
        let mut mechanic = Mechanic::new("burst", config, shooter("burst", None));
        assert!(!mechanic.is_enabled());

        assert!(mechanic.activate_now(&ctx, &cooldowns, false, false).is_activated());
        assert_eq!(
            mechanic.activate_now(&ctx, &cooldowns, false, false),
            ActivationOutcome::Skipped(SkipReason::NoEligibleTargets)
        );
        assert!(mechanic.activate_now(&ctx, &cooldowns, false, true).is_activated());
        assert_eq!(recorder.count(), 2);
    }

    #[test]
    fn run_condition_blocks_periodic_cycle() {
        let (recorder, mut ctx, cooldowns) = setup();
        let config = TriggerConfig {
            run_condition: Some(ConditionGroup::all(vec![Condition::HpBelow { percent: 10.0 }])),
            ..TriggerConfig::default()
        };
        let mut mechanic = Mechanic::new("enrage", config, shooter("enrage", None));
        mechanic.set_enabled(true);
        assert_eq!(
            step(&mut mechanic, 1.0, &mut ctx, &cooldowns),
            Some(ActivationOutcome::Skipped(SkipReason::RunCondition))
        );
        assert_eq!(recorder.count(), 0);
    }
}
