use crate::clock::IntervalTimer;
use crate::condition::{ConditionGroup, passes};
use crate::context::EncounterContext;
use crate::threshold::{PhaseBehavior, ThresholdCrossing};

/// Inclusive health window in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HpWindow {
    pub min: f32,
    pub max: f32,
}

impl HpWindow {
    pub const FULL: Self = Self {
        min: 0.0,
        max: 100.0,
    };

    pub fn contains(&self, hp01: f32) -> bool {
        let percent = hp01 * 100.0;
        let (min, max) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        percent >= min && percent <= max
    }
}

impl Default for HpWindow {
    fn default() -> Self {
        Self::FULL
    }
}

/// What one tick of an always-active phase produced.
#[derive(Debug, Default)]
pub(crate) struct AlwaysActiveTick {
    pub toggled: Option<bool>,
    pub crossings: Vec<ThresholdCrossing>,
}

/// Sub-phase running alongside the main phase index.
///
/// Its gate is re-evaluated every `eval_interval` seconds or right after a
/// main-phase change when `react_to_phase_entry` is set. Behaviors tick
/// every frame while the phase is active.
pub struct AlwaysActivePhase {
    name: String,
    hp_window: HpWindow,
    conditions: Option<ConditionGroup>,
    react_to_phase_entry: bool,

    eval_timer: IntervalTimer,
    reevaluate: bool,
    active: bool,
    behaviors: Vec<Box<dyn PhaseBehavior>>,
}

impl AlwaysActivePhase {
    pub fn new(name: impl Into<String>, hp_window: HpWindow, eval_interval: f32) -> Self {
        Self {
            name: name.into(),
            hp_window,
            conditions: None,
            react_to_phase_entry: false,
            eval_timer: IntervalTimer::primed(eval_interval),
            reevaluate: false,
            active: false,
            behaviors: Vec::new(),
        }
    }

    pub fn with_conditions(mut self, conditions: ConditionGroup) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn reacting_to_phase_entry(mut self, react: bool) -> Self {
        self.react_to_phase_entry = react;
        self
    }

    pub fn with_behavior(mut self, behavior: Box<dyn PhaseBehavior>) -> Self {
        self.behaviors.push(behavior);
        self
    }

    pub fn push_behavior(&mut self, behavior: Box<dyn PhaseBehavior>) {
        self.behaviors.push(behavior);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn reacts_to_phase_entry(&self) -> bool {
        self.react_to_phase_entry
    }

    pub fn behaviors(&self) -> &[Box<dyn PhaseBehavior>] {
        &self.behaviors
    }

    pub(crate) fn request_reevaluation(&mut self) {
        self.reevaluate = true;
    }

    fn gate_open(&self, ctx: &EncounterContext) -> bool {
        self.hp_window.contains(ctx.hp01()) && passes(self.conditions.as_ref(), ctx)
    }

    pub(crate) fn tick(&mut self, dt: f32, ctx: &EncounterContext) -> AlwaysActiveTick {
        let mut result = AlwaysActiveTick::default();

        let timer_due = self.eval_timer.advance(dt);
        if timer_due || std::mem::take(&mut self.reevaluate) {
            let open = self.gate_open(ctx);
            if open != self.active {
                self.active = open;
                for behavior in &mut self.behaviors {
                    if open {
                        behavior.on_enter(ctx);
                    } else {
                        behavior.on_exit(ctx);
                    }
                }
                tracing::debug!(
                    "always-active '{}' {} at hp {:.1}%",
                    self.name,
                    if open { "entered" } else { "exited" },
                    ctx.hp01() * 100.0
                );
                result.toggled = Some(open);
            }
        }

        if self.active {
            for behavior in &mut self.behaviors {
                result.crossings.extend(behavior.tick(dt, ctx));
            }
        }
        result
    }
}

impl std::fmt::Debug for AlwaysActivePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlwaysActivePhase")
            .field("name", &self.name)
            .field("hp_window", &self.hp_window)
            .field("active", &self.active)
            .field("behaviors", &self.behaviors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::env::{HealthOracle, OracleBundle};

    struct Health(AtomicU32);

    impl HealthOracle for Health {
        fn health(&self) -> f32 {
            self.0.load(Ordering::Relaxed) as f32
        }

        fn max_health(&self) -> f32 {
            100.0
        }
    }

    #[derive(Default)]
    struct Counting {
        enters: u32,
        ticks: u32,
    }

    impl PhaseBehavior for Counting {
        fn on_enter(&mut self, _ctx: &EncounterContext) {
            self.enters += 1;
        }

        fn tick(&mut self, _dt: f32, _ctx: &EncounterContext) -> Vec<ThresholdCrossing> {
            self.ticks += 1;
            Vec::new()
        }
    }

    #[test]
    fn window_is_inclusive_and_order_agnostic() {
        let window = HpWindow { min: 60.0, max: 20.0 };
        assert!(window.contains(0.2));
        assert!(window.contains(0.6));
        assert!(!window.contains(0.61));
        assert!(HpWindow::FULL.contains(0.0));
    }

    #[test]
    fn gate_is_only_rechecked_on_interval_or_request() {
        let health = Arc::new(Health(AtomicU32::new(100)));
        let mut ctx = EncounterContext::new(OracleBundle::empty().with_health(health.clone()));
        let mut phase = AlwaysActivePhase::new("enrage", HpWindow { min: 0.0, max: 50.0 }, 10.0)
            .with_behavior(Box::new(Counting::default()));

        ctx.advance(0.1);
        assert_eq!(phase.tick(0.1, &ctx).toggled, None);

        health.0.store(40, Ordering::Relaxed);
        ctx.advance(0.1);
        // below the window but the interval has not elapsed
        assert_eq!(phase.tick(0.1, &ctx).toggled, None);
        assert!(!phase.is_active());

        phase.request_reevaluation();
        ctx.advance(0.1);
        assert_eq!(phase.tick(0.1, &ctx).toggled, Some(true));
        ctx.advance(0.1);
        assert_eq!(phase.tick(0.1, &ctx).toggled, None);
        assert!(phase.is_active());
    }
}
