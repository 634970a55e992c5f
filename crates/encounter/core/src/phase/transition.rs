use crate::condition::{ConditionGroup, passes};
use crate::context::EncounterContext;
use crate::types::percent_to_ratio;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionKind {
    /// `hp01 <= value / 100`.
    HpAtOrBelowPercent,
    /// `phase_time >= value` seconds.
    PhaseTimeReached,
    /// The condition group alone decides; `value` is unused.
    ConditionsMet,
}

/// Exit edge of a phase.
///
/// `consumed` is runtime state. A `once` transition that fired stays
/// consumed for the controller's lifetime, across re-entries of its phase.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    pub kind: TransitionKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub value: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub conditions: Option<ConditionGroup>,
    pub target: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub once: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub consumed: bool,
}

impl Transition {
    pub fn new(kind: TransitionKind, value: f32, target: usize) -> Self {
        Self {
            kind,
            value,
            conditions: None,
            target,
            once: false,
            consumed: false,
        }
    }

    pub fn hp_at_or_below(percent: f32, target: usize) -> Self {
        Self::new(TransitionKind::HpAtOrBelowPercent, percent, target)
    }

    pub fn phase_time(seconds: f32, target: usize) -> Self {
        Self::new(TransitionKind::PhaseTimeReached, seconds, target)
    }

    pub fn conditions_met(conditions: ConditionGroup, target: usize) -> Self {
        Self::new(TransitionKind::ConditionsMet, 0.0, target).with_conditions(conditions)
    }

    pub fn with_conditions(mut self, conditions: ConditionGroup) -> Self {
        self.conditions = Some(conditions);
        self
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// A consumed `once` transition is never available again.
    pub fn is_available(&self) -> bool {
        !(self.once && self.consumed)
    }

    pub fn is_satisfied(&self, ctx: &EncounterContext) -> bool {
        match self.kind {
            TransitionKind::HpAtOrBelowPercent => {
                ctx.hp01() <= percent_to_ratio(self.value) && passes(self.conditions.as_ref(), ctx)
            }
            TransitionKind::PhaseTimeReached => {
                ctx.phase_time() >= self.value && passes(self.conditions.as_ref(), ctx)
            }
            // without a group there is nothing to satisfy
            TransitionKind::ConditionsMet => self
                .conditions
                .as_ref()
                .is_some_and(|conditions| conditions.evaluate(ctx)),
        }
    }
}
