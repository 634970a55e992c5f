//! Tuning data of a trigger mechanic.

use glam::Vec3;

use crate::condition::ConditionGroup;
use crate::cooldown::GroupIdSource;
use crate::types::AnchorId;

/// How the surviving candidates of one activation are chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionMode {
    /// Every candidate, each passing its own chance roll, capped.
    #[default]
    All,
    /// One candidate uniformly at random, subject to chance.
    RandomOne,
    /// Partial shuffle, first `count` taken, each subject to chance.
    RandomSome { count: usize },
    /// Rotating start index across activations, capped.
    RoundRobin,
}

/// Who the mechanic aims at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetSource {
    /// The context's player anchor.
    #[default]
    Player,
    /// The context's boss anchor.
    Boss,
    Anchor(AnchorId),
}

/// Direction the angle gate measures against.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForwardSource {
    /// Each holder's own facing.
    #[default]
    Holder,
    /// The boss anchor's facing.
    Boss,
    /// A fixed world direction.
    Fixed(Vec3),
}

/// Holder-to-target distance bounds; `0` leaves a side open.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RangeGate {
    pub min: f32,
    pub max: f32,
}

/// Angle bounds in degrees between the forward source and holder-to-target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AngleGate {
    pub min: f32,
    pub max: f32,
    pub forward: ForwardSource,
}

impl Default for AngleGate {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 180.0,
            forward: ForwardSource::Holder,
        }
    }
}

/// Membership in a shared cooldown group.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GlobalCooldown {
    pub source: GroupIdSource,
    pub custom_anchor: Option<AnchorId>,
    pub custom_int: u64,
}

bitflags::bitflags! {
    /// Checks an out-of-band activation is allowed to skip.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ActivationBypass: u8 {
        const GLOBAL_COOLDOWN = 1 << 0;
        const TARGET_COOLDOWN = 1 << 1;
    }
}

impl ActivationBypass {
    pub fn from_flags(ignore_global: bool, ignore_per_target: bool) -> Self {
        let mut bypass = Self::empty();
        bypass.set(Self::GLOBAL_COOLDOWN, ignore_global);
        bypass.set(Self::TARGET_COOLDOWN, ignore_per_target);
        bypass
    }
}

/// Everything that decides when and against whom a mechanic fires.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TriggerConfig {
    /// Seconds between activation attempts.
    pub interval: f32,
    /// Fill the timer on enable so the first attempt happens on the next tick.
    pub fire_on_enable: bool,
    /// Keep the timer running while disabled (saturating at one round).
    pub tick_while_disabled: bool,
    /// Restart the timer whenever a main phase is entered with the mechanic enabled.
    pub restart_on_phase_enter: bool,

    pub run_condition: Option<ConditionGroup>,

    /// Anchors activations originate from; each is one candidate.
    pub holders: Vec<AnchorId>,
    pub target: TargetSource,
    /// Anchor the owner-root group lookup starts from. Defaults to the boss.
    pub owner: Option<AnchorId>,

    pub selection: SelectionMode,
    /// Per-candidate pass probability in `0..=1`.
    pub chance: f32,
    /// Cap on chosen candidates per activation; `0` is unlimited.
    pub max_per_activation: usize,
    pub guarantee_at_least_one: bool,

    /// Seconds a holder rests after being chosen. `0` disables.
    pub per_target_cooldown: f32,
    pub range: Option<RangeGate>,
    pub angle: Option<AngleGate>,
    pub require_line_of_sight: bool,

    pub global_cooldown: Option<GlobalCooldown>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            interval: 1.0,
            fire_on_enable: false,
            tick_while_disabled: false,
            restart_on_phase_enter: false,
            run_condition: None,
            holders: Vec::new(),
            target: TargetSource::Player,
            owner: None,
            selection: SelectionMode::All,
            chance: 1.0,
            max_per_activation: 0,
            guarantee_at_least_one: false,
            per_target_cooldown: 0.0,
            range: None,
            angle: None,
            require_line_of_sight: false,
            global_cooldown: None,
        }
    }
}

impl TriggerConfig {
    pub fn with_interval(mut self, interval: f32) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_holders(mut self, holders: Vec<AnchorId>) -> Self {
        self.holders = holders;
        self
    }

    pub fn with_selection(mut self, selection: SelectionMode) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_chance(mut self, chance: f32) -> Self {
        self.chance = chance;
        self
    }

    pub fn with_global_cooldown(mut self, global_cooldown: GlobalCooldown) -> Self {
        self.global_cooldown = Some(global_cooldown);
        self
    }
}
