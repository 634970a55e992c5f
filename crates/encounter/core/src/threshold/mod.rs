//! Threshold trackers: one-shot activations as a value falls (or rises)
//! through evenly spaced boundaries.
//!
//! A tracker divides its domain into `N` segments and fires each of the
//! resulting boundaries at most once per entry. Firing never activates a
//! mechanic itself; it produces a [`ThresholdCrossing`] for the controller.
mod behavior;
mod boundaries;

pub use behavior::{PhaseBehavior, ThresholdCrossing};
pub use boundaries::Domain;

use crate::clock::IntervalTimer;
use crate::context::EncounterContext;
use crate::mechanic::ActivationBypass;
use crate::types::{AnchorId, MechanicIndex};
use boundaries::build_boundaries;

/// Value a tracker follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackedValue {
    /// Boss health ratio.
    #[default]
    Health,
    /// Live member count of `root` relative to the count at entry.
    Population { root: AnchorId },
}

/// How the number of segments is decided.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentMode {
    /// `round(100 / step)` segments.
    PercentStep { step: f32 },
    /// One segment per member of `root`; `live` re-reads the count on every
    /// evaluation instead of capturing it at entry.
    Population { root: AnchorId, live: bool },
}

impl Default for SegmentMode {
    fn default() -> Self {
        Self::PercentStep { step: 25.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Down,
    Up,
    Both,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ThresholdConfig {
    pub tracked: TrackedValue,
    pub segments: SegmentMode,
    pub domain: Domain,
    pub direction: Direction,
    /// Seconds between evaluations; `0` evaluates every tick.
    pub eval_interval: f32,
    /// Crossings reported per evaluation. `None` takes the engine default,
    /// `Some(0)` is unlimited.
    pub max_triggers_per_tick: Option<usize>,
    /// Name of the mechanic activated on each crossing.
    pub mechanic: String,
    pub ignore_global_cooldown: bool,
    pub ignore_per_target_cooldown: bool,
    /// Label forwarded to observers with each crossing.
    pub notify: Option<String>,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            tracked: TrackedValue::Health,
            segments: SegmentMode::default(),
            domain: Domain::Full,
            direction: Direction::Down,
            eval_interval: 0.0,
            max_triggers_per_tick: None,
            mechanic: String::new(),
            ignore_global_cooldown: false,
            ignore_per_target_cooldown: false,
            notify: None,
        }
    }
}

/// Fires each boundary at most once between entry and exit.
#[derive(Debug)]
pub struct ThresholdTracker {
    config: ThresholdConfig,
    mechanic: MechanicIndex,
    cap: usize,

    timer: IntervalTimer,
    segments: usize,
    boundaries: Vec<f32>,
    fired: Vec<bool>,
    entry_population: usize,
}

impl ThresholdTracker {
    /// `default_cap` applies when the config leaves the per-tick cap unset.
    pub fn new(config: ThresholdConfig, mechanic: MechanicIndex, default_cap: usize) -> Self {
        let cap = config.max_triggers_per_tick.unwrap_or(default_cap);
        let timer = IntervalTimer::primed(config.eval_interval);
        Self {
            config,
            mechanic,
            cap,
            timer,
            segments: 0,
            boundaries: Vec::new(),
            fired: Vec::new(),
            entry_population: 0,
        }
    }

    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    pub fn mechanic(&self) -> MechanicIndex {
        self.mechanic
    }

    /// Current boundaries, high to low.
    pub fn boundaries(&self) -> &[f32] {
        &self.boundaries
    }

    pub fn fired(&self) -> &[bool] {
        &self.fired
    }

    fn resolve_segments(&self, ctx: &EncounterContext) -> usize {
        let segments = match self.config.segments {
            SegmentMode::PercentStep { step } if step > 0.0 => (100.0 / step).round() as usize,
            SegmentMode::PercentStep { .. } => 1,
            SegmentMode::Population { root, .. } => ctx.population(root),
        };
        segments.max(1)
    }

    fn tracked_value(&self, ctx: &EncounterContext) -> f32 {
        match self.config.tracked {
            TrackedValue::Health => ctx.hp01(),
            TrackedValue::Population { root } => {
                if self.entry_population == 0 {
                    return 1.0;
                }
                (ctx.population(root) as f32 / self.entry_population as f32).clamp(0.0, 1.0)
            }
        }
    }

    fn rebuild(&mut self, segments: usize) {
        self.segments = segments;
        self.boundaries = build_boundaries(segments, &self.config.domain);
        self.fired = vec![false; self.boundaries.len()];
    }

    fn crossed(&self, value: f32, boundary: f32) -> bool {
        match self.config.direction {
            Direction::Up => value >= boundary,
            Direction::Down | Direction::Both => value <= boundary,
        }
    }

    fn crossing(&self, index: usize, value: f32, direction: Direction) -> ThresholdCrossing {
        ThresholdCrossing {
            mechanic: self.mechanic,
            bypass: ActivationBypass::from_flags(
                self.config.ignore_global_cooldown,
                self.config.ignore_per_target_cooldown,
            ),
            boundary_index: index,
            boundary: self.boundaries[index],
            value,
            direction,
            label: self.config.notify.clone(),
        }
    }

    /// Runs one evaluation against the current context.
    ///
    /// A live population tracker first re-resolves its segment count; when
    /// it changed, boundaries are rebuilt and those already passed are
    /// marked fired without dispatching.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context the tracked value is read from
    ///
    /// # Returns
    ///
    /// Boundaries newly crossed by this evaluation, capped by
    /// `max_triggers_per_tick` (or the controller default). Downward crossings
    /// come first, high to low, then upward ones, low to high. Each boundary
    /// fires once until its phase is entered again.
    pub fn evaluate(&mut self, ctx: &EncounterContext) -> Vec<ThresholdCrossing> {
        let value = self.tracked_value(ctx);

        if let SegmentMode::Population { live: true, .. } = self.config.segments {
            let segments = self.resolve_segments(ctx);
            if segments != self.segments {
                self.rebuild(segments);
                self.fired = self
                    .boundaries
                    .iter()
                    .map(|boundary| self.crossed(value, *boundary))
                    .collect();
                tracing::debug!(
                    "threshold for '{}': population now {} segments, {} boundaries pre-marked",
                    self.config.mechanic,
                    segments,
                    self.fired.iter().filter(|fired| **fired).count()
                );
            }
        }

        let cap = if self.cap == 0 { usize::MAX } else { self.cap };
        let mut crossings = Vec::new();

        if matches!(self.config.direction, Direction::Down | Direction::Both) {
            for i in 0..self.boundaries.len() {
                if crossings.len() >= cap {
                    break;
                }
                if !self.fired[i] && value <= self.boundaries[i] {
                    self.fired[i] = true;
                    crossings.push(self.crossing(i, value, Direction::Down));
                }
            }
        }
        if matches!(self.config.direction, Direction::Up | Direction::Both) {
            for i in (0..self.boundaries.len()).rev() {
                if crossings.len() >= cap {
                    break;
                }
                if !self.fired[i] && value >= self.boundaries[i] {
                    self.fired[i] = true;
                    crossings.push(self.crossing(i, value, Direction::Up));
                }
            }
        }

        for crossing in &crossings {
            tracing::debug!(
                "threshold {:.3} crossed {} at {:.3} -> '{}'",
                crossing.boundary,
                <&'static str>::from(crossing.direction),
                crossing.value,
                self.config.mechanic
            );
        }
        crossings
    }
}

impl PhaseBehavior for ThresholdTracker {
    fn on_enter(&mut self, ctx: &EncounterContext) {
        self.entry_population = match self.config.tracked {
            TrackedValue::Population { root } => ctx.population(root),
            TrackedValue::Health => 0,
        };
        self.segments = 0;
        let segments = self.resolve_segments(ctx);
        self.rebuild(segments);
        self.timer = IntervalTimer::primed(self.config.eval_interval);
    }

    fn tick(&mut self, dt: f32, ctx: &EncounterContext) -> Vec<ThresholdCrossing> {
        if !self.timer.advance(dt) {
            return Vec::new();
        }
        self.evaluate(ctx)
    }

    fn name(&self) -> &str {
        &self.config.mechanic
    }
}
