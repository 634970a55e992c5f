//! Predicates evaluated against the encounter context.
//!
//! Conditions are plain data: [`Condition::evaluate`] is a function of the
//! context and the condition's fields only. They gate mechanics (run
//! conditions), transitions (`conditions_met`) and always-active phases.
mod group;
mod segment;

pub use group::ConditionGroup;
pub(crate) use group::passes;
pub use segment::{PopulationMode, edge_window, near_segment_edge};

use crate::context::{EncounterContext, RollStream};
use crate::types::{AnchorId, percent_to_ratio};

/// A single predicate. Health values are percentages in `0..=100`.
#[derive(Clone, Debug, PartialEq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// Health at or below `percent`.
    HpBelow { percent: f32 },

    /// Health at or above `percent`.
    HpAbove { percent: f32 },

    /// Health inside `[min, max]`.
    HpRange { min: f32, max: f32 },

    /// Boss-to-player distance inside `[min, max]`; a bound of `0` is open.
    DistanceToTarget { min: f32, max: f32 },

    /// At least `seconds` spent in the current main phase.
    PhaseTimeElapsed { seconds: f32 },

    /// Passes with probability `chance` (`0..=1`).
    RandomChance { chance: f32 },

    /// Health within `half_width` of a multiple of `1 / count(root)`.
    SegmentEdge {
        root: AnchorId,
        half_width: f32,
        mode: PopulationMode,
    },
}

impl Condition {
    pub fn evaluate(&self, ctx: &EncounterContext) -> bool {
        let hp = ctx.hp01();
        match *self {
            Condition::HpBelow { percent } => hp <= percent_to_ratio(percent),
            Condition::HpAbove { percent } => hp >= percent_to_ratio(percent),
            Condition::HpRange { min, max } => {
                let (low, high) = if min <= max { (min, max) } else { (max, min) };
                hp >= percent_to_ratio(low) && hp <= percent_to_ratio(high)
            }
            Condition::DistanceToTarget { min, max } => match ctx.boss_to_player_distance() {
                Some(distance) => within_open_range(distance, min, max),
                None => false,
            },
            Condition::PhaseTimeElapsed { seconds } => ctx.phase_time() >= seconds,
            Condition::RandomChance { chance } => {
                if chance >= 1.0 {
                    true
                } else if chance <= 0.0 {
                    false
                } else {
                    ctx.roll_unit(RollStream::Condition) < chance
                }
            }
            Condition::SegmentEdge {
                root,
                half_width,
                mode,
            } => near_segment_edge(hp, mode.count(ctx, root), half_width),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.into()
    }
}

/// Inclusive range check where a non-positive bound means "unbounded".
pub(crate) fn within_open_range(value: f32, min: f32, max: f32) -> bool {
    if min > 0.0 && value < min {
        return false;
    }
    if max > 0.0 && value > max {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use glam::Vec3;

    use super::*;
    use crate::env::{HealthOracle, OracleBundle, PopulationOracle, RayHit, SpatialOracle};

    struct Health(f32);

    impl HealthOracle for Health {
        fn health(&self) -> f32 {
            self.0
        }

        fn max_health(&self) -> f32 {
            100.0
        }
    }

    struct Line;

    impl SpatialOracle for Line {
        fn position(&self, anchor: AnchorId) -> Option<Vec3> {
            Some(Vec3::new(anchor.0 as f32, 0.0, 0.0))
        }

        fn forward(&self, _anchor: AnchorId) -> Option<Vec3> {
            Some(Vec3::X)
        }

        fn linecast(&self, _from: Vec3, _to: Vec3) -> Option<RayHit> {
            None
        }
    }

    struct Crowd(AtomicUsize);

    impl PopulationOracle for Crowd {
        fn member_count(&self, _root: AnchorId) -> usize {
            self.0.load(Ordering::Relaxed)
        }
    }

    fn ctx_with_hp(hp: f32) -> EncounterContext {
        EncounterContext::new(OracleBundle::empty().with_health(Arc::new(Health(hp))))
    }

    #[test]
    fn hp_thresholds_are_inclusive() {
        let ctx = ctx_with_hp(50.0);
        assert!(Condition::HpBelow { percent: 50.0 }.evaluate(&ctx));
        assert!(Condition::HpAbove { percent: 50.0 }.evaluate(&ctx));
        assert!(!Condition::HpBelow { percent: 49.0 }.evaluate(&ctx));
        assert!(Condition::HpRange { min: 60.0, max: 40.0 }.evaluate(&ctx));
        assert!(!Condition::HpRange { min: 10.0, max: 40.0 }.evaluate(&ctx));
    }

    #[test]
    fn distance_uses_boss_and_player_anchors() {
        let oracles = OracleBundle::empty().with_spatial(Arc::new(Line));
        let ctx = EncounterContext::new(oracles)
            .with_boss(AnchorId(0))
            .with_player(AnchorId(10));
        assert!(Condition::DistanceToTarget { min: 5.0, max: 10.0 }.evaluate(&ctx));
        assert!(Condition::DistanceToTarget { min: 0.0, max: 0.0 }.evaluate(&ctx));
        assert!(!Condition::DistanceToTarget { min: 11.0, max: 0.0 }.evaluate(&ctx));
        assert!(!Condition::DistanceToTarget { min: 0.0, max: 9.0 }.evaluate(&ctx));
    }

    #[test]
    fn distance_without_player_fails() {
        let oracles = OracleBundle::empty().with_spatial(Arc::new(Line));
        let ctx = EncounterContext::new(oracles).with_boss(AnchorId(0));
        assert!(!Condition::DistanceToTarget { min: 0.0, max: 0.0 }.evaluate(&ctx));
    }

    #[test]
    fn random_chance_extremes_are_exact() {
        let ctx = ctx_with_hp(100.0);
        for _ in 0..32 {
            assert!(Condition::RandomChance { chance: 1.0 }.evaluate(&ctx));
            assert!(!Condition::RandomChance { chance: 0.0 }.evaluate(&ctx));
        }
    }

    #[test]
    fn static_segment_edge_keeps_first_count() {
        let crowd = Arc::new(Crowd(AtomicUsize::new(4)));
        let oracles = OracleBundle::empty()
            .with_health(Arc::new(Health(50.0)))
            .with_population(crowd.clone());
        let ctx = EncounterContext::new(oracles);
        let edge_static = Condition::SegmentEdge {
            root: AnchorId(1),
            half_width: 0.01,
            mode: PopulationMode::Static,
        };
        let edge_dynamic = Condition::SegmentEdge {
            root: AnchorId(1),
            half_width: 0.01,
            mode: PopulationMode::Dynamic,
        };
        assert!(edge_static.evaluate(&ctx));
        // 3 members: edges at thirds, 0.5 is not one of them
        crowd.0.store(3, Ordering::Relaxed);
        assert!(edge_static.evaluate(&ctx));
        assert!(!edge_dynamic.evaluate(&ctx));
    }
}
