//! Per-holder eligibility: cooldown, range, angle and line of sight.

use std::collections::HashMap;

use glam::Vec3;

use super::config::{AngleGate, ForwardSource, RangeGate, TriggerConfig};
use crate::condition::within_open_range;
use crate::context::EncounterContext;
use crate::types::AnchorId;

/// Holders that pass every configured gate, in configuration order.
pub(crate) fn eligible_holders(
    config: &TriggerConfig,
    holders: &[AnchorId],
    ctx: &EncounterContext,
    target: Option<AnchorId>,
    next_ready: &HashMap<AnchorId, f32>,
    ignore_per_target: bool,
) -> Vec<AnchorId> {
    let now = ctx.now();
    let spatial_gated =
        config.range.is_some() || config.angle.is_some() || config.require_line_of_sight;
    let target_position = target.and_then(|target| ctx.position(target));

    holders
        .iter()
        .copied()
        .filter(|holder| {
            if !ignore_per_target
                && next_ready.get(holder).is_some_and(|ready_at| *ready_at > now)
            {
                return false;
            }
            if !spatial_gated {
                return true;
            }
            let (Some(origin), Some(target_position)) = (ctx.position(*holder), target_position)
            else {
                return false;
            };
            passes_spatial_gates(config, ctx, *holder, origin, target, target_position)
        })
        .collect()
}

fn passes_spatial_gates(
    config: &TriggerConfig,
    ctx: &EncounterContext,
    holder: AnchorId,
    origin: Vec3,
    target: Option<AnchorId>,
    target_position: Vec3,
) -> bool {
    let to_target = target_position - origin;

    if let Some(range) = config.range
        && !in_range(&range, to_target.length())
    {
        return false;
    }

    if let Some(angle) = config.angle {
        let forward = match angle.forward {
            ForwardSource::Holder => ctx.forward(holder),
            ForwardSource::Boss => ctx.boss().and_then(|boss| ctx.forward(boss)),
            ForwardSource::Fixed(direction) => Some(direction),
        };
        let Some(forward) = forward else {
            return false;
        };
        if !in_angle(&angle, forward, to_target) {
            return false;
        }
    }

    if config.require_line_of_sight && !has_line_of_sight(ctx, origin, target, target_position) {
        return false;
    }

    true
}

pub(crate) fn in_range(range: &RangeGate, distance: f32) -> bool {
    within_open_range(distance, range.min, range.max)
}

/// Degrees between `forward` and `to_target`; 0 when either is degenerate.
pub(crate) fn angle_between(forward: Vec3, to_target: Vec3) -> f32 {
    let (Some(forward), Some(to_target)) = (forward.try_normalize(), to_target.try_normalize())
    else {
        return 0.0;
    };
    forward.dot(to_target).clamp(-1.0, 1.0).acos().to_degrees()
}

pub(crate) fn in_angle(angle: &AngleGate, forward: Vec3, to_target: Vec3) -> bool {
    let degrees = angle_between(forward, to_target);
    degrees >= angle.min && degrees <= angle.max
}

/// Unobstructed unless the segment hits something other than the target.
fn has_line_of_sight(
    ctx: &EncounterContext,
    origin: Vec3,
    target: Option<AnchorId>,
    target_position: Vec3,
) -> bool {
    let Ok(spatial) = ctx.oracles().spatial() else {
        return false;
    };
    match spatial.linecast(origin, target_position) {
        None => true,
        Some(hit) => hit.anchor.is_some() && hit.anchor == target,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::env::{OracleBundle, RayHit, SpatialOracle};

    const BOSS: AnchorId = AnchorId(1);
    const PLAYER: AnchorId = AnchorId(2);
    const OPEN: AnchorId = AnchorId(10);
    const WALLED: AnchorId = AnchorId(11);
    const BEHIND_TARGET: AnchorId = AnchorId(12);
    const PILLAR: AnchorId = AnchorId(99);

    /// Holders on the x axis facing +X, player at the origin. A wall sits
    /// between `WALLED` and the player, a collider owned by `PILLAR` between
    /// `BEHIND_TARGET` and the player.
    struct Room;

    impl SpatialOracle for Room {
        fn position(&self, anchor: AnchorId) -> Option<Vec3> {
            match anchor {
                BOSS | PLAYER => Some(Vec3::ZERO),
                OPEN => Some(Vec3::new(-5.0, 0.0, 0.0)),
                WALLED => Some(Vec3::new(-6.0, 0.0, 0.0)),
                BEHIND_TARGET => Some(Vec3::new(-7.0, 0.0, 0.0)),
                _ => None,
            }
        }

        fn forward(&self, _anchor: AnchorId) -> Option<Vec3> {
            Some(Vec3::X)
        }

        fn linecast(&self, from: Vec3, to: Vec3) -> Option<RayHit> {
            let point = (from + to) * 0.5;
            if from.x == -6.0 {
                Some(RayHit { anchor: None, point })
            } else if from.x == -7.0 {
                Some(RayHit { anchor: Some(PILLAR), point })
            } else if from.x == -5.0 {
                Some(RayHit { anchor: Some(PLAYER), point: to })
            } else {
                None
            }
        }
    }

    fn room() -> EncounterContext {
        EncounterContext::new(OracleBundle::empty().with_spatial(Arc::new(Room)))
            .with_boss(BOSS)
            .with_player(PLAYER)
    }

    fn sight_config() -> TriggerConfig {
        TriggerConfig {
            require_line_of_sight: true,
            ..TriggerConfig::default()
        }
    }

    #[test]
    fn max_range_is_inclusive() {
        let range = RangeGate { min: 0.0, max: 10.0 };
        assert!(in_range(&range, 10.0));
        assert!(!in_range(&range, 10.001));
        assert!(in_range(&RangeGate { min: 0.0, max: 0.0 }, 1.0e6));
        assert!(!in_range(&RangeGate { min: 2.0, max: 0.0 }, 1.0));
    }

    #[test]
    fn angle_is_measured_in_degrees() {
        assert!((angle_between(Vec3::X, Vec3::Y) - 90.0).abs() < 1e-4);
        assert!((angle_between(Vec3::X, -Vec3::X) - 180.0).abs() < 1e-4);
        assert_eq!(angle_between(Vec3::ZERO, Vec3::X), 0.0);

        let cone = AngleGate {
            min: 0.0,
            max: 45.0,
            forward: ForwardSource::Fixed(Vec3::X),
        };
        assert!(in_angle(&cone, Vec3::X, Vec3::new(1.0, 0.5, 0.0)));
        assert!(!in_angle(&cone, Vec3::X, Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn line_of_sight_drops_holders_behind_walls() {
        let holders = [OPEN, WALLED, BEHIND_TARGET];
        let eligible =
            eligible_holders(&sight_config(), &holders, &room(), Some(PLAYER), &HashMap::new(), false);
        assert_eq!(eligible, vec![OPEN]);
    }

    #[test]
    fn line_of_sight_needs_a_spatial_oracle() {
        let ctx = EncounterContext::new(OracleBundle::empty()).with_player(PLAYER);
        let eligible =
            eligible_holders(&sight_config(), &[OPEN], &ctx, Some(PLAYER), &HashMap::new(), false);
        assert!(eligible.is_empty());

        let ungated = TriggerConfig::default();
        let eligible = eligible_holders(&ungated, &[OPEN], &ctx, Some(PLAYER), &HashMap::new(), false);
        assert_eq!(eligible, vec![OPEN]);
    }

    #[test]
    fn angle_gate_follows_forward_source() {
        let ctx = room();
        let cone = |forward| TriggerConfig {
            angle: Some(AngleGate { min: 0.0, max: 45.0, forward }),
            ..TriggerConfig::default()
        };
        let open = [OPEN];
        let eligible = |config: &TriggerConfig| {
            eligible_holders(config, &open, &ctx, Some(PLAYER), &HashMap::new(), false)
        };

        // OPEN -> PLAYER points along +X.
        assert_eq!(eligible(&cone(ForwardSource::Holder)), vec![OPEN]);
        assert_eq!(eligible(&cone(ForwardSource::Boss)), vec![OPEN]);
        assert!(eligible(&cone(ForwardSource::Fixed(Vec3::Y))).is_empty());
        assert!(eligible(&cone(ForwardSource::Fixed(-Vec3::X))).is_empty());
    }

    #[test]
    fn resting_holders_skip_spatial_checks() {
        let ctx = room();
        let resting = HashMap::from([(OPEN, ctx.now() + 1.0)]);
        let eligible =
            eligible_holders(&sight_config(), &[OPEN], &ctx, Some(PLAYER), &resting, false);
        assert!(eligible.is_empty());

        let eligible =
            eligible_holders(&sight_config(), &[OPEN], &ctx, Some(PLAYER), &resting, true);
        assert_eq!(eligible, vec![OPEN]);
    }
}
