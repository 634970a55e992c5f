//! Concrete mechanic variants and their single extension point.

use glam::Vec3;

use crate::config::EncounterConfig;
use crate::context::{EncounterContext, RollStream};
use crate::types::AnchorId;

/// Holders chosen by one activation, handed to the effect.
#[derive(Clone, Copy, Debug)]
pub struct ActivationRequest<'a> {
    pub mechanic: &'a str,
    pub holders: &'a [AnchorId],
    pub target: Option<AnchorId>,
}

/// Extension point for effects outside the built-in variants.
pub trait ActivationEffect: Send + Sync {
    /// Performs the effect; returns false when nothing happened.
    fn execute(&mut self, request: &ActivationRequest<'_>, ctx: &EncounterContext) -> bool;

    /// Seconds pushed into the mechanic's cooldown group after an activation.
    fn global_cooldown(&self, interval: f32) -> f32 {
        interval
    }

    fn on_phase_enter(&mut self, _ctx: &EncounterContext) {}

    fn on_phase_exit(&mut self, _ctx: &EncounterContext) {}
}

/// Data description of a built-in effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectSpec {
    /// Runs a named ability from every chosen holder.
    AbilityShooter {
        ability: String,
        /// Overrides the group cooldown contribution (defaults to the interval).
        #[cfg_attr(feature = "serde", serde(default))]
        global_cooldown: Option<f32>,
    },
    /// Plays a clip on the chosen holders.
    Animation {
        clip: String,
        /// Clip length in seconds; locks the cooldown group for that long.
        #[cfg_attr(feature = "serde", serde(default))]
        clip_length: f32,
    },
    /// Spawns `prefab` at a free point around each chosen holder.
    Spawner {
        prefab: String,
        radius: f32,
        #[cfg_attr(feature = "serde", serde(default))]
        clearance: f32,
        /// Search budget per spawn; `0` uses the engine default.
        #[cfg_attr(feature = "serde", serde(default))]
        max_attempts: u32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct AbilityShooter {
    pub ability: String,
    pub global_cooldown: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationTrigger {
    pub clip: String,
    pub clip_length: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Spawner {
    pub prefab: String,
    pub radius: f32,
    pub clearance: f32,
    pub max_attempts: u32,
}

/// The closed set of mechanic behaviors.
pub enum MechanicKind {
    AbilityShooter(AbilityShooter),
    Animation(AnimationTrigger),
    Spawner(Spawner),
    Custom(Box<dyn ActivationEffect>),
}

impl MechanicKind {
    pub fn from_spec(spec: EffectSpec, config: &EncounterConfig) -> Self {
        match spec {
            EffectSpec::AbilityShooter {
                ability,
                global_cooldown,
            } => Self::AbilityShooter(AbilityShooter {
                ability,
                global_cooldown,
            }),
            EffectSpec::Animation { clip, clip_length } => {
                Self::Animation(AnimationTrigger { clip, clip_length })
            }
            EffectSpec::Spawner {
                prefab,
                radius,
                clearance,
                max_attempts,
            } => Self::Spawner(Spawner {
                prefab,
                radius,
                clearance,
                max_attempts: if max_attempts == 0 {
                    config.spawn_attempts
                } else {
                    max_attempts
                },
            }),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::AbilityShooter(_) => "AbilityShooter",
            Self::Animation(_) => "Animation",
            Self::Spawner(_) => "Spawner",
            Self::Custom(_) => "Custom",
        }
    }

    pub fn execute(&mut self, request: &ActivationRequest<'_>, ctx: &EncounterContext) -> bool {
        match self {
            Self::AbilityShooter(shooter) => shooter.execute(request, ctx),
            Self::Animation(animation) => animation.execute(request, ctx),
            Self::Spawner(spawner) => spawner.execute(request, ctx),
            Self::Custom(effect) => effect.execute(request, ctx),
        }
    }

    pub(crate) fn on_phase_enter(&mut self, ctx: &EncounterContext) {
        if let Self::Custom(effect) = self {
            effect.on_phase_enter(ctx);
        }
    }

    pub(crate) fn on_phase_exit(&mut self, ctx: &EncounterContext) {
        if let Self::Custom(effect) = self {
            effect.on_phase_exit(ctx);
        }
    }

    pub fn global_cooldown(&self, interval: f32) -> f32 {
        match self {
            Self::AbilityShooter(shooter) => shooter.global_cooldown.unwrap_or(interval),
            Self::Animation(animation) if animation.clip_length > 0.0 => animation.clip_length,
            Self::Animation(_) | Self::Spawner(_) => interval,
            Self::Custom(effect) => effect.global_cooldown(interval),
        }
    }
}

impl std::fmt::Debug for MechanicKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AbilityShooter(shooter) => f.debug_tuple("AbilityShooter").field(shooter).finish(),
            Self::Animation(animation) => f.debug_tuple("Animation").field(animation).finish(),
            Self::Spawner(spawner) => f.debug_tuple("Spawner").field(spawner).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl AbilityShooter {
    fn execute(&self, request: &ActivationRequest<'_>, ctx: &EncounterContext) -> bool {
        let Ok(executor) = ctx.oracles().abilities() else {
            tracing::debug!("{}: no ability executor, skipping '{}'", request.mechanic, self.ability);
            return false;
        };
        let mut fired = false;
        for holder in request.holders {
            fired |= executor.execute_ability(&self.ability, *holder, request.target);
        }
        fired
    }
}

impl AnimationTrigger {
    fn execute(&self, request: &ActivationRequest<'_>, ctx: &EncounterContext) -> bool {
        match ctx.oracles().animations() {
            Ok(player) => player.play(&self.clip, request.holders),
            Err(_) => {
                tracing::debug!("{}: no animation player, skipping '{}'", request.mechanic, self.clip);
                false
            }
        }
    }
}

impl Spawner {
    fn execute(&self, request: &ActivationRequest<'_>, ctx: &EncounterContext) -> bool {
        let Ok(executor) = ctx.oracles().spawner() else {
            tracing::debug!("{}: no spawn executor, skipping '{}'", request.mechanic, self.prefab);
            return false;
        };
        let mut spawned = false;
        for holder in request.holders {
            let Some(center) = ctx.position(*holder) else {
                continue;
            };
            match self.find_spawn_point(center, ctx) {
                Some(point) => spawned |= executor.spawn(&self.prefab, point),
                None => tracing::warn!(
                    "{}: no free spawn point for '{}' around {} after {} attempts",
                    request.mechanic,
                    self.prefab,
                    holder,
                    self.max_attempts
                ),
            }
        }
        spawned
    }

    /// Random point on the horizontal disc around `center` that is not blocked.
    pub(crate) fn find_spawn_point(&self, center: Vec3, ctx: &EncounterContext) -> Option<Vec3> {
        let spatial = ctx.oracles().spatial().ok();
        for _ in 0..self.max_attempts {
            let angle = ctx.roll_unit(RollStream::Spawn) * std::f32::consts::TAU;
            // sqrt keeps samples uniform over the disc area
            let distance = ctx.roll_unit(RollStream::Spawn).sqrt() * self.radius;
            let point = center + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
            let blocked = spatial.is_some_and(|spatial| spatial.is_blocked(point, self.clearance));
            if !blocked {
                return Some(point);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::env::{OracleBundle, RayHit, SpatialOracle};

    struct Walls {
        queries: AtomicU32,
    }

    impl SpatialOracle for Walls {
        fn position(&self, _anchor: AnchorId) -> Option<Vec3> {
            Some(Vec3::ZERO)
        }

        fn forward(&self, _anchor: AnchorId) -> Option<Vec3> {
            Some(Vec3::Z)
        }

        fn linecast(&self, _from: Vec3, _to: Vec3) -> Option<RayHit> {
            None
        }

        fn is_blocked(&self, _point: Vec3, _radius: f32) -> bool {
            self.queries.fetch_add(1, Ordering::Relaxed);
            true
        }
    }

    #[test]
    fn spawn_search_gives_up_after_budget() {
        let walls = Arc::new(Walls {
            queries: AtomicU32::new(0),
        });
        let ctx = EncounterContext::new(OracleBundle::empty().with_spatial(walls.clone()));
        let spawner = Spawner {
            prefab: "add".into(),
            radius: 4.0,
            clearance: 0.5,
            max_attempts: 7,
        };
        assert_eq!(spawner.find_spawn_point(Vec3::ZERO, &ctx), None);
        assert_eq!(walls.queries.load(Ordering::Relaxed), 7);
    }

    #[test]
    fn spawn_point_stays_inside_radius() {
        let ctx = EncounterContext::new(OracleBundle::empty()).with_seed(3);
        let spawner = Spawner {
            prefab: "add".into(),
            radius: 2.0,
            clearance: 0.0,
            max_attempts: 1,
        };
        for _ in 0..50 {
            let point = spawner.find_spawn_point(Vec3::new(10.0, 1.0, 0.0), &ctx).unwrap();
            assert!(point.distance(Vec3::new(10.0, 1.0, 0.0)) <= 2.0 + 1e-4);
            assert_eq!(point.y, 1.0);
        }
    }

    #[test]
    fn default_attempts_come_from_config() {
        let config = EncounterConfig::default().with_spawn_attempts(3);
        let kind = MechanicKind::from_spec(
            EffectSpec::Spawner {
                prefab: "add".into(),
                radius: 1.0,
                clearance: 0.0,
                max_attempts: 0,
            },
            &config,
        );
        match kind {
            MechanicKind::Spawner(spawner) => assert_eq!(spawner.max_attempts, 3),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn cooldown_contribution_per_kind() {
        let config = EncounterConfig::default();
        let shooter = MechanicKind::from_spec(
            EffectSpec::AbilityShooter {
                ability: "bolt".into(),
                global_cooldown: Some(4.0),
            },
            &config,
        );
        let clip = MechanicKind::from_spec(
            EffectSpec::Animation {
                clip: "slam".into(),
                clip_length: 2.5,
            },
            &config,
        );
        let bare = MechanicKind::from_spec(
            EffectSpec::Animation {
                clip: "roar".into(),
                clip_length: 0.0,
            },
            &config,
        );
        assert_eq!(shooter.global_cooldown(1.0), 4.0);
        assert_eq!(clip.global_cooldown(1.0), 2.5);
        assert_eq!(bare.global_cooldown(1.5), 1.5);
    }
}
