//! Traits describing the world the encounter runs in.
//!
//! Oracles expose read-only world data (health, positions, hierarchy,
//! population counts, randomness) and executors perform concrete effects. The
//! [`OracleBundle`] aggregates them so the engine reaches everything it needs
//! without coupling to concrete implementations. Every slot is optional:
//! an encounter with no spatial oracle simply never passes a range gate.
mod effects;
mod error;
mod health;
mod hierarchy;
mod rng;
mod spatial;

pub use effects::{AbilityExecutor, AnimationPlayer, SpawnExecutor};
pub use error::OracleError;
pub use health::HealthOracle;
pub use hierarchy::{HierarchyOracle, PopulationOracle};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use spatial::{RayHit, SpatialOracle};

use std::sync::Arc;

static DEFAULT_RNG: PcgRng = PcgRng;

/// Shared handles to every collaborator of an encounter.
#[derive(Clone, Default)]
pub struct OracleBundle {
    health: Option<Arc<dyn HealthOracle>>,
    spatial: Option<Arc<dyn SpatialOracle>>,
    hierarchy: Option<Arc<dyn HierarchyOracle>>,
    population: Option<Arc<dyn PopulationOracle>>,
    rng: Option<Arc<dyn RngOracle>>,
    abilities: Option<Arc<dyn AbilityExecutor>>,
    animations: Option<Arc<dyn AnimationPlayer>>,
    spawner: Option<Arc<dyn SpawnExecutor>>,
}

impl OracleBundle {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_health(mut self, health: Arc<dyn HealthOracle>) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_spatial(mut self, spatial: Arc<dyn SpatialOracle>) -> Self {
        self.spatial = Some(spatial);
        self
    }

    pub fn with_hierarchy(mut self, hierarchy: Arc<dyn HierarchyOracle>) -> Self {
        self.hierarchy = Some(hierarchy);
        self
    }

    pub fn with_population(mut self, population: Arc<dyn PopulationOracle>) -> Self {
        self.population = Some(population);
        self
    }

    pub fn with_rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = Some(rng);
        self
    }

    pub fn with_abilities(mut self, abilities: Arc<dyn AbilityExecutor>) -> Self {
        self.abilities = Some(abilities);
        self
    }

    pub fn with_animations(mut self, animations: Arc<dyn AnimationPlayer>) -> Self {
        self.animations = Some(animations);
        self
    }

    pub fn with_spawner(mut self, spawner: Arc<dyn SpawnExecutor>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Returns the HealthOracle, or an error if not available.
    pub fn health(&self) -> Result<&dyn HealthOracle, OracleError> {
        self.health.as_deref().ok_or(OracleError::HealthNotAvailable)
    }

    /// Returns the SpatialOracle, or an error if not available.
    pub fn spatial(&self) -> Result<&dyn SpatialOracle, OracleError> {
        self.spatial
            .as_deref()
            .ok_or(OracleError::SpatialNotAvailable)
    }

    /// Returns the HierarchyOracle, or an error if not available.
    pub fn hierarchy(&self) -> Result<&dyn HierarchyOracle, OracleError> {
        self.hierarchy
            .as_deref()
            .ok_or(OracleError::HierarchyNotAvailable)
    }

    /// Returns the PopulationOracle, or an error if not available.
    pub fn population(&self) -> Result<&dyn PopulationOracle, OracleError> {
        self.population
            .as_deref()
            .ok_or(OracleError::PopulationNotAvailable)
    }

    /// Returns the configured RngOracle, falling back to [`PcgRng`].
    pub fn rng(&self) -> &dyn RngOracle {
        match self.rng.as_deref() {
            Some(rng) => rng,
            None => &DEFAULT_RNG,
        }
    }

    pub fn abilities(&self) -> Result<&dyn AbilityExecutor, OracleError> {
        self.abilities
            .as_deref()
            .ok_or(OracleError::AbilitiesNotAvailable)
    }

    pub fn animations(&self) -> Result<&dyn AnimationPlayer, OracleError> {
        self.animations
            .as_deref()
            .ok_or(OracleError::AnimationsNotAvailable)
    }

    pub fn spawner(&self) -> Result<&dyn SpawnExecutor, OracleError> {
        self.spawner
            .as_deref()
            .ok_or(OracleError::SpawnerNotAvailable)
    }
}

impl std::fmt::Debug for OracleBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleBundle")
            .field("health", &self.health.is_some())
            .field("spatial", &self.spatial.is_some())
            .field("hierarchy", &self.hierarchy.is_some())
            .field("population", &self.population.is_some())
            .field("rng", &self.rng.is_some())
            .field("abilities", &self.abilities.is_some())
            .field("animations", &self.animations.is_some())
            .field("spawner", &self.spawner.is_some())
            .finish()
    }
}
