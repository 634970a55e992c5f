//! Oracle access errors.

use crate::error::{EncounterError, ErrorSeverity};

/// A collaborator slot of the [`OracleBundle`](super::OracleBundle) is empty.
///
/// Callers on the tick path absorb these and fall back to a neutral default.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("HealthOracle not available")]
    HealthNotAvailable,

    #[error("SpatialOracle not available")]
    SpatialNotAvailable,

    #[error("HierarchyOracle not available")]
    HierarchyNotAvailable,

    #[error("PopulationOracle not available")]
    PopulationNotAvailable,

    #[error("AbilityExecutor not available")]
    AbilitiesNotAvailable,

    #[error("AnimationPlayer not available")]
    AnimationsNotAvailable,

    #[error("SpawnExecutor not available")]
    SpawnerNotAvailable,
}

impl EncounterError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            HealthNotAvailable => "ORACLE_HEALTH_NOT_AVAILABLE",
            SpatialNotAvailable => "ORACLE_SPATIAL_NOT_AVAILABLE",
            HierarchyNotAvailable => "ORACLE_HIERARCHY_NOT_AVAILABLE",
            PopulationNotAvailable => "ORACLE_POPULATION_NOT_AVAILABLE",
            AbilitiesNotAvailable => "ORACLE_ABILITIES_NOT_AVAILABLE",
            AnimationsNotAvailable => "ORACLE_ANIMATIONS_NOT_AVAILABLE",
            SpawnerNotAvailable => "ORACLE_SPAWNER_NOT_AVAILABLE",
        }
    }
}
