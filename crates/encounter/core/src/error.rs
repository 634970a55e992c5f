//! Common error infrastructure for encounter-core.
//!
//! Nothing on the per-tick path returns an error: missing collaborators and
//! transient failures degrade to no-ops. Errors exist for the places where a
//! caller can still act on them, namely oracle access and building a
//! controller from a definition.

use crate::types::MechanicIndex;

/// How a caller should treat an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the same call may succeed on a later tick.
    Recoverable,

    /// Invalid input that should be rejected without retry.
    ///
    /// Examples: a phase toggle naming a mechanic that does not exist.
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,

    /// Unrecoverable error.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }
}

/// Shared classification of encounter-core errors. Implementors derive
/// `thiserror::Error`; severity follows recoverability, not impact.
pub trait EncounterError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for logs, one per variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised while turning an encounter definition into a controller.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("phase '{phase}' toggles unknown mechanic '{mechanic}'")]
    UnknownToggleMechanic { phase: String, mechanic: String },

    #[error("always-active phase '{phase}' tracks unknown mechanic '{mechanic}'")]
    UnknownBehaviorMechanic { phase: String, mechanic: String },

    #[error("mechanic name '{name}' is registered twice ({first} and {second})")]
    DuplicateMechanic {
        name: String,
        first: MechanicIndex,
        second: MechanicIndex,
    },
}

impl EncounterError for BuildError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownToggleMechanic { .. } => "BUILD_UNKNOWN_TOGGLE_MECHANIC",
            Self::UnknownBehaviorMechanic { .. } => "BUILD_UNKNOWN_BEHAVIOR_MECHANIC",
            Self::DuplicateMechanic { .. } => "BUILD_DUPLICATE_MECHANIC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_errors_are_validation_with_stable_codes() {
        let err = BuildError::UnknownToggleMechanic {
            phase: "opening".into(),
            mechanic: "bolt".into(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.severity().as_str(), "validation");
        assert_eq!(err.error_code(), "BUILD_UNKNOWN_TOGGLE_MECHANIC");
        assert_eq!(err.to_string(), "phase 'opening' toggles unknown mechanic 'bolt'");
    }
}
