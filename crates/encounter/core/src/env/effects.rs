//! Executors for the concrete gameplay effects a mechanic triggers.
//!
//! The engine only decides *when* and *against whom*; these collaborators
//! perform the effect. Every method reports whether the effect happened so
//! that a missing ability or clip degrades to a silent no-op.

use glam::Vec3;

use crate::types::AnchorId;

pub trait AbilityExecutor: Send + Sync {
    /// Executes `ability` originating at `source`, aimed at `target`.
    fn execute_ability(&self, ability: &str, source: AnchorId, target: Option<AnchorId>) -> bool;
}

pub trait AnimationPlayer: Send + Sync {
    /// Plays `clip` on every holder.
    fn play(&self, clip: &str, holders: &[AnchorId]) -> bool;
}

pub trait SpawnExecutor: Send + Sync {
    /// Spawns one `prefab` instance at `position`.
    fn spawn(&self, prefab: &str, position: Vec3) -> bool;
}
