/// Engine-wide tunables shared by every controller in a process.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncounterConfig {
    /// Seconds between cooldown table prunes. `0` disables pruning.
    pub cooldown_prune_interval: f32,

    /// Maximum number of parents walked when resolving an owner-root group id.
    pub max_hierarchy_depth: usize,

    /// Attempts a spawner makes to find a non-colliding point before giving up.
    pub spawn_attempts: u32,

    /// Crossing cap applied to threshold trackers that leave it unset.
    pub default_max_triggers_per_tick: usize,
}

impl EncounterConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_COOLDOWN_PRUNE_INTERVAL: f32 = 5.0;
    pub const DEFAULT_MAX_HIERARCHY_DEPTH: usize = 32;
    pub const DEFAULT_SPAWN_ATTEMPTS: u32 = 12;
    pub const DEFAULT_MAX_TRIGGERS_PER_TICK: usize = 1;

    pub fn new() -> Self {
        Self {
            cooldown_prune_interval: Self::DEFAULT_COOLDOWN_PRUNE_INTERVAL,
            max_hierarchy_depth: Self::DEFAULT_MAX_HIERARCHY_DEPTH,
            spawn_attempts: Self::DEFAULT_SPAWN_ATTEMPTS,
            default_max_triggers_per_tick: Self::DEFAULT_MAX_TRIGGERS_PER_TICK,
        }
    }

    pub fn with_spawn_attempts(mut self, spawn_attempts: u32) -> Self {
        self.spawn_attempts = spawn_attempts;
        self
    }
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self::new()
    }
}
