//! Simulation runtime configuration.
use std::env;
use std::path::PathBuf;

/// Knobs of one simulated fight. Built from the environment, then
/// overridden by command-line flags.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub data_dir: Option<PathBuf>,
    pub encounter: String,
    pub seed: u64,
    /// Seconds per tick.
    pub dt: f32,
    /// Upper bound on simulated seconds.
    pub duration: f32,
    /// Boss health percent lost per second.
    pub drain_per_second: f32,
    /// Adds alive when the fight starts.
    pub initial_adds: usize,
    /// Seconds between add deaths; `0` keeps adds alive.
    pub add_lifetime: f32,
    pub log_to_file: bool,
    pub session_id: Option<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            encounter: "warden".to_owned(),
            seed: 0,
            dt: 0.1,
            duration: 120.0,
            drain_per_second: 1.0,
            initial_adds: 0,
            add_lifetime: 8.0,
            log_to_file: false,
            session_id: None,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SIM_DATA_DIR` - Content directory (default: bundled content data)
    /// - `SIM_ENCOUNTER` - Encounter file stem (default: warden)
    /// - `SIM_SEED` - Encounter seed (default: 0)
    /// - `SIM_DT` - Seconds per tick (default: 0.1)
    /// - `SIM_DURATION` - Simulated seconds (default: 120)
    /// - `SIM_DRAIN` - Health percent lost per second (default: 1)
    /// - `SIM_ADDS` - Adds alive at the start (default: 0)
    /// - `SIM_ADD_LIFETIME` - Seconds between add deaths (default: 8)
    /// - `SIM_LOG_FILE` - Also write logs to a session file (default: false)
    /// - `SIM_SESSION_ID` - Session identifier for log files (default: auto-generated)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.data_dir = env::var("SIM_DATA_DIR").ok().map(PathBuf::from);
        if let Ok(encounter) = env::var("SIM_ENCOUNTER") {
            config.encounter = encounter;
        }
        if let Some(seed) = read_env::<u64>("SIM_SEED") {
            config.seed = seed;
        }
        if let Some(dt) = read_env::<f32>("SIM_DT") {
            config.dt = dt.max(0.001);
        }
        if let Some(duration) = read_env::<f32>("SIM_DURATION") {
            config.duration = duration.max(0.0);
        }
        if let Some(drain) = read_env::<f32>("SIM_DRAIN") {
            config.drain_per_second = drain;
        }
        if let Some(adds) = read_env::<usize>("SIM_ADDS") {
            config.initial_adds = adds;
        }
        if let Some(lifetime) = read_env::<f32>("SIM_ADD_LIFETIME") {
            config.add_lifetime = lifetime.max(0.0);
        }

        if let Some(enable) = read_env::<bool>("SIM_LOG_FILE") {
            config.log_to_file = enable;
        } else if env::var("SIM_LOG_FILE").is_ok() {
            // Also accept just setting the variable without value as "true"
            config.log_to_file = true;
        }

        config.session_id = env::var("SIM_SESSION_ID").ok();

        config
    }

    /// Content directory, falling back to the data bundled with the content crate.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../encounter/content/data"))
        })
    }

    /// Number of ticks needed to cover `duration`.
    pub fn tick_budget(&self) -> u64 {
        (self.duration / self.dt).ceil() as u64
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
