//! Runs an authored encounter against a scripted world and prints what
//! happened.
mod config;
mod dirs;
mod report;
mod scenario;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use encounter_content::ContentFactory;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::SimConfig;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Summary,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "encounter-sim", about = "Simulate a scripted boss encounter", version)]
struct Cli {
    /// Content directory holding config.toml and encounters/
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Encounter file stem under encounters/
    #[arg(long, short)]
    encounter: Option<String>,

    /// Simulated seconds
    #[arg(long)]
    duration: Option<f32>,

    /// Seconds per tick
    #[arg(long)]
    dt: Option<f32>,

    #[arg(long)]
    seed: Option<u64>,

    /// Boss health percent lost per second
    #[arg(long)]
    drain: Option<f32>,

    /// Adds alive when the fight starts
    #[arg(long)]
    adds: Option<usize>,

    /// List available encounters and exit
    #[arg(long)]
    list: bool,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,

    /// Also write logs to a session file
    #[arg(long)]
    log_file: bool,
}

impl Cli {
    fn apply(&self, config: &mut SimConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(encounter) = &self.encounter {
            config.encounter = encounter.clone();
        }
        if let Some(duration) = self.duration {
            config.duration = duration.max(0.0);
        }
        if let Some(dt) = self.dt {
            config.dt = dt.max(0.001);
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(drain) = self.drain {
            config.drain_per_second = drain;
        }
        if let Some(adds) = self.adds {
            config.initial_adds = adds;
        }
        config.log_to_file |= self.log_file;
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = SimConfig::from_env();
    cli.apply(&mut config);

    let _guard = setup_logging(&config)?;

    let factory = ContentFactory::new(config.data_dir());
    if cli.list {
        for name in factory.load_encounters()?.keys() {
            println!("{}", name);
        }
        return Ok(());
    }

    let report = scenario::run(&factory, &config)
        .with_context(|| format!("Simulation of '{}' failed", config.encounter))?;

    match cli.format {
        OutputFormat::Summary => print!("{}", report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

/// Logs to stderr, and to a session file when enabled.
///
/// The returned guard must stay alive for the file writer to flush.
fn setup_logging(config: &SimConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if !config.log_to_file {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    }

    let session_id = config.session_id.clone().unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        format!("session_{}", timestamp)
    });
    let session_log_dir = dirs::log_dir().join(&session_id);
    std::fs::create_dir_all(&session_log_dir)
        .with_context(|| format!("Failed to create {}", session_log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "sim.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/sim.log", session_log_dir.display());
    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_environment_config() {
        let cli = Cli::parse_from([
            "encounter-sim",
            "--encounter",
            "hydra",
            "--seed",
            "9",
            "--dt",
            "0",
            "--format",
            "json",
        ]);
        let mut config = SimConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.encounter, "hydra");
        assert_eq!(config.seed, 9);
        assert_eq!(config.dt, 0.001);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(config.duration, SimConfig::default().duration);
    }
}
