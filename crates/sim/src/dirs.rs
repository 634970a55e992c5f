//! Platform-specific directories for simulation output.

use std::path::PathBuf;

/// Root for session logs.
///
/// Follows platform conventions:
/// - macOS: `~/Library/Caches/encounter-sim/logs`
/// - Linux: `~/.cache/encounter-sim/logs` (or `$XDG_CACHE_HOME/encounter-sim/logs`)
/// - Windows: `%LOCALAPPDATA%\encounter-sim\logs`
/// - Fallback: `/tmp/encounter-sim/logs`
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "encounter-sim")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/encounter-sim"))
        .join("logs")
}
