//! Content factory for building controllers from data files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use encounter_core::{
    CooldownGroupService, EncounterConfig, EncounterContext, EncounterDefinition,
    EncounterError, PhaseController,
};

use crate::loaders::{ConfigLoader, EncounterLoader, LoadResult};

/// Content factory that loads encounter content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── encounters/
///     ├── warden.ron
///     └── hydra.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`.
    ///
    /// A missing file yields the defaults.
    pub fn load_config(&self) -> LoadResult<EncounterConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            tracing::debug!("{} not found, using default config", path.display());
            return Ok(EncounterConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load an encounter from `encounters/{name}.ron`.
    pub fn load_encounter(&self, name: &str) -> LoadResult<EncounterDefinition> {
        let path = self.encounters_dir().join(format!("{}.ron", name));
        EncounterLoader::load(&path)
    }

    /// Load every encounter under `encounters/`.
    pub fn load_encounters(&self) -> LoadResult<BTreeMap<String, EncounterDefinition>> {
        EncounterLoader::load_dir(&self.encounters_dir())
    }

    /// Load encounter `name` and build a ready-to-tick controller for it.
    pub fn build_controller(
        &self,
        name: &str,
        context: EncounterContext,
        cooldowns: Arc<CooldownGroupService>,
    ) -> LoadResult<PhaseController> {
        let config = self.load_config()?;
        let definition = self.load_encounter(name)?;
        PhaseController::from_definition(definition, context, cooldowns, config)
            .inspect_err(|err| {
                tracing::warn!(
                    "{} error {} in encounter '{}'",
                    err.severity().as_str(),
                    err.error_code(),
                    name
                )
            })
            .with_context(|| format!("Failed to build encounter '{}'", name))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn encounters_dir(&self) -> PathBuf {
        self.data_dir.join("encounters")
    }
}

#[cfg(test)]
mod tests {
    use encounter_core::OracleBundle;

    use super::*;

    fn seeded_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("encounters")).unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            include_str!("../../data/config.toml"),
        )
        .unwrap();
        std::fs::write(
            dir.path().join("encounters/warden.ron"),
            include_str!("../../data/encounters/warden.ron"),
        )
        .unwrap();
        dir
    }

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn builds_bundled_encounter() {
        let dir = seeded_dir();
        let factory = ContentFactory::new(dir.path());
        let ctx = EncounterContext::new(OracleBundle::empty());

        let mut controller = factory
            .build_controller("warden", ctx, Arc::new(CooldownGroupService::new()))
            .unwrap();
        controller.tick(0.1);
        assert_eq!(controller.current_phase_name(), Some("ranged"));
        assert!(controller.mechanic("volley").unwrap().is_enabled());
        assert_eq!(factory.load_encounters().unwrap().len(), 1);
    }

    #[test]
    fn dangling_mechanic_name_fails_with_context() {
        let dir = seeded_dir();
        std::fs::write(
            dir.path().join("encounters/broken.ron"),
            "(phases: [(name: \"p\", toggles: [(mechanic: \"ghost\")])])",
        )
        .unwrap();
        let factory = ContentFactory::new(dir.path());

        let err = factory
            .build_controller(
                "broken",
                EncounterContext::new(OracleBundle::empty()),
                Arc::new(CooldownGroupService::new()),
            )
            .unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Failed to build encounter 'broken'"));
        assert!(message.contains("ghost"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ContentFactory::new(dir.path()).load_config().unwrap();
        assert_eq!(config, EncounterConfig::default());
    }
}
