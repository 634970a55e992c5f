//! Encounter definition loader.

use std::collections::BTreeMap;
use std::path::Path;

use encounter_core::EncounterDefinition;

use crate::loaders::{LoadResult, read_file};

/// Loader for encounter definitions from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load one encounter definition from a RON file.
    pub fn load(path: &Path) -> LoadResult<EncounterDefinition> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<EncounterDefinition> {
        let definition: EncounterDefinition = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))?;

        Ok(definition)
    }

    /// Load every `*.ron` file in `dir`, keyed by file stem.
    ///
    /// A definition whose `name` is empty takes its file stem.
    pub fn load_dir(dir: &Path) -> LoadResult<BTreeMap<String, EncounterDefinition>> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;

        let mut definitions = BTreeMap::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("ron") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let mut definition = Self::load(&path)?;
            if definition.name.is_empty() {
                definition.name = stem.to_owned();
            }
            tracing::debug!("loaded encounter '{}' from {}", definition.name, path.display());
            definitions.insert(stem.to_owned(), definition);
        }
        Ok(definitions)
    }
}
