// ============================================================
// Layer 6 — Config Store
// ============================================================
// Reads LoaderConfig from a JSON file.
//
// Keys missing from the file take their default values, so a
// config may name only what it changes:
//
//   { "source_path": "data/signals.csv", "augment_data": true }
//
// Reference: serde docs (#[serde(default)])

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::application::load_use_case::LoaderConfig;

pub struct ConfigStore;

impl ConfigStore {
    /// Read a config file. Unknown keys are ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<LoaderConfig> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read loader config '{}'", path.display()))?;

        let config: LoaderConfig = serde_json::from_str(&json)
            .with_context(|| format!("Invalid loader config '{}'", path.display()))?;

        tracing::debug!("Loaded loader config from '{}'", path.display());
        Ok(config)
    }
}
