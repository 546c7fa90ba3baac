//! File-backed preset storage for native hosts.
//!
//! Browsers keep the JSON array in `localStorage`; native hosts keep the
//! same JSON in the platform data directory.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::error::NoiseError;

use super::saved::{PresetStore, STORAGE_KEY};

#[derive(Debug, Clone)]
pub struct PresetFile {
    path: PathBuf,
}

impl PresetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PresetFile { path: path.into() }
    }

    /// `<data dir>/noise-generator-presets.json`, if the platform has a
    /// data directory.
    pub fn default_location() -> Option<Self> {
        ProjectDirs::from("", "", "ambient-noise")
            .map(|dirs| Self::new(dirs.data_dir().join(format!("{STORAGE_KEY}.json"))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection; a missing file is an empty collection.
    pub fn load(&self) -> Result<PresetStore, NoiseError> {
        if !self.path.exists() {
            return Ok(PresetStore::new());
        }
        let json = fs::read_to_string(&self.path)?;
        let store = PresetStore::from_json(&json)?;
        debug!(path = %self.path.display(), count = store.len(), "loaded saved presets");
        Ok(store)
    }

    /// Write the collection, replacing the file atomically.
    pub fn save(&self, store: &PresetStore) -> Result<(), NoiseError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, store.to_json()?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
