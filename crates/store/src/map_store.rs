//! JSON file-backed map documents with atomic writes.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use {
    serde::{Serialize, de::DeserializeOwned},
    tokio::fs,
};

use crate::error::Result;

/// A single JSON document holding a string-keyed map.
///
/// A missing file reads as an empty map; saves replace the whole document
/// through a temp-file rename so a crash mid-write never leaves a torn
/// document behind.
#[derive(Debug, Clone)]
pub struct MapStore {
    path: PathBuf,
}

impl MapStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full map. A missing file is an empty map, never an error.
    pub async fn load<V: DeserializeOwned>(&self) -> Result<BTreeMap<String, V>> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(BTreeMap::new());
        }
        let data = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Atomically persist the full map, overwriting prior content.
    ///
    /// Creates parent directories if absent.
    pub async fn save<V: Serialize>(&self, map: &BTreeMap<String, V>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
