use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use sm_core::{ConnectionConfig, EmotionRegion, EngineConfig, Entry, LayoutConfig};

use crate::error::{CatalogError, Result};

/// On-disk description of a star-map universe.
///
/// ```toml
/// [connection]
/// similarity_threshold = 0.25
///
/// [[regions]]
/// id = 1
/// name = "joy"
/// center = { x = 0.0, y = 0.0, z = 0.0 }
/// radius = 10.0
///
/// [[entries]]
/// id = 1
/// owner_id = 7
/// region_id = 1
/// tags = ["sea", "night"]
/// ```
///
/// `[layout]` and `[connection]` are optional; missing keys take defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UniverseFile {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub regions: Vec<EmotionRegion>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl UniverseFile {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::InvalidData(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn config(&self) -> EngineConfig {
        EngineConfig {
            layout: self.layout,
            connection: self.connection,
        }
    }
}
