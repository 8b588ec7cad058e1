use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_SCALE, CONSTELLATION_FILL, GROUP_SPREAD, MAX_CONNECTIONS_PER_ENTRY, REGION_FILL,
    SIMILARITY_THRESHOLD,
};

/// Scale factors used when fitting templates into regions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fraction of the region radius a single constellation may fill.
    pub region_fill: f64,
    /// Fraction of the region radius over which group centres are spread.
    pub group_spread: f64,
    /// Cap on one constellation's radius when a region holds several.
    pub constellation_fill: f64,
    /// Constellation radius per log10(size + 1).
    pub base_scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            region_fill: REGION_FILL,
            group_spread: GROUP_SPREAD,
            constellation_fill: CONSTELLATION_FILL,
            base_scale: BASE_SCALE,
        }
    }
}

/// Limits for the similarity-ranked connection builder.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub similarity_threshold: f64,
    /// Soft: the repair pass may exceed it.
    pub max_connections: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: SIMILARITY_THRESHOLD,
            max_connections: MAX_CONNECTIONS_PER_ENTRY,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub layout: LayoutConfig,
    pub connection: ConnectionConfig,
}
