//! Constellation coordinate engine.
//!
//! Places journal entries inside per-emotion spheres using hand-authored
//! constellation templates, and links entries into a sparse, degree-bounded
//! graph for star-map rendering.
//!
//! Zero I/O: region and entry data arrive through the [`RegionCatalog`] and
//! [`EntrySource`] traits, randomness through a caller-supplied `rand::Rng`.

pub mod config;
pub mod connection;
pub mod constants;
pub mod emotion;
pub mod entry;
pub mod error;
pub mod layout;
pub mod orchestrator;
pub mod point;
pub mod similarity;
pub mod template;

pub use config::{ConnectionConfig, EngineConfig, LayoutConfig};
pub use connection::{ConnectionEngine, ConnectionGraph};
pub use constants::{MAX_CONNECTIONS_PER_ENTRY, PHI, SIMILARITY_THRESHOLD};
pub use emotion::{EmotionCategory, EmotionRegion, RegionId};
pub use entry::{Entry, EntryId, OwnerId, TagSet, tag_set};
pub use error::{CoordinateError, Result};
pub use layout::{Layout, distribute_centers, place_in_region};
pub use orchestrator::{
    ConstellationSet, CoordinateEngine, EntrySource, Placement, RegionCatalog, UNSAVED_ENTRY_ID,
};
pub use point::Point3;
pub use similarity::similarity;
pub use template::{TemplateShape, clamp_count, template};
