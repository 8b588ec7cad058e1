use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::emotion::RegionId;
use crate::point::Point3;

pub type EntryId = i64;
pub type OwnerId = i64;
pub type TagSet = BTreeSet<String>;

/// Snapshot of a journal entry as seen by the engine.
///
/// Owned by the storage layer. The engine reads it and returns derived
/// values; it never writes back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub owner_id: OwnerId,
    #[serde(default)]
    pub tags: TagSet,
    #[serde(default)]
    pub position: Option<Point3>,
    #[serde(default)]
    pub region_id: Option<RegionId>,
}

impl Entry {
    pub fn new(id: EntryId, owner_id: OwnerId) -> Self {
        Self {
            id,
            owner_id,
            tags: TagSet::new(),
            position: None,
            region_id: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tag_set(tags);
        self
    }

    pub fn in_region(mut self, region_id: RegionId) -> Self {
        self.region_id = Some(region_id);
        self
    }

    pub fn at(mut self, position: Point3) -> Self {
        self.position = Some(position);
        self
    }
}

/// Collect tag names into a set, dropping duplicates.
pub fn tag_set<I, S>(tags: I) -> TagSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tags.into_iter().map(Into::into).collect()
}
