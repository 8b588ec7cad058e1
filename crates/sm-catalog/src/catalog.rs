use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use sm_core::{
    CoordinateEngine, EmotionCategory, EmotionRegion, EngineConfig, Entry, EntryId, EntrySource,
    OwnerId, RegionCatalog, RegionId,
};

use crate::error::{CatalogError, Result};
use crate::universe::UniverseFile;

/// Read-only snapshot of regions and entries, validated on construction.
///
/// Serves as both collaborators of [`CoordinateEngine`].
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    regions: Vec<EmotionRegion>,
    entries: BTreeMap<EntryId, Entry>,
    config: EngineConfig,
}

impl Catalog {
    pub fn new(regions: Vec<EmotionRegion>, entries: Vec<Entry>) -> Result<Self> {
        Self::with_config(regions, entries, EngineConfig::default())
    }

    pub fn with_config(
        regions: Vec<EmotionRegion>,
        entries: Vec<Entry>,
        config: EngineConfig,
    ) -> Result<Self> {
        validate_regions(&regions)?;

        let mut by_id = BTreeMap::new();
        for entry in entries {
            if let Some(region_id) = entry.region_id {
                let Some(region) = regions.iter().find(|r| r.id == region_id) else {
                    return Err(CatalogError::InvalidData(format!(
                        "entry {} references unknown region {region_id}",
                        entry.id
                    )));
                };
                if let Some(position) = entry.position
                    && !region.contains(position)
                {
                    tracing::warn!(
                        entry = entry.id,
                        region = region.name.as_str(),
                        "stored position lies outside its region"
                    );
                }
            }
            let id = entry.id;
            if by_id.insert(id, entry).is_some() {
                return Err(CatalogError::InvalidData(format!("duplicate entry id {id}")));
            }
        }

        tracing::debug!(
            regions = regions.len(),
            entries = by_id.len(),
            "catalog loaded"
        );
        Ok(Self {
            regions,
            entries: by_id,
            config,
        })
    }

    pub fn from_universe(file: UniverseFile) -> Result<Self> {
        let config = file.config();
        Self::with_config(file.regions, file.entries, config)
    }

    /// Load and validate a TOML universe file.
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_universe(UniverseFile::read(path)?)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn regions(&self) -> &[EmotionRegion] {
        &self.regions
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Engine borrowing this catalog for both lookups.
    pub fn engine(&self) -> CoordinateEngine<&Self, &Self> {
        CoordinateEngine::new(self, self, self.config)
    }
}

fn validate_regions(regions: &[EmotionRegion]) -> Result<()> {
    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for region in regions {
        if !(region.radius.is_finite() && region.radius > 0.0) {
            return Err(CatalogError::InvalidData(format!(
                "region '{}' has non-positive radius {}",
                region.name, region.radius
            )));
        }
        if !ids.insert(region.id) {
            return Err(CatalogError::InvalidData(format!(
                "duplicate region id {}",
                region.id
            )));
        }
        if !names.insert(region.name.as_str()) {
            return Err(CatalogError::InvalidData(format!(
                "duplicate region name '{}'",
                region.name
            )));
        }
    }
    Ok(())
}

impl RegionCatalog for Catalog {
    /// Exact name first, then any region of the same known category
    /// (so "행복" finds the "joy" region).
    fn region_by_name(&self, name: &str) -> Option<EmotionRegion> {
        if let Some(region) = self.regions.iter().find(|r| r.name == name) {
            return Some(region.clone());
        }
        let category = EmotionCategory::from_str_lossy(name);
        if category == EmotionCategory::Other {
            return None;
        }
        self.regions
            .iter()
            .find(|r| r.category() == category)
            .cloned()
    }

    fn region_by_id(&self, id: RegionId) -> Option<EmotionRegion> {
        self.regions.iter().find(|r| r.id == id).cloned()
    }
}

impl EntrySource for Catalog {
    fn entry(&self, id: EntryId) -> Option<Entry> {
        self.entries.get(&id).cloned()
    }

    /// Owner's entries in ascending id order.
    fn entries_for_owner(&self, owner_id: OwnerId) -> Vec<Entry> {
        self.entries
            .values()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sm_core::Point3;

    fn regions() -> Vec<EmotionRegion> {
        vec![
            EmotionRegion::new(1, "joy", Point3::origin(), 10.0),
            EmotionRegion::new(2, "sadness", Point3::new(40.0, 0.0, 0.0), 12.0),
        ]
    }

    #[test]
    fn test_rejects_bad_radius() {
        let bad = vec![EmotionRegion::new(1, "joy", Point3::origin(), 0.0)];
        assert!(matches!(Catalog::new(bad, vec![]), Err(CatalogError::InvalidData(_))));
        let nan = vec![EmotionRegion::new(1, "joy", Point3::origin(), f64::NAN)];
        assert!(Catalog::new(nan, vec![]).is_err());
    }

    #[test]
    fn test_rejects_duplicates() {
        let mut dup = regions();
        dup.push(EmotionRegion::new(1, "hope", Point3::origin(), 3.0));
        assert!(Catalog::new(dup, vec![]).is_err());

        let entries = vec![Entry::new(1, 1), Entry::new(1, 2)];
        let err = Catalog::new(regions(), entries).unwrap_err();
        assert!(err.to_string().contains("duplicate entry id 1"));
    }

    #[test]
    fn test_rejects_unknown_entry_region() {
        let entries = vec![Entry::new(1, 1).in_region(99)];
        assert!(Catalog::new(regions(), entries).is_err());
    }

    #[test]
    fn test_region_lookup_by_alias() {
        let catalog = Catalog::new(regions(), vec![]).unwrap();
        assert_eq!(catalog.region_by_name("joy").unwrap().id, 1);
        assert_eq!(catalog.region_by_name("슬픔").unwrap().id, 2);
        assert!(catalog.region_by_name("anger").is_none());
        assert!(catalog.region_by_name("nostalgia").is_none());
        assert_eq!(catalog.region_by_id(2).unwrap().name, "sadness");
    }

    #[test]
    fn test_entries_for_owner_sorted() {
        let entries = vec![Entry::new(9, 1), Entry::new(3, 1), Entry::new(4, 2)];
        let catalog = Catalog::new(regions(), entries).unwrap();
        let ids: Vec<EntryId> = catalog.entries_for_owner(1).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 9]);
        assert!(catalog.entry(4).is_some());
        assert!(catalog.entry(5).is_none());
    }
}
