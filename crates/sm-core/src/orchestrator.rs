//! Public entry point: resolves regions and entries through collaborator
//! traits, then drives layout and connection building.
//!
//! The engine holds only configuration. Region and entry data come from the
//! caller's [`RegionCatalog`] and [`EntrySource`] on every call; results go
//! back to the caller, which decides what to persist.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::connection::{ConnectionEngine, ConnectionGraph};
use crate::emotion::{EmotionRegion, RegionId};
use crate::entry::{Entry, EntryId, OwnerId, TagSet};
use crate::error::{CoordinateError, Result};
use crate::layout::Layout;
use crate::point::Point3;

/// Id used for a synthetic entry that has not been stored yet.
pub const UNSAVED_ENTRY_ID: EntryId = -1;

/// Read access to the emotion catalog.
pub trait RegionCatalog {
    fn region_by_name(&self, name: &str) -> Option<EmotionRegion>;
    fn region_by_id(&self, id: RegionId) -> Option<EmotionRegion>;
}

/// Read access to stored entries (with their tags).
pub trait EntrySource {
    fn entry(&self, id: EntryId) -> Option<Entry>;
    fn entries_for_owner(&self, owner_id: OwnerId) -> Vec<Entry>;
}

impl<T: RegionCatalog + ?Sized> RegionCatalog for &T {
    fn region_by_name(&self, name: &str) -> Option<EmotionRegion> {
        (**self).region_by_name(name)
    }

    fn region_by_id(&self, id: RegionId) -> Option<EmotionRegion> {
        (**self).region_by_id(id)
    }
}

impl<T: EntrySource + ?Sized> EntrySource for &T {
    fn entry(&self, id: EntryId) -> Option<Entry> {
        (**self).entry(id)
    }

    fn entries_for_owner(&self, owner_id: OwnerId) -> Vec<Entry> {
        (**self).entries_for_owner(owner_id)
    }
}

/// A computed position and the region it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub region_id: RegionId,
    pub point: Point3,
}

/// Several constellations laid out in one region, with their pattern graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstellationSet {
    pub region_id: RegionId,
    /// Keyed by each group's first entry id.
    pub layouts: BTreeMap<EntryId, Vec<Point3>>,
    pub connections: ConnectionGraph,
}

pub struct CoordinateEngine<C, S> {
    regions: C,
    entries: S,
    layout: Layout,
    connections: ConnectionEngine,
}

impl<C: RegionCatalog, S: EntrySource> CoordinateEngine<C, S> {
    pub fn new(regions: C, entries: S, config: EngineConfig) -> Self {
        Self {
            regions,
            entries,
            layout: Layout::new(config.layout),
            connections: ConnectionEngine::new(config.connection),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn connections(&self) -> &ConnectionEngine {
        &self.connections
    }

    fn region_named(&self, name: &str) -> Result<EmotionRegion> {
        self.regions
            .region_by_name(name)
            .ok_or_else(|| CoordinateError::RegionNotFound(name.to_string()))
    }

    /// Lay `entries` out as one constellation centred in `region`.
    /// Returns (entry id, position) in input order.
    pub fn layout_entries(
        &self,
        region: &EmotionRegion,
        entries: &[Entry],
        rng: &mut impl Rng,
    ) -> Vec<(EntryId, Point3)> {
        let points = self.layout.constellation(region, entries.len(), rng);
        entries.iter().map(|e| e.id).zip(points).collect()
    }

    /// Position for a new (or re-categorised) entry in `category`'s region.
    pub fn assign_coordinates(
        &self,
        category: &str,
        tags: &TagSet,
        existing_id: Option<EntryId>,
        rng: &mut impl Rng,
    ) -> Result<Placement> {
        let region = self.region_named(category)?;

        let mut synthetic = Entry::new(existing_id.unwrap_or(UNSAVED_ENTRY_ID), 0);
        synthetic.tags = tags.clone();
        synthetic.region_id = Some(region.id);

        let placement = self.place_single(&region, &synthetic, rng);
        tracing::info!(
            category,
            entry = synthetic.id,
            x = placement.point.x,
            y = placement.point.y,
            z = placement.point.z,
            "assigned coordinates"
        );
        Ok(placement)
    }

    /// Position for an edited entry.
    ///
    /// A category change re-places the entry from scratch. Within the same
    /// category a fresh single-entry layout is still computed; the previous
    /// position is logged but not kept.
    pub fn relocate_coordinates(
        &self,
        entry: &Entry,
        new_category: &str,
        tags: &TagSet,
        rng: &mut impl Rng,
    ) -> Result<Placement> {
        let target = self.region_named(new_category)?;
        let current = entry.region_id.and_then(|id| self.regions.region_by_id(id));

        let Some(current) = current.filter(|r| r.id == target.id) else {
            tracing::info!(
                entry = entry.id,
                from = ?entry.region_id,
                to = target.id,
                "emotion changed, re-placing entry"
            );
            return self.assign_coordinates(new_category, tags, Some(entry.id), rng);
        };

        let mut synthetic = entry.clone();
        synthetic.tags = tags.clone();

        let placement = self.place_single(&current, &synthetic, rng);
        tracing::info!(
            entry = entry.id,
            previous = ?entry.position,
            x = placement.point.x,
            y = placement.point.y,
            z = placement.point.z,
            "relocated entry within its region"
        );
        Ok(placement)
    }

    fn place_single(&self, region: &EmotionRegion, entry: &Entry, rng: &mut impl Rng) -> Placement {
        let placed = self.layout_entries(region, std::slice::from_ref(entry), rng);
        let point = placed.first().map_or(region.center, |&(_, p)| p);
        Placement {
            region_id: region.id,
            point,
        }
    }

    /// Neighbours of `id` among the owner's entries in the same region.
    ///
    /// The list is the entry's row of the similarity-ranked graph, cut to
    /// `max` in insertion order.
    pub fn find_connected_entries(&self, id: EntryId, max: usize) -> Result<Vec<EntryId>> {
        let focal = self
            .entries
            .entry(id)
            .ok_or(CoordinateError::EntryNotFound(id))?;

        let peers: Vec<Entry> = self
            .entries
            .entries_for_owner(focal.owner_id)
            .into_iter()
            .filter(|e| e.id != focal.id && e.region_id == focal.region_id)
            .collect();
        if peers.is_empty() {
            return Ok(Vec::new());
        }

        let mut candidates = Vec::with_capacity(peers.len() + 1);
        candidates.push(focal);
        candidates.extend(peers);

        let graph = self.connections.connect_by_similarity(&candidates);
        let connected: Vec<EntryId> = graph.neighbors(id).iter().take(max).copied().collect();
        tracing::debug!(
            entry = id,
            candidates = candidates.len(),
            found = connected.len(),
            "connected entries"
        );
        Ok(connected)
    }

    /// Similarity-ranked graph over all of an owner's entries in one region.
    pub fn region_graph(&self, owner_id: OwnerId, category: &str) -> Result<ConnectionGraph> {
        let region = self.region_named(category)?;
        let entries: Vec<Entry> = self
            .entries
            .entries_for_owner(owner_id)
            .into_iter()
            .filter(|e| e.region_id == Some(region.id))
            .collect();
        Ok(self.connections.connect_by_similarity(&entries))
    }

    /// Lay out several constellation groups in `category`'s region and
    /// connect them with the pattern builder.
    pub fn layout_constellations(
        &self,
        category: &str,
        groups: &[Vec<EntryId>],
        rng: &mut impl Rng,
    ) -> Result<ConstellationSet> {
        let region = self.region_named(category)?;
        let layouts = self.layout.constellations(&region, groups, rng);
        let connections = self.connections.connect_groups(groups);
        tracing::info!(
            category,
            groups = layouts.len(),
            links = connections.link_count(),
            "laid out constellations"
        );
        Ok(ConstellationSet {
            region_id: region.id,
            layouts,
            connections,
        })
    }

    /// Recompute every constellation of an owner's universe.
    ///
    /// Not implemented: always returns
    /// [`CoordinateError::CapabilityNotImplemented`].
    pub fn relayout_region(&self, owner_id: OwnerId) -> Result<ConnectionGraph> {
        tracing::warn!(owner_id, "whole-universe relayout requested but not implemented");
        Err(CoordinateError::CapabilityNotImplemented {
            operation: "relayout_region",
            owner_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::tag_set;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    struct Fixture {
        regions: Vec<EmotionRegion>,
        entries: Vec<Entry>,
    }

    impl RegionCatalog for Fixture {
        fn region_by_name(&self, name: &str) -> Option<EmotionRegion> {
            self.regions.iter().find(|r| r.name == name).cloned()
        }

        fn region_by_id(&self, id: RegionId) -> Option<EmotionRegion> {
            self.regions.iter().find(|r| r.id == id).cloned()
        }
    }

    impl EntrySource for Fixture {
        fn entry(&self, id: EntryId) -> Option<Entry> {
            self.entries.iter().find(|e| e.id == id).cloned()
        }

        fn entries_for_owner(&self, owner_id: OwnerId) -> Vec<Entry> {
            self.entries.iter().filter(|e| e.owner_id == owner_id).cloned().collect()
        }
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    fn fixture() -> Fixture {
        Fixture {
            regions: vec![
                EmotionRegion::new(1, "joy", Point3::new(0.0, 0.0, 0.0), 10.0),
                EmotionRegion::new(2, "anger", Point3::new(50.0, 0.0, 0.0), 20.0),
                EmotionRegion::new(3, "peace", Point3::new(0.0, 50.0, 0.0), 15.0),
            ],
            entries: vec![
                Entry::new(1, 7).in_region(1).with_tags(["sea", "night"]),
                Entry::new(2, 7).in_region(1).with_tags(["sea", "night"]),
                Entry::new(3, 7).in_region(1).with_tags(["school"]),
                Entry::new(4, 7).in_region(1).with_tags(["falling"]),
                Entry::new(5, 7).in_region(2).with_tags(["sea", "night"]),
                Entry::new(6, 8).in_region(1).with_tags(["sea", "night"]),
                Entry::new(9, 7).in_region(3).at(Point3::new(0.0, 55.0, 0.0)),
            ],
        }
    }

    fn engine(f: &Fixture) -> CoordinateEngine<&Fixture, &Fixture> {
        CoordinateEngine::new(f, f, EngineConfig::default())
    }

    #[test]
    fn test_assign_unknown_region() {
        let f = fixture();
        let err = engine(&f)
            .assign_coordinates("nostalgia", &TagSet::new(), None, &mut rng())
            .unwrap_err();
        assert_eq!(err, CoordinateError::RegionNotFound("nostalgia".into()));
    }

    #[test]
    fn test_assign_within_region_fill() {
        let f = fixture();
        let engine = engine(&f);
        let mut rng = rng();
        for _ in 0..50 {
            let p = engine
                .assign_coordinates("anger", &tag_set(["storm"]), None, &mut rng)
                .unwrap();
            assert_eq!(p.region_id, 2);
            assert!(p.point.distance(Point3::new(50.0, 0.0, 0.0)) <= 16.0 + 1e-9);
        }
    }

    #[test]
    fn test_relocate_across_regions_reassigns() {
        let f = fixture();
        let entry = f.entries[0].clone().at(Point3::new(1.0, 1.0, 1.0));
        let p = engine(&f)
            .relocate_coordinates(&entry, "peace", &entry.tags, &mut rng())
            .unwrap();
        assert_eq!(p.region_id, 3);
        assert!(p.point.distance(Point3::new(0.0, 50.0, 0.0)) <= 12.0 + 1e-9);
    }

    #[test]
    fn test_relocate_same_region_recomputes_position() {
        let f = fixture();
        let entry = f.entries[6].clone();
        let previous = entry.position.unwrap();
        let p = engine(&f)
            .relocate_coordinates(&entry, "peace", &TagSet::new(), &mut rng())
            .unwrap();
        assert_eq!(p.region_id, 3);
        // The old position is not preserved: peace's first template point
        // is the region centre.
        assert_ne!(p.point, previous);
        assert_eq!(p.point, Point3::new(0.0, 50.0, 0.0));
    }

    #[test]
    fn test_relocate_unknown_target() {
        let f = fixture();
        let entry = f.entries[0].clone();
        let err = engine(&f)
            .relocate_coordinates(&entry, "envy", &entry.tags, &mut rng())
            .unwrap_err();
        assert!(matches!(err, CoordinateError::RegionNotFound(_)));
    }

    #[test]
    fn test_find_connected_same_owner_same_region() {
        let f = fixture();
        let connected = engine(&f).find_connected_entries(1, 5).unwrap();
        assert!(connected.contains(&2));
        assert!(!connected.contains(&5), "different region");
        assert!(!connected.contains(&6), "different owner");
    }

    #[test]
    fn test_find_connected_truncates() {
        let f = fixture();
        let all = engine(&f).find_connected_entries(1, 10).unwrap();
        let one = engine(&f).find_connected_entries(1, 1).unwrap();
        assert!(all.len() > 1);
        assert_eq!(one, all[..1]);
        assert!(engine(&f).find_connected_entries(1, 0).unwrap().is_empty());
    }

    #[test]
    fn test_find_connected_alone_in_region() {
        let f = fixture();
        assert!(engine(&f).find_connected_entries(5, 5).unwrap().is_empty());
    }

    #[test]
    fn test_find_connected_missing_entry() {
        let f = fixture();
        let err = engine(&f).find_connected_entries(404, 5).unwrap_err();
        assert_eq!(err, CoordinateError::EntryNotFound(404));
    }

    #[test]
    fn test_region_graph() {
        let f = fixture();
        let graph = engine(&f).region_graph(7, "joy").unwrap();
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert!(graph.contains_edge(1, 2));
    }

    #[test]
    fn test_layout_constellations() {
        let f = fixture();
        let set = engine(&f)
            .layout_constellations("joy", &[vec![1, 2, 3], vec![4]], &mut rng())
            .unwrap();
        assert_eq!(set.region_id, 1);
        assert_eq!(set.layouts.len(), 2);
        assert!(set.connections.contains_edge(1, 4));
        assert!(set.connections.contains_edge(3, 1));
    }

    #[test]
    fn test_relayout_is_explicitly_unsupported() {
        let f = fixture();
        let err = engine(&f).relayout_region(7).unwrap_err();
        assert!(matches!(
            err,
            CoordinateError::CapabilityNotImplemented { owner_id: 7, .. }
        ));
        assert!(err.to_string().contains("not implemented"));
    }
}
