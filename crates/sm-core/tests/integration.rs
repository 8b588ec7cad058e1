//! Integration tests exercising the engine end to end:
//! region lookup → template → layout, and entry snapshots → connection graph.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use sm_core::{
    CoordinateEngine, EmotionCategory, EmotionRegion, EngineConfig, Entry, EntryId, EntrySource,
    OwnerId, Point3, RegionCatalog, RegionId, TagSet, TemplateShape, similarity, tag_set,
    template,
};

fn rng() -> SmallRng {
    SmallRng::seed_from_u64(42)
}

#[derive(Default)]
struct Universe {
    regions: Vec<EmotionRegion>,
    entries: Vec<Entry>,
}

impl RegionCatalog for Universe {
    fn region_by_name(&self, name: &str) -> Option<EmotionRegion> {
        self.regions.iter().find(|r| r.name == name).cloned()
    }

    fn region_by_id(&self, id: RegionId) -> Option<EmotionRegion> {
        self.regions.iter().find(|r| r.id == id).cloned()
    }
}

impl EntrySource for Universe {
    fn entry(&self, id: EntryId) -> Option<Entry> {
        self.entries.iter().find(|e| e.id == id).cloned()
    }

    fn entries_for_owner(&self, owner_id: OwnerId) -> Vec<Entry> {
        self.entries
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect()
    }
}

fn origin_joy() -> EmotionRegion {
    EmotionRegion::new(1, "joy", Point3::origin(), 10.0)
}

/// Joy region of radius 10 at the origin, three entries: every star within
/// 8.0 of the origin and the first one at the template centre.
#[test]
fn joy_three_entry_scenario() {
    let universe = Universe {
        regions: vec![origin_joy()],
        ..Default::default()
    };
    let engine = CoordinateEngine::new(&universe, &universe, EngineConfig::default());
    let entries: Vec<Entry> = (1..=3).map(|id| Entry::new(id, 1)).collect();

    let placed = engine.layout_entries(&origin_joy(), &entries, &mut rng());
    assert_eq!(placed.len(), 3);

    let points: Vec<Point3> = placed.iter().map(|&(_, p)| p).collect();
    for p in &points {
        assert!(p.norm() <= 8.0 + 1e-9, "{p:?} outside 80% of the region");
    }

    let centroid = Point3::centroid(&points);
    let nearest = points
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.distance(centroid).total_cmp(&b.1.distance(centroid)))
        .map(|(i, _)| i);
    assert_eq!(nearest, Some(0));
    assert_eq!(placed[0].0, 1);
}

#[test]
fn assign_stays_inside_every_region() {
    let names = ["joy", "sadness", "anger", "anxiety", "peace", "hope", "fear", "dread"];
    let universe = Universe {
        regions: names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                EmotionRegion::new(
                    i as RegionId,
                    name,
                    Point3::new(i as f64 * 100.0, -20.0, 7.5),
                    5.0 + i as f64 * 3.0,
                )
            })
            .collect(),
        ..Default::default()
    };
    let engine = CoordinateEngine::new(&universe, &universe, EngineConfig::default());
    let mut rng = rng();

    for region in &universe.regions {
        for _ in 0..20 {
            let placement = engine
                .assign_coordinates(&region.name, &tag_set(["x"]), None, &mut rng)
                .unwrap();
            assert_eq!(placement.region_id, region.id);
            assert!(placement.point.distance(region.center) <= region.radius * 0.8 + 1e-9);
        }
    }
}

#[test]
fn five_entries_pair_sharing_all_tags() {
    let entries = vec![
        Entry::new(1, 1).in_region(1).with_tags(["ocean", "whale"]),
        Entry::new(2, 1).in_region(1).with_tags(["ocean", "whale"]),
        Entry::new(3, 1).in_region(1).with_tags(["exam"]),
        Entry::new(4, 1).in_region(1).with_tags(["teeth"]),
        Entry::new(5, 1).in_region(1).with_tags(["chase"]),
    ];
    let universe = Universe {
        regions: vec![origin_joy()],
        entries,
    };
    let engine = CoordinateEngine::new(&universe, &universe, EngineConfig::default());

    let graph = engine.region_graph(1, "joy").unwrap();
    assert!(graph.contains_edge(1, 2));
    assert!(graph.contains_edge(2, 1));
    for id in 1..=5 {
        assert!(graph.degree(id) >= 1, "entry {id} isolated");
    }

    let from_one = engine.find_connected_entries(1, 1).unwrap();
    assert_eq!(from_one, vec![2]);
}

#[test]
fn seeded_templates_are_byte_identical() {
    for count in 3..=7 {
        let shape = TemplateShape::select(EmotionCategory::Fear, count);
        assert!(shape.is_deterministic());
        let a = template(EmotionCategory::Fear, count, &mut SmallRng::seed_from_u64(1));
        let b = template(EmotionCategory::Fear, count, &mut SmallRng::seed_from_u64(2));
        let bits = |pts: &[Point3]| -> Vec<u64> {
            pts.iter()
                .flat_map(|p| p.to_array())
                .map(f64::to_bits)
                .collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }
}

#[test]
fn relocate_within_region_does_not_keep_old_position() {
    let old = Point3::new(3.0, 3.0, 0.0);
    let entry = Entry::new(11, 1).in_region(1).at(old).with_tags(["a"]);
    let universe = Universe {
        regions: vec![origin_joy()],
        entries: vec![entry.clone()],
    };
    let engine = CoordinateEngine::new(&universe, &universe, EngineConfig::default());

    let placement = engine
        .relocate_coordinates(&entry, "joy", &entry.tags, &mut rng())
        .unwrap();
    assert_eq!(placement.region_id, 1);
    assert_ne!(placement.point, old);
}

fn tags() -> impl Strategy<Value = TagSet> {
    prop::collection::btree_set("[a-f]{1,2}", 0..4)
}

proptest! {
    #[test]
    fn ranked_graph_has_no_isolated_entries(all_tags in prop::collection::vec(tags(), 2..12)) {
        let entries: Vec<Entry> = all_tags
            .into_iter()
            .enumerate()
            .map(|(i, t)| {
                let mut e = Entry::new(i as EntryId, 1);
                e.tags = t;
                e
            })
            .collect();
        let engine = sm_core::ConnectionEngine::default();
        let graph = engine.connect_by_similarity(&entries);
        for e in &entries {
            prop_assert!(graph.degree(e.id) >= 1);
            prop_assert!(!graph.contains_edge(e.id, e.id));
            for &n in graph.neighbors(e.id) {
                prop_assert!(graph.contains_edge(n, e.id));
            }
        }
    }

    #[test]
    fn similarity_is_symmetric(a in tags(), b in tags()) {
        prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }

    #[test]
    fn placement_within_scaled_radius(
        cx in -500.0..500.0f64,
        cy in -500.0..500.0f64,
        cz in -500.0..500.0f64,
        radius in 0.5..200.0f64,
        category in 0usize..8,
        count in 3usize..=7,
        seed in any::<u64>(),
    ) {
        let category = EmotionCategory::ALL[category];
        let region = EmotionRegion::new(1, category.as_str(), Point3::new(cx, cy, cz), radius);
        let layout = sm_core::Layout::default();
        let mut rng = SmallRng::seed_from_u64(seed);
        for p in layout.constellation(&region, count, &mut rng) {
            prop_assert!(p.distance(region.center) <= radius * 0.8 * (1.0 + 1e-9));
        }
    }
}
