//! Fitting normalized templates into world-space spheres.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use rand::Rng;

use crate::config::LayoutConfig;
use crate::constants::{MIN_CENTER_DEPTH, MIN_TEMPLATE_EXTENT, PHI};
use crate::emotion::EmotionRegion;
use crate::entry::EntryId;
use crate::point::Point3;
use crate::template::template;

/// Scale `template` into the sphere at `center` with `radius`.
///
/// The point with the largest norm lands on the sphere surface; every other
/// point lands inside. Templates whose extent is below 1.0 are not inflated.
pub fn place_in_region(template: &[Point3], center: Point3, radius: f64) -> Vec<Point3> {
    let max_norm = template
        .iter()
        .map(|p| p.norm())
        .fold(0.0_f64, f64::max)
        .max(MIN_TEMPLATE_EXTENT);
    let scale = radius / max_norm;
    template.iter().map(|&p| center + p * scale).collect()
}

/// Spread `count` points through the interior of a sphere.
///
/// Directions follow a Fibonacci sphere; each point then sits at a random
/// depth between 30% and 100% of `radius`. Not reproducible unless the
/// caller's `rng` is.
pub fn distribute_centers(
    center: Point3,
    radius: f64,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<Point3> {
    if count <= 1 {
        return vec![center; count];
    }

    (0..count)
        .map(|i| {
            let t = i as f64 / count as f64;
            let inclination = (1.0 - 2.0 * t).acos();
            let azimuth = TAU * i as f64 / PHI;
            let depth = MIN_CENTER_DEPTH + (1.0 - MIN_CENTER_DEPTH) * rng.random::<f64>();
            center + Point3::from_spherical(inclination, azimuth) * (radius * depth)
        })
        .collect()
}

/// Region-aware layout with configurable scale factors.
#[derive(Clone, Copy, Debug, Default)]
pub struct Layout {
    config: LayoutConfig,
}

impl Layout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// One constellation of `count` stars centred in `region`.
    pub fn constellation(
        &self,
        region: &EmotionRegion,
        count: usize,
        rng: &mut impl Rng,
    ) -> Vec<Point3> {
        let points = template(region.category(), count, rng);
        place_in_region(&points, region.center, region.radius * self.config.region_fill)
    }

    /// Radius of one constellation among several in a region.
    pub fn constellation_radius(&self, region_radius: f64, group_size: usize) -> f64 {
        let by_size = self.config.base_scale * ((group_size + 1) as f64).log10();
        (region_radius * self.config.constellation_fill).min(by_size)
    }

    /// Lay out several constellations in one region.
    ///
    /// Each non-empty group gets its own centre and template. The result is
    /// keyed by the group's first entry id; its points follow the group order
    /// (groups larger than the biggest template only get that many points).
    pub fn constellations(
        &self,
        region: &EmotionRegion,
        groups: &[Vec<EntryId>],
        rng: &mut impl Rng,
    ) -> BTreeMap<EntryId, Vec<Point3>> {
        let groups: Vec<&Vec<EntryId>> = groups.iter().filter(|g| !g.is_empty()).collect();
        let centers = distribute_centers(
            region.center,
            region.radius * self.config.group_spread,
            groups.len(),
            rng,
        );

        let mut layouts = BTreeMap::new();
        for (group, center) in groups.into_iter().zip(centers) {
            let radius = self.constellation_radius(region.radius, group.len());
            let points = template(region.category(), group.len(), rng);
            layouts.insert(group[0], place_in_region(&points, center, radius));
        }
        layouts
    }
}
