//! Constellation templates.
//!
//! Every template is a small point set in the canonical [-1, 1] cube around
//! the origin. Point `i` is the star for entry `i` of the constellation, and
//! the first point is usually the centre. Layout code rescales templates into
//! world space (see [`crate::layout`]).
//!
//! Spike and explosion draw from the caller's random source, so their output
//! changes from call to call. Scatter and chaos ignore it and build their own
//! fixed-seed generator: identical inputs give identical points.

use std::f64::consts::{PI, TAU};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::constants::{CHAOS_SEED, MAX_TEMPLATE_COUNT, MIN_TEMPLATE_COUNT, SCATTER_SEED};
use crate::emotion::EmotionCategory;
use crate::point::Point3;

/// Named constellation shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateShape {
    Triangle,
    Circle,
    Pentagon,
    Crown,
    Teardrop,
    River,
    Spike,
    Explosion,
    Zigzag,
    Spiral,
    Arrow,
    Rise,
    Balance,
    Scatter,
    Chaos,
}

/// Clamp an entry count into the supported template range.
pub fn clamp_count(count: usize) -> usize {
    count.clamp(MIN_TEMPLATE_COUNT, MAX_TEMPLATE_COUNT)
}

/// Normalized template for `category` holding `count` entries.
///
/// `count` is clamped to [3, 7] first, so the returned vector always has
/// `clamp_count(count)` points.
pub fn template(category: EmotionCategory, count: usize, rng: &mut impl Rng) -> Vec<Point3> {
    let count = clamp_count(count);
    let shape = TemplateShape::select(category, count);
    tracing::debug!(
        category = category.as_str(),
        count,
        shape = shape.as_str(),
        "selected constellation template"
    );
    shape.points(count, rng)
}

impl TemplateShape {
    /// Pick the shape for a category and an already-clamped count.
    pub fn select(category: EmotionCategory, count: usize) -> Self {
        use EmotionCategory as E;
        match category {
            E::Joy if count <= 5 => Self::Pentagon,
            E::Joy => Self::Crown,
            E::Sadness if count <= 4 => Self::Teardrop,
            E::Sadness => Self::River,
            E::Anger if count <= 5 => Self::Spike,
            E::Anger => Self::Explosion,
            E::Anxiety if count <= 4 => Self::Zigzag,
            E::Anxiety => Self::Spiral,
            E::Peace if count <= 5 => Self::Circle,
            E::Peace => Self::Balance,
            E::Hope if count <= 4 => Self::Arrow,
            E::Hope => Self::Rise,
            E::Fear if count <= 5 => Self::Scatter,
            E::Fear => Self::Chaos,
            E::Other if count <= 4 => Self::Triangle,
            E::Other => Self::Circle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Triangle => "triangle",
            Self::Circle => "circle",
            Self::Pentagon => "pentagon",
            Self::Crown => "crown",
            Self::Teardrop => "teardrop",
            Self::River => "river",
            Self::Spike => "spike",
            Self::Explosion => "explosion",
            Self::Zigzag => "zigzag",
            Self::Spiral => "spiral",
            Self::Arrow => "arrow",
            Self::Rise => "rise",
            Self::Balance => "balance",
            Self::Scatter => "scatter",
            Self::Chaos => "chaos",
        }
    }

    /// False for the shapes that consume the caller's random source.
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, Self::Spike | Self::Explosion)
    }

    /// Generate this shape with `count` points (clamped to [3, 7]).
    pub fn points(&self, count: usize, rng: &mut impl Rng) -> Vec<Point3> {
        let n = clamp_count(count);
        match self {
            Self::Triangle => triangle(n),
            Self::Circle => circle(n),
            Self::Pentagon => pentagon(n),
            Self::Crown => crown(n),
            Self::Teardrop => teardrop(n),
            Self::River => river(n),
            Self::Spike => spike(n, rng),
            Self::Explosion => explosion(n, rng),
            Self::Zigzag => zigzag(n),
            Self::Spiral => spiral(n),
            Self::Arrow => arrow(n),
            Self::Rise => rise(n),
            Self::Balance => balance(n),
            Self::Scatter => scatter(n),
            Self::Chaos => chaos(n),
        }
    }
}

// ---------------------------------------------------------------------------
// Shapes. Slots a shape does not define stay at the origin.
// ---------------------------------------------------------------------------

/// Parameter t = i / (n - 1) along an open curve.
fn curve_t(i: usize, n: usize) -> f64 {
    i as f64 / (n - 1) as f64
}

/// Alternating +a / -a, starting positive.
fn alternate(i: usize, a: f64) -> f64 {
    if i % 2 == 0 { a } else { -a }
}

fn fill_fixed(n: usize, fixed: &[Point3]) -> Vec<Point3> {
    let mut points = vec![Point3::origin(); n];
    for (slot, p) in points.iter_mut().zip(fixed) {
        *slot = *p;
    }
    points
}

fn triangle(n: usize) -> Vec<Point3> {
    fill_fixed(
        n,
        &[
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(-0.5, 0.866, 0.0),
            Point3::new(-0.5, -0.866, 0.0),
        ],
    )
}

fn circle(n: usize) -> Vec<Point3> {
    let mut points = vec![Point3::origin()];
    let ring = (n - 1) as f64;
    for i in 1..n {
        let angle = TAU * (i - 1) as f64 / ring;
        points.push(Point3::new(angle.cos(), angle.sin(), 0.0));
    }
    points
}

fn pentagon(n: usize) -> Vec<Point3> {
    let mut points = vec![Point3::origin(); n];
    for (k, slot) in points.iter_mut().skip(1).take(5).enumerate() {
        let angle = TAU * k as f64 / 5.0;
        *slot = Point3::new(angle.cos(), angle.sin(), 0.0);
    }
    points
}

fn crown(n: usize) -> Vec<Point3> {
    let mut points = vec![Point3::origin(); n];
    // Base: quarter-turn steps along a shallow arc.
    for (i, slot) in points.iter_mut().enumerate().take(4).skip(1) {
        let angle = PI * (i - 1) as f64 / 2.0;
        *slot = Point3::new(angle.cos(), -0.5, angle.sin() * 0.3);
    }
    // Peaks.
    if n > 4 {
        let peaks = (n - 4) as f64;
        for (k, slot) in points.iter_mut().skip(4).enumerate() {
            let angle = PI * k as f64 / peaks;
            *slot = Point3::new(angle.cos() * 0.8, 0.8, angle.sin() * 0.2);
        }
    }
    points
}

fn teardrop(n: usize) -> Vec<Point3> {
    fill_fixed(
        n,
        &[
            Point3::origin(),
            Point3::new(-0.3, -0.5, 0.0),
            Point3::new(0.3, -0.5, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ],
    )
}

fn river(n: usize) -> Vec<Point3> {
    (0..n)
        .map(|i| {
            let t = curve_t(i, n);
            Point3::new(t * 2.0 - 1.0, (t * PI).sin() * 0.5, (t * TAU).cos() * 0.2)
        })
        .collect()
}

fn spike(n: usize, rng: &mut impl Rng) -> Vec<Point3> {
    let mut points = vec![Point3::origin()];
    let rays = (n - 1) as f64;
    for i in 1..n {
        let angle = TAU * (i - 1) as f64 / rays;
        let length = 0.8 + 0.4 * rng.random::<f64>();
        let z = (rng.random::<f64>() - 0.5) * 0.3;
        points.push(Point3::new(angle.cos() * length, angle.sin() * length, z));
    }
    points
}

/// Uniformly distributed direction scaled by `r`.
fn sphere_point(rng: &mut impl Rng, r_min: f64, r_span: f64) -> Point3 {
    let inclination = (2.0 * rng.random::<f64>() - 1.0).acos();
    let azimuth = TAU * rng.random::<f64>();
    let r = r_min + r_span * rng.random::<f64>();
    Point3::from_spherical(inclination, azimuth) * r
}

fn explosion(n: usize, rng: &mut impl Rng) -> Vec<Point3> {
    let mut points = vec![Point3::origin()];
    for _ in 1..n {
        points.push(sphere_point(rng, 0.5, 0.5));
    }
    points
}

fn zigzag(n: usize) -> Vec<Point3> {
    (0..n)
        .map(|i| Point3::new(curve_t(i, n) * 2.0 - 1.0, alternate(i, 0.5), 0.0))
        .collect()
}

fn spiral(n: usize) -> Vec<Point3> {
    (0..n)
        .map(|i| {
            let t = curve_t(i, n);
            let radius = t * 0.8;
            let angle = t * 2.0 * TAU;
            Point3::new(radius * angle.cos(), radius * angle.sin(), t * 0.5 - 0.25)
        })
        .collect()
}

fn arrow(n: usize) -> Vec<Point3> {
    fill_fixed(
        n,
        &[
            Point3::new(0.0, 1.0, 0.0),
            Point3::origin(),
            Point3::new(-0.5, 0.5, 0.0),
            Point3::new(0.5, 0.5, 0.0),
        ],
    )
}

fn rise(n: usize) -> Vec<Point3> {
    (0..n)
        .map(|i| {
            let t = curve_t(i, n);
            Point3::new(t * 2.0 - 1.0, t * t, alternate(i, 0.2))
        })
        .collect()
}

fn balance(n: usize) -> Vec<Point3> {
    let mut points = vec![Point3::origin()];
    let half = (n - 1) / 2;
    for i in 1..=half {
        let s = (i - 1) as f64 / half as f64;
        points.push(Point3::new((s * PI).cos() * 0.5, 0.5, (s * PI).sin() * 0.3));
    }
    let lower = (n - half - 1) as f64;
    for i in (half + 1)..n {
        let s = (i - half - 1) as f64 / lower;
        points.push(Point3::new(-(s * PI).cos() * 0.5, -0.5, -(s * PI).sin() * 0.3));
    }
    points
}

fn scatter(n: usize) -> Vec<Point3> {
    let mut rng = SmallRng::seed_from_u64(SCATTER_SEED);
    let mut points = vec![Point3::origin()];
    for _ in 1..n {
        let x = (rng.random::<f64>() - 0.5) * 2.0;
        let y = (rng.random::<f64>() - 0.5) * 2.0;
        let z = (rng.random::<f64>() - 0.5) * 0.5;
        points.push(Point3::new(x, y, z));
    }
    points
}

fn chaos(n: usize) -> Vec<Point3> {
    let mut rng = SmallRng::seed_from_u64(CHAOS_SEED);
    (0..n).map(|_| sphere_point(&mut rng, 0.2, 0.8)).collect()
}
