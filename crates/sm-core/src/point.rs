use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::constants::EPSILON;

/// A point (or offset) in 3-D layout space.
///
/// Plain value type. Templates use it in the canonical [-1, 1] cube,
/// layouts use it in world coordinates.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Point3 {
    fn eq(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < EPSILON
            && (self.y - other.y).abs() < EPSILON
            && (self.z - other.z).abs() < EPSILON
    }
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin (0, 0, 0).
    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Euclidean norm (distance from the origin).
    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        (self - other).norm()
    }

    /// Unit vector from spherical angles: `inclination` from +z, `azimuth` around z.
    pub fn from_spherical(inclination: f64, azimuth: f64) -> Self {
        Self::new(
            inclination.sin() * azimuth.cos(),
            inclination.sin() * azimuth.sin(),
            inclination.cos(),
        )
    }

    /// Arithmetic mean of `points`. Origin for an empty slice.
    pub fn centroid(points: &[Self]) -> Self {
        if points.is_empty() {
            return Self::origin();
        }
        let sum = points.iter().fold(Self::origin(), |acc, &p| acc + p);
        sum * (1.0 / points.len() as f64)
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

impl Add for Point3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Uniform scaling.
impl Mul<f64> for Point3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}
