use serde::{Deserialize, Serialize};

use crate::point::Point3;

pub type RegionId = i64;

/// Emotion category that picks a region's constellation templates.
/// Unknown names fall back to `Other`, which uses generic shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmotionCategory {
    Joy,
    Sadness,
    Anger,
    Anxiety,
    Peace,
    Hope,
    Fear,
    #[default]
    Other,
}

impl EmotionCategory {
    pub const ALL: [Self; 8] = [
        Self::Joy,
        Self::Sadness,
        Self::Anger,
        Self::Anxiety,
        Self::Peace,
        Self::Hope,
        Self::Fear,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Joy => "joy",
            Self::Sadness => "sadness",
            Self::Anger => "anger",
            Self::Anxiety => "anxiety",
            Self::Peace => "peace",
            Self::Hope => "hope",
            Self::Fear => "fear",
            Self::Other => "other",
        }
    }

    /// Parse a category name. Accepts English names (case-insensitive) and
    /// the Korean names the diary front end sends.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "joy" | "행복" => Self::Joy,
            "sadness" | "슬픔" => Self::Sadness,
            "anger" | "분노" => Self::Anger,
            "anxiety" | "불안" => Self::Anxiety,
            "peace" | "평화" => Self::Peace,
            "hope" | "희망" => Self::Hope,
            "fear" | "공포" => Self::Fear,
            _ => Self::Other,
        }
    }
}

/// A sphere of layout space owned by one emotion.
///
/// Reference data from the emotion catalog. The engine only reads it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmotionRegion {
    pub id: RegionId,
    pub name: String,
    pub center: Point3,
    pub radius: f64,
}

impl EmotionRegion {
    pub fn new(id: RegionId, name: &str, center: Point3, radius: f64) -> Self {
        Self {
            id,
            name: name.to_string(),
            center,
            radius,
        }
    }

    pub fn category(&self) -> EmotionCategory {
        EmotionCategory::from_str_lossy(&self.name)
    }

    /// True if `point` lies inside (or on) the region sphere.
    pub fn contains(&self, point: Point3) -> bool {
        self.center.distance(point) <= self.radius + crate::constants::EPSILON
    }
}
