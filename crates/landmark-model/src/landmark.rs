//! Landmark point types.
//!
//! A landmark set is ordered: index `i` always names the same semantic
//! point (e.g. "left wrist") across frames of a stream.

use serde::{Deserialize, Serialize};

/// A landmark in absolute units (pixels; `z` uses the same scale as `x`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,

    /// Likelihood that the point is visible (not occluded).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,

    /// Likelihood that the point is present in the frame at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<f64>,
}

/// A landmark with `x`/`y` normalized to image width/height.
///
/// `z` is normalized by image width so depth shares the `x` scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility: None,
            presence: None,
        }
    }

    pub fn with_visibility(self, visibility: f64) -> Self {
        Self {
            visibility: Some(visibility),
            ..self
        }
    }

    pub fn with_presence(self, presence: f64) -> Self {
        Self {
            presence: Some(presence),
            ..self
        }
    }

    #[inline]
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl NormalizedLandmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility: None,
            presence: None,
        }
    }

    pub fn with_visibility(self, visibility: f64) -> Self {
        Self {
            visibility: Some(visibility),
            ..self
        }
    }

    pub fn with_presence(self, presence: f64) -> Self {
        Self {
            presence: Some(presence),
            ..self
        }
    }
}

/// Ordered list of absolute landmarks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkList {
    pub landmarks: Vec<Landmark>,
}

/// Ordered list of normalized landmarks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedLandmarkList {
    pub landmarks: Vec<NormalizedLandmark>,
}

impl LandmarkList {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Empty list with room for `capacity` landmarks.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            landmarks: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Landmark> {
        self.landmarks.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Width and height of the axis-aligned box enclosing all points.
    ///
    /// Returns `None` for an empty list.
    pub fn extent(&self) -> Option<(f64, f64)> {
        let first = self.landmarks.first()?;
        let (mut min_x, mut max_x) = (first.x, first.x);
        let (mut min_y, mut max_y) = (first.y, first.y);
        for lm in &self.landmarks[1..] {
            min_x = min_x.min(lm.x);
            max_x = max_x.max(lm.x);
            min_y = min_y.min(lm.y);
            max_y = max_y.max(lm.y);
        }
        Some((max_x - min_x, max_y - min_y))
    }
}

impl NormalizedLandmarkList {
    pub fn new(landmarks: Vec<NormalizedLandmark>) -> Self {
        Self { landmarks }
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedLandmark> {
        self.landmarks.iter()
    }
}

impl From<Vec<Landmark>> for LandmarkList {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }
}

impl From<Vec<NormalizedLandmark>> for NormalizedLandmarkList {
    fn from(landmarks: Vec<NormalizedLandmark>) -> Self {
        Self { landmarks }
    }
}
