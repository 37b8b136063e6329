//! Conversion between image-normalized and absolute landmark coordinates.
//!
//! `x` scales with image width, `y` with image height, and `z` with image
//! width. Confidence values are carried over untouched.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::landmark::{Landmark, LandmarkList, NormalizedLandmark, NormalizedLandmarkList};

/// Image dimensions in pixels. Both sides are guaranteed to be positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawImageSize")]
pub struct ImageSize {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct RawImageSize {
    width: u32,
    height: u32,
}

impl TryFrom<RawImageSize> for ImageSize {
    type Error = ModelError;

    fn try_from(raw: RawImageSize) -> Result<Self, Self::Error> {
        ImageSize::new(raw.width, raw.height)
    }
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Result<Self, ModelError> {
        if width == 0 || height == 0 {
            return Err(ModelError::InvalidImageSize { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` as floats.
    pub fn as_f64(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }
}

/// Convert normalized landmarks to absolute units.
pub fn normalized_to_absolute(landmarks: &NormalizedLandmarkList, size: ImageSize) -> LandmarkList {
    let mut out = LandmarkList::with_capacity(landmarks.len());
    normalized_to_absolute_into(landmarks, size, &mut out);
    out
}

/// Like [`normalized_to_absolute`], reusing `out`'s allocation.
pub fn normalized_to_absolute_into(
    landmarks: &NormalizedLandmarkList,
    size: ImageSize,
    out: &mut LandmarkList,
) {
    let (w, h) = size.as_f64();
    out.landmarks.clear();
    out.landmarks.extend(landmarks.iter().map(|lm| Landmark {
        x: lm.x * w,
        y: lm.y * h,
        z: lm.z * w,
        visibility: lm.visibility,
        presence: lm.presence,
    }));
}

/// Convert absolute landmarks to image-normalized units.
pub fn absolute_to_normalized(landmarks: &LandmarkList, size: ImageSize) -> NormalizedLandmarkList {
    let mut out = NormalizedLandmarkList::default();
    absolute_to_normalized_into(landmarks, size, &mut out);
    out
}

/// Like [`absolute_to_normalized`], reusing `out`'s allocation.
pub fn absolute_to_normalized_into(
    landmarks: &LandmarkList,
    size: ImageSize,
    out: &mut NormalizedLandmarkList,
) {
    let (w, h) = size.as_f64();
    out.landmarks.clear();
    out.landmarks.extend(landmarks.iter().map(|lm| NormalizedLandmark {
        x: lm.x / w,
        y: lm.y / h,
        z: lm.z / w,
        visibility: lm.visibility,
        presence: lm.presence,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_image_size_rejects_zero() {
        assert!(matches!(
            ImageSize::new(0, 480),
            Err(ModelError::InvalidImageSize {
                width: 0,
                height: 480
            })
        ));
        assert!(ImageSize::new(640, 0).is_err());
        assert!(serde_json::from_str::<ImageSize>(r#"{"width":0,"height":1}"#).is_err());
        assert!(serde_json::from_str::<ImageSize>(r#"{"width":2,"height":1}"#).is_ok());
    }

    #[test]
    fn test_normalized_to_absolute_scales_z_by_width() {
        let size = ImageSize::new(200, 100).unwrap();
        let norm = NormalizedLandmarkList::new(vec![NormalizedLandmark::new(0.5, 0.5, -0.1)
            .with_visibility(0.8)
            .with_presence(0.7)]);
        let abs = normalized_to_absolute(&norm, size);
        let lm = abs.landmarks[0];
        assert_eq!(lm.x, 100.0);
        assert_eq!(lm.y, 50.0);
        assert!((lm.z - -20.0).abs() < 1e-12);
        assert_eq!(lm.visibility, Some(0.8));
        assert_eq!(lm.presence, Some(0.7));
    }

    #[test]
    fn test_into_reuses_buffer() {
        let size = ImageSize::new(10, 10).unwrap();
        let mut out = LandmarkList::new(vec![Landmark::new(9.0, 9.0, 9.0); 4]);
        let norm = NormalizedLandmarkList::new(vec![NormalizedLandmark::new(0.1, 0.2, 0.0)]);
        normalized_to_absolute_into(&norm, size, &mut out);
        assert_eq!(out.len(), 1);
        assert!(out.landmarks.capacity() >= 4);
    }

    proptest! {
        #[test]
        fn conversions_are_mutually_inverse(
            x in -2.0f64..2.0,
            y in -2.0f64..2.0,
            z in -1.0f64..1.0,
            width in 1u32..4096,
            height in 1u32..4096,
        ) {
            let size = ImageSize::new(width, height).unwrap();
            let norm = NormalizedLandmarkList::new(vec![NormalizedLandmark::new(x, y, z)]);
            let back = absolute_to_normalized(&normalized_to_absolute(&norm, size), size);
            let lm = back.landmarks[0];
            prop_assert!((lm.x - x).abs() < 1e-9);
            prop_assert!((lm.y - y).abs() < 1e-9);
            prop_assert!((lm.z - z).abs() < 1e-9);
        }
    }
}
