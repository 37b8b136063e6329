//! Object scale estimation.
//!
//! The object scale is the mean of a reference region's width and height in
//! absolute units. Dividing landmark speeds by it makes filter tuning
//! independent of how large the subject appears in the image.
//!
//! Every estimator returns `None` for degenerate input (non-positive or
//! non-finite sides); callers then skip scale normalization.

use lmsmooth_landmark_model::convert::ImageSize;
use lmsmooth_landmark_model::landmark::LandmarkList;
use lmsmooth_landmark_model::rect::{NormalizedRect, Rect};

/// Scale of an absolute region.
pub fn object_scale(rect: &Rect) -> Option<f64> {
    if rect.is_degenerate() {
        return None;
    }
    Some(mean_side(rect.width, rect.height))
}

/// Scale of a normalized region in an image of `size`.
pub fn normalized_object_scale(rect: &NormalizedRect, size: ImageSize) -> Option<f64> {
    object_scale(&rect.to_absolute(size))
}

/// Scale of the box enclosing all landmarks.
///
/// Returns `None` for empty lists and for collinear or coincident points.
pub fn landmarks_object_scale(landmarks: &LandmarkList) -> Option<f64> {
    let (width, height) = landmarks.extent()?;
    let scale = mean_side(width, height);
    (scale.is_finite() && scale > 0.0).then_some(scale)
}

fn mean_side(width: f64, height: f64) -> f64 {
    (width + height) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use lmsmooth_landmark_model::landmark::Landmark;

    #[test]
    fn test_absolute_scale_is_mean_side() {
        assert_eq!(object_scale(&Rect::new(0.0, 0.0, 100.0, 50.0)), Some(75.0));
    }

    #[test]
    fn test_degenerate_region_has_no_scale() {
        assert_eq!(object_scale(&Rect::new(0.0, 0.0, 0.0, 50.0)), None);
        assert_eq!(object_scale(&Rect::new(0.0, 0.0, 10.0, -5.0)), None);
        assert_eq!(object_scale(&Rect::new(0.0, 0.0, f64::INFINITY, 5.0)), None);
    }

    #[test]
    fn test_normalized_scale_uses_image_size() {
        let size = ImageSize::new(1920, 1080).unwrap();
        let rect = NormalizedRect::new(0.5, 0.5, 0.5, 0.5);
        let scale = normalized_object_scale(&rect, size).unwrap();
        assert!((scale - (960.0 + 540.0) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_is_resolution_invariant_and_monotonic() {
        let rect = NormalizedRect::new(0.5, 0.5, 0.2, 0.4);
        let small = normalized_object_scale(&rect, ImageSize::new(640, 480).unwrap()).unwrap();
        let large = normalized_object_scale(&rect, ImageSize::new(1280, 960).unwrap()).unwrap();
        // Doubling the resolution doubles the scale, so scale-relative speed is unchanged
        assert!((large - 2.0 * small).abs() < 1e-9);

        let bigger = NormalizedRect::new(0.5, 0.5, 0.3, 0.4);
        let size = ImageSize::new(640, 480).unwrap();
        assert!(normalized_object_scale(&bigger, size).unwrap() > small);
    }

    #[test]
    fn test_landmarks_scale() {
        let list = LandmarkList::new(vec![
            Landmark::new(0.0, 0.0, 0.0),
            Landmark::new(40.0, 20.0, 5.0),
        ]);
        assert_eq!(landmarks_object_scale(&list), Some(30.0));

        let single = LandmarkList::new(vec![Landmark::new(3.0, 3.0, 0.0)]);
        assert_eq!(landmarks_object_scale(&single), None);
        assert_eq!(landmarks_object_scale(&LandmarkList::default()), None);
    }
}
