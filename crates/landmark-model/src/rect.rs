//! Region types used as object-scale references.

use serde::{Deserialize, Serialize};

use crate::convert::ImageSize;

/// A rotated rectangle in absolute (pixel) units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in radians, clockwise.
    #[serde(default)]
    pub rotation: f64,
}

/// A rotated rectangle normalized to image width/height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
}

impl Rect {
    pub fn new(x_center: f64, y_center: f64, width: f64, height: f64) -> Self {
        Self {
            x_center,
            y_center,
            width,
            height,
            rotation: 0.0,
        }
    }

    pub fn with_rotation(self, rotation: f64) -> Self {
        Self { rotation, ..self }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True if either side is non-positive or not a finite number.
    pub fn is_degenerate(&self) -> bool {
        is_degenerate(self.width, self.height)
    }
}

impl NormalizedRect {
    pub fn new(x_center: f64, y_center: f64, width: f64, height: f64) -> Self {
        Self {
            x_center,
            y_center,
            width,
            height,
            rotation: 0.0,
        }
    }

    pub fn with_rotation(self, rotation: f64) -> Self {
        Self { rotation, ..self }
    }

    pub fn is_degenerate(&self) -> bool {
        is_degenerate(self.width, self.height)
    }

    /// Express this region in pixels for an image of the given size.
    pub fn to_absolute(&self, size: ImageSize) -> Rect {
        let (w, h) = size.as_f64();
        Rect {
            x_center: self.x_center * w,
            y_center: self.y_center * h,
            width: self.width * w,
            height: self.height * h,
            rotation: self.rotation,
        }
    }
}

fn is_degenerate(width: f64, height: f64) -> bool {
    !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_rects() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(Rect::new(0.0, 0.0, 10.0, -1.0).is_degenerate());
        assert!(NormalizedRect::new(0.5, 0.5, f64::NAN, 0.5).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 10.0, 10.0).is_degenerate());
    }

    #[test]
    fn test_normalized_rect_to_absolute() {
        let size = ImageSize::new(640, 480).unwrap();
        let rect = NormalizedRect::new(0.5, 0.5, 0.25, 0.5).with_rotation(0.3);
        let abs = rect.to_absolute(size);
        assert_eq!(abs.x_center, 320.0);
        assert_eq!(abs.y_center, 240.0);
        assert_eq!(abs.width, 160.0);
        assert_eq!(abs.height, 240.0);
        assert_eq!(abs.rotation, 0.3);
    }

    #[test]
    fn test_rotation_defaults_to_zero() {
        let rect: Rect =
            serde_json::from_str(r#"{"x_center":1,"y_center":2,"width":3,"height":4}"#).unwrap();
        assert_eq!(rect.rotation, 0.0);
        assert_eq!(rect.area(), 12.0);
    }
}
