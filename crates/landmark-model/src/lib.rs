//! lmsmooth Landmark Model
//!
//! Defines the data contracts shared by the smoothing engine and its tools:
//! - **Landmarks:** Ordered, fixed-cardinality point sets with optional confidence
//! - **Regions:** Rectangles used to estimate object scale
//! - **Coordinate spaces:** Conversion between image-normalized and absolute units
//! - **Frames:** Timestamped observations stored as JSONL streams
//!
//! Normalized coordinates are relative to image size (`[0.0, 1.0]` inside the
//! image); absolute coordinates are in pixels, with `z` scaled like `x`.

pub mod convert;
pub mod error;
pub mod frame;
pub mod landmark;
pub mod rect;

pub use convert::*;
pub use error::*;
pub use frame::*;
pub use landmark::*;
pub use rect::*;
