//! lmsmooth Smoothing Core
//!
//! Removes frame-to-frame jitter from landmark streams while staying
//! responsive to real motion:
//! - **Scalar filters:** 1€ (adaptive cutoff) and relative-velocity smoothing
//! - **Object scale:** size normalization so tuning survives distance/resolution changes
//! - **Landmark filter:** lockstep filtering of every channel of every landmark
//! - **Smoothing stage:** per-stream frame processing with empty-frame resets
//!
//! This crate is pure computation: no I/O and no internal synchronization.
//! One [`LandmarksFilter`] or [`SmoothingStage`] per tracked subject.

pub mod landmarks_filter;
pub mod low_pass;
pub mod object_scale;
pub mod one_euro;
pub mod stage;
pub mod velocity;

pub use landmarks_filter::{Channel, LandmarksFilter};
pub use object_scale::{landmarks_object_scale, normalized_object_scale, object_scale};
pub use one_euro::OneEuroFilter;
pub use stage::SmoothingStage;
pub use velocity::RelativeVelocityFilter;
