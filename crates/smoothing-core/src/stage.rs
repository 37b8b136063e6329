//! Per-stream smoothing stage.
//!
//! Wraps a [`LandmarksFilter`] with the frame-level contract:
//! - Frames without landmarks reset the filter and produce no output.
//! - Normalized landmarks are converted to absolute units for filtering and
//!   converted back, so output keeps the input's coordinate space.
//! - The optional region of interest supplies the object scale.

use lmsmooth_common::config::SmoothingConfig;
use lmsmooth_common::error::{SmoothingError, SmoothingResult};
use lmsmooth_landmark_model::convert::{
    absolute_to_normalized, normalized_to_absolute_into, ImageSize,
};
use lmsmooth_landmark_model::frame::{LandmarkFrame, Observation, RegionOfInterest};
use lmsmooth_landmark_model::landmark::LandmarkList;

use crate::landmarks_filter::LandmarksFilter;
use crate::object_scale::{normalized_object_scale, object_scale};

/// Counters describing what a stage has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageStats {
    /// Frames handed to [`SmoothingStage::process`].
    pub frames_in: u64,
    /// Frames that produced output.
    pub frames_out: u64,
    /// Resets triggered by frames without landmarks.
    pub resets: u64,
}

/// Smoothing for one landmark stream.
#[derive(Debug, Clone)]
pub struct SmoothingStage {
    filter: LandmarksFilter,
    absolute_in: LandmarkList,
    absolute_out: LandmarkList,
    stats: StageStats,
}

impl SmoothingStage {
    pub fn new(config: SmoothingConfig) -> SmoothingResult<Self> {
        Ok(Self {
            filter: LandmarksFilter::new(config)?,
            absolute_in: LandmarkList::default(),
            absolute_out: LandmarkList::default(),
            stats: StageStats::default(),
        })
    }

    pub fn config(&self) -> &SmoothingConfig {
        self.filter.config()
    }

    /// Replace the configuration before the first frame with landmarks.
    pub fn set_config(&mut self, config: SmoothingConfig) -> SmoothingResult<()> {
        self.filter.set_config(config)
    }

    pub fn filter(&self) -> &LandmarksFilter {
        &self.filter
    }

    pub fn stats(&self) -> StageStats {
        self.stats
    }

    /// Smooth one frame.
    ///
    /// Returns `Ok(None)` when the frame carries no landmarks. The output
    /// frame keeps the input's timestamp, region, and image size.
    pub fn process(&mut self, frame: &LandmarkFrame) -> SmoothingResult<Option<LandmarkFrame>> {
        self.stats.frames_in += 1;
        let timestamp_us = frame.timestamp_us;

        let observation = match &frame.observation {
            Some(obs) if !obs.is_empty() => obs,
            _ => {
                tracing::debug!(timestamp_us, "No landmarks, resetting");
                self.filter.reset();
                self.stats.resets += 1;
                return Ok(None);
            }
        };

        let scale = region_scale(frame)?;

        let smoothed = match observation {
            Observation::Normalized { landmarks } => {
                let size = require_image_size(frame)?;
                normalized_to_absolute_into(landmarks, size, &mut self.absolute_in);
                self.filter
                    .apply_into(&self.absolute_in, timestamp_us, scale, &mut self.absolute_out)?;
                Observation::Normalized {
                    landmarks: absolute_to_normalized(&self.absolute_out, size),
                }
            }
            Observation::Absolute { landmarks } => Observation::Absolute {
                landmarks: self.filter.apply(landmarks, timestamp_us, scale)?,
            },
        };

        self.stats.frames_out += 1;
        Ok(Some(LandmarkFrame {
            timestamp_us,
            observation: Some(smoothed),
            roi: frame.roi,
            image_size: frame.image_size,
        }))
    }

    /// Drop filter history, as if the subject had been lost.
    pub fn reset(&mut self) {
        self.filter.reset();
    }
}

/// Object scale for a frame's region of interest, if any.
fn region_scale(frame: &LandmarkFrame) -> SmoothingResult<Option<f64>> {
    match &frame.roi {
        None => Ok(None),
        Some(RegionOfInterest::Absolute(rect)) => Ok(object_scale(rect)),
        Some(RegionOfInterest::Normalized(rect)) => {
            let size = require_image_size(frame)?;
            Ok(normalized_object_scale(rect, size))
        }
    }
}

fn require_image_size(frame: &LandmarkFrame) -> SmoothingResult<ImageSize> {
    frame.image_size.ok_or(SmoothingError::MissingImageSize {
        timestamp_us: frame.timestamp_us,
    })
}
