//! Timestamped landmark frames and their JSONL stream format.
//!
//! A stream file holds one JSON frame per line. The first line may be a
//! header prefixed with `# `; blank lines and other `#` lines are ignored.
//! A frame without an observation means the detector reported nothing for
//! that timestamp, which is distinct from a frame of all-zero landmarks.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::convert::ImageSize;
use crate::error::ModelError;
use crate::landmark::{LandmarkList, NormalizedLandmarkList};
use crate::rect::{NormalizedRect, Rect};

/// Monotonic timestamp in microseconds.
pub type TimestampUs = u64;

/// Current stream schema version.
pub const SCHEMA_VERSION: &str = "1.0";

/// Landmarks observed in one frame, tagged with their coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "space", rename_all = "snake_case")]
pub enum Observation {
    /// Coordinates relative to image size; requires the frame's image size.
    Normalized { landmarks: NormalizedLandmarkList },
    /// Coordinates in pixels.
    Absolute { landmarks: LandmarkList },
}

impl Observation {
    pub fn len(&self) -> usize {
        match self {
            Observation::Normalized { landmarks } => landmarks.len(),
            Observation::Absolute { landmarks } => landmarks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_normalized(&self) -> bool {
        matches!(self, Observation::Normalized { .. })
    }
}

/// Reference region for object-scale estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "space", rename_all = "snake_case")]
pub enum RegionOfInterest {
    Normalized(NormalizedRect),
    Absolute(Rect),
}

/// A single frame of a landmark stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Monotonic microseconds.
    #[serde(rename = "t")]
    pub timestamp_us: TimestampUs,

    /// Detected landmarks; `None` when nothing was detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<Observation>,

    /// Optional object-scale reference region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roi: Option<RegionOfInterest>,

    /// Image dimensions; required for normalized observations and regions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSize>,
}

impl LandmarkFrame {
    /// Frame carrying an observation.
    pub fn observed(timestamp_us: TimestampUs, observation: Observation) -> Self {
        Self {
            timestamp_us,
            observation: Some(observation),
            roi: None,
            image_size: None,
        }
    }

    /// Frame signalling that nothing was detected.
    pub fn empty(timestamp_us: TimestampUs) -> Self {
        Self {
            timestamp_us,
            observation: None,
            roi: None,
            image_size: None,
        }
    }

    pub fn with_roi(self, roi: RegionOfInterest) -> Self {
        Self {
            roi: Some(roi),
            ..self
        }
    }

    pub fn with_image_size(self, size: ImageSize) -> Self {
        Self {
            image_size: Some(size),
            ..self
        }
    }

    /// Whether this frame carries at least one landmark.
    pub fn has_landmarks(&self) -> bool {
        self.observation.as_ref().is_some_and(|o| !o.is_empty())
    }
}

/// Stream metadata written as the first (`# `-prefixed) line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time the stream was written (RFC 3339).
    pub created_at: String,

    /// Free-form description of the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl StreamHeader {
    pub fn new(created_at: impl Into<String>, source: Option<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            created_at: created_at.into(),
            source,
        }
    }
}

/// Parse frames from JSONL content (one JSON object per line).
pub fn parse_frames(jsonl: &str) -> Result<Vec<LandmarkFrame>, ModelError> {
    jsonl
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(line_no, line)| {
            serde_json::from_str(line).map_err(|e| ModelError::ParseError {
                line: line_no,
                source: e,
            })
        })
        .collect()
}

/// Serialize frames to JSONL format.
pub fn serialize_frames(frames: &[LandmarkFrame]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}

/// A header plus the frames of a stream file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameStream {
    pub header: Option<StreamHeader>,
    pub frames: Vec<LandmarkFrame>,
}

impl FrameStream {
    pub fn new(header: Option<StreamHeader>, frames: Vec<LandmarkFrame>) -> Self {
        Self { header, frames }
    }

    /// Parse stream content.
    ///
    /// A header is only recognised on the first non-blank line; a malformed
    /// one is a parse error rather than a missing header.
    pub fn parse(content: &str) -> Result<Self, ModelError> {
        let first = content
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .find(|(_, line)| !line.is_empty());
        let header = match first {
            Some((line_no, line)) if line.starts_with("# {") => Some(
                serde_json::from_str::<StreamHeader>(&line[2..]).map_err(|e| {
                    ModelError::ParseError {
                        line: line_no,
                        source: e,
                    }
                })?,
            ),
            _ => None,
        };
        let frames = parse_frames(content)?;
        Ok(Self { header, frames })
    }

    /// Load a stream from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ModelError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Render the stream, header first.
    pub fn to_jsonl(&self) -> Result<String, ModelError> {
        let to_err = |e: serde_json::Error| ModelError::SerializeError { source: e };
        let mut output = String::new();
        if let Some(header) = &self.header {
            output.push_str("# ");
            output.push_str(&serde_json::to_string(header).map_err(to_err)?);
            output.push('\n');
        }
        output.push_str(&serialize_frames(&self.frames).map_err(to_err)?);
        Ok(output)
    }

    /// Save the stream to a file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ModelError::IoError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        std::fs::write(path, self.to_jsonl()?).map_err(|e| ModelError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Check the stream against the smoothing contract.
    ///
    /// Reports timestamp regressions, normalized data without an image
    /// size, and landmark-count changes within a tracking run. Returns a
    /// human-readable list of problems; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = vec![];
        let mut prev_ts: Option<TimestampUs> = None;
        let mut run_count: Option<usize> = None;

        for (i, frame) in self.frames.iter().enumerate() {
            if let Some(prev) = prev_ts {
                if frame.timestamp_us < prev {
                    issues.push(format!(
                        "frame {i}: timestamp {} is earlier than {prev}",
                        frame.timestamp_us
                    ));
                }
            }
            prev_ts = Some(frame.timestamp_us);

            let needs_size = frame.observation.as_ref().is_some_and(Observation::is_normalized)
                || matches!(frame.roi, Some(RegionOfInterest::Normalized(_)));
            if needs_size && frame.image_size.is_none() {
                issues.push(format!("frame {i}: normalized data without image_size"));
            }

            match &frame.observation {
                Some(obs) if !obs.is_empty() => match run_count {
                    Some(expected) if expected != obs.len() => issues.push(format!(
                        "frame {i}: landmark count changed from {expected} to {}",
                        obs.len()
                    )),
                    _ => run_count = Some(obs.len()),
                },
                // An empty frame ends the tracking run
                _ => run_count = None,
            }
        }

        issues
    }
}
