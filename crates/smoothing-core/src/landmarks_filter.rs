//! Lockstep filtering of landmark sets.
//!
//! A [`LandmarksFilter`] owns one scalar filter per (landmark, channel)
//! pair, stored in a flat array that is sized by the first landmark set it
//! sees. Later sets must have the same number of landmarks until the filter
//! is reset.
//!
//! Positional channels (`x`, `y`, `z`) are speed-normalized by the object
//! scale. Confidence channels (`visibility`, `presence`) are filtered with
//! the same parameters but never scaled.

use lmsmooth_common::config::{SmoothingConfig, SmoothingMethod};
use lmsmooth_common::error::{SmoothingError, SmoothingResult};
use lmsmooth_landmark_model::frame::TimestampUs;
use lmsmooth_landmark_model::landmark::{Landmark, LandmarkList};

use crate::object_scale::landmarks_object_scale;
use crate::one_euro::OneEuroFilter;
use crate::velocity::RelativeVelocityFilter;

/// A filtered component of a landmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    X,
    Y,
    Z,
    Visibility,
    Presence,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::X,
        Channel::Y,
        Channel::Z,
        Channel::Visibility,
        Channel::Presence,
    ];

    /// Number of channels per landmark.
    pub const COUNT: usize = Self::ALL.len();

    /// Whether object-scale normalization applies to this channel.
    pub fn is_positional(self) -> bool {
        matches!(self, Channel::X | Channel::Y | Channel::Z)
    }

    /// Value of this channel; positional channels are always present.
    pub fn read(self, landmark: &Landmark) -> Option<f64> {
        match self {
            Channel::X => Some(landmark.x),
            Channel::Y => Some(landmark.y),
            Channel::Z => Some(landmark.z),
            Channel::Visibility => landmark.visibility,
            Channel::Presence => landmark.presence,
        }
    }

    /// Store `value`; `None` is ignored for positional channels.
    pub fn write(self, landmark: &mut Landmark, value: Option<f64>) {
        match (self, value) {
            (Channel::X, Some(v)) => landmark.x = v,
            (Channel::Y, Some(v)) => landmark.y = v,
            (Channel::Z, Some(v)) => landmark.z = v,
            (Channel::Visibility, v) => landmark.visibility = v,
            (Channel::Presence, v) => landmark.presence = v,
            _ => {}
        }
    }
}

/// Scalar filter for one channel of one landmark.
#[derive(Debug, Clone)]
enum ChannelFilter {
    OneEuro(OneEuroFilter),
    Velocity(RelativeVelocityFilter),
}

impl ChannelFilter {
    /// `None` when the configured method does no filtering.
    fn for_config(config: &SmoothingConfig) -> Option<Self> {
        match config.method {
            SmoothingMethod::None => None,
            SmoothingMethod::OneEuro => Some(Self::OneEuro(OneEuroFilter::from_validated(
                config.one_euro,
            ))),
            SmoothingMethod::Velocity => Some(Self::Velocity(
                RelativeVelocityFilter::from_validated(config.velocity),
            )),
        }
    }

    fn filter(
        &mut self,
        value: f64,
        timestamp_us: TimestampUs,
        scale: Option<f64>,
    ) -> SmoothingResult<f64> {
        match self {
            Self::OneEuro(f) => f.filter(value, timestamp_us, scale),
            Self::Velocity(f) => f.filter(value, timestamp_us, scale),
        }
    }

    fn filter_confidence(
        &mut self,
        value: Option<f64>,
        timestamp_us: TimestampUs,
    ) -> SmoothingResult<Option<f64>> {
        match value {
            Some(v) => self.filter(v, timestamp_us, None).map(Some),
            None => {
                // Restart this channel when the value comes back
                self.reset();
                Ok(None)
            }
        }
    }

    fn reset(&mut self) {
        match self {
            Self::OneEuro(f) => f.reset(),
            Self::Velocity(f) => f.reset(),
        }
    }
}

/// Filters allocated for an established landmark count.
#[derive(Debug, Clone)]
struct FilterBank {
    landmark_count: usize,
    /// One entry per landmark, or empty for pass-through.
    filters: Vec<[ChannelFilter; Channel::COUNT]>,
    /// Output of the most recent apply.
    last_output: Vec<Landmark>,
}

impl FilterBank {
    fn new(config: &SmoothingConfig, landmark_count: usize) -> Self {
        let filters = match ChannelFilter::for_config(config) {
            Some(proto) => vec![std::array::from_fn(|_| proto.clone()); landmark_count],
            None => Vec::new(),
        };
        Self {
            landmark_count,
            filters,
            last_output: Vec::with_capacity(landmark_count),
        }
    }

    fn remember(&mut self, output: &LandmarkList) {
        self.last_output.clear();
        self.last_output.extend_from_slice(&output.landmarks);
    }
}

/// Stateful smoother for one stream of landmark sets.
///
/// Not internally synchronized: use one instance per tracked subject.
#[derive(Debug, Clone)]
pub struct LandmarksFilter {
    config: SmoothingConfig,
    bank: Option<FilterBank>,
    last_timestamp_us: Option<TimestampUs>,
    /// Set by the first apply; configuration is frozen from then on.
    locked: bool,
}

impl LandmarksFilter {
    /// Create a filter, failing fast on invalid configuration.
    pub fn new(config: SmoothingConfig) -> SmoothingResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bank: None,
            last_timestamp_us: None,
            locked: false,
        })
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Replace the configuration. Only allowed before the first apply.
    pub fn set_config(&mut self, config: SmoothingConfig) -> SmoothingResult<()> {
        if self.locked {
            return Err(SmoothingError::ConfigLocked);
        }
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Landmark count established by the first set since the last reset.
    pub fn landmark_count(&self) -> Option<usize> {
        self.bank.as_ref().map(|b| b.landmark_count)
    }

    pub fn is_tracking(&self) -> bool {
        self.bank.is_some()
    }

    pub fn last_timestamp_us(&self) -> Option<TimestampUs> {
        self.last_timestamp_us
    }

    /// Filter `input` observed at `timestamp_us`.
    ///
    /// An empty input resets the filter and yields an empty set.
    pub fn apply(
        &mut self,
        input: &LandmarkList,
        timestamp_us: TimestampUs,
        object_scale: Option<f64>,
    ) -> SmoothingResult<LandmarkList> {
        let mut out = LandmarkList::with_capacity(input.len());
        self.apply_into(input, timestamp_us, object_scale, &mut out)?;
        Ok(out)
    }

    /// Filter an optional observation.
    ///
    /// `None` or an empty set means nothing was detected: the filter resets
    /// and no output is produced for this timestamp.
    pub fn apply_observation(
        &mut self,
        input: Option<&LandmarkList>,
        timestamp_us: TimestampUs,
        object_scale: Option<f64>,
    ) -> SmoothingResult<Option<LandmarkList>> {
        match input {
            Some(landmarks) if !landmarks.is_empty() => self
                .apply(landmarks, timestamp_us, object_scale)
                .map(Some),
            _ => {
                self.reset();
                Ok(None)
            }
        }
    }

    /// Like [`apply`](Self::apply), writing into `out` and reusing its buffer.
    ///
    /// On error nothing is mutated and `out` is left untouched.
    pub fn apply_into(
        &mut self,
        input: &LandmarkList,
        timestamp_us: TimestampUs,
        object_scale: Option<f64>,
        out: &mut LandmarkList,
    ) -> SmoothingResult<()> {
        if input.is_empty() {
            self.reset();
            out.landmarks.clear();
            return Ok(());
        }

        if let Some(previous) = self.last_timestamp_us {
            if timestamp_us < previous {
                return Err(SmoothingError::non_monotonic(previous, timestamp_us));
            }
        }

        if let Some(bank) = &self.bank {
            if bank.landmark_count != input.len() {
                return Err(SmoothingError::count_mismatch(
                    bank.landmark_count,
                    input.len(),
                ));
            }
            // Zero elapsed time: repeat the previous output, state untouched
            if self.last_timestamp_us == Some(timestamp_us) {
                out.landmarks.clear();
                out.landmarks.extend_from_slice(&bank.last_output);
                return Ok(());
            }
        }

        let scale = self.resolve_scale(input, object_scale);
        let filter_confidence = self.config.filter_confidence;
        self.locked = true;
        self.last_timestamp_us = Some(timestamp_us);

        let config = &self.config;
        let bank = self.bank.get_or_insert_with(|| {
            tracing::debug!(
                landmarks = input.len(),
                method = ?config.method,
                "Allocating landmark filters"
            );
            FilterBank::new(config, input.len())
        });

        out.landmarks.clear();
        if bank.filters.is_empty() {
            out.landmarks.extend_from_slice(&input.landmarks);
            bank.remember(out);
            return Ok(());
        }

        for (lm, filters) in input.iter().zip(bank.filters.iter_mut()) {
            let mut filtered = *lm;
            for (&channel, filter) in Channel::ALL.iter().zip(filters.iter_mut()) {
                let value = channel.read(lm);
                let smoothed = if channel.is_positional() {
                    value
                        .map(|v| filter.filter(v, timestamp_us, scale))
                        .transpose()?
                } else if filter_confidence {
                    filter.filter_confidence(value, timestamp_us)?
                } else {
                    value
                };
                channel.write(&mut filtered, smoothed);
            }
            out.landmarks.push(filtered);
        }

        bank.remember(out);
        Ok(())
    }

    /// Drop all filter history. Configuration is preserved.
    ///
    /// The next set becomes the initial sample and may have any size.
    pub fn reset(&mut self) {
        if self.bank.is_some() {
            tracing::debug!("Resetting landmark filters");
        }
        self.bank = None;
        self.last_timestamp_us = None;
    }

    /// Object scale to normalize speeds with, or `None` to skip normalization.
    fn resolve_scale(&self, input: &LandmarkList, object_scale: Option<f64>) -> Option<f64> {
        if self.config.disable_value_scaling {
            return None;
        }

        let candidate = match object_scale {
            Some(scale) => Some(scale),
            None if self.config.scale_from_landmarks => landmarks_object_scale(input),
            None => None,
        }?;

        if candidate.is_finite()
            && candidate > 0.0
            && candidate >= self.config.min_allowed_object_scale
        {
            Some(candidate)
        } else {
            tracing::debug!(scale = candidate, "Ignoring degenerate object scale");
            None
        }
    }
}
