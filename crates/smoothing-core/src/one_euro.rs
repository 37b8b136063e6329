//! An implementation of the [1€ Filter] for a single scalar channel.
//!
//! The cutoff frequency adapts to the (low-passed) speed of the signal:
//! slow motion gets heavy smoothing, fast motion gets little lag.
//! Speed can be divided by an object scale so the same tuning works for
//! large and small subjects alike.
//!
//! [1€ Filter]: https://gery.casiez.net/1euro/

use lmsmooth_common::clock::elapsed_secs;
use lmsmooth_common::config::OneEuroParams;
use lmsmooth_common::error::{SmoothingError, SmoothingResult};
use lmsmooth_landmark_model::frame::TimestampUs;

use crate::low_pass::{exponential_smoothing, smoothing_factor};

/// Filter lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FilterState {
    /// No sample seen since construction or the last reset.
    #[default]
    Uninitialized,
    Tracking(Tracking),
}

/// History kept between samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tracking {
    /// Raw value of the previous sample.
    pub last_raw: f64,
    /// Output of the previous sample.
    pub last_filtered: f64,
    /// Low-passed, scale-normalized derivative (units per second).
    pub derivative: f64,
    pub last_timestamp_us: TimestampUs,
}

/// 1€ filter for one scalar channel.
#[derive(Debug, Clone)]
pub struct OneEuroFilter {
    params: OneEuroParams,
    state: FilterState,
}

impl OneEuroFilter {
    /// Create a filter, rejecting non-positive cutoffs and negative beta.
    pub fn new(params: OneEuroParams) -> SmoothingResult<Self> {
        params.validate()?;
        Ok(Self::from_validated(params))
    }

    pub(crate) fn from_validated(params: OneEuroParams) -> Self {
        Self {
            params,
            state: FilterState::Uninitialized,
        }
    }

    pub fn params(&self) -> &OneEuroParams {
        &self.params
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, FilterState::Tracking(_))
    }

    /// Filter `raw` observed at `timestamp_us`.
    ///
    /// `scale`, when present and positive, divides the derivative so speed is
    /// measured in object sizes per second. The first sample passes through.
    /// A repeated timestamp returns the previous output and leaves state alone.
    pub fn filter(
        &mut self,
        raw: f64,
        timestamp_us: TimestampUs,
        scale: Option<f64>,
    ) -> SmoothingResult<f64> {
        let prev = match self.state {
            FilterState::Uninitialized => {
                self.state = FilterState::Tracking(Tracking {
                    last_raw: raw,
                    last_filtered: raw,
                    derivative: 0.0,
                    last_timestamp_us: timestamp_us,
                });
                return Ok(raw);
            }
            FilterState::Tracking(prev) => prev,
        };

        let elapsed = elapsed_secs(prev.last_timestamp_us, timestamp_us)
            .ok_or_else(|| SmoothingError::non_monotonic(prev.last_timestamp_us, timestamp_us))?;
        if elapsed == 0.0 {
            return Ok(prev.last_filtered);
        }

        let value_scale = match scale {
            Some(s) if s.is_finite() && s > 0.0 => 1.0 / s,
            _ => 1.0,
        };

        let dx = (raw - prev.last_raw) * value_scale / elapsed;
        let a_d = smoothing_factor(elapsed, self.params.derivative_cutoff);
        let dx_hat = exponential_smoothing(a_d, dx, prev.derivative);

        let cutoff = self.params.min_cutoff + self.params.beta * dx_hat.abs();
        let a = smoothing_factor(elapsed, cutoff);
        let x_hat = exponential_smoothing(a, raw, prev.last_filtered);

        self.state = FilterState::Tracking(Tracking {
            last_raw: raw,
            last_filtered: x_hat,
            derivative: dx_hat,
            last_timestamp_us: timestamp_us,
        });

        Ok(x_hat)
    }

    pub fn reset(&mut self) {
        self.state = FilterState::Uninitialized;
    }
}
