//! Relative velocity filter.
//!
//! Exponential smoothing whose alpha grows with the object-relative speed
//! of the signal, estimated over a short window of recent motion. A still
//! signal is held in place; fast motion is followed closely.

use std::collections::VecDeque;

use lmsmooth_common::clock::micros_to_secs;
use lmsmooth_common::config::VelocityParams;
use lmsmooth_common::error::{SmoothingError, SmoothingResult};
use lmsmooth_landmark_model::frame::TimestampUs;

use crate::low_pass::LowPassFilter;

/// Longest gap between samples (30 fps) a window entry may cover before
/// older entries stop contributing to the velocity estimate.
const ASSUMED_MAX_DURATION_US: u64 = 1_000_000 / 30;

#[derive(Debug, Clone, Copy)]
struct WindowElement {
    distance: f64,
    duration_us: u64,
}

#[derive(Debug, Clone, Copy)]
struct Last {
    value: f64,
    timestamp_us: TimestampUs,
}

/// Velocity-adaptive smoother for one scalar channel.
#[derive(Debug, Clone)]
pub struct RelativeVelocityFilter {
    params: VelocityParams,
    last: Option<Last>,
    /// Newest entry first.
    window: VecDeque<WindowElement>,
    low_pass: LowPassFilter,
}

impl RelativeVelocityFilter {
    pub fn new(params: VelocityParams) -> SmoothingResult<Self> {
        params.validate()?;
        Ok(Self::from_validated(params))
    }

    pub(crate) fn from_validated(params: VelocityParams) -> Self {
        Self {
            params,
            last: None,
            window: VecDeque::with_capacity(params.window_size + 1),
            low_pass: LowPassFilter::new(),
        }
    }

    pub fn params(&self) -> &VelocityParams {
        &self.params
    }

    pub fn is_tracking(&self) -> bool {
        self.last.is_some()
    }

    /// Filter `value` observed at `timestamp_us`.
    ///
    /// Same contract as the 1€ filter: first sample passes through, repeated
    /// timestamps return the previous output, earlier timestamps are an error.
    pub fn filter(
        &mut self,
        value: f64,
        timestamp_us: TimestampUs,
        scale: Option<f64>,
    ) -> SmoothingResult<f64> {
        let value_scale = match scale {
            Some(s) if s.is_finite() && s > 0.0 => 1.0 / s,
            _ => 1.0,
        };

        let alpha = match self.last {
            None => 1.0,
            Some(last) if timestamp_us < last.timestamp_us => {
                return Err(SmoothingError::non_monotonic(
                    last.timestamp_us,
                    timestamp_us,
                ));
            }
            Some(last) if timestamp_us == last.timestamp_us => {
                return Ok(self.low_pass.last_stored().unwrap_or(value));
            }
            Some(last) => {
                let distance = value_scale * (value - last.value);
                let duration_us = timestamp_us - last.timestamp_us;

                let mut cumulative_distance = distance;
                let mut cumulative_duration_us = duration_us;
                let max_cumulative_duration_us =
                    (1 + self.window.len() as u64) * ASSUMED_MAX_DURATION_US;
                for el in &self.window {
                    if cumulative_duration_us + el.duration_us > max_cumulative_duration_us {
                        break;
                    }
                    cumulative_distance += el.distance;
                    cumulative_duration_us += el.duration_us;
                }

                let velocity = cumulative_distance / micros_to_secs(cumulative_duration_us);

                self.window.push_front(WindowElement {
                    distance,
                    duration_us,
                });
                if self.window.len() > self.params.window_size {
                    self.window.pop_back();
                }

                1.0 - 1.0 / (1.0 + self.params.velocity_scale * velocity.abs())
            }
        };

        self.last = Some(Last {
            value,
            timestamp_us,
        });
        Ok(self.low_pass.apply_with_alpha(value, alpha))
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.window.clear();
        self.low_pass.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> RelativeVelocityFilter {
        RelativeVelocityFilter::new(VelocityParams::default()).unwrap()
    }

    #[test]
    fn test_rejects_zero_window() {
        let params = VelocityParams {
            window_size: 0,
            velocity_scale: 1.0,
        };
        assert!(RelativeVelocityFilter::new(params).is_err());
    }

    #[test]
    fn test_first_sample_passthrough() {
        let mut f = filter();
        assert_eq!(f.filter(3.5, 0, None).unwrap(), 3.5);
        assert!(f.is_tracking());
    }

    #[test]
    fn test_still_signal_is_held() {
        let mut f = filter();
        f.filter(1.0, 0, None).unwrap();
        assert_eq!(f.filter(1.0, 33_333, None).unwrap(), 1.0);
    }

    #[test]
    fn test_fast_motion_is_followed_closely() {
        let mut slow = filter();
        let mut fast = filter();
        slow.filter(0.0, 0, None).unwrap();
        fast.filter(0.0, 0, None).unwrap();

        let s = slow.filter(0.01, 33_333, None).unwrap();
        let f = fast.filter(10.0, 33_333, None).unwrap();
        assert!(s / 0.01 < f / 10.0, "fast motion should have larger alpha");
        assert!(f > 9.9 && f < 10.0);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut f = RelativeVelocityFilter::new(VelocityParams {
            window_size: 3,
            velocity_scale: 1.0,
        })
        .unwrap();
        for i in 0..10u64 {
            f.filter(i as f64, i * 33_333, None).unwrap();
        }
        assert_eq!(f.window.len(), 3);
    }

    #[test]
    fn test_long_gap_drops_out_of_window() {
        let params = VelocityParams {
            window_size: 5,
            velocity_scale: 1.0,
        };
        let mut gapped = RelativeVelocityFilter::new(params).unwrap();
        let mut regular = RelativeVelocityFilter::new(params).unwrap();

        // Same jump of 10, then a still frame
        gapped.filter(0.0, 0, None).unwrap();
        let gapped_jump = gapped.filter(10.0, 200_000, None).unwrap();
        let gapped_still = gapped.filter(10.0, 233_333, None).unwrap();

        regular.filter(0.0, 0, None).unwrap();
        let regular_jump = regular.filter(10.0, 33_333, None).unwrap();
        let regular_still = regular.filter(10.0, 66_666, None).unwrap();

        // The 200 ms entry exceeds the duration budget: velocity is zero and
        // the output holds still
        assert_eq!(gapped_still, gapped_jump);
        // The 33 ms entry still counts, so the output keeps moving toward 10
        assert!(regular_still > regular_jump);
        assert!(regular_still < 10.0);
    }

    #[test]
    fn test_zero_elapsed_and_backwards() {
        let mut f = filter();
        f.filter(0.0, 0, None).unwrap();
        let a = f.filter(5.0, 10_000, None).unwrap();
        assert_eq!(f.filter(100.0, 10_000, None).unwrap(), a);
        assert!(matches!(
            f.filter(1.0, 5_000, None),
            Err(SmoothingError::NonMonotonicTimestamp { .. })
        ));
    }

    #[test]
    fn test_reset_clears_window() {
        let mut f = filter();
        f.filter(0.0, 0, None).unwrap();
        f.filter(1.0, 33_333, None).unwrap();
        f.reset();
        assert!(!f.is_tracking());
        assert!(f.window.is_empty());
        assert_eq!(f.filter(7.0, 0, None).unwrap(), 7.0);
    }
}
