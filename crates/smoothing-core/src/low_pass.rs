//! Exponential smoothing primitives shared by the scalar filters.

use std::f64::consts::PI;

/// Smoothing factor for a first-order low-pass filter.
///
/// `alpha = 1 / (1 + tau / te)` with `tau = 1 / (2π·cutoff)`.
pub fn smoothing_factor(elapsed_secs: f64, cutoff: f64) -> f64 {
    let r = 2.0 * PI * cutoff * elapsed_secs;
    r / (r + 1.0)
}

/// `alpha·value + (1 − alpha)·previous`.
pub fn exponential_smoothing(alpha: f64, value: f64, previous: f64) -> f64 {
    alpha * value + (1.0 - alpha) * previous
}

/// Low-pass filter driven by an externally computed alpha.
#[derive(Debug, Clone, Default)]
pub struct LowPassFilter {
    stored: Option<f64>,
}

impl LowPassFilter {
    pub fn new() -> Self {
        Self { stored: None }
    }

    /// Filter `value`; the first sample passes through regardless of `alpha`.
    pub fn apply_with_alpha(&mut self, value: f64, alpha: f64) -> f64 {
        let stored = match self.stored {
            Some(prev) => exponential_smoothing(alpha, value, prev),
            None => value,
        };
        self.stored = Some(stored);
        stored
    }

    pub fn last_stored(&self) -> Option<f64> {
        self.stored
    }

    pub fn reset(&mut self) {
        self.stored = None;
    }
}
