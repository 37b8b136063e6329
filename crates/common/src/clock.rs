//! Clock and timing utilities for landmark streams.
//!
//! Landmark streams are stamped with monotonic microseconds. This module
//! provides utilities for:
//! - Converting between microseconds and seconds
//! - Measuring elapsed time between samples without underflow
//! - Re-stamping recorded frames at a fixed rate

/// Microseconds per second.
pub const MICROS_PER_SEC: f64 = 1_000_000.0;

/// Convert a microsecond value to seconds.
pub fn micros_to_secs(us: u64) -> f64 {
    us as f64 / MICROS_PER_SEC
}

/// Convert seconds to microseconds.
pub fn secs_to_micros(secs: f64) -> u64 {
    (secs * MICROS_PER_SEC).round() as u64
}

/// Seconds elapsed between two microsecond timestamps.
///
/// Returns `None` if `current_us` is earlier than `previous_us`.
pub fn elapsed_secs(previous_us: u64, current_us: u64) -> Option<f64> {
    current_us
        .checked_sub(previous_us)
        .map(micros_to_secs)
}

/// Current wall-clock time as an RFC 3339 string.
pub fn wall_clock_now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Synthetic fixed-rate clock.
///
/// Used to assign timestamps to recorded frames whose original timing
/// is missing or untrustworthy.
#[derive(Debug, Clone)]
pub struct FrameClock {
    fps: f64,
    next_frame: u64,
}

impl FrameClock {
    /// Create a clock ticking at `fps` frames per second.
    ///
    /// Non-positive rates are clamped to 1 fps.
    pub fn new(fps: f64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { 1.0 };
        Self { fps, next_frame: 0 }
    }

    /// Frame rate of this clock.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Interval between frames in microseconds (rounded).
    pub fn interval_us(&self) -> u64 {
        secs_to_micros(1.0 / self.fps)
    }

    /// Timestamp of frame `index`, computed without accumulating rounding error.
    pub fn timestamp_for_frame(&self, index: u64) -> u64 {
        secs_to_micros(index as f64 / self.fps)
    }

    /// Timestamp for the next frame; advances the clock.
    pub fn next_timestamp(&mut self) -> u64 {
        let ts = self.timestamp_for_frame(self.next_frame);
        self.next_frame += 1;
        ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micros_to_secs_conversion() {
        assert!((micros_to_secs(1_500_000) - 1.5).abs() < 1e-12);
        assert_eq!(secs_to_micros(2.0), 2_000_000);
    }

    #[test]
    fn test_elapsed_secs() {
        assert_eq!(elapsed_secs(1_000_000, 1_000_000), Some(0.0));
        assert!((elapsed_secs(0, 33_333).unwrap() - 0.033333).abs() < 1e-9);
        assert_eq!(elapsed_secs(2, 1), None);
    }

    #[test]
    fn test_frame_clock_30fps() {
        let mut clock = FrameClock::new(30.0);
        assert_eq!(clock.next_timestamp(), 0);
        assert_eq!(clock.next_timestamp(), 33_333);
        assert_eq!(clock.next_timestamp(), 66_667);
        // No drift after a full second
        assert_eq!(clock.timestamp_for_frame(30), 1_000_000);
        assert_eq!(clock.interval_us(), 33_333);
    }

    #[test]
    fn test_frame_clock_rejects_bad_rate() {
        let clock = FrameClock::new(0.0);
        assert_eq!(clock.fps(), 1.0);
        assert_eq!(clock.timestamp_for_frame(2), 2_000_000);
    }

    #[test]
    fn test_wall_clock_is_rfc3339() {
        let now = wall_clock_now();
        assert!(chrono::DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
