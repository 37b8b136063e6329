//! Application and filter configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{SmoothingError, SmoothingResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Landmark smoothing settings.
    pub smoothing: SmoothingConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Which scalar filter runs on each landmark channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMethod {
    /// Pass landmarks through unchanged.
    None,
    /// Adaptive-cutoff 1€ filter.
    #[default]
    OneEuro,
    /// Relative velocity filter with a sliding window.
    Velocity,
}

impl FromStr for SmoothingMethod {
    type Err = SmoothingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "one_euro" | "one-euro" | "oneeuro" => Ok(Self::OneEuro),
            "velocity" => Ok(Self::Velocity),
            other => Err(SmoothingError::config(format!(
                "unknown smoothing method '{other}' (expected none, one-euro or velocity)"
            ))),
        }
    }
}

/// 1€ filter tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneEuroParams {
    /// Minimum cutoff frequency in Hz. Lower values reduce jitter but add lag.
    pub min_cutoff: f64,

    /// Speed coefficient. Higher values reduce lag during fast motion.
    pub beta: f64,

    /// Cutoff frequency in Hz for the derivative estimate.
    pub derivative_cutoff: f64,
}

impl Default for OneEuroParams {
    fn default() -> Self {
        Self {
            min_cutoff: 1.0,
            beta: 0.0,
            derivative_cutoff: 1.0,
        }
    }
}

impl OneEuroParams {
    pub fn new(min_cutoff: f64, beta: f64, derivative_cutoff: f64) -> SmoothingResult<Self> {
        let params = Self {
            min_cutoff,
            beta,
            derivative_cutoff,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> SmoothingResult<()> {
        if !(self.min_cutoff.is_finite() && self.min_cutoff > 0.0) {
            return Err(SmoothingError::config(format!(
                "min_cutoff must be > 0, got {}",
                self.min_cutoff
            )));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(SmoothingError::config(format!(
                "beta must be >= 0, got {}",
                self.beta
            )));
        }
        if !(self.derivative_cutoff.is_finite() && self.derivative_cutoff > 0.0) {
            return Err(SmoothingError::config(format!(
                "derivative_cutoff must be > 0, got {}",
                self.derivative_cutoff
            )));
        }
        Ok(())
    }
}

/// Relative velocity filter tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityParams {
    /// Number of past samples used to estimate velocity.
    pub window_size: usize,

    /// Higher values make the filter follow fast motion more closely.
    pub velocity_scale: f64,
}

impl Default for VelocityParams {
    fn default() -> Self {
        Self {
            window_size: 5,
            velocity_scale: 10.0,
        }
    }
}

impl VelocityParams {
    pub fn validate(&self) -> SmoothingResult<()> {
        if self.window_size == 0 {
            return Err(SmoothingError::config("window_size must be at least 1"));
        }
        if !(self.velocity_scale.is_finite() && self.velocity_scale > 0.0) {
            return Err(SmoothingError::config(format!(
                "velocity_scale must be > 0, got {}",
                self.velocity_scale
            )));
        }
        Ok(())
    }
}

/// Landmark smoothing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Active filter.
    pub method: SmoothingMethod,

    /// Parameters used when `method` is `one_euro`.
    pub one_euro: OneEuroParams,

    /// Parameters used when `method` is `velocity`.
    pub velocity: VelocityParams,

    /// Object scales below this are treated as absent.
    pub min_allowed_object_scale: f64,

    /// Ignore object scale entirely; velocities are measured in raw units.
    pub disable_value_scaling: bool,

    /// Filter visibility/presence with the shared parameters (unscaled).
    /// When false they are copied through.
    pub filter_confidence: bool,

    /// Estimate object scale from the landmarks' bounding box when no
    /// region of interest accompanies a frame.
    pub scale_from_landmarks: bool,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            method: SmoothingMethod::OneEuro,
            one_euro: OneEuroParams::default(),
            velocity: VelocityParams::default(),
            min_allowed_object_scale: 1e-6,
            disable_value_scaling: false,
            filter_confidence: true,
            scale_from_landmarks: false,
        }
    }
}

impl SmoothingConfig {
    /// Config that runs the 1€ filter with the given parameters.
    pub fn one_euro(params: OneEuroParams) -> Self {
        Self {
            method: SmoothingMethod::OneEuro,
            one_euro: params,
            ..Self::default()
        }
    }

    /// Config that runs the relative velocity filter.
    pub fn velocity(params: VelocityParams) -> Self {
        Self {
            method: SmoothingMethod::Velocity,
            velocity: params,
            ..Self::default()
        }
    }

    /// Config that passes landmarks through unchanged.
    pub fn passthrough() -> Self {
        Self {
            method: SmoothingMethod::None,
            ..Self::default()
        }
    }

    /// Apply a per-session `min_cutoff`/`beta` override.
    ///
    /// Switches the method to 1€; the derivative cutoff keeps its configured value.
    pub fn with_one_euro_override(self, min_cutoff: f64, beta: f64) -> Self {
        Self {
            method: SmoothingMethod::OneEuro,
            one_euro: OneEuroParams {
                min_cutoff,
                beta,
                ..self.one_euro
            },
            ..self
        }
    }

    pub fn validate(&self) -> SmoothingResult<()> {
        match self.method {
            SmoothingMethod::None => {}
            SmoothingMethod::OneEuro => self.one_euro.validate()?,
            SmoothingMethod::Velocity => self.velocity.validate()?,
        }
        if !(self.min_allowed_object_scale.is_finite() && self.min_allowed_object_scale >= 0.0) {
            return Err(SmoothingError::config(format!(
                "min_allowed_object_scale must be >= 0, got {}",
                self.min_allowed_object_scale
            )));
        }
        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "lmsmooth=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!(path = %config_path.display(), error = %e, "Failed to load config");
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> SmoothingResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.smoothing.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> SmoothingResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path, creating parent directories.
    pub fn save_to(&self, path: impl AsRef<Path>) -> SmoothingResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("lmsmooth").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SmoothingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.method, SmoothingMethod::OneEuro);
        assert_eq!(config.one_euro.derivative_cutoff, 1.0);
    }

    #[test]
    fn test_one_euro_rejects_non_positive_cutoffs() {
        assert!(OneEuroParams::new(0.0, 0.0, 1.0).is_err());
        assert!(OneEuroParams::new(1.0, 0.0, -1.0).is_err());
        assert!(OneEuroParams::new(1.0, -0.1, 1.0).is_err());
        assert!(OneEuroParams::new(f64::NAN, 0.0, 1.0).is_err());
        assert!(OneEuroParams::new(0.5, 0.0, 1.0).is_ok());
    }

    #[test]
    fn test_velocity_rejects_empty_window() {
        let config = SmoothingConfig::velocity(VelocityParams {
            window_size: 0,
            velocity_scale: 10.0,
        });
        assert!(matches!(
            config.validate(),
            Err(SmoothingError::Config { .. })
        ));
    }

    #[test]
    fn test_passthrough_ignores_filter_params() {
        let mut config = SmoothingConfig::passthrough();
        config.one_euro.min_cutoff = -1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_one_euro_override_keeps_derivative_cutoff() {
        let mut base = SmoothingConfig::velocity(VelocityParams::default());
        base.one_euro.derivative_cutoff = 2.5;
        let config = base.with_one_euro_override(0.05, 80.0);
        assert_eq!(config.method, SmoothingMethod::OneEuro);
        assert_eq!(config.one_euro.min_cutoff, 0.05);
        assert_eq!(config.one_euro.beta, 80.0);
        assert_eq!(config.one_euro.derivative_cutoff, 2.5);
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("one-euro".parse::<SmoothingMethod>().unwrap(), SmoothingMethod::OneEuro);
        assert_eq!("VELOCITY".parse::<SmoothingMethod>().unwrap(), SmoothingMethod::Velocity);
        assert_eq!("none".parse::<SmoothingMethod>().unwrap(), SmoothingMethod::None);
        assert!("kalman".parse::<SmoothingMethod>().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let raw = r#"{"smoothing":{"method":"velocity","velocity":{"window_size":3,"velocity_scale":4.0}}}"#;
        let parsed: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.smoothing.method, SmoothingMethod::Velocity);
        assert_eq!(parsed.smoothing.velocity.window_size, 3);
        assert!(parsed.smoothing.filter_confidence);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = std::env::temp_dir().join("lmsmooth_test_config");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.smoothing = config.smoothing.with_one_euro_override(0.2, 3.0);
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_from_rejects_invalid_params() {
        let dir = std::env::temp_dir().join("lmsmooth_test_config_invalid");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(
            &path,
            r#"{"smoothing":{"one_euro":{"min_cutoff":0.0,"beta":0.0,"derivative_cutoff":1.0}}}"#,
        )
        .unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(SmoothingError::Config { .. })
        ));

        std::fs::remove_dir_all(&dir).ok();
    }
}
