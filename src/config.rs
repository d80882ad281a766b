//! Classifier configuration
//!
//! Thresholds are supplied once at construction. They can be built in code,
//! or loaded from a TOML file such as:
//!
//! ```toml
//! touch_slop_px = 8.0
//! swipe_distance_threshold_px = 100.0
//! swipe_velocity_threshold_px_per_sec = 100.0
//! vertical_gate_degrees = 60.0
//!
//! [velocity]
//! horizon_ms = 100
//! assume_stopped_ms = 40
//! ```

use crate::error::GestureError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Touch slop used when the host does not report one (px)
pub const DEFAULT_TOUCH_SLOP_PX: f32 = 8.0;

/// Minimum displacement along the dominant axis for a swipe (px)
pub const SWIPE_DISTANCE_THRESHOLD_PX: f32 = 100.0;

/// Minimum release velocity along the dominant axis for a swipe (px/s)
pub const SWIPE_VELOCITY_THRESHOLD_PX: f32 = 100.0;

/// Movements steeper than this angle from the horizontal axis count as vertical
pub const DEFAULT_VERTICAL_GATE_DEGREES: f64 = 60.0;

/// Velocity estimation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityConfig {
    /// Only samples this recent (relative to the newest) contribute
    pub horizon_ms: u64,
    /// A gap this long between consecutive samples means the finger had stopped.
    /// Must exceed the host's sampling interval, or every swipe reads as zero velocity.
    pub assume_stopped_ms: u64,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            horizon_ms: 100,
            assume_stopped_ms: 40,
        }
    }
}

/// Classifier thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Radius of the tap region (px), normally the host's scaled touch slop
    pub touch_slop_px: f32,
    /// Strict lower bound on swipe displacement (px)
    pub swipe_distance_threshold_px: f32,
    /// Strict lower bound on swipe release velocity (px/s)
    pub swipe_velocity_threshold_px_per_sec: f32,
    /// Angle from the horizontal axis above which motion is vertical
    pub vertical_gate_degrees: f64,
    /// Velocity estimator settings
    #[serde(default)]
    pub velocity: VelocityConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            touch_slop_px: DEFAULT_TOUCH_SLOP_PX,
            swipe_distance_threshold_px: SWIPE_DISTANCE_THRESHOLD_PX,
            swipe_velocity_threshold_px_per_sec: SWIPE_VELOCITY_THRESHOLD_PX,
            vertical_gate_degrees: DEFAULT_VERTICAL_GATE_DEGREES,
            velocity: VelocityConfig::default(),
        }
    }
}

impl ClassifierConfig {
    /// Default thresholds with a host-reported touch slop
    pub fn with_touch_slop(touch_slop_px: f32) -> Self {
        Self {
            touch_slop_px,
            ..Self::default()
        }
    }

    /// Squared tap tolerance compared against squared displacement
    pub fn tap_tolerance_squared_px(&self) -> f32 {
        self.touch_slop_px * self.touch_slop_px
    }

    /// `tan` of the vertical gate angle
    pub fn vertical_gate_tan(&self) -> f64 {
        self.vertical_gate_degrees.to_radians().tan()
    }

    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), GestureError> {
        if !self.touch_slop_px.is_finite() || self.touch_slop_px < 0.0 {
            return Err(GestureError::ConfigError(format!(
                "touch_slop_px must be finite and >= 0, got {}",
                self.touch_slop_px
            )));
        }
        if !self.swipe_distance_threshold_px.is_finite() || self.swipe_distance_threshold_px < 0.0 {
            return Err(GestureError::ConfigError(format!(
                "swipe_distance_threshold_px must be finite and >= 0, got {}",
                self.swipe_distance_threshold_px
            )));
        }
        if !self.swipe_velocity_threshold_px_per_sec.is_finite()
            || self.swipe_velocity_threshold_px_per_sec < 0.0
        {
            return Err(GestureError::ConfigError(format!(
                "swipe_velocity_threshold_px_per_sec must be finite and >= 0, got {}",
                self.swipe_velocity_threshold_px_per_sec
            )));
        }
        if !(self.vertical_gate_degrees > 0.0 && self.vertical_gate_degrees < 90.0) {
            return Err(GestureError::ConfigError(format!(
                "vertical_gate_degrees must be in (0, 90), got {}",
                self.vertical_gate_degrees
            )));
        }
        if self.velocity.horizon_ms == 0 {
            return Err(GestureError::ConfigError("velocity.horizon_ms must be > 0".to_string()));
        }
        if self.velocity.assume_stopped_ms == 0 {
            return Err(GestureError::ConfigError(
                "velocity.assume_stopped_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, GestureError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file
    pub fn load(path: &Path) -> Result<Self, GestureError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<(), GestureError> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, GestureError> {
        toml::to_string_pretty(self).map_err(|e| GestureError::ConfigError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClassifierConfig::default();
        assert_eq!(config.touch_slop_px, 8.0);
        assert_eq!(config.swipe_distance_threshold_px, 100.0);
        assert_eq!(config.swipe_velocity_threshold_px_per_sec, 100.0);
        assert_eq!(config.vertical_gate_degrees, 60.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tap_tolerance_is_squared() {
        let config = ClassifierConfig::with_touch_slop(12.0);
        assert_eq!(config.tap_tolerance_squared_px(), 144.0);
    }

    #[test]
    fn test_vertical_gate_tan() {
        let config = ClassifierConfig::default();
        assert!((config.vertical_gate_tan() - 3f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ClassifierConfig {
            vertical_gate_degrees: 50.0,
            ..ClassifierConfig::with_touch_slop(10.0)
        };
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("touch_slop_px"));
        assert!(toml.contains("[velocity]"));

        let parsed = ClassifierConfig::from_toml_str(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_velocity_section_is_optional() {
        let toml = r#"
            touch_slop_px = 6.0
            swipe_distance_threshold_px = 80.0
            swipe_velocity_threshold_px_per_sec = 120.0
            vertical_gate_degrees = 60.0
        "#;
        let config = ClassifierConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.velocity, VelocityConfig::default());
        assert_eq!(config.swipe_distance_threshold_px, 80.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClassifierConfig::default();
        config.vertical_gate_degrees = 90.0;
        assert!(matches!(config.validate(), Err(GestureError::ConfigError(_))));

        let mut config = ClassifierConfig::default();
        config.touch_slop_px = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = ClassifierConfig::default();
        config.swipe_velocity_threshold_px_per_sec = -1.0;
        assert!(config.validate().is_err());

        let mut config = ClassifierConfig::default();
        config.velocity.horizon_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let result = ClassifierConfig::from_toml_str("touch_slop_px = \"wide\"");
        assert!(matches!(result, Err(GestureError::TomlError(_))));
    }
}
