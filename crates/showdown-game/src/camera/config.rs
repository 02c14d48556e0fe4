//! Camera configuration

use serde::{Deserialize, Serialize};
use showdown_core::{Keyframe, ResponseCurve};

use crate::ConfigError;

/// Camera feedback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Field of view at rest, in degrees
    pub rest_fov: f32,
    /// Extra field of view per meter per second of horizontal speed
    pub fov_speed_factor: f32,
    /// How quickly the field of view follows its target
    pub fov_rate: f32,
    /// Roll smoothing time
    pub tilt_smoothing: f32,
    /// Roll in degrees at full strafe
    pub tilt_amount: f32,
    /// Roll in degrees of the walking bob
    pub bobbing_amount: f32,
    /// Walking bob frequency
    pub bobbing_speed: f32,
    /// Pitch dip in degrees when jumping
    pub jump_bob_amount: f32,
    /// Length of the jump dip in seconds
    pub jump_bob_time: f32,
    /// Jump dip shape over `[0, 1]`
    pub jump_bob_curve: ResponseCurve,
    /// How quickly the speedlines fade in and out
    pub speedlines_rate: f32,
    /// Largest pitch either way, in degrees
    pub pitch_limit: f32,
    /// Eye height above the character's feet
    pub eye_height: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            rest_fov: 60.0,
            fov_speed_factor: 2.5,
            fov_rate: 3.0,
            tilt_smoothing: 0.15,
            tilt_amount: 2.5,
            bobbing_amount: 2.5,
            bobbing_speed: 15.0,
            jump_bob_amount: 7.0,
            jump_bob_time: 0.2,
            jump_bob_curve: ResponseCurve::from_keys(vec![
                Keyframe::new(0.0, 0.0),
                Keyframe::new(0.3, 1.0),
                Keyframe::new(1.0, 0.0),
            ])
            .unwrap_or_else(|_| ResponseCurve::constant(0.0)),
            speedlines_rate: 2.0,
            pitch_limit: 90.0,
            eye_height: 1.6,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraConfig {
    /// Check every value for a usable range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.jump_bob_time.is_finite() || self.jump_bob_time < crate::locomotion::MIN_DURATION {
            return Err(ConfigError::Duration {
                name: "jump_bob_time",
                value: self.jump_bob_time,
            });
        }

        for (name, value) in [
            ("rest_fov", self.rest_fov),
            ("fov_speed_factor", self.fov_speed_factor),
            ("fov_rate", self.fov_rate),
            ("tilt_smoothing", self.tilt_smoothing),
            ("speedlines_rate", self.speedlines_rate),
            ("near", self.near),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }

        for (name, value) in [
            ("tilt_amount", self.tilt_amount),
            ("bobbing_amount", self.bobbing_amount),
            ("bobbing_speed", self.bobbing_speed),
            ("jump_bob_amount", self.jump_bob_amount),
            ("eye_height", self.eye_height),
            ("far", self.far),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }

        if !(0.0..=90.0).contains(&self.pitch_limit) {
            return Err(ConfigError::PitchLimit(self.pitch_limit));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_config_is_valid() {
        let config = CameraConfig::default();
        assert!(config.validate().is_ok());
        // The dip returns to neutral at the end of its window
        assert_eq!(config.jump_bob_curve.evaluate(1.0), 0.0);
    }

    #[test]
    fn test_rejects_bad_camera_config() {
        let config = CameraConfig {
            jump_bob_time: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Duration { .. })));

        let config = CameraConfig {
            pitch_limit: 95.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::PitchLimit(_))));

        let config = CameraConfig {
            fov_rate: -1.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Negative { .. })));
    }
}
