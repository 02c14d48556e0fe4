//! Locomotion tuning
//!
//! Every value is fixed for the lifetime of a [`Locomotion`](super::Locomotion);
//! it is validated once at construction.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use showdown_core::{Keyframe, ResponseCurve};
use showdown_physics::MapLayers;

use crate::ConfigError;

/// Smallest duration accepted for acceleration, deceleration and dash timing
pub const MIN_DURATION: f32 = 0.01;

/// Locomotion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Top ground speed in meters per second
    pub movement_speed: f32,
    /// Input smoothing time while grounded
    pub ground_movement_smoothing: f32,
    /// Input smoothing time while airborne
    pub air_movement_smoothing: f32,

    /// Speed ramp while input is held, sampled over `[0, 1]`
    pub acceleration_curve: ResponseCurve,
    /// Seconds to run through the acceleration curve
    pub acceleration_duration: f32,
    /// Speed falloff after input is released, sampled over `[0, 1]`
    pub deceleration_curve: ResponseCurve,
    /// Seconds to run through the deceleration curve
    pub deceleration_duration: f32,

    /// Upward velocity applied by a jump
    pub jump_force: f32,
    /// How long a jump press is remembered
    pub jump_buffer_time: f32,
    /// How long after leaving the ground a jump is still accepted
    pub jump_coyote_time: f32,

    /// Dash speed at the start of a dash
    pub dash_force: f32,
    /// Dash length in seconds
    pub dash_duration: f32,
    /// Dash speed multiplier over the dash, sampled over `[0, 1]`
    pub dash_stopping_curve: ResponseCurve,

    /// Base downward speed of a ground dash
    pub ground_dash_force: f32,

    /// Layers treated as map geometry
    pub map_layers: MapLayers,
    /// Full size of the ground check box
    pub ground_check_size: Vec3,
    /// Ground check box center relative to the character's feet
    pub ground_check_offset: Vec3,
    /// Full size of the ceiling check box
    pub ceil_check_size: Vec3,
    /// Ceiling check box center relative to the character's feet
    pub ceil_check_offset: Vec3,

    /// Steepest ground (degrees) that still counts as walkable
    pub slope_angle_limit: f32,

    /// Vertical acceleration (negative is down)
    pub gravity: f32,
    /// Gravity stops accumulating once vertical velocity reaches this value
    pub gravity_clamp: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            movement_speed: 9.0,
            ground_movement_smoothing: 0.065,
            air_movement_smoothing: 0.15,
            acceleration_curve: ResponseCurve::from_keys(vec![
                Keyframe::with_tangents(0.0, 0.0, 2.0, 2.0),
                Keyframe::new(1.0, 1.0),
            ])
            .unwrap_or_else(|_| ResponseCurve::linear(0.0, 1.0)),
            acceleration_duration: 0.2,
            deceleration_curve: ResponseCurve::ease_in_out(1.0, 0.0),
            deceleration_duration: 0.25,
            jump_force: 8.0,
            jump_buffer_time: 0.1,
            jump_coyote_time: 0.1,
            dash_force: 24.0,
            dash_duration: 0.3,
            dash_stopping_curve: ResponseCurve::ease_in_out(1.0, 0.0),
            ground_dash_force: 20.0,
            map_layers: MapLayers::default(),
            ground_check_size: Vec3::new(0.6, 0.2, 0.6),
            ground_check_offset: Vec3::ZERO,
            ceil_check_size: Vec3::new(0.6, 0.2, 0.6),
            ceil_check_offset: Vec3::new(0.0, 1.8, 0.0),
            slope_angle_limit: 60.0,
            gravity: -18.0,
            gravity_clamp: -40.0,
        }
    }
}

impl LocomotionConfig {
    /// Check every value for a usable range
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_duration("acceleration_duration", self.acceleration_duration)?;
        check_duration("deceleration_duration", self.deceleration_duration)?;
        check_duration("dash_duration", self.dash_duration)?;

        check_non_negative("movement_speed", self.movement_speed)?;
        check_non_negative("ground_movement_smoothing", self.ground_movement_smoothing)?;
        check_non_negative("air_movement_smoothing", self.air_movement_smoothing)?;
        check_non_negative("jump_buffer_time", self.jump_buffer_time)?;
        check_non_negative("jump_coyote_time", self.jump_coyote_time)?;
        check_non_negative("ground_dash_force", self.ground_dash_force)?;

        for (name, value) in [
            ("jump_force", self.jump_force),
            ("dash_force", self.dash_force),
            ("gravity", self.gravity),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }

        if !(0.0..=90.0).contains(&self.slope_angle_limit) {
            return Err(ConfigError::SlopeLimit(self.slope_angle_limit));
        }

        if !self.gravity_clamp.is_finite() || self.gravity_clamp > 0.0 {
            return Err(ConfigError::GravityClamp(self.gravity_clamp));
        }

        for (name, size) in [
            ("ground_check_size", self.ground_check_size),
            ("ceil_check_size", self.ceil_check_size),
        ] {
            if !size.is_finite() || size.min_element() <= 0.0 {
                return Err(ConfigError::CheckBox(name));
            }
        }

        Ok(())
    }
}

fn check_duration(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < MIN_DURATION {
        return Err(ConfigError::Duration { name, value });
    }
    Ok(())
}

fn check_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite(name));
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}
