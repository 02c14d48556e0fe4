//! Per-character locomotion state

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Input consumed by one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementInput {
    /// Raw move axes in `[-1, 1]²` (x = strafe, y = forward)
    pub move_axes: Vec2,
    /// Jump was pressed since the last tick
    pub jump_pressed: bool,
    /// Dash was pressed since the last tick
    pub dash_pressed: bool,
    /// Ground dash was pressed since the last tick
    pub ground_dash_pressed: bool,
}

impl MovementInput {
    /// Input that only moves
    pub fn moving(move_axes: Vec2) -> Self {
        Self {
            move_axes,
            ..Default::default()
        }
    }

    /// Whether the move axes are non-zero
    pub fn has_movement(&self) -> bool {
        self.move_axes.length() > 0.0
    }
}

/// What the ground probe found this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundingInfo {
    pub grounded: bool,
    /// Surface normal, up while airborne
    pub ground_normal: Vec3,
    /// Angle between up and the normal in degrees, rounded to 0.1
    pub ground_angle: f32,
}

impl GroundingInfo {
    /// Flat and airborne
    pub const AIRBORNE: GroundingInfo = GroundingInfo {
        grounded: false,
        ground_normal: Vec3::Y,
        ground_angle: 0.0,
    };
}

impl Default for GroundingInfo {
    fn default() -> Self {
        Self::AIRBORNE
    }
}

/// Acceleration and deceleration ramps
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccelerationState {
    pub acceleration_time: f32,
    pub deceleration_time: f32,
    /// Acceleration curve sampled at `acceleration_time / duration`
    pub acceleration_value: f32,
    /// Deceleration curve sampled at `deceleration_time / duration`
    pub deceleration_value: f32,
    pub accelerating: bool,
}

/// Jump grace windows; both count down and never go below zero
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JumpState {
    pub jump_buffer_timer: f32,
    pub jump_coyote_timer: f32,
}

impl JumpState {
    /// A jump goes off when both windows are open
    pub fn can_jump(&self) -> bool {
        self.jump_buffer_timer > 0.0 && self.jump_coyote_timer > 0.0
    }
}

/// Dash progress
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashState {
    /// Seconds into the dash, within `[0, dash_duration]`
    pub dash_time: f32,
    /// Stopping curve sampled at `dash_time / dash_duration`
    pub dash_value: f32,
    /// `dash_time < dash_duration`
    pub dashing: bool,
    /// Captured when the dash starts
    pub dash_direction: Vec3,
}

/// High-level movement state, recomputed every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocomotionState {
    #[default]
    Idle,
    Move,
    Dash,
    IdleAir,
    MoveAir,
}

impl LocomotionState {
    /// Classify from dash, grounding, and input, in that order of precedence
    pub fn classify(dashing: bool, grounded: bool, has_movement: bool) -> Self {
        match (dashing, grounded, has_movement) {
            (true, _, _) => LocomotionState::Dash,
            (false, true, false) => LocomotionState::Idle,
            (false, true, true) => LocomotionState::Move,
            (false, false, false) => LocomotionState::IdleAir,
            (false, false, true) => LocomotionState::MoveAir,
        }
    }

    /// Whether this is one of the airborne states
    pub fn is_airborne(&self) -> bool {
        matches!(self, LocomotionState::IdleAir | LocomotionState::MoveAir)
    }
}

/// Values an animator needs each frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationParams {
    pub dir_x: f32,
    pub dir_y: f32,
    pub in_air: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_precedence() {
        assert_eq!(LocomotionState::classify(true, true, false), LocomotionState::Dash);
        assert_eq!(LocomotionState::classify(true, false, true), LocomotionState::Dash);
        assert_eq!(LocomotionState::classify(false, true, false), LocomotionState::Idle);
        assert_eq!(LocomotionState::classify(false, true, true), LocomotionState::Move);
        assert_eq!(LocomotionState::classify(false, false, false), LocomotionState::IdleAir);
        assert_eq!(LocomotionState::classify(false, false, true), LocomotionState::MoveAir);
    }

    #[test]
    fn test_jump_window() {
        let mut jump = JumpState::default();
        assert!(!jump.can_jump());
        jump.jump_buffer_timer = 0.1;
        assert!(!jump.can_jump());
        jump.jump_coyote_timer = 0.05;
        assert!(jump.can_jump());
    }
}
