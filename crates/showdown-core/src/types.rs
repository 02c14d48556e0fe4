//! Core types used throughout Showdown

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Planar facing of a character, as a yaw angle around +Y.
///
/// Forward is -Z at yaw 0, matching the camera convention.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    /// Yaw in radians
    pub yaw: f32,
}

impl Orientation {
    /// Create an orientation from a yaw in radians
    pub fn from_yaw(yaw: f32) -> Self {
        Self { yaw }
    }

    /// Create an orientation from a yaw in degrees
    pub fn from_yaw_degrees(yaw: f32) -> Self {
        Self {
            yaw: yaw.to_radians(),
        }
    }

    /// Horizontal forward direction
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Horizontal right direction
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// Rotation quaternion
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw)
    }

    /// Map a 2D input (x = strafe, y = forward) onto the horizontal plane
    pub fn planar(&self, input: glam::Vec2) -> Vec3 {
        self.forward() * input.y + self.right() * input.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_axes() {
        let facing = Orientation::default();
        assert_eq!(facing.forward(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(facing.right(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_orientation_quarter_turn() {
        let facing = Orientation::from_yaw_degrees(90.0);
        assert!((facing.forward() - Vec3::X).length() < 1e-5);
        assert!((facing.right() - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_rotation_matches_forward() {
        let facing = Orientation::from_yaw_degrees(30.0);
        let rotated = facing.rotation() * -Vec3::Z;
        assert!((rotated - facing.forward()).length() < 1e-5);
    }
}
