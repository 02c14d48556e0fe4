//! Kinematic character body using rapier3d's character controller
//!
//! The locomotion code decides a velocity each physics step; the body turns
//! it into a collision-corrected translation against the map.

use glam::Vec3;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{MapGeometry, MapLayers};

/// Character body configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterBodyConfig {
    /// Capsule height (default: 1.8m)
    pub height: f32,
    /// Capsule radius (default: 0.4m)
    pub radius: f32,
    /// Maximum climbable slope angle in degrees (default: 60)
    pub max_slope_angle: f32,
    /// Step height for climbing stairs (default: 0.25m)
    pub step_height: f32,
    /// Skin width for collision detection (default: 0.02m)
    pub skin_width: f32,
    /// Layers the body collides with
    pub layers: MapLayers,
}

impl Default for CharacterBodyConfig {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.4,
            max_slope_angle: 60.0,
            step_height: 0.25,
            skin_width: 0.02,
            layers: MapLayers::default(),
        }
    }
}

/// A capsule that moves through static map geometry.
///
/// `position` is the bottom of the capsule (the character's feet).
pub struct CharacterBody {
    /// Configuration
    pub config: CharacterBodyConfig,
    /// Current position
    pub position: Vec3,
    /// Velocity actually achieved during the last step
    pub velocity: Vec3,
    shape: SharedShape,
    controller: KinematicCharacterController,
}

impl CharacterBody {
    /// Create a new body with default config
    pub fn new() -> Self {
        Self::with_config(CharacterBodyConfig::default())
    }

    /// Create a new body with custom config
    pub fn with_config(config: CharacterBodyConfig) -> Self {
        let mut controller = KinematicCharacterController::default();
        controller.max_slope_climb_angle = config.max_slope_angle.to_radians();
        controller.min_slope_slide_angle = config.max_slope_angle.to_radians();
        controller.autostep = Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(config.step_height),
            min_width: CharacterLength::Relative(0.5),
            include_dynamic_bodies: false,
        });
        // Vertical motion is owned by the locomotion code
        controller.snap_to_ground = None;
        controller.offset = CharacterLength::Absolute(config.skin_width);

        let half_height = (config.height - 2.0 * config.radius) / 2.0;
        let shape = SharedShape::capsule_y(half_height.max(0.01), config.radius);

        Self {
            config,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            shape,
            controller,
        }
    }

    /// Place the body at a position and clear its motion
    pub fn spawn(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
    }

    /// Move the body by `velocity * dt`, sliding along map colliders
    pub fn step(&mut self, map: &MapGeometry, velocity: Vec3, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let current_pos = Isometry::translation(
            self.position.x,
            self.position.y + self.config.height / 2.0,
            self.position.z,
        );
        let desired = velocity * dt;

        let movement = self.controller.move_shape(
            dt,
            &map.rigid_body_set,
            &map.collider_set,
            &map.query_pipeline,
            &*self.shape,
            &current_pos,
            vector![desired.x, desired.y, desired.z],
            MapGeometry::filter(self.config.layers),
            |_| {},
        );

        let applied = Vec3::new(
            movement.translation.x,
            movement.translation.y,
            movement.translation.z,
        );
        self.position += applied;
        self.velocity = applied / dt;
    }
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_map() -> MapGeometry {
        let mut map = MapGeometry::new();
        map.create_ground(0.0);
        map.finalize();
        map
    }

    #[test]
    fn test_character_body_config() {
        let config = CharacterBodyConfig::default();
        assert_eq!(config.height, 1.8);
        assert_eq!(config.radius, 0.4);
        assert_eq!(config.max_slope_angle, 60.0);
    }

    #[test]
    fn test_spawn_clears_motion() {
        let map = flat_map();
        let mut body = CharacterBody::new();
        body.spawn(Vec3::new(0.0, 5.0, 0.0));
        body.step(&map, Vec3::new(0.0, 0.0, -4.0), 0.25);
        assert!(body.velocity.length() > 1.0);

        body.spawn(Vec3::new(3.0, 2.0, 0.0));
        assert_eq!(body.position, Vec3::new(3.0, 2.0, 0.0));
        assert_eq!(body.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_moves_freely_in_open_space() {
        let map = flat_map();
        let mut body = CharacterBody::new();
        body.spawn(Vec3::new(0.0, 5.0, 0.0));

        body.step(&map, Vec3::new(2.0, 0.0, 0.0), 0.5);
        assert!((body.position.x - 1.0).abs() < 1e-3);
        assert!((body.velocity.x - 2.0).abs() < 1e-2);
    }

    #[test]
    fn test_floor_stops_falling() {
        let map = flat_map();
        let mut body = CharacterBody::new();
        body.spawn(Vec3::new(0.0, 0.5, 0.0));

        body.step(&map, Vec3::new(0.0, -10.0, 0.0), 0.5);
        assert!(body.position.y >= -0.01, "sank to {}", body.position.y);
        assert!(body.velocity.y > -10.0);
    }

    #[test]
    fn test_zero_dt_is_ignored() {
        let map = flat_map();
        let mut body = CharacterBody::new();
        body.spawn(Vec3::new(0.0, 1.0, 0.0));
        body.step(&map, Vec3::X * 10.0, 0.0);
        assert_eq!(body.position, Vec3::new(0.0, 1.0, 0.0));
    }
}
