//! First-person camera rig driven by locomotion feedback

use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec2, Vec3};
use showdown_core::math::{lerp, smooth_damp};
use showdown_core::Orientation;
use tracing::info;

use crate::locomotion::{LocomotionHooks, LocomotionSnapshot, LocomotionState};
use crate::ConfigError;

use super::CameraConfig;

/// Where the camera is and what it looks like this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position in world space, shake included
    pub position: Vec3,
    /// Yaw in degrees
    pub yaw: f32,
    /// Pitch in degrees including the jump dip, positive looks up
    pub pitch: f32,
    /// Roll in degrees
    pub roll: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Speedline overlay opacity in `[0, 1]`
    pub speedlines: f32,
    pub near: f32,
    pub far: f32,
}

impl CameraPose {
    /// View direction
    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.sin() * pitch.cos(), pitch.sin(), -yaw.cos() * pitch.cos())
    }

    /// Horizontal right direction
    pub fn right(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, yaw.sin())
    }

    /// Up direction with roll applied
    pub fn up(&self) -> Vec3 {
        let forward = self.forward();
        let up = self.right().cross(forward).normalize();
        Quat::from_axis_angle(forward, self.roll.to_radians()) * up
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), self.up())
    }

    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), aspect_ratio, self.near, self.far)
    }
}

/// Positional shake that fades out over its duration
#[derive(Debug, Clone, Copy, Default)]
struct Shake {
    duration: f32,
    strength: f32,
    vibrato: f32,
    elapsed: f32,
}

impl Shake {
    fn offset(&self) -> Vec3 {
        if self.elapsed >= self.duration {
            return Vec3::ZERO;
        }
        let fade = 1.0 - self.elapsed / self.duration;
        // Detuned per axis so the motion does not trace a line
        let phase = self.elapsed * self.vibrato * TAU;
        Vec3::new(
            phase.sin(),
            (phase * 1.31 + 1.7).sin(),
            (phase * 0.73 + 0.4).sin(),
        ) * self.strength
            * fade
    }
}

/// Camera rig: look, strafe tilt, walking bob, jump dip, speed FOV and speedlines.
///
/// Plug it into [`Locomotion::advance`](crate::locomotion::Locomotion::advance)
/// as the hooks; it reads the snapshot and only writes the character's yaw.
pub struct CameraRig {
    config: CameraConfig,
    /// Degrees
    yaw: f32,
    /// Degrees, positive looks up
    pitch: f32,
    pending_look: Vec2,

    roll: f32,
    roll_velocity: f32,

    bob: f32,
    bob_return: f32,
    bob_timer: f32,

    fov: f32,
    speedlines: f32,
    shake: Shake,
    elapsed: f32,
}

impl CameraRig {
    pub fn new(config: CameraConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        info!("Camera rig ready: fov {}, pitch limit {}", config.rest_fov, config.pitch_limit);

        Ok(Self {
            fov: config.rest_fov,
            bob_timer: config.jump_bob_time,
            config,
            yaw: 0.0,
            pitch: 0.0,
            pending_look: Vec2::ZERO,
            roll: 0.0,
            roll_velocity: 0.0,
            bob: 0.0,
            bob_return: 0.0,
            speedlines: 0.0,
            shake: Shake::default(),
            elapsed: 0.0,
        })
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Queue a look delta in degrees (x = yaw right, y = pitch down).
    /// Applied on the next tick.
    pub fn queue_look(&mut self, delta: Vec2) {
        self.pending_look += delta;
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    /// Current jump dip in degrees (zero or below)
    pub fn bob(&self) -> f32 {
        self.bob
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn speedlines(&self) -> f32 {
        self.speedlines
    }

    /// Start a shake, cutting off any shake still running
    pub fn shake(&mut self, duration: f32, strength: f32, vibrato: u32) {
        self.shake = Shake {
            duration: duration.max(0.0),
            strength: strength.max(0.0),
            vibrato: vibrato as f32,
            elapsed: 0.0,
        };
    }

    pub fn shake_offset(&self) -> Vec3 {
        self.shake.offset()
    }

    /// Eye position before shake for a character standing at `feet`
    pub fn eye_position(&self, feet: Vec3) -> Vec3 {
        feet + Vec3::Y * self.config.eye_height
    }

    /// Pose for a character standing at `feet`
    pub fn pose(&self, feet: Vec3) -> CameraPose {
        CameraPose {
            position: self.eye_position(feet) + self.shake.offset(),
            yaw: self.yaw,
            pitch: self.pitch + self.bob,
            roll: self.roll,
            fov: self.fov,
            speedlines: self.speedlines,
            near: self.config.near,
            far: self.config.far,
        }
    }

    fn apply_look(&mut self) {
        let look = std::mem::take(&mut self.pending_look);
        let limit = self.config.pitch_limit;
        self.yaw = (self.yaw + look.x).rem_euclid(360.0);
        self.pitch = (self.pitch - look.y).clamp(-limit, limit);
    }

    fn update_tilt(&mut self, snapshot: &LocomotionSnapshot, dt: f32) {
        let moving = if snapshot.state == LocomotionState::Move {
            snapshot.acceleration_value * snapshot.deceleration_value
        } else {
            0.0
        };
        let bobbing = (self.elapsed * self.config.bobbing_speed).cos() * self.config.bobbing_amount;
        let target = snapshot.move_axes.x * -self.config.tilt_amount
            + snapshot.move_axes.y * bobbing * moving;

        self.roll = smooth_damp(
            self.roll,
            target,
            &mut self.roll_velocity,
            self.config.tilt_smoothing,
            dt,
        );
    }

    fn update_jump_bob(&mut self, dt: f32) {
        let duration = self.config.jump_bob_time;
        if self.bob_timer < duration {
            self.bob_timer = (self.bob_timer + dt).min(duration);
            // Looking straight up or down hides the dip
            let scale = 1.0 - self.pitch.abs() / 90.0;
            let shape = self.config.jump_bob_curve.evaluate(self.bob_timer / duration);
            self.bob = self.bob_return - self.config.jump_bob_amount * shape * scale;
        } else {
            self.bob = lerp(self.bob, 0.0, dt);
            self.bob_return = self.bob;
        }
    }

    fn update_fov(&mut self, snapshot: &LocomotionSnapshot, dt: f32) {
        let speedlines_target = if snapshot.state == LocomotionState::Dash { 1.0 } else { 0.0 };
        self.speedlines = lerp(self.speedlines, speedlines_target, self.config.speedlines_rate * dt);

        let horizontal_speed = Vec2::new(snapshot.body_velocity.x, snapshot.body_velocity.z).length();
        let fov_target = self.config.rest_fov + horizontal_speed * self.config.fov_speed_factor;
        self.fov = lerp(self.fov, fov_target, self.config.fov_rate * dt);
    }
}

impl LocomotionHooks for CameraRig {
    fn pre_tick(&mut self, snapshot: &LocomotionSnapshot, orientation: &mut Orientation, dt: f32) {
        self.apply_look();
        *orientation = Orientation::from_yaw_degrees(self.yaw);

        self.elapsed += dt;
        self.shake.elapsed += dt;
        self.update_tilt(snapshot, dt);
        self.update_jump_bob(dt);
        self.update_fov(snapshot, dt);
    }

    fn post_jump(&mut self) {
        self.bob_timer = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(state: LocomotionState) -> LocomotionSnapshot {
        LocomotionSnapshot {
            state,
            grounded: !state.is_airborne(),
            move_axes: Vec2::ZERO,
            acceleration_value: 0.0,
            deceleration_value: 1.0,
            body_velocity: Vec3::ZERO,
        }
    }

    fn tick(rig: &mut CameraRig, snapshot: &LocomotionSnapshot, dt: f32) -> Orientation {
        let mut orientation = Orientation::default();
        rig.pre_tick(snapshot, &mut orientation, dt);
        orientation
    }

    #[test]
    fn test_look_writes_yaw_and_clamps_pitch() {
        let mut rig = CameraRig::new(CameraConfig::default()).unwrap();
        rig.queue_look(Vec2::new(90.0, -500.0));
        let orientation = tick(&mut rig, &snapshot(LocomotionState::Idle), 0.016);

        assert_eq!(rig.yaw(), 90.0);
        assert_eq!(rig.pitch(), 90.0);
        assert!((orientation.forward() - Vec3::X).length() < 1e-5);

        rig.queue_look(Vec2::new(0.0, 1000.0));
        tick(&mut rig, &snapshot(LocomotionState::Idle), 0.016);
        assert_eq!(rig.pitch(), -90.0);
    }

    #[test]
    fn test_strafe_tilts_against_direction() {
        let mut rig = CameraRig::new(CameraConfig::default()).unwrap();
        let mut strafing = snapshot(LocomotionState::Move);
        strafing.move_axes = Vec2::new(1.0, 0.0);

        for _ in 0..100 {
            tick(&mut rig, &strafing, 0.016);
        }
        assert!((rig.roll() - -rig.config().tilt_amount).abs() < 0.01);
    }

    #[test]
    fn test_walking_bob_needs_move_state() {
        let mut rig = CameraRig::new(CameraConfig::default()).unwrap();
        let mut forward = snapshot(LocomotionState::MoveAir);
        forward.move_axes = Vec2::Y;
        forward.acceleration_value = 1.0;

        for _ in 0..50 {
            tick(&mut rig, &forward, 0.016);
        }
        assert!(rig.roll().abs() < 1e-4);
    }

    #[test]
    fn test_jump_dip_and_recovery() {
        let mut rig = CameraRig::new(CameraConfig::default()).unwrap();
        let idle = snapshot(LocomotionState::Idle);

        rig.post_jump();
        let mut deepest: f32 = 0.0;
        for _ in 0..12 {
            tick(&mut rig, &idle, 0.02);
            deepest = deepest.min(rig.bob());
        }
        assert!(deepest < -5.0, "dip {deepest}");

        for _ in 0..400 {
            tick(&mut rig, &idle, 0.02);
        }
        assert!(rig.bob().abs() < 0.01);
    }

    #[test]
    fn test_jump_during_dip_keeps_its_baseline() {
        let mut rig = CameraRig::new(CameraConfig::default()).unwrap();
        let idle = snapshot(LocomotionState::Idle);

        rig.post_jump();
        for _ in 0..4 {
            tick(&mut rig, &idle, 0.02);
        }
        assert!(rig.bob() < -1.0);

        // The second dip runs from the same rest value, so it ends back at zero
        rig.post_jump();
        for _ in 0..11 {
            tick(&mut rig, &idle, 0.02);
        }
        assert!(rig.bob().abs() < 1e-4, "bob {}", rig.bob());
    }

    #[test]
    fn test_jump_dip_fades_at_pitch_extremes() {
        let mut rig = CameraRig::new(CameraConfig::default()).unwrap();
        rig.queue_look(Vec2::new(0.0, -90.0));
        tick(&mut rig, &snapshot(LocomotionState::Idle), 0.0);

        rig.post_jump();
        for _ in 0..10 {
            tick(&mut rig, &snapshot(LocomotionState::Idle), 0.02);
            assert!(rig.bob().abs() < 1e-5);
        }
    }

    #[test]
    fn test_speedlines_follow_dash() {
        let mut rig = CameraRig::new(CameraConfig::default()).unwrap();
        for _ in 0..10 {
            tick(&mut rig, &snapshot(LocomotionState::Dash), 0.05);
        }
        let during = rig.speedlines();
        assert!(during > 0.5);

        for _ in 0..10 {
            tick(&mut rig, &snapshot(LocomotionState::Idle), 0.05);
        }
        assert!(rig.speedlines() < during);
    }

    #[test]
    fn test_fov_widens_with_horizontal_speed() {
        let mut rig = CameraRig::new(CameraConfig::default()).unwrap();
        let mut running = snapshot(LocomotionState::Move);
        running.body_velocity = Vec3::new(0.0, -30.0, -8.0);

        for _ in 0..200 {
            tick(&mut rig, &running, 0.05);
        }
        // Vertical speed does not count
        assert!((rig.fov() - (60.0 + 8.0 * 2.5)).abs() < 0.1);
    }

    #[test]
    fn test_shake_fades_and_replaces() {
        let mut rig = CameraRig::new(CameraConfig::default()).unwrap();
        let idle = snapshot(LocomotionState::Idle);
        assert_eq!(rig.shake_offset(), Vec3::ZERO);

        rig.shake(0.35, 0.5, 10);
        let mut largest: f32 = 0.0;
        for _ in 0..17 {
            tick(&mut rig, &idle, 0.02);
            let offset = rig.shake_offset();
            assert!(offset.abs().max_element() <= 0.5);
            largest = largest.max(offset.length());
        }
        assert!(largest > 0.05, "shake too weak: {largest}");
        assert_eq!(
            rig.pose(Vec3::ZERO).position,
            rig.eye_position(Vec3::ZERO) + rig.shake_offset()
        );

        tick(&mut rig, &idle, 0.02);
        assert_eq!(rig.shake_offset(), Vec3::ZERO);

        // A zero-strength shake still stops the running one
        rig.shake(1.0, 0.5, 10);
        tick(&mut rig, &idle, 0.05);
        assert!(rig.shake_offset().length() > 0.0);
        rig.shake(1.0, 0.0, 10);
        tick(&mut rig, &idle, 0.05);
        assert_eq!(rig.shake_offset(), Vec3::ZERO);
    }

    #[test]
    fn test_pose_matrices() {
        let mut rig = CameraRig::new(CameraConfig::default()).unwrap();
        rig.set_yaw(0.0);
        let pose = rig.pose(Vec3::ZERO);
        assert_eq!(pose.position, Vec3::new(0.0, 1.6, 0.0));

        let ahead = pose.view_matrix().transform_point3(Vec3::new(0.0, 1.6, -5.0));
        assert!((ahead - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-4);

        let projection = pose.projection_matrix(16.0 / 9.0);
        assert!(projection.is_finite());
    }
}
