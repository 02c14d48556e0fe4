//! The locomotion state machine
//!
//! One `Locomotion` drives one locally controlled character. Each frame the
//! driver calls [`Locomotion::advance`] (input, timers, curves, jump and dash
//! bookkeeping), then for every physics step [`Locomotion::fixed_advance`] to
//! compose the output velocity, and finally [`Locomotion::sync_body`] with
//! what the body actually did.

use std::sync::Arc;

use glam::{Vec2, Vec3};
use showdown_core::math::{angle_between, angle_between_2d, project_on_plane, round_to_tenth, smooth_damp_vec2};
use showdown_core::Orientation;
use showdown_physics::GeometryQuery;
use tracing::{debug, info, trace};

use crate::ConfigError;

use super::{
    AccelerationState, AnimationParams, DashState, GroundingInfo, JumpState,
    LocomotionConfig, LocomotionEvent, LocomotionHooks, LocomotionSnapshot, LocomotionState,
    MovementInput, SoundCue, SoundEmitter,
};

/// Height above the feet the slope probe starts from
const GROUND_PROBE_HEIGHT: f32 = 0.5;
/// How far ahead of the feet the slope probe leans while rising
const GROUND_PROBE_LEAD: f32 = 0.255;
/// Slope probe range
const GROUND_PROBE_RANGE: f32 = 4.0;
/// Ground dash probe range
const GROUND_DASH_PROBE_RANGE: f32 = 1000.0;
/// Falling faster than this adds the fall speed to a ground dash
const GROUND_DASH_FALL_THRESHOLD: f32 = -1.0;
/// Multiplier on the fall speed folded into a ground dash
const GROUND_DASH_FALL_SCALE: f32 = 3.0;
/// Contacts with a normal this far downward stop upward motion
const CEILING_NORMAL_Y: f32 = -0.5;
/// Divisor of the squared slope angle in the angle boost
const ANGLE_BOOST_DIVISOR: f32 = 3600.0;

/// Locomotion for a single character
pub struct Locomotion {
    config: LocomotionConfig,
    geometry: Arc<dyn GeometryQuery + Send + Sync>,
    sound: Box<dyn SoundEmitter>,

    position: Vec3,
    body_velocity: Vec3,
    orientation: Orientation,

    input: MovementInput,
    smoothed_movement_input: Vec2,
    last_smoothed_movement_input: Vec2,
    movement_smoothing_velocity: Vec2,

    grounding: GroundingInfo,
    acceleration: AccelerationState,
    jump: JumpState,
    dash: DashState,
    y_velocity: f32,
    state: LocomotionState,

    /// Play the ground-dash landing cue the next time we are grounded
    landing_armed: bool,
    output_velocity: Vec3,
    events: Vec<LocomotionEvent>,
}

impl Locomotion {
    /// Create a locomotion machine, rejecting unusable configuration
    pub fn new(
        config: LocomotionConfig,
        geometry: Arc<dyn GeometryQuery + Send + Sync>,
        sound: Box<dyn SoundEmitter>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let dash = DashState {
            dash_time: config.dash_duration,
            dash_value: config.dash_stopping_curve.evaluate(1.0),
            dashing: false,
            dash_direction: Vec3::ZERO,
        };

        info!(
            "Locomotion ready: speed {}, jump {}, dash {} over {}s",
            config.movement_speed, config.jump_force, config.dash_force, config.dash_duration
        );

        Ok(Self {
            config,
            geometry,
            sound,
            position: Vec3::ZERO,
            body_velocity: Vec3::ZERO,
            orientation: Orientation::default(),
            input: MovementInput::default(),
            smoothed_movement_input: Vec2::ZERO,
            last_smoothed_movement_input: Vec2::ZERO,
            movement_smoothing_velocity: Vec2::ZERO,
            grounding: GroundingInfo::AIRBORNE,
            acceleration: AccelerationState::default(),
            jump: JumpState::default(),
            dash,
            y_velocity: 0.0,
            state: LocomotionState::IdleAir,
            landing_armed: false,
            output_velocity: Vec3::ZERO,
            events: Vec::new(),
        })
    }

    /// Variable-rate pass: consume input, update timers and curves.
    ///
    /// # Panics
    ///
    /// Panics if `dt` is negative or not finite.
    pub fn advance(&mut self, dt: f32, input: &MovementInput, hooks: &mut dyn LocomotionHooks) {
        assert!(dt.is_finite() && dt >= 0.0, "locomotion advanced with invalid dt {dt}");

        self.input = *input;
        if input.jump_pressed {
            self.reset_jump_buffer();
        }
        if input.dash_pressed {
            self.try_start_dash();
        }
        if input.ground_dash_pressed {
            self.try_start_ground_dash();
        }

        self.check_grounded();
        self.check_ceiling();
        self.resolve_landing();

        // Coyote window stays full while grounded
        if self.grounding.grounded {
            self.jump.jump_coyote_timer = self.config.jump_coyote_time;
        } else {
            self.jump.jump_coyote_timer = (self.jump.jump_coyote_timer - dt).max(0.0);
        }

        self.apply_gravity(dt);

        let snapshot = self.snapshot();
        hooks.pre_tick(&snapshot, &mut self.orientation, dt);

        let smoothing = if self.grounding.grounded {
            self.config.ground_movement_smoothing
        } else {
            self.config.air_movement_smoothing
        };
        self.smoothed_movement_input = smooth_damp_vec2(
            self.smoothed_movement_input,
            self.input.move_axes,
            &mut self.movement_smoothing_velocity,
            smoothing,
            dt,
        );
        if self.input.has_movement() {
            self.last_smoothed_movement_input = self.smoothed_movement_input;
        }

        self.update_acceleration(dt);
        self.update_deceleration(dt);
        self.acceleration.acceleration_value = self
            .config
            .acceleration_curve
            .evaluate(self.acceleration.acceleration_time / self.config.acceleration_duration);
        self.acceleration.deceleration_value = self
            .config
            .deceleration_curve
            .evaluate(self.acceleration.deceleration_time / self.config.deceleration_duration);

        if self.jump.can_jump() {
            self.execute_jump(hooks);
            self.jump.jump_buffer_timer = 0.0;
        }
        if self.jump.jump_buffer_timer > 0.0 {
            self.jump.jump_buffer_timer = (self.jump.jump_buffer_timer - dt).max(0.0);
        }

        self.update_dash(dt);
        self.update_state();

        trace!(
            "tick dt={dt:.4} state={:?} grounded={} y={:.3}",
            self.state,
            self.grounding.grounded,
            self.y_velocity
        );
    }

    /// Fixed-rate pass: compose the velocity the body should move with
    pub fn fixed_advance(&mut self) -> Vec3 {
        let normal = self.grounding.ground_normal;
        let direction = self.orientation.planar(self.last_smoothed_movement_input);
        let move_direction = if self.on_traversable_slope() {
            project_on_plane(direction, normal)
        } else {
            direction
        };

        // Steeper ground gets a boost to make up for the speed lost to projection
        let angle_x = angle_between_2d(Vec2::Y, Vec2::new(normal.x, normal.y));
        let angle_z = angle_between_2d(Vec2::Y, Vec2::new(normal.z, normal.y));
        let ground_angle = self.grounding.ground_angle;
        let angle_boost = Vec3::new(
            1.0 + angle_x * angle_x / ANGLE_BOOST_DIVISOR,
            1.0 + ground_angle * ground_angle / ANGLE_BOOST_DIVISOR,
            1.0 + angle_z * angle_z / ANGLE_BOOST_DIVISOR,
        );

        let move_speed = self.acceleration.acceleration_value
            * self.acceleration.deceleration_value
            * self.config.movement_speed;
        let dash_speed = self.config.dash_force * self.dash.dash_value;

        let planar = move_direction * move_speed + self.dash.dash_direction * dash_speed;
        self.output_velocity = angle_boost * planar + Vec3::Y * self.y_velocity;
        self.output_velocity
    }

    /// Report where the body ended up and how fast it actually moved
    pub fn sync_body(&mut self, position: Vec3, velocity: Vec3) {
        self.position = position;
        self.body_velocity = velocity;
    }

    /// Report a collision contact; downward-facing normals stop upward motion
    pub fn on_contact(&mut self, normal: Vec3) {
        if normal.y <= CEILING_NORMAL_Y {
            self.y_velocity = 0.0;
        }
    }

    /// Remember a jump press for the buffer window
    pub fn reset_jump_buffer(&mut self) {
        self.jump.jump_buffer_timer = self.config.jump_buffer_time;
    }

    /// Start a dash unless one is already running
    pub fn try_start_dash(&mut self) -> bool {
        if self.dash.dashing {
            return false;
        }

        self.dash.dash_time = 0.0;
        self.dash.dashing = true;

        // A dash cancels falling
        if self.y_velocity < 0.0 {
            self.y_velocity = 0.0;
        }

        let straight = if self.input.has_movement() {
            self.orientation.planar(self.input.move_axes)
        } else {
            let forward = self.orientation.forward();
            Vec3::new(forward.x, 0.0, forward.z)
        };
        self.dash.dash_direction = if self.on_traversable_slope() {
            project_on_plane(straight, self.grounding.ground_normal)
        } else {
            straight
        };

        debug!("Dash started toward {:?}", self.dash.dash_direction);
        self.events.push(LocomotionEvent::DashStarted {
            direction: self.dash.dash_direction,
        });
        true
    }

    /// Slam toward the ground. Airborne only; declines silently when there is
    /// no ground within range.
    pub fn try_start_ground_dash(&mut self) -> bool {
        if self.grounding.grounded {
            return false;
        }

        let fall_speed = self.y_velocity;
        let target_force = if fall_speed <= GROUND_DASH_FALL_THRESHOLD {
            -self.config.ground_dash_force + fall_speed * GROUND_DASH_FALL_SCALE
        } else {
            -self.config.ground_dash_force
        };

        let Some(hit) = self.geometry.probe_downward(
            self.position,
            GROUND_DASH_PROBE_RANGE,
            self.config.map_layers,
        ) else {
            trace!("Ground dash declined: no ground below {:?}", self.position);
            return false;
        };

        // Farther drops hit harder so the landing feels the same from any height
        self.y_velocity = target_force - hit.distance;
        self.landing_armed = true;

        debug!(
            "Ground dash from {:.2}m, vertical velocity {:.2}",
            hit.distance, self.y_velocity
        );
        self.events.push(LocomotionEvent::GroundDashStarted {
            position: self.position,
            vertical_velocity: self.y_velocity,
        });
        true
    }

    /// Hand over the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<LocomotionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn state(&self) -> LocomotionState {
        self.state
    }

    pub fn grounding(&self) -> &GroundingInfo {
        &self.grounding
    }

    pub fn acceleration(&self) -> &AccelerationState {
        &self.acceleration
    }

    pub fn jump(&self) -> &JumpState {
        &self.jump
    }

    pub fn dash(&self) -> &DashState {
        &self.dash
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.y_velocity
    }

    /// Velocity produced by the last fixed pass
    pub fn output_velocity(&self) -> Vec3 {
        self.output_velocity
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    pub fn smoothed_input(&self) -> Vec2 {
        self.smoothed_movement_input
    }

    /// Whether a ground-dash landing cue is waiting for touchdown
    pub fn landing_armed(&self) -> bool {
        self.landing_armed
    }

    /// Animator parameters for this frame
    pub fn animation_params(&self) -> AnimationParams {
        AnimationParams {
            dir_x: self.smoothed_movement_input.x,
            dir_y: self.smoothed_movement_input.y,
            in_air: !self.grounding.grounded,
        }
    }

    /// Read-only view handed to hooks
    pub fn snapshot(&self) -> LocomotionSnapshot {
        LocomotionSnapshot {
            state: self.state,
            grounded: self.grounding.grounded,
            move_axes: self.input.move_axes,
            acceleration_value: self.acceleration.acceleration_value,
            deceleration_value: self.acceleration.deceleration_value,
            body_velocity: self.body_velocity,
        }
    }

    fn on_traversable_slope(&self) -> bool {
        self.grounding.ground_angle <= self.config.slope_angle_limit
    }

    fn check_grounded(&mut self) {
        let center = self.position + self.config.ground_check_offset;
        let grounded =
            self.geometry
                .check_box(center, self.config.ground_check_size / 2.0, self.config.map_layers);

        if !grounded {
            self.grounding = GroundingInfo::AIRBORNE;
            return;
        }

        // While rising, look at the ground slightly ahead so ramps are caught early
        let lead = if self.body_velocity.y > 0.0 {
            self.orientation.planar(self.smoothed_movement_input)
        } else {
            Vec3::ZERO
        };
        let origin = Vec3::new(
            self.position.x + lead.x * GROUND_PROBE_LEAD,
            self.position.y + GROUND_PROBE_HEIGHT,
            self.position.z + lead.z * GROUND_PROBE_LEAD,
        );

        self.grounding = match self
            .geometry
            .probe_downward(origin, GROUND_PROBE_RANGE, self.config.map_layers)
        {
            Some(hit) => GroundingInfo {
                grounded: true,
                ground_normal: hit.normal,
                ground_angle: round_to_tenth(angle_between(Vec3::Y, hit.normal)).min(90.0),
            },
            None => GroundingInfo {
                grounded: true,
                ..GroundingInfo::AIRBORNE
            },
        };
    }

    fn check_ceiling(&mut self) {
        if self.y_velocity <= 0.0 {
            return;
        }
        let center = self.position + self.config.ceil_check_offset;
        if self
            .geometry
            .check_box(center, self.config.ceil_check_size / 2.0, self.config.map_layers)
        {
            debug!("Ceiling bump at {:?}", self.position);
            self.y_velocity = 0.0;
        }
    }

    fn resolve_landing(&mut self) {
        if !(self.landing_armed && self.grounding.grounded) {
            return;
        }
        self.landing_armed = false;
        self.sound.emit(SoundCue::GroundDashLand, self.position, true);
        self.events.push(LocomotionEvent::GroundDashLanded {
            position: self.position,
        });
    }

    /// Gravity accumulates only while above the clamp, so a single tick may
    /// carry the velocity past it but further ticks never extend it.
    fn apply_gravity(&mut self, dt: f32) {
        if self.grounding.grounded && self.y_velocity <= 0.0 && self.on_traversable_slope() {
            self.y_velocity = 0.0;
        } else if self.y_velocity > self.config.gravity_clamp {
            self.y_velocity += self.config.gravity * dt;
        }
    }

    fn update_acceleration(&mut self, dt: f32) {
        let moving = self.input.has_movement();
        let duration = self.config.acceleration_duration;
        let acc = &mut self.acceleration;

        if acc.accelerating && (!moving || acc.acceleration_time >= duration) {
            acc.accelerating = false;
        }

        // Resume from wherever braking left off
        if moving && !acc.accelerating {
            acc.accelerating = true;
            acc.acceleration_time =
                (acc.deceleration_value * self.config.deceleration_duration).min(duration);
        }

        if acc.accelerating {
            acc.acceleration_time = (acc.acceleration_time + dt).min(duration);
        }
    }

    fn update_deceleration(&mut self, dt: f32) {
        let duration = self.config.deceleration_duration;
        if self.input.has_movement() {
            self.acceleration.deceleration_time = 0.0;
        } else if self.acceleration.deceleration_time < duration {
            self.acceleration.deceleration_time =
                (self.acceleration.deceleration_time + dt).min(duration);
        }
    }

    fn execute_jump(&mut self, hooks: &mut dyn LocomotionHooks) {
        self.y_velocity = self.config.jump_force;
        self.sound.emit(SoundCue::Jump, self.position, true);
        self.events.push(LocomotionEvent::Jumped {
            position: self.position,
        });
        hooks.post_jump();
        debug!("Jump from {:?}", self.position);
    }

    fn update_dash(&mut self, dt: f32) {
        let duration = self.config.dash_duration;
        if self.dash.dash_time < duration {
            self.dash.dash_time = (self.dash.dash_time + dt).min(duration);
        }
        self.dash.dashing = self.dash.dash_time < duration;
        self.dash.dash_value = self
            .config
            .dash_stopping_curve
            .evaluate(self.dash.dash_time / duration);
    }

    fn update_state(&mut self) {
        let next = LocomotionState::classify(
            self.dash.dashing,
            self.grounding.grounded,
            self.input.has_movement(),
        );
        if next != self.state {
            debug!("Locomotion {:?} -> {:?}", self.state, next);
            self.events.push(LocomotionEvent::StateChanged {
                from: self.state,
                to: next,
            });
            self.state = next;
        }
    }
}
