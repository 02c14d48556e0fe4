//! What the locomotion machine tells the outside world
//!
//! Sound cues go to an injected [`SoundEmitter`]. Intent events are queued for
//! whoever drives the machine (replication, logging). Presentation code hooks
//! in through [`LocomotionHooks`].

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use showdown_core::Orientation;

use super::LocomotionState;

/// Sounds the locomotion machine asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Jump,
    GroundDashLand,
}

/// Plays sound cues in the world
pub trait SoundEmitter {
    fn emit(&mut self, cue: SoundCue, position: Vec3, spatialize: bool);
}

/// Discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSound;

impl SoundEmitter for SilentSound {
    fn emit(&mut self, _cue: SoundCue, _position: Vec3, _spatialize: bool) {}
}

/// Intent events a replication layer may broadcast to other participants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LocomotionEvent {
    Jumped { position: Vec3 },
    DashStarted { direction: Vec3 },
    GroundDashStarted { position: Vec3, vertical_velocity: f32 },
    GroundDashLanded { position: Vec3 },
    StateChanged { from: LocomotionState, to: LocomotionState },
}

/// Read-only view of the machine handed to hooks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionSnapshot {
    /// State classified on the previous tick
    pub state: LocomotionState,
    pub grounded: bool,
    /// Raw move axes for this tick
    pub move_axes: Vec2,
    pub acceleration_value: f32,
    pub deceleration_value: f32,
    /// Velocity the body actually achieved on its last physics step
    pub body_velocity: Vec3,
}

/// Extension points for presentation code.
///
/// Hooks observe the machine; the only thing they may steer is the
/// character's facing.
pub trait LocomotionHooks {
    /// Runs after grounding and gravity, before input smoothing
    fn pre_tick(&mut self, _snapshot: &LocomotionSnapshot, _orientation: &mut Orientation, _dt: f32) {}

    /// Runs right after a jump fires
    fn post_jump(&mut self) {}
}

/// No-op hooks
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl LocomotionHooks for NoHooks {}
