//! Character locomotion
//!
//! Grounding, coyote time and jump buffering, curve-shaped acceleration,
//! dashes, ground dashes, and the resulting movement state.

mod config;
mod controller;
mod events;
mod state;

pub use config::{LocomotionConfig, MIN_DURATION};
pub use controller::Locomotion;
pub use events::{
    LocomotionEvent, LocomotionHooks, LocomotionSnapshot, NoHooks, SilentSound, SoundCue,
    SoundEmitter,
};
pub use state::{
    AccelerationState, AnimationParams, DashState, GroundingInfo, JumpState, LocomotionState,
    MovementInput,
};
