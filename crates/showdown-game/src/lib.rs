//! Showdown Game - Movement gameplay
//!
//! Provides the locomotion state machine, the camera feedback rig, and the
//! input adapter that feeds them.

pub mod camera;
pub mod error;
pub mod input;
pub mod locomotion;

pub use camera::{CameraConfig, CameraPose, CameraRig};
pub use error::ConfigError;
pub use input::{
    FrameInput, GamepadButton, InputAction, InputAdapter, InputBinding, InputBindings,
    InputConfig, InputState, LookInput,
};
pub use locomotion::{
    AccelerationState, AnimationParams, DashState, GroundingInfo, JumpState, Locomotion,
    LocomotionConfig, LocomotionEvent, LocomotionHooks, LocomotionSnapshot, LocomotionState,
    MovementInput, NoHooks, SilentSound, SoundCue, SoundEmitter, MIN_DURATION,
};
