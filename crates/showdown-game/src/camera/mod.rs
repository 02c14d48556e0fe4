//! Camera feedback
//!
//! First-person rig that turns locomotion state into look, tilt, bob,
//! field of view and speedlines. Presentation only.

mod config;
mod rig;

pub use config::CameraConfig;
pub use rig::{CameraPose, CameraRig};
