//! Showdown Core - Shared primitives for the movement prototype
//!
//! This crate provides the foundational pieces used by the other crates:
//! - Mathematical primitives (re-exported from glam)
//! - Critically damped smoothing and vector helpers
//! - Keyframed response curves
//! - Character orientation
//! - Frame and fixed-step timing

pub mod curve;
pub mod math;
pub mod time;
pub mod types;

pub use curve::{CurveError, Keyframe, ResponseCurve};
pub use glam::{Mat4, Quat, Vec2, Vec3};
pub use time::{GameTime, TimeConfig};
pub use types::Orientation;
