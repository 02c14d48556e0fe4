//! Showdown Audio - Sound effect playback using kira
//!
//! Provides one-shot and spatialized sound effects with per-effect clip sets,
//! pitch variation, audible range, and the camera shake each effect carries.

mod config;
mod error;
mod properties;
mod sfx;
mod spatial;

pub use config::AudioConfig;
pub use error::AudioError;
pub use properties::{SfxProperties, ShakeSettings};
pub use sfx::AudioEngine;
pub use spatial::{compute_spatial, Listener, SpatialParams};
