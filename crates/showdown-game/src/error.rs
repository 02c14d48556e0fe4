use thiserror::Error;

/// Reasons a locomotion or camera configuration is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be at least {min}s, got {value}", min = crate::locomotion::MIN_DURATION)]
    Duration { name: &'static str, value: f32 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("{0} must be finite")]
    NonFinite(&'static str),

    #[error("slope angle limit must be within 0..=90 degrees, got {0}")]
    SlopeLimit(f32),

    #[error("gravity clamp must be zero or below, got {0}")]
    GravityClamp(f32),

    #[error("{0} must have a positive size on every axis")]
    CheckBox(&'static str),

    #[error("pitch limit must be within 0..=90 degrees, got {0}")]
    PitchLimit(f32),
}
