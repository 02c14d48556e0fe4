//! Per-effect playback properties

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AudioError;

/// How a sound effect is played: which clips, how loud, how far it carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SfxProperties {
    /// Candidate clips; one is picked at random for each play
    pub clips: Vec<PathBuf>,
    /// Base volume (0.0–1.0)
    pub volume: f64,
    /// Playback rate is picked uniformly from this range
    pub pitch_range: [f64; 2],
    /// Distance at which a spatial sound becomes inaudible
    pub max_distance: f32,
    /// Camera shake kicked off when the effect plays
    pub shake: ShakeSettings,
}

impl Default for SfxProperties {
    fn default() -> Self {
        Self {
            clips: Vec::new(),
            volume: 0.8,
            pitch_range: [1.0, 1.0],
            max_distance: 85.0,
            shake: ShakeSettings::default(),
        }
    }
}

impl SfxProperties {
    /// Properties for a single clip with default volume and pitch
    pub fn single(path: impl Into<PathBuf>) -> Self {
        Self {
            clips: vec![path.into()],
            ..Default::default()
        }
    }

    /// Pick one of the clips at random
    pub fn pick_clip<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&Path, AudioError> {
        if self.clips.is_empty() {
            return Err(AudioError::NoClips);
        }
        let index = rng.gen_range(0..self.clips.len());
        Ok(&self.clips[index])
    }

    /// Pick a playback rate from the pitch range
    pub fn pick_pitch<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let [a, b] = self.pitch_range;
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        rng.gen_range(low..=high)
    }
}

/// Camera shake attached to a sound effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeSettings {
    /// Seconds
    pub duration: f32,
    /// Offset at the source, in world units
    pub strength: f32,
    /// Oscillations per second
    pub vibrato: u32,
}

impl Default for ShakeSettings {
    fn default() -> Self {
        Self {
            duration: 0.35,
            strength: 0.5,
            vibrato: 10,
        }
    }
}

impl ShakeSettings {
    /// No shake at all
    pub const NONE: Self = Self {
        duration: 0.0,
        strength: 0.0,
        vibrato: 0,
    };

    /// Any zero component turns the shake off
    pub fn is_enabled(&self) -> bool {
        self.duration > 0.0 && self.strength > 0.0 && self.vibrato > 0
    }

    /// Strength fading linearly to nothing at `max_distance`
    pub fn strength_at(&self, distance: f32, max_distance: f32) -> f32 {
        if max_distance <= 0.0 {
            return 0.0;
        }
        (1.0 - (distance / max_distance).clamp(0.0, 1.0)) * self.strength
    }
}
