use serde::{Deserialize, Serialize};

/// Audio volume configuration. Maps to the `audio` section of the settings file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Master volume multiplier (0.0–1.0).
    pub master_volume: f64,
    /// Sound effects volume multiplier (0.0–1.0).
    pub sfx_volume: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
        }
    }
}

impl AudioConfig {
    /// Effective SFX volume (master * sfx), clamped to 0.0–1.0.
    pub fn effective_sfx_volume(&self) -> f64 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_volumes() {
        let config = AudioConfig::default();
        assert_eq!(config.master_volume, 1.0);
        assert_eq!(config.sfx_volume, 1.0);
    }

    #[test]
    fn effective_volume() {
        let config = AudioConfig {
            master_volume: 0.5,
            sfx_volume: 0.6,
        };
        assert!((config.effective_sfx_volume() - 0.3).abs() < f64::EPSILON);

        let loud = AudioConfig {
            master_volume: 2.0,
            sfx_volume: 1.0,
        };
        assert_eq!(loud.effective_sfx_volume(), 1.0);
    }
}
