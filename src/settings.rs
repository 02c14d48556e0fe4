//! Game settings with persistence
//!
//! Settings are saved to `<config dir>/showdown/settings.toml`

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use showdown_audio::AudioConfig;
use showdown_core::TimeConfig;
use showdown_game::{CameraConfig, InputConfig, LocomotionConfig};
use showdown_physics::CharacterBodyConfig;
use tracing::{info, warn};

use crate::sound::SoundBank;

/// All game settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub movement: LocomotionConfig,
    pub camera: CameraConfig,
    pub input: InputConfig,
    pub audio: AudioConfig,
    pub time: TimeConfig,
    pub body: CharacterBodyConfig,
    pub sounds: SoundBank,
}

impl GameSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("showdown"))
    }

    /// Get the settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load settings from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = Self::settings_path() else {
            anyhow::bail!("Could not determine config directory");
        };
        self.save_to(&path)
    }

    /// Save settings to a specific file, creating its directory
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {:?}", dir))?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("showdown-settings-{}-{}", std::process::id(), name))
            .join("settings.toml")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = GameSettings::load_from(&scratch_path("missing"));
        assert_eq!(settings.movement.movement_speed, 9.0);
        assert_eq!(settings.camera.rest_fov, 60.0);
    }

    #[test]
    fn test_save_and_reload() {
        let path = scratch_path("roundtrip");
        let mut settings = GameSettings::default();
        settings.movement.jump_force = 11.0;
        settings.input.invert_y = true;
        settings.save_to(&path).unwrap();

        let loaded = GameSettings::load_from(&path);
        assert_eq!(loaded.movement.jump_force, 11.0);
        assert!(loaded.input.invert_y);
        assert_eq!(
            loaded.movement.acceleration_curve.keys().len(),
            settings.movement.acceleration_curve.keys().len()
        );

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: GameSettings = toml::from_str(
            r#"
            [movement]
            dash_force = 30.0

            [camera]
            rest_fov = 75.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.movement.dash_force, 30.0);
        assert_eq!(settings.movement.dash_duration, 0.3);
        assert_eq!(settings.camera.rest_fov, 75.0);
        assert_eq!(settings.input.gamepad_look_scale, 80.0);
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let path = scratch_path("malformed");
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).unwrap();
        }
        fs::write(&path, "[movement]\nacceleration_curve = []\n").unwrap();

        let settings = GameSettings::load_from(&path);
        assert_eq!(settings.movement.acceleration_curve.keys().len(), 2);

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }
}
