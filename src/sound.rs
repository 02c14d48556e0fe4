//! Locomotion sound cues played through the audio engine

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use showdown_audio::{AudioEngine, SfxProperties, ShakeSettings};
use showdown_game::{SoundCue, SoundEmitter};
use tracing::{info, warn};

/// Which effect each locomotion cue plays
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundBank {
    pub jump: SfxProperties,
    pub ground_dash_land: SfxProperties,
}

impl Default for SoundBank {
    fn default() -> Self {
        Self {
            jump: SfxProperties {
                clips: vec![
                    PathBuf::from("assets/sfx/jump_01.ogg"),
                    PathBuf::from("assets/sfx/jump_02.ogg"),
                ],
                pitch_range: [0.95, 1.05],
                ..Default::default()
            },
            ground_dash_land: SfxProperties {
                volume: 1.0,
                ..SfxProperties::single("assets/sfx/ground_dash_land.ogg")
            },
        }
    }
}

impl SoundBank {
    pub fn get(&self, cue: SoundCue) -> &SfxProperties {
        match cue {
            SoundCue::Jump => &self.jump,
            SoundCue::GroundDashLand => &self.ground_dash_land,
        }
    }
}

/// A shake started by a cue, waiting for the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingShake {
    pub origin: Vec3,
    pub shake: ShakeSettings,
    pub max_distance: f32,
}

impl PendingShake {
    /// Shake as felt from `eye`
    pub fn felt_from(&self, eye: Vec3) -> ShakeSettings {
        ShakeSettings {
            strength: self.shake.strength_at(eye.distance(self.origin), self.max_distance),
            ..self.shake
        }
    }
}

/// Shakes queued by the emitter and drained by the session
pub type ShakeQueue = Rc<RefCell<Vec<PendingShake>>>;

/// Plays cues on a shared audio engine, or logs them when there is none
pub struct CueSound {
    engine: Option<Rc<RefCell<AudioEngine>>>,
    bank: SoundBank,
    shakes: ShakeQueue,
}

impl CueSound {
    pub fn new(engine: Option<Rc<RefCell<AudioEngine>>>, bank: SoundBank, shakes: ShakeQueue) -> Self {
        Self { engine, bank, shakes }
    }
}

impl SoundEmitter for CueSound {
    fn emit(&mut self, cue: SoundCue, position: Vec3, spatialize: bool) {
        let props = self.bank.get(cue);

        match &self.engine {
            Some(engine) => {
                let mut engine = engine.borrow_mut();
                let result = if spatialize {
                    engine.play_sfx_at(props, position)
                } else {
                    engine.play_sfx(props)
                };
                if let Err(e) = result {
                    warn!("Failed to play {:?}: {}", cue, e);
                }
            }
            None => {
                info!("Sound {:?} at ({:.2}, {:.2}, {:.2})", cue, position.x, position.y, position.z);
            }
        }

        if props.shake.is_enabled() {
            self.shakes.borrow_mut().push(PendingShake {
                origin: position,
                shake: props.shake,
                max_distance: props.max_distance,
            });
        }
    }
}
