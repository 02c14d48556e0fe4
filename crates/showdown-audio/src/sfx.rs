use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec3;
use kira::manager::backend::DefaultBackend;
use kira::manager::{AudioManager, AudioManagerSettings};
use kira::sound::static_sound::{StaticSoundData, StaticSoundSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::AudioConfig;
use crate::error::AudioError;
use crate::properties::SfxProperties;
use crate::spatial::{self, Listener, SpatialParams};

/// Fire-and-forget sound effects over kira, positioned against one listener.
///
/// Decoded clips are cached by path; clip and pitch are picked per play.
pub struct AudioEngine {
    manager: AudioManager<DefaultBackend>,
    cache: HashMap<PathBuf, StaticSoundData>,
    listener: Listener,
    sfx_volume: f64,
    rng: StdRng,
}

impl AudioEngine {
    pub fn new(config: AudioConfig) -> Result<Self, AudioError> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| AudioError::InitFailed(e.to_string()))?;

        let sfx_volume = config.effective_sfx_volume();
        info!("Audio engine initialized (sfx volume {:.2})", sfx_volume);

        Ok(Self {
            manager,
            cache: HashMap::new(),
            listener: Listener::default(),
            sfx_volume,
            rng: StdRng::from_entropy(),
        })
    }

    /// Play an effect at full volume, centered.
    pub fn play_sfx(&mut self, props: &SfxProperties) -> Result<(), AudioError> {
        self.play_with(props, SpatialParams { volume: 1.0, panning: 0.0 })
    }

    /// Play an effect attenuated and panned for the listener. Out of range is a no-op.
    pub fn play_sfx_at(&mut self, props: &SfxProperties, position: Vec3) -> Result<(), AudioError> {
        let params = spatial::compute_spatial(&self.listener, position, props.max_distance);
        if params.volume <= 0.0 {
            debug!("Skipping inaudible effect at {:?}", position);
            return Ok(());
        }
        self.play_with(props, params)
    }

    pub fn set_listener(&mut self, position: Vec3, forward: Vec3, up: Vec3) {
        self.listener = Listener { position, forward, up };
    }

    fn play_with(&mut self, props: &SfxProperties, params: SpatialParams) -> Result<(), AudioError> {
        let path = props.pick_clip(&mut self.rng)?.to_path_buf();
        let pitch = props.pick_pitch(&mut self.rng);
        let data = self.load_or_cache(&path)?;

        let settings = StaticSoundSettings::new()
            .volume(self.sfx_volume * props.volume * params.volume)
            // kira pans over 0..1 with 0.5 centered
            .panning((params.panning + 1.0) / 2.0)
            .playback_rate(pitch);
        self.manager
            .play(data.with_settings(settings))
            .map_err(|e| AudioError::PlaybackFailed(e.to_string()))?;
        Ok(())
    }

    fn load_or_cache(&mut self, path: &Path) -> Result<StaticSoundData, AudioError> {
        if let Some(data) = self.cache.get(path) {
            return Ok(data.clone());
        }
        let data = StaticSoundData::from_file(path)
            .map_err(|e| AudioError::LoadFailed(path.to_path_buf(), e.to_string()))?;
        self.cache.insert(path.to_path_buf(), data.clone());
        Ok(data)
    }
}
