//! Showdown - Movement prototype
//!
//! Runs a headless session: a scripted player tours a small test map while
//! the locomotion machine, the character body and the camera rig run at
//! their real rates. Everything interesting is logged.

mod script;
mod settings;
mod sound;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec3;
use showdown_audio::AudioEngine;
use showdown_core::GameTime;
use showdown_game::{CameraRig, InputAdapter, Locomotion, LocomotionEvent};
use showdown_physics::{CharacterBody, MapGeometry, MapLayers};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::script::InputScript;
use crate::settings::GameSettings;
use crate::sound::{CueSound, ShakeQueue};

/// Simulated display refresh rate
const FRAME_RATE: f32 = 144.0;
/// Extra time simulated after the last scripted input
const SETTLE_TIME: f32 = 1.5;
const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 0.1, 0.0);

/// Session state
struct ShowdownApp {
    map: Arc<MapGeometry>,
    body: CharacterBody,
    locomotion: Locomotion,
    camera: CameraRig,
    input: InputAdapter,
    audio: Option<Rc<RefCell<AudioEngine>>>,
    shakes: ShakeQueue,
    game_time: GameTime,
    jumps: u32,
}

impl ShowdownApp {
    fn new(settings: &GameSettings) -> Result<Self> {
        let map = Arc::new(build_demo_map());

        let mut body = CharacterBody::with_config(settings.body.clone());
        body.spawn(SPAWN_POSITION);

        let audio = match AudioEngine::new(settings.audio.clone()) {
            Ok(engine) => Some(Rc::new(RefCell::new(engine))),
            Err(e) => {
                warn!("Audio unavailable, logging sounds instead: {}", e);
                None
            }
        };
        let shakes = ShakeQueue::default();
        let sound = CueSound::new(audio.clone(), settings.sounds.clone(), shakes.clone());

        let mut locomotion = Locomotion::new(settings.movement.clone(), map.clone(), Box::new(sound))
            .context("Invalid movement settings")?;
        locomotion.sync_body(body.position, body.velocity);

        let camera = CameraRig::new(settings.camera.clone()).context("Invalid camera settings")?;

        Ok(Self {
            map,
            body,
            locomotion,
            camera,
            input: InputAdapter::new(settings.input.clone()),
            audio,
            shakes,
            game_time: GameTime::new(settings.time.clone()),
            jumps: 0,
        })
    }

    fn update(&mut self, raw_delta: f32) -> Result<()> {
        self.game_time.update(raw_delta);
        let dt = self.game_time.delta_time;

        let frame = self.input.sample(dt);
        self.camera.queue_look(frame.look.delta);
        self.locomotion.advance(dt, &frame.movement, &mut self.camera);

        for _ in 0..self.game_time.fixed_steps() {
            let velocity = self.locomotion.fixed_advance();
            self.body.step(&self.map, velocity, self.game_time.fixed_delta());
            self.locomotion.sync_body(self.body.position, self.body.velocity);
        }

        self.apply_shakes();

        let pose = self.camera.pose(self.body.position);
        if let Some(audio) = &self.audio {
            audio.borrow_mut().set_listener(pose.position, pose.forward(), pose.up());
        }

        for event in self.locomotion.drain_events() {
            if matches!(event, LocomotionEvent::Jumped { .. }) {
                self.jumps += 1;
            }
            info!("{}", serde_json::to_string(&event)?);
        }

        debug!(
            "t={:.3} pos=({:.2}, {:.2}, {:.2}) fov={:.1} roll={:.2} speedlines={:.2}",
            self.game_time.total_time,
            self.body.position.x,
            self.body.position.y,
            self.body.position.z,
            pose.fov,
            pose.roll,
            pose.speedlines
        );
        Ok(())
    }

    /// Hand shakes from this frame's sounds to the camera, scaled by distance
    fn apply_shakes(&mut self) {
        let eye = self.camera.eye_position(self.body.position);
        for pending in self.shakes.borrow_mut().drain(..) {
            let felt = pending.felt_from(eye);
            debug!("Camera shake {:.2} for {:.2}s", felt.strength, felt.duration);
            self.camera.shake(felt.duration, felt.strength, felt.vibrato);
        }
    }
}

/// Floor, a walkable ramp, a wall-steep ramp and a low ceiling slab
fn build_demo_map() -> MapGeometry {
    let mut map = MapGeometry::new();
    map.create_ground(0.0);

    // 45 degrees, rising toward -X along the scripted path
    map.create_ramp(
        Vec3::new(4.0, 0.25, 3.0),
        Vec3::new(-16.0, 2.6, 0.0),
        45.0,
        MapLayers::GROUND,
    );
    // 70 degrees, too steep to stand on
    map.create_ramp(
        Vec3::new(3.0, 0.25, 3.0),
        Vec3::new(-6.0, 2.6, 10.0),
        70.0,
        MapLayers::STRUCTURE,
    );
    // Low enough to bump into when jumping underneath
    map.create_static_box(
        Vec3::new(2.0, 0.2, 3.0),
        Vec3::new(-7.0, 2.6, 0.0),
        MapLayers::STRUCTURE,
    );

    map.finalize();
    map
}

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Showdown movement session...");

    let settings = GameSettings::load();
    if std::env::args().any(|arg| arg == "--write-settings") {
        settings.save()?;
    }

    let mut app = ShowdownApp::new(&settings)?;
    let mut script = InputScript::demo();

    let frame_delta = 1.0 / FRAME_RATE;
    let end = script.duration() + SETTLE_TIME;
    let mut now = 0.0;
    while now < end {
        script.apply(now, &mut app.input);
        app.update(frame_delta)?;
        now += frame_delta;
    }

    info!(
        "Session finished after {} frames: {} jumps, final state {:?} at ({:.2}, {:.2}, {:.2})",
        app.game_time.frame_count,
        app.jumps,
        app.locomotion.state(),
        app.body.position.x,
        app.body.position.y,
        app.body.position.z
    );
    Ok(())
}
