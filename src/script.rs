//! Scripted input for the headless session

use glam::Vec2;
use showdown_game::InputAdapter;
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// One raw input event
#[derive(Debug, Clone, Copy)]
pub enum ScriptedInput {
    Key(KeyCode, bool),
    Mouse(f64, f64),
    LeftStick(Vec2),
    CaptureCursor,
}

/// Input events ordered by the time they fire
pub struct InputScript {
    steps: Vec<(f32, ScriptedInput)>,
    next: usize,
}

impl InputScript {
    pub fn new(mut steps: Vec<(f32, ScriptedInput)>) -> Self {
        steps.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { steps, next: 0 }
    }

    /// Tour of the demo map: turn toward the ramps, walk, jump, dash,
    /// ground dash from the top of a jump, strafe, then stop.
    pub fn demo() -> Self {
        use ScriptedInput::*;

        let press = |at: f32, key: KeyCode| [(at, Key(key, true)), (at + 0.05, Key(key, false))];

        let mut steps = vec![
            (0.0, CaptureCursor),
            // 900 px at 0.1 deg/px turns to face -X
            (0.1, Mouse(-900.0, 0.0)),
            (0.3, Key(KeyCode::KeyW, true)),
            (4.0, Key(KeyCode::KeyD, true)),
            (4.6, Key(KeyCode::KeyD, false)),
            (5.0, Key(KeyCode::KeyW, false)),
            (5.5, LeftStick(Vec2::new(0.0, 1.0))),
            (6.5, LeftStick(Vec2::ZERO)),
        ];
        steps.extend(press(1.2, KeyCode::Space));
        steps.extend(press(2.0, KeyCode::ShiftLeft));
        steps.extend(press(3.0, KeyCode::Space));
        steps.extend(press(3.3, KeyCode::ControlLeft));
        Self::new(steps)
    }

    /// Time of the last scripted event
    pub fn duration(&self) -> f32 {
        self.steps.last().map_or(0.0, |(at, _)| *at)
    }

    /// Feed every event due by `now` into the adapter
    pub fn apply(&mut self, now: f32, input: &mut InputAdapter) {
        while let Some((at, step)) = self.steps.get(self.next) {
            if *at > now {
                break;
            }
            match *step {
                ScriptedInput::Key(code, pressed) => {
                    let state = if pressed {
                        ElementState::Pressed
                    } else {
                        ElementState::Released
                    };
                    input.handle_keyboard(PhysicalKey::Code(code), state);
                }
                ScriptedInput::Mouse(x, y) => input.handle_mouse_motion((x, y)),
                ScriptedInput::LeftStick(value) => input.handle_left_stick(value),
                ScriptedInput::CaptureCursor => input.set_cursor_captured(true),
            }
            self.next += 1;
        }
    }
}
