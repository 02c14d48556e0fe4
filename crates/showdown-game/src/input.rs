//! Input adapter with action-based mapping
//!
//! Turns raw keyboard, mouse and gamepad events into the per-tick
//! [`MovementInput`] the locomotion machine consumes, plus a look delta
//! for the camera rig.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::locomotion::MovementInput;

/// Game actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    /// Move forward (W by default)
    MoveForward,
    /// Move backward (S by default)
    MoveBackward,
    /// Move left (A by default)
    MoveLeft,
    /// Move right (D by default)
    MoveRight,
    /// Jump (Space by default)
    Jump,
    /// Dash (Left Shift by default)
    Dash,
    /// Ground dash (Left Ctrl by default)
    GroundDash,
    /// Capture or release the cursor (F1 by default)
    ToggleCursor,
}

/// Gamepad buttons, in positional naming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamepadButton {
    South,
    East,
    West,
    North,
    LeftShoulder,
    RightShoulder,
}

/// Input adapter tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Degrees of look per pixel of mouse motion
    pub mouse_sensitivity: f32,
    /// Invert vertical look
    pub invert_y: bool,
    /// Degrees per second of look at full right-stick deflection
    pub gamepad_look_scale: f32,
    /// Stick deflection ignored as noise
    pub stick_deadzone: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.1,
            invert_y: false,
            gamepad_look_scale: 80.0,
            stick_deadzone: 0.1,
        }
    }
}

/// Current state of all inputs for a frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Actions currently held down
    pub held: HashSet<InputAction>,
    /// Actions that were just pressed this frame
    pub just_pressed: HashSet<InputAction>,
    /// Mouse look accumulated this frame, already scaled
    pub mouse_delta: Vec2,
    /// Left stick deflection
    pub left_stick: Vec2,
    /// Right stick deflection
    pub right_stick: Vec2,
    /// Whether the cursor is captured (invisible, locked)
    pub cursor_captured: bool,
}

impl InputState {
    /// Create a new empty input state
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an action is currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn is_just_pressed(&self, action: InputAction) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Clear frame-specific data (call at end of frame)
    pub fn clear_frame(&mut self) {
        self.just_pressed.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    fn press(&mut self, action: InputAction) {
        if !self.held.contains(&action) {
            self.just_pressed.insert(action);
        }
        self.held.insert(action);
    }

    fn release(&mut self, action: InputAction) {
        self.held.remove(&action);
    }

    fn axis(&self, positive: InputAction, negative: InputAction) -> f32 {
        let mut value = 0.0;
        if self.is_held(positive) {
            value += 1.0;
        }
        if self.is_held(negative) {
            value -= 1.0;
        }
        value
    }
}

/// Binding of a physical control to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputBinding {
    /// Keyboard key
    Key(KeyCode),
    /// Gamepad button
    Gamepad(GamepadButton),
}

impl From<KeyCode> for InputBinding {
    fn from(key: KeyCode) -> Self {
        Self::Key(key)
    }
}

impl From<GamepadButton> for InputBinding {
    fn from(button: GamepadButton) -> Self {
        Self::Gamepad(button)
    }
}

/// Maps physical inputs to game actions
#[derive(Debug, Clone)]
pub struct InputBindings {
    /// Control to action mappings
    bindings: HashMap<InputBinding, InputAction>,
    /// Reverse lookup: action to all bindings
    reverse: HashMap<InputAction, Vec<InputBinding>>,
}

impl Default for InputBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
            reverse: HashMap::new(),
        };

        bindings.bind(KeyCode::KeyW, InputAction::MoveForward);
        bindings.bind(KeyCode::KeyS, InputAction::MoveBackward);
        bindings.bind(KeyCode::KeyA, InputAction::MoveLeft);
        bindings.bind(KeyCode::KeyD, InputAction::MoveRight);

        // Arrow keys as alternative
        bindings.bind(KeyCode::ArrowUp, InputAction::MoveForward);
        bindings.bind(KeyCode::ArrowDown, InputAction::MoveBackward);
        bindings.bind(KeyCode::ArrowLeft, InputAction::MoveLeft);
        bindings.bind(KeyCode::ArrowRight, InputAction::MoveRight);

        bindings.bind(KeyCode::Space, InputAction::Jump);
        bindings.bind(KeyCode::ShiftLeft, InputAction::Dash);
        bindings.bind(KeyCode::ControlLeft, InputAction::GroundDash);
        bindings.bind(KeyCode::F1, InputAction::ToggleCursor);

        bindings.bind(GamepadButton::RightShoulder, InputAction::Jump);
        bindings.bind(GamepadButton::West, InputAction::Dash);
        bindings.bind(GamepadButton::East, InputAction::GroundDash);

        bindings
    }
}

impl InputBindings {
    /// Bind a key or gamepad button to an action
    pub fn bind(&mut self, control: impl Into<InputBinding>, action: InputAction) {
        let binding = control.into();
        if let Some(previous) = self.bindings.insert(binding, action) {
            if let Some(list) = self.reverse.get_mut(&previous) {
                list.retain(|b| *b != binding);
            }
        }
        self.reverse.entry(action).or_default().push(binding);
    }

    /// Remove whatever a control is bound to
    pub fn unbind(&mut self, control: impl Into<InputBinding>) {
        let binding = control.into();
        if let Some(action) = self.bindings.remove(&binding) {
            if let Some(bindings) = self.reverse.get_mut(&action) {
                bindings.retain(|b| *b != binding);
            }
        }
    }

    /// Get the action for a binding, if any
    pub fn get_action(&self, binding: &InputBinding) -> Option<InputAction> {
        self.bindings.get(binding).copied()
    }

    /// Get the action for a key, if any
    pub fn get_key_action(&self, key: KeyCode) -> Option<InputAction> {
        self.get_action(&InputBinding::Key(key))
    }

    /// All controls bound to an action
    pub fn bindings_for(&self, action: InputAction) -> &[InputBinding] {
        self.reverse.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Look delta for the camera, in degrees (x = yaw right, y = pitch down)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LookInput {
    pub delta: Vec2,
}

/// Everything sampled for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub movement: MovementInput,
    pub look: LookInput,
}

/// Input adapter that processes raw events and samples frames
#[derive(Debug, Default)]
pub struct InputAdapter {
    /// Current input state
    pub state: InputState,
    /// Input bindings
    pub bindings: InputBindings,
    pub config: InputConfig,
}

impl InputAdapter {
    /// Create an adapter with default bindings
    pub fn new(config: InputConfig) -> Self {
        Self {
            state: InputState::new(),
            bindings: InputBindings::default(),
            config,
        }
    }

    /// Handle a keyboard event
    pub fn handle_keyboard(&mut self, physical_key: PhysicalKey, element_state: ElementState) {
        if let PhysicalKey::Code(key_code) = physical_key {
            if let Some(action) = self.bindings.get_key_action(key_code) {
                self.apply(action, element_state.is_pressed());
            }
        }
    }

    /// Handle a gamepad button event
    pub fn handle_gamepad_button(&mut self, button: GamepadButton, pressed: bool) {
        if let Some(action) = self.bindings.get_action(&InputBinding::Gamepad(button)) {
            self.apply(action, pressed);
        }
    }

    /// Handle mouse movement in pixels
    pub fn handle_mouse_motion(&mut self, delta: (f64, f64)) {
        if self.state.cursor_captured {
            let y_mult = if self.config.invert_y { -1.0 } else { 1.0 };
            self.state.mouse_delta += Vec2::new(
                delta.0 as f32 * self.config.mouse_sensitivity,
                delta.1 as f32 * self.config.mouse_sensitivity * y_mult,
            );
        }
    }

    /// Left stick position, y up
    pub fn handle_left_stick(&mut self, value: Vec2) {
        self.state.left_stick = value;
    }

    /// Right stick position, y up
    pub fn handle_right_stick(&mut self, value: Vec2) {
        self.state.right_stick = value;
    }

    /// Set cursor capture state
    pub fn set_cursor_captured(&mut self, captured: bool) {
        self.state.cursor_captured = captured;
    }

    /// Sample this frame's input and clear the edge triggers
    pub fn sample(&mut self, dt: f32) -> FrameInput {
        if self.state.is_just_pressed(InputAction::ToggleCursor) {
            self.state.cursor_captured = !self.state.cursor_captured;
            debug!("Cursor captured: {}", self.state.cursor_captured);
        }

        let frame = FrameInput {
            movement: MovementInput {
                move_axes: self.move_axes(),
                jump_pressed: self.state.is_just_pressed(InputAction::Jump),
                dash_pressed: self.state.is_just_pressed(InputAction::Dash),
                ground_dash_pressed: self.state.is_just_pressed(InputAction::GroundDash),
            },
            look: LookInput {
                delta: self.state.mouse_delta + self.stick_look(dt),
            },
        };

        self.state.clear_frame();
        frame
    }

    fn apply(&mut self, action: InputAction, pressed: bool) {
        if pressed {
            self.state.press(action);
        } else {
            self.state.release(action);
        }
    }

    /// The stick wins over keys when deflected; both give unit-length directions
    fn move_axes(&self) -> Vec2 {
        let stick = self.state.left_stick;
        if stick.length() > self.config.stick_deadzone {
            return stick.normalize();
        }

        Vec2::new(
            self.state.axis(InputAction::MoveRight, InputAction::MoveLeft),
            self.state.axis(InputAction::MoveForward, InputAction::MoveBackward),
        )
        .normalize_or_zero()
    }

    fn stick_look(&self, dt: f32) -> Vec2 {
        let stick = self.state.right_stick;
        if stick.length() <= self.config.stick_deadzone {
            return Vec2::ZERO;
        }
        let y_mult = if self.config.invert_y { -1.0 } else { 1.0 };
        // Stick up looks up, which is a negative pitch delta
        Vec2::new(stick.x, -stick.y * y_mult) * dt * self.config.gamepad_look_scale
    }
}
