//! Platform-agnostic input handling system
use serde::Deserialize;

/// Platform-independent input events. Key events carry the physical key
/// code named as in DOM `KeyboardEvent.code` ("KeyW", "Space", "ShiftLeft").
#[derive(Debug, Clone)]
pub enum InputEvent {
    // Keyboard events
    KeyDown(String),
    KeyUp(String),

    // Mouse events
    MouseMove { dx: f32, dy: f32 },

    // Window events
    FocusLost,
    VisibilityChanged { visible: bool },
    PointerLockChanged { locked: bool },
}

/// Direction a movement intent asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// What a bound key does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Intent),
    Reset,
}

/// Result of feeding one event to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Handled,
    /// The reset key went down; the camera must be reset now, not next tick.
    Reset,
}

/// Movement directions currently held down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementIntent {
    pub fn set(&mut self, intent: Intent, held: bool) {
        match intent {
            Intent::Forward => self.forward = held,
            Intent::Backward => self.backward = held,
            Intent::Left => self.left = held,
            Intent::Right => self.right = held,
            Intent::Up => self.up = held,
            Intent::Down => self.down = held,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

/// Key mapping configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub up: String,
    pub down: String,
    pub reset: String,
    pub escape: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: "KeyW".to_string(),
            backward: "KeyS".to_string(),
            left: "KeyA".to_string(),
            right: "KeyD".to_string(),
            up: "Space".to_string(),
            down: "ShiftLeft".to_string(),
            reset: "KeyR".to_string(),
            escape: "Escape".to_string(),
        }
    }
}

impl KeyBindings {
    pub fn action_for(&self, code: &str) -> Option<KeyAction> {
        let action = if code == self.forward {
            KeyAction::Move(Intent::Forward)
        } else if code == self.backward {
            KeyAction::Move(Intent::Backward)
        } else if code == self.left {
            KeyAction::Move(Intent::Left)
        } else if code == self.right {
            KeyAction::Move(Intent::Right)
        } else if code == self.up {
            KeyAction::Move(Intent::Up)
        } else if code == self.down {
            KeyAction::Move(Intent::Down)
        } else if code == self.reset {
            KeyAction::Reset
        } else {
            return None;
        };
        Some(action)
    }

    pub fn is_escape(&self, code: &str) -> bool {
        code == self.escape
    }

    /// Keys whose browser default (scrolling) should be suppressed.
    pub fn is_bound(&self, code: &str) -> bool {
        self.action_for(code).is_some()
    }
}

/// Unified input state: held intents, pointer lock and pending look delta
pub struct InputState {
    bindings: KeyBindings,
    pub intent: MovementIntent,
    pub look_delta: (f32, f32),
    pub pointer_locked: bool,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            intent: MovementIntent::default(),
            look_delta: (0.0, 0.0),
            pointer_locked: false,
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Process an input event and update state
    pub fn process_event(&mut self, event: &InputEvent) -> KeyOutcome {
        match event {
            InputEvent::KeyDown(code) => self.on_key_down(code),
            InputEvent::KeyUp(code) => self.on_key_up(code),
            InputEvent::MouseMove { dx, dy } => {
                if !self.pointer_locked {
                    return KeyOutcome::Ignored;
                }
                self.look_delta.0 += dx;
                self.look_delta.1 += dy;
                KeyOutcome::Handled
            }
            InputEvent::FocusLost | InputEvent::VisibilityChanged { .. } => {
                self.clear_intents();
                KeyOutcome::Handled
            }
            InputEvent::PointerLockChanged { locked } => {
                if self.pointer_locked != *locked {
                    tracing::debug!(locked, "pointer lock changed");
                }
                self.pointer_locked = *locked;
                if !locked {
                    self.look_delta = (0.0, 0.0);
                }
                KeyOutcome::Handled
            }
        }
    }

    pub fn on_key_down(&mut self, code: &str) -> KeyOutcome {
        match self.bindings.action_for(code) {
            Some(KeyAction::Move(intent)) => {
                self.intent.set(intent, true);
                KeyOutcome::Handled
            }
            Some(KeyAction::Reset) => KeyOutcome::Reset,
            None => KeyOutcome::Ignored,
        }
    }

    pub fn on_key_up(&mut self, code: &str) -> KeyOutcome {
        match self.bindings.action_for(code) {
            Some(KeyAction::Move(intent)) => {
                self.intent.set(intent, false);
                KeyOutcome::Handled
            }
            _ => KeyOutcome::Ignored,
        }
    }

    /// Whether look mode (pointer lock) is active. Movement only applies while engaged.
    pub fn is_engaged(&self) -> bool {
        self.pointer_locked
    }

    pub fn clear_intents(&mut self) {
        self.intent = MovementIntent::default();
    }

    pub fn consume_look(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.look_delta)
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    pub fn keyboard_event_to_input(e: &KeyboardEvent, is_down: bool) -> InputEvent {
        let code = e.code();
        if is_down {
            InputEvent::KeyDown(code)
        } else {
            InputEvent::KeyUp(code)
        }
    }

    pub fn mouse_move_to_input(e: &MouseEvent) -> InputEvent {
        InputEvent::MouseMove {
            dx: e.movement_x() as f32,
            dy: e.movement_y() as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> InputState {
        InputState::new(KeyBindings::default())
    }

    #[test]
    fn test_key_down_and_up_toggle_intent() {
        let mut input = tracker();
        assert_eq!(input.on_key_down("KeyW"), KeyOutcome::Handled);
        assert_eq!(input.on_key_down("ShiftLeft"), KeyOutcome::Handled);
        assert!(input.intent.forward);
        assert!(input.intent.down);

        input.on_key_up("KeyW");
        assert!(!input.intent.forward);
        assert!(input.intent.down);
    }

    #[test]
    fn test_unmapped_codes_are_ignored() {
        let mut input = tracker();
        assert_eq!(input.on_key_down("KeyQ"), KeyOutcome::Ignored);
        assert_eq!(input.on_key_up("F5"), KeyOutcome::Ignored);
        assert!(input.intent.is_idle());
    }

    #[test]
    fn test_reset_is_reported_not_stored() {
        let mut input = tracker();
        assert_eq!(input.on_key_down("KeyR"), KeyOutcome::Reset);
        assert_eq!(input.on_key_up("KeyR"), KeyOutcome::Ignored);
        assert!(input.intent.is_idle());
    }

    #[test]
    fn test_focus_loss_clears_intents() {
        let mut input = tracker();
        input.on_key_down("KeyA");
        input.on_key_down("Space");
        input.process_event(&InputEvent::FocusLost);
        assert!(input.intent.is_idle());

        input.on_key_down("KeyD");
        input.process_event(&InputEvent::VisibilityChanged { visible: false });
        assert!(input.intent.is_idle());
    }

    #[test]
    fn test_look_only_accumulates_while_engaged() {
        let mut input = tracker();
        input.process_event(&InputEvent::MouseMove { dx: 4.0, dy: 2.0 });
        assert_eq!(input.consume_look(), (0.0, 0.0));

        input.process_event(&InputEvent::PointerLockChanged { locked: true });
        assert!(input.is_engaged());
        input.process_event(&InputEvent::MouseMove { dx: 4.0, dy: 2.0 });
        input.process_event(&InputEvent::MouseMove { dx: 1.0, dy: -1.0 });
        assert_eq!(input.consume_look(), (5.0, 1.0));
        assert_eq!(input.consume_look(), (0.0, 0.0));
    }

    #[test]
    fn test_custom_bindings() {
        let bindings = KeyBindings {
            forward: "ArrowUp".into(),
            reset: "KeyH".into(),
            ..KeyBindings::default()
        };
        let mut input = InputState::new(bindings);
        input.on_key_down("ArrowUp");
        assert!(input.intent.forward);
        assert_eq!(input.on_key_down("KeyH"), KeyOutcome::Reset);
        assert_eq!(input.on_key_down("KeyR"), KeyOutcome::Ignored);
    }
}
