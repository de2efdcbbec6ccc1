//! Input sampling — key events in, per-tick movement intent out

use std::collections::{HashMap, HashSet};
use winit::keyboard::KeyCode;

pub const ACTION_FORWARD: &str = "move_forward";
pub const ACTION_BACKWARD: &str = "move_backward";
pub const ACTION_LEFT: &str = "turn_left";
pub const ACTION_RIGHT: &str = "turn_right";
pub const ACTION_RUN: &str = "run";

/// Directional intent for one simulation tick.
///
/// Produced only by [`InputState::sample_intent`]; the simulation step reads
/// it and never writes it back.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub run: bool,
}

impl MovementIntent {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }

    pub fn forward() -> Self {
        Self {
            forward: true,
            ..Self::default()
        }
    }
}

/// Tracks which keys are held and maps them to movement actions.
///
/// Key events are the only writers. Once [`detach`](Self::detach) is called
/// further events are dropped, so nothing keeps mutating state after the
/// owning controller has been torn down.
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    action_map: HashMap<String, Vec<KeyCode>>,
    attached: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            action_map: Self::default_action_map(),
            attached: true,
        }
    }

    fn default_action_map() -> HashMap<String, Vec<KeyCode>> {
        let mut map = HashMap::new();
        map.insert(ACTION_FORWARD.into(), vec![KeyCode::KeyW, KeyCode::ArrowUp]);
        map.insert(ACTION_BACKWARD.into(), vec![KeyCode::KeyS, KeyCode::ArrowDown]);
        map.insert(ACTION_LEFT.into(), vec![KeyCode::KeyA, KeyCode::ArrowLeft]);
        map.insert(ACTION_RIGHT.into(), vec![KeyCode::KeyD, KeyCode::ArrowRight]);
        map.insert(ACTION_RUN.into(), vec![KeyCode::ShiftLeft, KeyCode::ShiftRight]);
        map
    }

    /// Bind an action to one or more keys, replacing the previous binding
    pub fn bind_action(&mut self, action: impl Into<String>, keys: Vec<KeyCode>) {
        self.action_map.insert(action.into(), keys);
    }

    /// Process a key press event
    pub fn process_key_down(&mut self, key: KeyCode) {
        if !self.attached {
            tracing::trace!("dropping key down {:?} after detach", key);
            return;
        }
        self.keys_down.insert(key);
    }

    /// Process a key release event
    pub fn process_key_up(&mut self, key: KeyCode) {
        if !self.attached {
            return;
        }
        self.keys_down.remove(&key);
    }

    /// Release every held key (e.g. on window focus loss)
    pub fn release_all(&mut self) {
        self.keys_down.clear();
    }

    /// Stop listening. Held keys are released and later events are ignored.
    pub fn detach(&mut self) {
        self.attached = false;
        self.keys_down.clear();
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Is a key currently held down?
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Is an action currently held? (any bound key is down)
    pub fn is_action_pressed(&self, action: &str) -> bool {
        self.action_map
            .get(action)
            .map(|keys| keys.iter().any(|k| self.keys_down.contains(k)))
            .unwrap_or(false)
    }

    /// Snapshot the held actions as this tick's movement intent
    pub fn sample_intent(&self) -> MovementIntent {
        MovementIntent {
            forward: self.is_action_pressed(ACTION_FORWARD),
            backward: self.is_action_pressed(ACTION_BACKWARD),
            left: self.is_action_pressed(ACTION_LEFT),
            right: self.is_action_pressed(ACTION_RIGHT),
            run: self.is_action_pressed(ACTION_RUN),
        }
    }
}

/// Parse a key name as written in config files (`"KeyW"`, `"ArrowUp"`, `"ShiftLeft"`).
///
/// Single letters and digits are accepted as shorthand (`"w"`, `"1"`).
pub fn key_from_name(name: &str) -> Option<KeyCode> {
    let trimmed = name.trim();
    let key = match trimmed {
        "ArrowUp" | "Up" => KeyCode::ArrowUp,
        "ArrowDown" | "Down" => KeyCode::ArrowDown,
        "ArrowLeft" | "Left" => KeyCode::ArrowLeft,
        "ArrowRight" | "Right" => KeyCode::ArrowRight,
        "ShiftLeft" | "Shift" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" | "Ctrl" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "Space" => KeyCode::Space,
        _ => {
            let letter = trimmed.strip_prefix("Key").unwrap_or(trimmed);
            let digit = trimmed.strip_prefix("Digit").unwrap_or(trimmed);
            if letter.len() == 1 {
                return letter_key(letter.chars().next()?.to_ascii_uppercase())
                    .or_else(|| digit_key(letter.chars().next()?));
            }
            if digit.len() == 1 {
                return digit_key(digit.chars().next()?);
            }
            return None;
        }
    };
    Some(key)
}

fn letter_key(c: char) -> Option<KeyCode> {
    let key = match c {
        'A' => KeyCode::KeyA,
        'B' => KeyCode::KeyB,
        'C' => KeyCode::KeyC,
        'D' => KeyCode::KeyD,
        'E' => KeyCode::KeyE,
        'F' => KeyCode::KeyF,
        'G' => KeyCode::KeyG,
        'H' => KeyCode::KeyH,
        'I' => KeyCode::KeyI,
        'J' => KeyCode::KeyJ,
        'K' => KeyCode::KeyK,
        'L' => KeyCode::KeyL,
        'M' => KeyCode::KeyM,
        'N' => KeyCode::KeyN,
        'O' => KeyCode::KeyO,
        'P' => KeyCode::KeyP,
        'Q' => KeyCode::KeyQ,
        'R' => KeyCode::KeyR,
        'S' => KeyCode::KeyS,
        'T' => KeyCode::KeyT,
        'U' => KeyCode::KeyU,
        'V' => KeyCode::KeyV,
        'W' => KeyCode::KeyW,
        'X' => KeyCode::KeyX,
        'Y' => KeyCode::KeyY,
        'Z' => KeyCode::KeyZ,
        _ => return None,
    };
    Some(key)
}

fn digit_key(c: char) -> Option<KeyCode> {
    let key = match c {
        '0' => KeyCode::Digit0,
        '1' => KeyCode::Digit1,
        '2' => KeyCode::Digit2,
        '3' => KeyCode::Digit3,
        '4' => KeyCode::Digit4,
        '5' => KeyCode::Digit5,
        '6' => KeyCode::Digit6,
        '7' => KeyCode::Digit7,
        '8' => KeyCode::Digit8,
        '9' => KeyCode::Digit9,
        _ => return None,
    };
    Some(key)
}
