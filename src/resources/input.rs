//! Platform-agnostic input system
//!
//! Defines keyboard types and a per-frame state container that do not depend
//! on any windowing library. Platform adapters (see `app::input_adapter`)
//! translate their events into these types.

use std::collections::HashSet;

/// Keyboard key enumeration (platform-agnostic)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    // Number row
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,

    // Numpad
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,

    // Letters used by the demo and by custom bindings
    A,
    D,
    E,
    Q,
    S,
    W,

    // Control keys
    Space,
    Enter,
    Escape,
}

impl Key {
    /// The character a browser would report as `KeyboardEvent.key` for this
    /// key, ignoring modifiers. Digits on the number row and on the numpad
    /// share a symbol.
    #[must_use]
    pub fn symbol(self) -> Option<char> {
        let c = match self {
            Key::Key0 | Key::Numpad0 => '0',
            Key::Key1 | Key::Numpad1 => '1',
            Key::Key2 | Key::Numpad2 => '2',
            Key::Key3 | Key::Numpad3 => '3',
            Key::Key4 | Key::Numpad4 => '4',
            Key::Key5 | Key::Numpad5 => '5',
            Key::Key6 | Key::Numpad6 => '6',
            Key::Key7 | Key::Numpad7 => '7',
            Key::Key8 | Key::Numpad8 => '8',
            Key::Key9 | Key::Numpad9 => '9',
            Key::A => 'a',
            Key::D => 'd',
            Key::E => 'e',
            Key::Q => 'q',
            Key::S => 's',
            Key::W => 'w',
            Key::Space => ' ',
            Key::Enter | Key::Escape => return None,
        };
        Some(c)
    }

    /// Inverse of [`Key::symbol`], preferring the number row for digits.
    /// Case sensitive: `'W'` is not a symbol any key produces.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Key> {
        let key = match symbol {
            '0' => Key::Key0,
            '1' => Key::Key1,
            '2' => Key::Key2,
            '3' => Key::Key3,
            '4' => Key::Key4,
            '5' => Key::Key5,
            '6' => Key::Key6,
            '7' => Key::Key7,
            '8' => Key::Key8,
            '9' => Key::Key9,
            'a' => Key::A,
            'd' => Key::D,
            'e' => Key::E,
            'q' => Key::Q,
            's' => Key::S,
            'w' => Key::W,
            ' ' => Key::Space,
            _ => return None,
        };
        Some(key)
    }
}

/// Button state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Per-frame keyboard state container.
///
/// Key-down events are edge triggered: OS key repeat while a key is held
/// does not produce a second "just pressed" entry.
#[derive(Debug, Clone, Default)]
pub struct Input {
    pressed_keys: HashSet<Key>,
    just_pressed_keys: Vec<Key>,
    just_released_keys: HashSet<Key>,
}

impl Input {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== System API (called by the frame loop / adapter) ==========

    /// Clears transient state at the start of each frame.
    pub fn start_frame(&mut self) {
        self.just_pressed_keys.clear();
        self.just_released_keys.clear();
    }

    /// Injects a keyboard event
    pub fn inject_key(&mut self, key: Key, state: ButtonState) {
        match state {
            ButtonState::Pressed => {
                if self.pressed_keys.insert(key) {
                    self.just_pressed_keys.push(key);
                }
            }
            ButtonState::Released => {
                if self.pressed_keys.remove(&key) {
                    self.just_released_keys.insert(key);
                }
            }
        }
    }

    // ========== User API ==========

    /// Checks whether a key is currently held down
    #[must_use]
    pub fn get_key(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Checks whether a key was just pressed this frame
    #[must_use]
    pub fn get_key_down(&self, key: Key) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    /// Checks whether a key was just released this frame
    #[must_use]
    pub fn get_key_up(&self, key: Key) -> bool {
        self.just_released_keys.contains(&key)
    }

    /// Keys pressed this frame, in arrival order.
    pub fn keys_down(&self) -> impl Iterator<Item = Key> + '_ {
        self.just_pressed_keys.iter().copied()
    }
}
