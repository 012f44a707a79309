use std::collections::HashSet;

use super::types::{InputEvent, Key, KeyState};

/// Instantaneous key-state query.
///
/// The frame loop only ever asks "is this key held right now"; anything that
/// can answer that (live window state, a scripted test double) can drive input
/// handling.
pub trait KeyQuery {
    fn is_down(&self, key: Key) -> bool;
}

/// Current input state for the window.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the held-key set.
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Key releases are not delivered to unfocused windows.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    self.keys_down.insert(*key);
                }
                KeyState::Released => {
                    self.keys_down.remove(key);
                }
            },
        }
    }
}

impl KeyQuery for InputState {
    fn is_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}
