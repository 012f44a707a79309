use crate::window::Host;

use super::state::KeyQuery;
use super::types::Key;

/// Something a key can trigger.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Action {
    /// Request the window to close; the loop terminates before the next draw.
    Close,
}

/// Key → action table consulted once per frame.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<(Key, Action)>,
}

impl KeyBindings {
    /// A table with no bindings at all.
    pub fn empty() -> Self {
        Self { bindings: Vec::new() }
    }

    /// Adds `key → action`. Binding the same pair twice is a no-op.
    pub fn bind(mut self, key: Key, action: Action) -> Self {
        if !self.bindings.contains(&(key, action)) {
            self.bindings.push((key, action));
        }
        self
    }

    /// Removes every binding for `key`.
    pub fn unbind(mut self, key: Key) -> Self {
        self.bindings.retain(|(k, _)| *k != key);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Key, Action)> {
        self.bindings.iter()
    }

    /// Actions whose key is currently held, in binding order.
    pub fn active<K: KeyQuery + ?Sized>(&self, keys: &K) -> Vec<Action> {
        self.bindings
            .iter()
            .filter(|(key, _)| keys.is_down(*key))
            .map(|(_, action)| *action)
            .collect()
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::empty().bind(Key::Escape, Action::Close)
    }
}

/// Polls every bound key and applies the triggered actions to `host`.
///
/// State is sampled as-is each call; there is no debouncing or repeat filter.
pub fn process_input<K: KeyQuery + ?Sized>(keys: &K, bindings: &KeyBindings, host: &mut Host) {
    for action in bindings.active(keys) {
        match action {
            Action::Close => {
                if !host.should_close() {
                    log::info!("close requested from keyboard");
                }
                host.request_close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    struct Held(HashSet<Key>);

    impl KeyQuery for Held {
        fn is_down(&self, key: Key) -> bool {
            self.0.contains(&key)
        }
    }

    fn held(keys: &[Key]) -> Held {
        Held(keys.iter().copied().collect())
    }

    #[test]
    fn escape_requests_close_by_default() {
        let mut host = Host::new(800, 600);
        process_input(&held(&[Key::Escape]), &KeyBindings::default(), &mut host);
        assert!(host.should_close());
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut host = Host::new(800, 600);
        process_input(&held(&[Key::Q, Key::Space]), &KeyBindings::default(), &mut host);
        assert!(!host.should_close());
    }

    #[test]
    fn extra_binding_closes_without_touching_the_loop() {
        let bindings = KeyBindings::default().bind(Key::Q, Action::Close);
        let mut host = Host::new(800, 600);
        process_input(&held(&[Key::Q]), &bindings, &mut host);
        assert!(host.should_close());
    }

    #[test]
    fn unbinding_escape_disables_it() {
        let bindings = KeyBindings::default().unbind(Key::Escape);
        let mut host = Host::new(800, 600);
        process_input(&held(&[Key::Escape]), &bindings, &mut host);
        assert!(!host.should_close());
        assert_eq!(bindings.iter().count(), 0);
    }

    #[test]
    fn duplicate_bind_is_ignored() {
        let bindings = KeyBindings::default().bind(Key::Escape, Action::Close);
        assert_eq!(bindings.iter().count(), 1);
    }
}
