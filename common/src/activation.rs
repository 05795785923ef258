//! Hidden entry points for the game: the Konami code and the `initiate()` command.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Front-end neutral key press
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Char(char),
    Other,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    KonamiCode,
    Command,
}

pub const KONAMI_CODE: [Key; 10] = [
    Key::Up, Key::Up, Key::Down, Key::Down,
    Key::Left, Key::Right, Key::Left, Key::Right,
    Key::Char('b'), Key::Char('a'),
];

pub const COMMAND: &str = "initiate()";

/// Watches key presses for either activation sequence
#[derive(Debug, Default)]
pub struct Activation {
    konami_index: usize,
    /// Last typed characters, at most as many as `COMMAND` has
    typed: VecDeque<char>,
    active: bool,
}

impl Activation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Feed one key. Returns the trigger when a sequence just completed and
    /// the game was not already open.
    pub fn feed(&mut self, key: Key) -> Option<Trigger> {
        let konami = self.feed_konami(normalize(key));
        let command = self.feed_command(key);

        let trigger = if konami {
            Some(Trigger::KonamiCode)
        } else if command {
            Some(Trigger::Command)
        } else {
            None
        };

        trigger.and_then(|t| self.activate(t))
    }

    /// Open the game directly. None if it is already open.
    pub fn activate(&mut self, trigger: Trigger) -> Option<Trigger> {
        if self.active {
            log::info!("Easter egg already active");
            return None;
        }
        log::info!("Easter egg activated by {trigger:?}");
        self.active = true;
        Some(trigger)
    }

    /// The game was closed; sequences can open it again
    pub fn close(&mut self) {
        self.active = false;
    }

    fn feed_konami(&mut self, key: Key) -> bool {
        if key != KONAMI_CODE[self.konami_index] {
            self.konami_index = 0;
            return false;
        }
        self.konami_index += 1;
        if self.konami_index == KONAMI_CODE.len() {
            self.konami_index = 0;
            return true;
        }
        false
    }

    fn feed_command(&mut self, key: Key) -> bool {
        let Key::Char(c) = key else {
            return false;
        };
        self.typed.push_back(c);
        if self.typed.len() > COMMAND.chars().count() {
            self.typed.pop_front();
        }
        if self.typed.iter().copied().eq(COMMAND.chars()) {
            self.typed.clear();
            return true;
        }
        false
    }
}

/// Konami letters match either case
fn normalize(key: Key) -> Key {
    match key {
        Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(activation: &mut Activation, text: &str) -> Option<Trigger> {
        let mut last = None;
        for c in text.chars() {
            last = activation.feed(Key::Char(c));
        }
        last
    }

    #[test]
    fn test_konami_code_activates() {
        let mut activation = Activation::new();
        let results: Vec<_> = KONAMI_CODE.iter().map(|&k| activation.feed(k)).collect();

        assert!(results[..9].iter().all(Option::is_none));
        assert_eq!(results[9], Some(Trigger::KonamiCode));
        assert!(activation.is_active());
    }

    #[test]
    fn test_konami_accepts_uppercase_letters() {
        let mut activation = Activation::new();
        for &key in &KONAMI_CODE[..8] {
            activation.feed(key);
        }
        activation.feed(Key::Char('B'));
        assert_eq!(activation.feed(Key::Char('A')), Some(Trigger::KonamiCode));
    }

    #[test]
    fn test_wrong_key_resets_progress() {
        let mut activation = Activation::new();
        for &key in &KONAMI_CODE[..5] {
            activation.feed(key);
        }
        activation.feed(Key::Other);
        for &key in &KONAMI_CODE[5..] {
            assert_eq!(activation.feed(key), None);
        }
        assert!(!activation.is_active());
    }

    #[test]
    fn test_extra_up_breaks_sequence() {
        // The mismatching key is not counted as a new start
        let mut activation = Activation::new();
        activation.feed(Key::Up);
        activation.feed(Key::Up);
        activation.feed(Key::Up);
        for &key in &KONAMI_CODE[2..] {
            assert_eq!(activation.feed(key), None);
        }
    }

    #[test]
    fn test_command_activates_after_noise() {
        let mut activation = Activation::new();
        assert_eq!(type_str(&mut activation, "hello initiate()"), Some(Trigger::Command));
        assert!(activation.is_active());
    }

    #[test]
    fn test_non_ascii_keys_do_not_break_command() {
        let mut activation = Activation::new();
        activation.feed(Key::Char('é'));
        assert_eq!(type_str(&mut activation, "abcdefghij"), None);
        activation.feed(Key::Char('🌿'));
        assert_eq!(type_str(&mut activation, "ßinitiate()"), Some(Trigger::Command));
    }

    #[test]
    fn test_command_is_case_sensitive() {
        let mut activation = Activation::new();
        assert_eq!(type_str(&mut activation, "INITIATE()"), None);
        assert_eq!(type_str(&mut activation, "Initiate()"), None);
        assert!(!activation.is_active());
    }

    #[test]
    fn test_partial_command_does_nothing() {
        let mut activation = Activation::new();
        assert_eq!(type_str(&mut activation, "initiate"), None);
        assert!(!activation.is_active());
    }

    #[test]
    fn test_already_active_is_noop() {
        let mut activation = Activation::new();
        type_str(&mut activation, "initiate()");
        assert_eq!(type_str(&mut activation, "initiate()"), None);

        activation.close();
        assert_eq!(type_str(&mut activation, "initiate()"), Some(Trigger::Command));
    }
}
