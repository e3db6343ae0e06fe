//! Polled key state
//!
//! Platform code feeds press/release transitions into a [`Keyboard`]; the
//! game only asks "is this key held" plus a latched one-shot for the place
//! and pause keys.

use std::collections::HashSet;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Confirm placement on the current cell
    Place,
    /// Toggle pause, or restart once the game is over
    Pause,
}

/// Anything that can answer "is key K currently held"
pub trait KeySource {
    fn is_held(&self, key: Key) -> bool;
}

/// Key state fed by press/release transitions
#[derive(Debug, Default)]
pub struct Keyboard {
    held: HashSet<Key>,
    /// Presses not yet consumed
    latched: HashSet<Key>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        // Auto-repeat does not latch again
        if self.held.insert(key) {
            self.latched.insert(key);
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Consume a latched press
    pub fn take_press(&mut self, key: Key) -> bool {
        self.latched.remove(&key)
    }

    /// Release everything (focus loss)
    pub fn reset(&mut self) {
        self.held.clear();
        self.latched.clear();
    }
}

impl KeySource for Keyboard {
    fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}
