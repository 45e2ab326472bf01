//! Keyboard state and the two control schemes
//!
//! Blue plays on the arrow keys (down to fast-fall) with F (dash) and C
//! (charge); red plays on WASD (S to fast-fall) with K (dash) and L
//! (charge). Escape toggles pause, R restarts the level. Keys are tracked
//! by `KeyboardEvent.key` name.

use std::collections::HashSet;

use crate::sim::tick::{PlayerInput, TickInput};

/// Raw held/pressed key tracking, fed by keydown/keyup events.
///
/// Held keys drive continuous actions (movement, charge); the pressed set
/// records keydown edges so one-shot actions (jump, dash, pause, reset)
/// fire exactly once per press. The edges are kept until the frame loop
/// reports that a tick consumed them: on a fast display a frame can run
/// zero substeps, and a press made during such a frame must survive to the
/// next one.
#[derive(Debug, Default)]
pub struct Keyboard {
    held: HashSet<String>,
    pressed: HashSet<String>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        let key = normalize(key);
        if self.held.insert(key.clone()) {
            self.pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        let key = normalize(key);
        self.held.remove(&key);
    }

    /// Drop all held keys. Called on window blur so keys released while the
    /// tab is hidden do not stick.
    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
    }

    fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    fn was_pressed(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }

    /// Build the input snapshot for this frame. Press edges stay recorded;
    /// the frame loop calls `consume_presses` once a tick has run with them.
    pub fn snapshot(&self) -> TickInput {
        let blue = PlayerInput {
            move_dir: axis(self.is_held("arrowleft"), self.is_held("arrowright")),
            down: self.is_held("arrowdown"),
            jump: self.was_pressed("arrowup"),
            dash: self.was_pressed("f"),
            charge: self.is_held("c"),
        };
        let red = PlayerInput {
            move_dir: axis(self.is_held("a"), self.is_held("d")),
            down: self.is_held("s"),
            jump: self.was_pressed("w"),
            dash: self.was_pressed("k"),
            charge: self.is_held("l"),
        };
        TickInput {
            players: [blue, red],
            pause: self.was_pressed("escape"),
            reset: self.was_pressed("r"),
        }
    }

    /// Drop the press edges after a tick has consumed them.
    pub fn consume_presses(&mut self) {
        self.pressed.clear();
    }
}

fn normalize(key: &str) -> String {
    key.to_ascii_lowercase()
}

fn axis(neg: bool, pos: bool) -> f32 {
    match (neg, pos) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}
