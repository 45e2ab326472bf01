//! Deterministic game simulation
//!
//! All gameplay logic lives here and is pure: given a `LevelState`, a
//! `TickInput`, and a fixed dt, `tick` advances one step with no platform,
//! rendering, or wall-clock dependencies. The host drives it through an
//! accumulator so native and wasm builds step identically.

pub mod levels;
pub mod physics;
pub mod rules;
pub mod state;
#[cfg(test)]
pub mod testutil;
pub mod tick;

pub use physics::{Axis, Body};
pub use rules::{WinProgress, WinRule};
pub use state::{GamePhase, LevelState, Polarity};
pub use tick::{tick, PlayerInput, TickInput};
