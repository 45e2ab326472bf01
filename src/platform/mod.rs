//! Platform abstraction layer
//!
//! The browser delivers raw keyboard events; the sim consumes immutable
//! `TickInput` snapshots. The mapping between the two lives here so it can
//! be tested natively.

pub mod input;

pub use input::Keyboard;
