//! Polarity Twins - a two-player cooperative puzzle platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, entities, level rules)
//! - `platform`: Input snapshots and key bindings
//! - `render`: Canvas 2D flat-color rendering (wasm only)
//! - `savegame`: Flat JSON snapshot persistence
//! - `settings`: Player preferences

pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod savegame;
pub mod settings;
pub mod sim;

pub use savegame::Snapshot;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Gravity acceleration (px/s², +y is down)
    pub const GRAVITY: f32 = 980.0;
    /// Ground friction decay per update for players
    pub const FRICTION: f32 = 0.82;
    /// Air drag decay per update
    pub const AIR_DRAG: f32 = 0.93;
    /// Crate ground friction
    pub const CRATE_FRICTION: f32 = 0.85;
    /// Below this speed a grounded crate snaps to rest
    pub const CRATE_STOP_SPEED: f32 = 10.0;

    /// Player body side length
    pub const PLAYER_SIZE: f32 = 32.0;
    /// Horizontal run speed (px/s)
    pub const PLAYER_SPEED: f32 = 200.0;
    /// Jump impulse (negative = upward)
    pub const JUMP_FORCE: f32 = -420.0;

    /// Dash burst speed (px/s)
    pub const DASH_SPEED: f32 = 500.0;
    /// Dash duration in seconds
    pub const DASH_DURATION: f32 = 0.2;
    /// Cooldown before the next dash can start
    pub const DASH_COOLDOWN: f32 = 1.0;

    /// Maximum fall speed while wall-sliding
    pub const WALL_SLIDE_SPEED: f32 = 60.0;
    /// Horizontal kick applied by a wall jump
    pub const WALL_JUMP_KICK: f32 = 260.0;

    /// Crate side length
    pub const CRATE_SIZE: f32 = 35.0;
    /// Seconds between contact pushes on the same crate
    pub const PUSH_COOLDOWN: f32 = 0.3;
    /// Contact distance for a push to register
    pub const PUSH_DISTANCE: f32 = 8.0;
    /// Opposite-polarity crate repulsion (px/s²)
    pub const CRATE_REPULSION: f32 = 150.0;

    /// Radius within which a charge lock can be acquired
    pub const CHARGE_LOCK_RADIUS: f32 = 80.0;
    /// Maximum duration of a single charge
    pub const CHARGE_DURATION: f32 = 5.0;
    /// Cooldown after a charge ends
    pub const CHARGE_COOLDOWN: f32 = 2.0;

    /// Vertical gap below which a grounded crate presses a button
    pub const BUTTON_TOLERANCE: f32 = 5.0;
    /// Button zone size
    pub const BUTTON_W: f32 = 40.0;
    pub const BUTTON_H: f32 = 10.0;

    /// Energy carry duration granted by a source (seconds)
    pub const ENERGY_DURATION: f32 = 35.0;
    /// Energy source re-arm cooldown
    pub const ENERGY_SOURCE_COOLDOWN: f32 = 15.0;
    /// Player proximity range for sources and sinks
    pub const ENERGY_RANGE: f32 = 60.0;

    /// Fade wall alpha decay per second
    pub const WALL_FADE_RATE: f32 = 0.5;
    /// Portal alpha fade in/out per second
    pub const PORTAL_FADE_RATE: f32 = 2.0;
    /// Moving platform top-snap tolerance when carrying riders
    pub const CARRY_SNAP: f32 = 10.0;
}
