//! Cosmic Cleaner - a space debris collection arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, effects)
//! - `session`: Game state machine and tick/countdown drivers
//! - `render`: Canvas 2D rendering (wasm only)
//! - `stats`: Best-score persistence (LocalStorage on web)
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;
pub mod stats;

pub use session::{Phase, SessionController};
pub use settings::Settings;
pub use stats::GameStats;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum sim ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Countdown timer period (1 Hz)
    pub const COUNTDOWN_PERIOD: f32 = 1.0;

    /// Minimum playfield dimensions
    pub const MIN_FIELD_WIDTH: f32 = 300.0;
    pub const MIN_FIELD_HEIGHT: f32 = 200.0;

    /// Target count of uncollected debris on the field
    pub const DEBRIS_COUNT: usize = 15;
    pub const ENEMY_COUNT: usize = 3;
    pub const POWERUP_COUNT: usize = 2;
    /// Debris collected to win the session
    pub const DEBRIS_TO_WIN: u32 = 30;

    pub const MAX_HEALTH: f32 = 100.0;
    /// Session length in seconds
    pub const INITIAL_TIME: f32 = 60.0;

    /// Player defaults (square ship, movement in pixels per tick)
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 4.0;
    pub const BOOST_SPEED: f32 = 6.0;

    /// Entity diameters
    pub const DEBRIS_SIZE: f32 = 12.0;
    pub const ENEMY_SIZE: f32 = 25.0;
    pub const POWERUP_SIZE: f32 = 20.0;

    /// Spawn margins keep entities fully visible at the edges
    pub const DEBRIS_SPAWN_MARGIN: f32 = 10.0;
    pub const POWERUP_SPAWN_MARGIN: f32 = 15.0;

    /// Damage per enemy contact (per tick of overlap)
    pub const ENEMY_DAMAGE: f32 = 10.0;
    /// Enemy drift velocity range at spawn, per axis
    pub const ENEMY_DRIFT_SPEED: f32 = 1.0;
    /// Enemy velocity range after being knocked by the player, per axis
    pub const ENEMY_KNOCK_SPEED: f32 = 2.0;

    /// Magnet attraction radius around the player
    pub const MAGNET_RADIUS: f32 = 80.0;
    /// Distance a debris is pulled per tick while magnetized
    pub const MAGNET_PULL_STEP: f32 = 6.0;
    /// Power drained per attracted debris per tick
    pub const MAGNET_DRAIN: f32 = 0.1;
    /// Power gained per collected debris
    pub const POWER_PER_DEBRIS: f32 = 2.0;
    /// Power bar display scale (full bar at this much power)
    pub const POWER_BAR_MAX: f32 = 50.0;

    /// Effect durations in ticks
    pub const MAGNET_TICKS: u64 = 3 * 60;
    pub const SHIELD_TICKS: u64 = 5 * 60;
    pub const SPEED_BOOST_TICKS: u64 = 10 * 60;
    /// Speed powerup multiplier applied to the base speed
    pub const SPEED_BOOST_FACTOR: f32 = 1.5;

    /// Virtual joystick knob travel radius in pixels
    pub const JOYSTICK_MAX_RADIUS: f32 = 40.0;
}
