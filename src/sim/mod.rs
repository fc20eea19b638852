//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod joystick;
pub mod state;
pub mod tick;

pub use collision::entities_overlap;
pub use joystick::VirtualJoystick;
pub use state::{Debris, Enemy, HudSnapshot, Player, Powerup, PowerupKind, World};
pub use tick::{Terminal, TickInput, tick};
