//! Entity store and session scalars
//!
//! The `World` aggregate owns everything the simulation mutates: the player,
//! the entity collections, and the score/health/time/power scalars. It is
//! passed explicitly to the tick and render steps - no free-standing state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// The player's ship
///
/// Exactly one instance, owned by the `World` for the session lifetime and
/// reset in place at each restart.
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Side length of the square hull
    pub size: f32,
    /// Current non-boosting speed in pixels per tick. The speed powerup
    /// rewrites this; expiry reverts it to `PLAYER_SPEED` exactly.
    pub speed: f32,
    /// Boost button held (overrides `speed` with `BOOST_SPEED`)
    pub boosting: bool,
}

impl Player {
    fn reset(&mut self, bounds: Vec2) {
        self.pos = bounds / 2.0;
        self.size = PLAYER_SIZE;
        self.speed = PLAYER_SPEED;
        self.boosting = false;
    }

    pub fn half_extent(&self) -> f32 {
        self.size / 2.0
    }
}

/// A piece of drifting debris
///
/// Ids are monotonically increasing and never reused; collected debris stays
/// in the collection (marked) while replacements keep the uncollected count
/// at the configured target.
#[derive(Debug, Clone)]
pub struct Debris {
    pub id: u32,
    pub pos: Vec2,
    pub collected: bool,
}

/// A patrolling enemy, bouncing off the playfield edges
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Powerup variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    /// Multiplies the player's base speed for a fixed duration
    Speed,
}

/// A one-shot pickup; consumed powerups do not respawn
#[derive(Debug, Clone)]
pub struct Powerup {
    pub pos: Vec2,
    pub kind: PowerupKind,
    pub active: bool,
}

/// Expiry ticks for timed effects
///
/// Checked against the world tick counter inside the simulation step, so a
/// paused session freezes them along with everything else. Reactivating an
/// effect resets its expiry rather than stacking.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveEffects {
    pub magnet_until: u64,
    pub shield_until: u64,
    pub speed_until: u64,
}

/// Complete game world: entities plus session scalars
#[derive(Debug, Clone)]
pub struct World {
    /// Playfield dimensions in pixels
    pub bounds: Vec2,
    pub player: Player,
    pub debris: Vec<Debris>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<Powerup>,
    /// Monotonic non-decreasing during play
    pub score: u32,
    /// May transiently read negative before the terminal check fires
    pub health: f32,
    /// Magnet fuel; may dip below zero within a tick, UI reads clamp
    pub power: f32,
    /// Seconds remaining, decremented by the 1 Hz countdown driver
    pub time_left: f32,
    /// Simulation tick counter
    pub ticks: u64,
    pub effects: ActiveEffects,
    next_id: u32,
    pub(crate) rng: Pcg32,
}

impl World {
    /// Create a fresh world with entities at seeded random positions
    pub fn new(seed: u64, bounds: Vec2) -> Self {
        let mut world = Self {
            bounds,
            player: Player {
                pos: Vec2::ZERO,
                size: PLAYER_SIZE,
                speed: PLAYER_SPEED,
                boosting: false,
            },
            debris: Vec::new(),
            enemies: Vec::new(),
            powerups: Vec::new(),
            score: 0,
            health: MAX_HEALTH,
            power: 0.0,
            time_left: INITIAL_TIME,
            ticks: 0,
            effects: ActiveEffects::default(),
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
        };
        world.reset(bounds);
        world
    }

    /// Reinitialize everything in place for a new session
    ///
    /// The player is reset, not reallocated; the collections are regenerated
    /// at random in-bounds positions with exact configured counts.
    pub fn reset(&mut self, bounds: Vec2) {
        self.bounds = bounds.max(Vec2::new(MIN_FIELD_WIDTH, MIN_FIELD_HEIGHT));
        self.player.reset(self.bounds);
        self.score = 0;
        self.health = MAX_HEALTH;
        self.power = 0.0;
        self.time_left = INITIAL_TIME;
        self.ticks = 0;
        self.effects = ActiveEffects::default();

        self.debris.clear();
        self.enemies.clear();
        self.powerups.clear();
        for _ in 0..DEBRIS_COUNT {
            self.spawn_debris();
        }
        for _ in 0..ENEMY_COUNT {
            let pos = self.random_point(0.0);
            let vel = self.random_velocity(ENEMY_DRIFT_SPEED);
            self.enemies.push(Enemy { pos, vel });
        }
        for _ in 0..POWERUP_COUNT {
            let pos = self.random_point(POWERUP_SPAWN_MARGIN);
            self.powerups.push(Powerup {
                pos,
                kind: PowerupKind::Speed,
                active: true,
            });
        }
    }

    /// Playfield resized (browser window change); clamp the player back in
    pub fn resize(&mut self, bounds: Vec2) {
        self.bounds = bounds.max(Vec2::new(MIN_FIELD_WIDTH, MIN_FIELD_HEIGHT));
        let half = self.player.half_extent();
        self.player.pos = self
            .player
            .pos
            .clamp(Vec2::splat(half), self.bounds - Vec2::splat(half));
    }

    /// Spawn one uncollected debris at a random in-bounds position
    pub fn spawn_debris(&mut self) {
        let id = self.next_id;
        self.next_id += 1;
        let pos = self.random_point(DEBRIS_SPAWN_MARGIN);
        self.debris.push(Debris {
            id,
            pos,
            collected: false,
        });
    }

    /// Count of debris still on the field
    pub fn uncollected_debris(&self) -> usize {
        self.debris.iter().filter(|d| !d.collected).count()
    }

    pub fn magnet_active(&self) -> bool {
        self.ticks < self.effects.magnet_until
    }

    pub fn shield_active(&self) -> bool {
        self.ticks < self.effects.shield_until
    }

    pub fn speed_boost_active(&self) -> bool {
        self.ticks < self.effects.speed_until
    }

    /// Seconds elapsed this session (victory screen stat)
    pub fn elapsed(&self) -> f32 {
        INITIAL_TIME - self.time_left
    }

    /// Uniform random point inside the bounds, inset by `margin`
    pub(crate) fn random_point(&mut self, margin: f32) -> Vec2 {
        let x = self.rng.random_range(margin..self.bounds.x - margin);
        let y = self.rng.random_range(margin..self.bounds.y - margin);
        Vec2::new(x, y)
    }

    /// Uniform random velocity in (-range, range) per axis
    pub(crate) fn random_velocity(&mut self, range: f32) -> Vec2 {
        Vec2::new(
            self.rng.random_range(-range..range),
            self.rng.random_range(-range..range),
        )
    }

    /// UI-facing view of the session scalars
    ///
    /// Internal arithmetic may leave health or power transiently negative;
    /// everything here is clamped for display.
    pub fn snapshot(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.score,
            target: DEBRIS_TO_WIN,
            health: self.health.max(0.0),
            time_left: self.time_left.max(0.0).ceil() as u32,
            power: self.power.max(0.0),
            power_frac: (self.power / POWER_BAR_MAX).clamp(0.0, 1.0),
            boosting: self.player.boosting,
            magnet_active: self.magnet_active(),
            shield_active: self.shield_active(),
        }
    }
}

/// Per-frame HUD snapshot consumed by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSnapshot {
    pub score: u32,
    pub target: u32,
    pub health: f32,
    pub time_left: u32,
    pub power: f32,
    pub power_frac: f32,
    pub boosting: bool,
    pub magnet_active: bool,
    pub shield_active: bool,
}
