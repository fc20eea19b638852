//! Fixed timestep simulation step
//!
//! One call advances the world by one 60 Hz tick. Sub-step order matters:
//! later steps read positions written by earlier ones within the same tick.

use glam::Vec2;

use super::collision::entities_overlap;
use super::state::{PowerupKind, World};
use crate::consts::*;

/// Input for a single tick
///
/// `direction` comes from the joystick mapper, magnitude <= 1. `boost` is a
/// held flag; `magnet` and `shield` are one-shot activation commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub direction: Vec2,
    pub boost: bool,
    pub magnet: bool,
    pub shield: bool,
}

/// Terminal outcome of a tick, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Won,
    Lost,
}

/// Advance the world by one tick
///
/// Returns the terminal transition to apply, if the session ended. Health is
/// checked before score, so a tick that both exhausts health and reaches the
/// debris target counts as a loss.
pub fn tick(world: &mut World, input: &TickInput) -> Option<Terminal> {
    world.ticks += 1;

    apply_effect_commands(world, input);
    expire_speed_boost(world);

    update_player(world, input);
    update_enemies(world);
    attract_debris(world);

    collect_debris(world);
    enemy_contacts(world);
    consume_powerups(world);

    // Terminal check runs after all mutation; loss wins ties
    if world.health <= 0.0 {
        Some(Terminal::Lost)
    } else if world.score >= DEBRIS_TO_WIN {
        Some(Terminal::Won)
    } else {
        None
    }
}

/// Arm timed effects; reactivation resets the expiry rather than stacking
fn apply_effect_commands(world: &mut World, input: &TickInput) {
    if input.magnet && world.power > 0.0 {
        world.effects.magnet_until = world.ticks + MAGNET_TICKS;
    }
    if input.shield {
        world.effects.shield_until = world.ticks + SHIELD_TICKS;
    }
}

/// Hard revert to the base speed when the boost timer lapses
///
/// Last timer wins: a second speed pickup before expiry just rearms the
/// timer, and the revert always writes the base constant.
fn expire_speed_boost(world: &mut World) {
    if world.effects.speed_until != 0 && world.ticks >= world.effects.speed_until {
        world.player.speed = PLAYER_SPEED;
        world.effects.speed_until = 0;
    }
}

fn update_player(world: &mut World, input: &TickInput) {
    world.player.boosting = input.boost;
    let speed = if world.player.boosting {
        BOOST_SPEED
    } else {
        world.player.speed
    };
    let half = world.player.half_extent();
    let pos = world.player.pos + input.direction * speed;
    world.player.pos = pos.clamp(Vec2::splat(half), world.bounds - Vec2::splat(half));
}

/// Drift enemies and reflect off the field edges
///
/// Sign flip per axis only; an enemy that overshoots the edge is not
/// repositioned, it just turns around.
fn update_enemies(world: &mut World) {
    let bounds = world.bounds;
    for enemy in world.enemies.iter_mut() {
        enemy.pos += enemy.vel;
        if enemy.pos.x < 0.0 || enemy.pos.x > bounds.x {
            enemy.vel.x = -enemy.vel.x;
        }
        if enemy.pos.y < 0.0 || enemy.pos.y > bounds.y {
            enemy.vel.y = -enemy.vel.y;
        }
    }
}

/// Pull nearby debris toward the player while the magnet has fuel
///
/// Power is checked per debris, and each attracted debris drains
/// independently, so a crowded radius can push power below zero within a
/// single tick. That transient is expected; UI reads clamp it.
fn attract_debris(world: &mut World) {
    if !world.magnet_active() {
        return;
    }
    let player_pos = world.player.pos;
    for deb in world.debris.iter_mut() {
        if deb.collected || world.power <= 0.0 {
            continue;
        }
        let offset = player_pos - deb.pos;
        let distance = offset.length();
        if distance > 0.0 && distance < MAGNET_RADIUS {
            deb.pos += (offset / distance) * MAGNET_PULL_STEP;
            world.power -= MAGNET_DRAIN;
        }
    }
}

/// Collect overlapping debris and keep the field replenished
fn collect_debris(world: &mut World) {
    let player_pos = world.player.pos;
    let half_player = world.player.half_extent();
    let mut collected = 0;
    for deb in world.debris.iter_mut() {
        if deb.collected {
            continue;
        }
        if entities_overlap(player_pos, half_player, deb.pos, DEBRIS_SIZE / 2.0) {
            deb.collected = true;
            world.score += 1;
            world.power += POWER_PER_DEBRIS;
            collected += 1;
        }
    }
    // One replacement per collection, never past the configured target
    for _ in 0..collected {
        if world.uncollected_debris() < DEBRIS_COUNT {
            world.spawn_debris();
        }
    }
}

/// Enemy contact: damage unless shielded, and always knock the enemy away
fn enemy_contacts(world: &mut World) {
    let player_pos = world.player.pos;
    let half_player = world.player.half_extent();
    let shielded = world.shield_active();
    for i in 0..world.enemies.len() {
        if entities_overlap(player_pos, half_player, world.enemies[i].pos, ENEMY_SIZE / 2.0) {
            if !shielded {
                world.health -= ENEMY_DAMAGE;
            }
            let knock = world.random_velocity(ENEMY_KNOCK_SPEED);
            world.enemies[i].vel = knock;
        }
    }
}

/// Consume overlapping powerups; consumed pickups never respawn
fn consume_powerups(world: &mut World) {
    let player_pos = world.player.pos;
    let half_player = world.player.half_extent();
    for powerup in world.powerups.iter_mut() {
        if !powerup.active {
            continue;
        }
        if entities_overlap(player_pos, half_player, powerup.pos, POWERUP_SIZE / 2.0) {
            powerup.active = false;
            match powerup.kind {
                PowerupKind::Speed => {
                    world.player.speed = PLAYER_SPEED * SPEED_BOOST_FACTOR;
                    world.effects.speed_until = world.ticks + SPEED_BOOST_TICKS;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// World with every entity parked away from the player so individual
    /// tests can stage exactly the contacts they want.
    fn quiet_world() -> World {
        let mut world = World::new(12345, Vec2::new(400.0, 400.0));
        for deb in world.debris.iter_mut() {
            deb.pos = Vec2::new(390.0, 390.0);
        }
        for enemy in world.enemies.iter_mut() {
            enemy.pos = Vec2::new(10.0, 10.0);
            enemy.vel = Vec2::ZERO;
        }
        for powerup in world.powerups.iter_mut() {
            powerup.pos = Vec2::new(10.0, 390.0);
        }
        world
    }

    #[test]
    fn collecting_debris_increments_score_and_respawns() {
        let mut world = quiet_world();
        world.player.pos = Vec2::new(100.0, 100.0);
        world.debris[0].pos = Vec2::new(105.0, 100.0);

        let outcome = tick(&mut world, &TickInput::default());
        assert_eq!(outcome, None);
        assert_eq!(world.score, 1);
        assert_eq!(world.power, POWER_PER_DEBRIS);
        assert!(world.debris[0].collected);
        // Replacement spawned, uncollected count back at the target
        assert_eq!(world.uncollected_debris(), DEBRIS_COUNT);
        assert!(!world.debris.last().unwrap().collected);
    }

    #[test]
    fn enemy_contact_damages_and_knocks() {
        let mut world = quiet_world();
        world.enemies[0].pos = world.player.pos;

        tick(&mut world, &TickInput::default());
        assert_eq!(world.health, MAX_HEALTH - ENEMY_DAMAGE);
        let vel = world.enemies[0].vel;
        assert!(vel.x.abs() < ENEMY_KNOCK_SPEED && vel.y.abs() < ENEMY_KNOCK_SPEED);
    }

    #[test]
    fn shield_blocks_damage_but_still_knocks() {
        let mut world = quiet_world();
        world.enemies[0].pos = world.player.pos;
        world.enemies[0].vel = Vec2::new(0.77, 0.77);
        world.power = 10.0;

        let input = TickInput {
            shield: true,
            ..Default::default()
        };
        tick(&mut world, &input);
        assert_eq!(world.health, MAX_HEALTH);
        assert_ne!(world.enemies[0].vel, Vec2::new(0.77, 0.77));
    }

    #[test]
    fn health_exhaustion_triggers_lost() {
        let mut world = quiet_world();
        world.health = 10.0;
        world.enemies[0].pos = world.player.pos;

        let outcome = tick(&mut world, &TickInput::default());
        assert_eq!(outcome, Some(Terminal::Lost));
        assert!(world.health <= 0.0);
    }

    #[test]
    fn thirtieth_debris_triggers_won() {
        let mut world = quiet_world();
        world.score = DEBRIS_TO_WIN - 1;
        world.debris[0].pos = world.player.pos;

        let outcome = tick(&mut world, &TickInput::default());
        assert_eq!(outcome, Some(Terminal::Won));
        assert_eq!(world.score, DEBRIS_TO_WIN);
    }

    #[test]
    fn loss_preempts_win_in_the_same_tick() {
        let mut world = quiet_world();
        world.score = DEBRIS_TO_WIN - 1;
        world.health = ENEMY_DAMAGE;
        world.debris[0].pos = world.player.pos;
        world.enemies[0].pos = world.player.pos;

        let outcome = tick(&mut world, &TickInput::default());
        assert_eq!(outcome, Some(Terminal::Lost));
        assert_eq!(world.score, DEBRIS_TO_WIN);
    }

    #[test]
    fn magnet_pulls_debris_and_drains_power() {
        let mut world = quiet_world();
        world.power = 5.0;
        world.debris[0].pos = world.player.pos + Vec2::new(60.0, 0.0);

        let input = TickInput {
            magnet: true,
            ..Default::default()
        };
        tick(&mut world, &input);
        assert!(world.magnet_active());
        let dist = world.player.pos.distance(world.debris[0].pos);
        assert!((dist - (60.0 - MAGNET_PULL_STEP)).abs() < 1e-3);
        assert!((world.power - (5.0 - MAGNET_DRAIN)).abs() < 1e-5);
    }

    #[test]
    fn magnet_drain_can_go_transiently_negative() {
        let mut world = quiet_world();
        world.power = 0.05;
        world.debris[0].pos = world.player.pos + Vec2::new(60.0, 0.0);
        world.debris[1].pos = world.player.pos + Vec2::new(0.0, 60.0);

        let input = TickInput {
            magnet: true,
            ..Default::default()
        };
        tick(&mut world, &input);
        // First debris drains past zero; the second is then skipped
        assert!(world.power < 0.0);
        assert!(world.power > -MAGNET_DRAIN);
        // UI read clamps the transient
        assert_eq!(world.snapshot().power, 0.0);
    }

    #[test]
    fn magnet_command_requires_power() {
        let mut world = quiet_world();
        world.power = 0.0;
        let input = TickInput {
            magnet: true,
            ..Default::default()
        };
        tick(&mut world, &input);
        assert!(!world.magnet_active());
    }

    #[test]
    fn effect_reactivation_resets_the_timer() {
        let mut world = quiet_world();
        world.power = 10.0;
        let input = TickInput {
            magnet: true,
            ..Default::default()
        };
        tick(&mut world, &input);
        let first_expiry = world.effects.magnet_until;

        for _ in 0..10 {
            tick(&mut world, &TickInput::default());
        }
        tick(&mut world, &input);
        assert_eq!(world.effects.magnet_until, first_expiry + 11);
    }

    #[test]
    fn speed_powerup_applies_then_hard_reverts() {
        let mut world = quiet_world();
        world.powerups[0].pos = world.player.pos;

        tick(&mut world, &TickInput::default());
        assert!(!world.powerups[0].active);
        assert_eq!(world.player.speed, PLAYER_SPEED * SPEED_BOOST_FACTOR);
        assert!(world.speed_boost_active());

        for _ in 0..SPEED_BOOST_TICKS {
            tick(&mut world, &TickInput::default());
        }
        assert!(!world.speed_boost_active());
        assert_eq!(world.player.speed, PLAYER_SPEED);
    }

    #[test]
    fn boost_overrides_current_speed() {
        let mut world = quiet_world();
        let start = world.player.pos;
        let input = TickInput {
            direction: Vec2::new(1.0, 0.0),
            boost: true,
            ..Default::default()
        };
        tick(&mut world, &input);
        assert!((world.player.pos.x - start.x - BOOST_SPEED).abs() < 1e-5);
    }

    #[test]
    fn enemies_reflect_off_bounds_without_reposition() {
        let mut world = quiet_world();
        world.enemies[0].pos = Vec2::new(399.5, 200.0);
        world.enemies[0].vel = Vec2::new(1.0, 0.5);

        tick(&mut world, &TickInput::default());
        // Overshoots past the edge, then turns around
        assert!(world.enemies[0].pos.x > 400.0);
        assert_eq!(world.enemies[0].vel.x, -1.0);
        assert_eq!(world.enemies[0].vel.y, 0.5);
    }

    proptest! {
        #[test]
        fn player_stays_within_bounds(
            start_x in 20.0f32..380.0,
            start_y in 20.0f32..380.0,
            dir_x in -1.0f32..1.0,
            dir_y in -1.0f32..1.0,
            boost in proptest::bool::ANY,
            steps in 1usize..200,
        ) {
            let mut world = quiet_world();
            world.player.pos = Vec2::new(start_x, start_y);
            let input = TickInput {
                direction: Vec2::new(dir_x, dir_y),
                boost,
                ..Default::default()
            };
            for _ in 0..steps {
                tick(&mut world, &input);
                let half = world.player.half_extent();
                prop_assert!(world.player.pos.x >= half);
                prop_assert!(world.player.pos.x <= world.bounds.x - half);
                prop_assert!(world.player.pos.y >= half);
                prop_assert!(world.player.pos.y <= world.bounds.y - half);
            }
        }
    }
}
