//! Session controller: game-level state machine and tick drivers
//!
//! Owns the world, the 60 Hz simulation driver, the 1 Hz countdown driver,
//! and the persistence bridge. The presentation layer feeds it wall-clock
//! deltas and per-tick input; everything else happens here.

use glam::Vec2;

use crate::consts::*;
use crate::sim::{HudSnapshot, Terminal, TickInput, World, tick};
use crate::stats::GameStats;

/// Session phases
///
/// `Idle -> Running -> {Paused <-> Running} -> {Won | Lost}`; any phase can
/// go back to `Idle` (menu) or straight to a fresh `Running` (restart).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Won,
    Lost,
}

/// Fixed-rate driver fed by wall-clock deltas
///
/// Fires at most `max_fires` times per advance and drops the backlog: there
/// is no catch-up for missed ticks, which is acceptable for this game.
/// Stopping is idempotent.
#[derive(Debug, Clone)]
pub struct IntervalDriver {
    period: f32,
    accumulator: f32,
    running: bool,
    max_fires: u32,
}

impl IntervalDriver {
    pub fn new(period: f32, max_fires: u32) -> Self {
        Self {
            period,
            accumulator: 0.0,
            running: false,
            max_fires,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        self.accumulator = 0.0;
    }

    /// Stop the driver; stopping twice is a no-op, never an error
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Accumulate `dt` seconds and return how many times the driver fires
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulator += dt;
        let mut fires = 0;
        while self.accumulator >= self.period && fires < self.max_fires {
            self.accumulator -= self.period;
            fires += 1;
        }
        if fires == self.max_fires {
            // Hit the cap: drop the backlog instead of catching up
            self.accumulator = 0.0;
        }
        fires
    }
}

/// Drives one game session from menu to win/lose and back
pub struct SessionController {
    pub world: World,
    phase: Phase,
    sim_driver: IntervalDriver,
    countdown: IntervalDriver,
    stats: GameStats,
}

impl SessionController {
    pub fn new(seed: u64, bounds: Vec2) -> Self {
        Self {
            world: World::new(seed, bounds),
            phase: Phase::Idle,
            sim_driver: IntervalDriver::new(SIM_DT, MAX_SUBSTEPS),
            countdown: IntervalDriver::new(COUNTDOWN_PERIOD, 1),
            stats: GameStats::load(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn snapshot(&self) -> HudSnapshot {
        self.world.snapshot()
    }

    /// Start (or restart) a session: full world reset, both drivers running
    ///
    /// Valid from any phase; a mid-session restart throws the old state away.
    pub fn start_session(&mut self, bounds: Vec2) {
        self.world.reset(bounds);
        self.phase = Phase::Running;
        self.sim_driver.start();
        self.countdown.start();
        log::info!(
            "session started: {}x{} field, {} debris target",
            self.world.bounds.x,
            self.world.bounds.y,
            DEBRIS_TO_WIN
        );
    }

    /// Running <-> Paused; ignored in any other phase
    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => self.phase = Phase::Paused,
            Phase::Paused => self.phase = Phase::Running,
            _ => {}
        }
    }

    /// Back to the menu; both drivers stop unconditionally
    pub fn quit_to_menu(&mut self) {
        self.stop_drivers();
        self.phase = Phase::Idle;
    }

    /// Feed wall-clock time into the drivers
    ///
    /// Does nothing unless the session is Running: a paused session is
    /// frozen, not slowed, and effect timers freeze with it. Returns the
    /// number of simulation ticks that fired, so callers know when one-shot
    /// commands have been consumed.
    pub fn advance(&mut self, dt: f32, input: &TickInput) -> u32 {
        if self.phase != Phase::Running {
            return 0;
        }

        let sim_fires = self.sim_driver.advance(dt);
        for fired in 0..sim_fires {
            let outcome = tick(&mut self.world, input);
            if self.stats.record(self.world.score) {
                log::info!("new best score: {}", self.world.score);
            }
            match outcome {
                Some(Terminal::Lost) => {
                    self.finish(Phase::Lost);
                    return fired + 1;
                }
                Some(Terminal::Won) => {
                    self.finish(Phase::Won);
                    return fired + 1;
                }
                None => {}
            }
        }

        let countdown_fires = self.countdown.advance(dt);
        for _ in 0..countdown_fires {
            self.world.time_left -= 1.0;
            if self.world.time_left <= 0.0 {
                self.finish(Phase::Lost);
                break;
            }
        }
        sim_fires
    }

    /// Playfield resized while a session exists
    pub fn resize(&mut self, bounds: Vec2) {
        self.world.resize(bounds);
    }

    fn finish(&mut self, terminal: Phase) {
        self.stop_drivers();
        self.phase = terminal;
        match terminal {
            Phase::Won => log::info!(
                "session won: score {}, health {:.0}, {:.0}s elapsed",
                self.world.score,
                self.world.health.max(0.0),
                self.world.elapsed()
            ),
            Phase::Lost => log::info!(
                "session lost: score {} (best {})",
                self.world.score,
                self.stats.best_score
            ),
            _ => {}
        }
    }

    fn stop_drivers(&mut self) {
        self.sim_driver.stop();
        self.countdown.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SessionController {
        let mut ctl = SessionController::new(777, Vec2::new(400.0, 400.0));
        ctl.start_session(Vec2::new(400.0, 400.0));
        // Park entities so tests stage their own contacts
        for deb in ctl.world.debris.iter_mut() {
            deb.pos = Vec2::new(390.0, 390.0);
        }
        for enemy in ctl.world.enemies.iter_mut() {
            enemy.pos = Vec2::new(10.0, 10.0);
            enemy.vel = Vec2::ZERO;
        }
        for powerup in ctl.world.powerups.iter_mut() {
            powerup.pos = Vec2::new(10.0, 390.0);
        }
        ctl
    }

    #[test]
    fn driver_stop_is_idempotent() {
        let mut driver = IntervalDriver::new(1.0, 1);
        driver.start();
        driver.stop();
        driver.stop();
        assert!(!driver.is_running());
        assert_eq!(driver.advance(5.0), 0);
    }

    #[test]
    fn driver_drops_backlog_instead_of_catching_up() {
        let mut driver = IntervalDriver::new(0.1, 2);
        driver.start();
        // A 1-second stall fires at most the cap, then the backlog is gone
        assert_eq!(driver.advance(1.0), 2);
        assert_eq!(driver.advance(0.05), 0);
    }

    #[test]
    fn start_session_transitions_idle_to_running() {
        let mut ctl = SessionController::new(1, Vec2::new(400.0, 400.0));
        assert_eq!(ctl.phase(), Phase::Idle);
        ctl.start_session(Vec2::new(400.0, 400.0));
        assert_eq!(ctl.phase(), Phase::Running);
    }

    #[test]
    fn paused_session_is_frozen() {
        let mut ctl = controller();
        ctl.toggle_pause();
        assert_eq!(ctl.phase(), Phase::Paused);

        let ticks_before = ctl.world.ticks;
        let time_before = ctl.world.time_left;
        ctl.advance(5.0, &TickInput::default());
        assert_eq!(ctl.world.ticks, ticks_before);
        assert_eq!(ctl.world.time_left, time_before);

        ctl.toggle_pause();
        assert_eq!(ctl.phase(), Phase::Running);
        ctl.advance(SIM_DT, &TickInput::default());
        assert!(ctl.world.ticks > ticks_before);
    }

    #[test]
    fn countdown_reaching_zero_loses_with_full_health() {
        let mut ctl = controller();
        ctl.world.time_left = 1.0;
        // One full second of frames
        for _ in 0..60 {
            ctl.advance(SIM_DT + 1e-5, &TickInput::default());
        }
        assert_eq!(ctl.phase(), Phase::Lost);
        assert_eq!(ctl.world.health, MAX_HEALTH);
        assert!(!ctl.sim_driver.is_running());
        assert!(!ctl.countdown.is_running());
    }

    #[test]
    fn health_exhaustion_loses_and_stops_drivers() {
        let mut ctl = controller();
        ctl.world.health = ENEMY_DAMAGE;
        ctl.world.enemies[0].pos = ctl.world.player.pos;

        ctl.advance(SIM_DT, &TickInput::default());
        assert_eq!(ctl.phase(), Phase::Lost);
        assert!(!ctl.sim_driver.is_running());
        assert!(!ctl.countdown.is_running());
    }

    #[test]
    fn reaching_target_wins() {
        let mut ctl = controller();
        ctl.world.score = DEBRIS_TO_WIN - 1;
        ctl.world.debris[0].pos = ctl.world.player.pos;

        ctl.advance(SIM_DT, &TickInput::default());
        assert_eq!(ctl.phase(), Phase::Won);
        assert_eq!(ctl.world.score, DEBRIS_TO_WIN);
        assert!(!ctl.sim_driver.is_running());
    }

    #[test]
    fn quit_to_menu_stops_drivers_from_any_phase() {
        let mut ctl = controller();
        ctl.toggle_pause();
        ctl.quit_to_menu();
        assert_eq!(ctl.phase(), Phase::Idle);
        assert!(!ctl.sim_driver.is_running());
        assert!(!ctl.countdown.is_running());

        // Quitting again is harmless
        ctl.quit_to_menu();
        assert_eq!(ctl.phase(), Phase::Idle);
    }

    #[test]
    fn restart_mid_session_restores_configured_counts() {
        let mut ctl = controller();
        ctl.world.score = 12;
        ctl.world.debris[0].collected = true;
        ctl.world.powerups[0].active = false;

        ctl.start_session(Vec2::new(400.0, 400.0));
        assert_eq!(ctl.phase(), Phase::Running);
        assert_eq!(ctl.world.score, 0);
        assert_eq!(ctl.world.uncollected_debris(), DEBRIS_COUNT);
        assert_eq!(ctl.world.enemies.len(), ENEMY_COUNT);
        assert_eq!(
            ctl.world.powerups.iter().filter(|p| p.active).count(),
            POWERUP_COUNT
        );
    }

    #[test]
    fn collecting_records_a_new_best() {
        let mut ctl = controller();
        assert_eq!(ctl.stats().best_score, 0);
        ctl.world.debris[0].pos = ctl.world.player.pos;

        ctl.advance(SIM_DT, &TickInput::default());
        assert_eq!(ctl.stats().best_score, 1);
        assert_eq!(ctl.stats().total_cleaned, 1);
    }
}
