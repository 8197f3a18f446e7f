//! Session driver
//!
//! Owns the authoritative game state, runs accumulated fixed-timestep ticks,
//! applies player commands between ticks against the latest snapshot, and
//! dispatches simulation events to the host callbacks. All timed effects are
//! expiry timestamps inside the state, so a reset tears everything down
//! atomically with no stale callbacks left behind.

use crate::consts::*;
use crate::sim::{
    GameEvent, GamePhase, GameState, TickInput, resolve_obstacle_collisions, tick,
};
use crate::tuning::Tuning;

/// End-of-run summary handed to the session-end callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: u64,
    pub level: u32,
    pub duration_ms: u64,
    pub lives_used: u8,
    pub items_used: u32,
}

type RewardFn = Box<dyn FnMut(u32)>;
type SessionEndFn = Box<dyn FnMut(&SessionSummary)>;

/// A playable run: state plus the host-facing glue
pub struct Session {
    state: GameState,
    accumulator_ms: f64,
    last_advance_ms: Option<f64>,
    paused: bool,
    items_used: u32,
    end_reported: bool,
    reward: Option<RewardFn>,
    on_end: Option<SessionEndFn>,
    outbox: Vec<GameEvent>,
}

impl Session {
    /// Create a session with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a session with explicit tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::with_tuning(seed, tuning),
            accumulator_ms: 0.0,
            last_advance_ms: None,
            paused: false,
            items_used: 0,
            end_reported: false,
            reward: None,
            on_end: None,
            outbox: Vec::new(),
        }
    }

    /// Register the reward callback, invoked once per coin unit collected
    pub fn on_reward(&mut self, f: impl FnMut(u32) + 'static) {
        self.reward = Some(Box::new(f));
    }

    /// Register the session-end callback, invoked once on game over or victory
    pub fn on_session_end(&mut self, f: impl FnMut(&SessionSummary) + 'static) {
        self.on_end = Some(Box::new(f));
    }

    /// Mark the session as authenticated; guests freeze at the guest level cap
    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.state.authenticated = authenticated;
    }

    /// Start the run. No-op unless idle.
    pub fn start(&mut self) {
        if self.state.phase == GamePhase::Idle {
            self.state.phase = GamePhase::Running;
            log::info!("session started (seed {})", self.state.seed);
        }
    }

    /// External pause gate: true whenever any modal is open
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Move the player vertically. Applied immediately against the latest
    /// snapshot, and collisions are resolved reactively on the new position.
    pub fn set_player_y(&mut self, y: f32) {
        self.state.player.pos.y = crate::clamp_to_band(y);
        resolve_obstacle_collisions(&mut self.state);
        self.dispatch_events();
    }

    /// Open the speed-boost window (obstacles slow down while it lasts)
    pub fn activate_boost(&mut self) {
        if !self.state.boost_active() {
            let now = self.state.now_ms();
            self.state.boost_until_ms = now + self.state.tuning.boost_duration_ms;
        }
    }

    /// Consume a banked invincibility item, if any
    pub fn use_invincibility(&mut self) -> bool {
        if self.state.invincibility_items == 0 || self.state.invincible_active() {
            return false;
        }
        self.state.invincibility_items -= 1;
        self.items_used += 1;
        let now = self.state.now_ms();
        self.state.invincible_until_ms = now + self.state.tuning.invincibility_duration_ms;
        true
    }

    /// Consume a banked magnet item, if any
    pub fn use_magnet(&mut self) -> bool {
        if self.state.magnet_items == 0 || self.state.magnet_active() {
            return false;
        }
        self.state.magnet_items -= 1;
        self.items_used += 1;
        let now = self.state.now_ms();
        self.state.magnet_until_ms = now + self.state.tuning.magnet_duration_ms;
        true
    }

    /// Run the fixed-timestep ticks accumulated since the last call.
    /// `now_ms` is the host clock; substeps are capped per advance.
    pub fn advance(&mut self, now_ms: f64) {
        let dt = match self.last_advance_ms.replace(now_ms) {
            Some(last) => (now_ms - last).max(0.0),
            None => 0.0,
        };
        // Long stalls (tab hidden, debugger) must not unleash a tick storm
        self.accumulator_ms += dt.min(250.0);

        let step = TICK_MS as f64;
        let mut substeps = 0;
        while self.accumulator_ms >= step && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                pause: self.paused,
                ..Default::default()
            };
            tick(&mut self.state, &input);
            resolve_obstacle_collisions(&mut self.state);
            self.accumulator_ms -= step;
            substeps += 1;
        }

        self.dispatch_events();
    }

    /// Run exactly `n` fixed ticks, ignoring the host clock. Test/demo helper.
    pub fn step_ticks(&mut self, n: u64) {
        for _ in 0..n {
            let input = TickInput {
                pause: self.paused,
                ..Default::default()
            };
            tick(&mut self.state, &input);
            resolve_obstacle_collisions(&mut self.state);
        }
        self.dispatch_events();
    }

    /// Tear down the run and start over: populations, timers, counters and
    /// flags reset together, and the end-of-run guard is re-armed.
    pub fn reset(&mut self, seed: u64) {
        self.state.reset(seed);
        self.accumulator_ms = 0.0;
        self.last_advance_ms = None;
        self.paused = false;
        self.items_used = 0;
        self.end_reported = false;
        self.outbox.clear();
        log::info!("session reset (seed {seed})");
    }

    /// Read-only snapshot for rendering
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Gear tier derived from the current level
    pub fn gear_tier(&self) -> crate::sim::GearTier {
        crate::sim::progression::gear_tier_for(&self.state.tuning, self.state.level)
    }

    /// Drain events queued since the last poll (for the presentation layer)
    pub fn poll_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn dispatch_events(&mut self) {
        for event in self.state.take_events() {
            match event {
                GameEvent::CoinCollected { units } => {
                    if let Some(reward) = self.reward.as_mut() {
                        for _ in 0..units {
                            reward(1);
                        }
                    }
                }
                GameEvent::GameOver { .. } | GameEvent::Victory { .. } => {
                    self.report_end();
                }
                GameEvent::LevelUp { level } => {
                    log::debug!("level up event: {level}");
                }
                _ => {}
            }
            self.outbox.push(event);
        }
    }

    fn report_end(&mut self) {
        if self.end_reported {
            return;
        }
        self.end_reported = true;
        let summary = SessionSummary {
            score: self.state.score,
            level: self.state.level,
            duration_ms: self.state.now_ms(),
            lives_used: STARTING_LIVES - self.state.lives,
            items_used: self.items_used,
        };
        if let Some(on_end) = self.on_end.as_mut() {
            on_end(&summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_accumulator_runs_fixed_ticks() {
        let mut session = Session::new(1);
        session.start();
        session.advance(0.0);
        assert_eq!(session.state().time_ticks, 0);
        session.advance(64.0);
        assert_eq!(session.state().time_ticks, 4);
        session.advance(80.0);
        assert_eq!(session.state().time_ticks, 5);
    }

    #[test]
    fn test_substep_cap_bounds_catchup() {
        let mut session = Session::new(1);
        session.start();
        session.advance(0.0);
        session.advance(10_000.0);
        assert_eq!(session.state().time_ticks, u64::from(MAX_SUBSTEPS));
    }

    #[test]
    fn test_pause_gate_blocks_advancement() {
        let mut session = Session::new(1);
        session.start();
        session.set_paused(true);
        session.advance(0.0);
        session.advance(160.0);
        assert_eq!(session.state().time_ticks, 0);
        assert_eq!(session.state().phase, GamePhase::Paused);

        session.set_paused(false);
        session.advance(320.0);
        assert!(session.state().time_ticks > 0);
        assert_eq!(session.state().phase, GamePhase::Running);
    }

    #[test]
    fn test_reward_callback_fires_per_coin_unit() {
        use crate::sim::{Collectible, CollectibleKind};
        use glam::Vec2;

        let units = Rc::new(RefCell::new(0u32));
        let sink = units.clone();

        let mut session = Session::new(1);
        session.on_reward(move |n| *sink.borrow_mut() += n);
        session.start();

        let pos = session.state().player.pos;
        session.state.collectibles.push(Collectible {
            id: 900,
            kind: CollectibleKind::Coin,
            pos,
            speed: 0.0,
            double: true,
        });
        session.state.collectibles.push(Collectible {
            id: 901,
            kind: CollectibleKind::Coin,
            pos: pos + Vec2::new(5.0, 0.0),
            speed: 0.0,
            double: false,
        });
        session.step_ticks(1);
        assert_eq!(*units.borrow(), 3);
        assert_eq!(session.state().coins, 3);
    }

    #[test]
    fn test_session_end_reported_once() {
        use crate::sim::{Obstacle, ObstacleKind};

        let ends = Rc::new(RefCell::new(Vec::new()));
        let sink = ends.clone();

        let mut session = Session::new(1);
        session.on_session_end(move |s| sink.borrow_mut().push(s.clone()));
        session.start();

        session.state.lives = 1;
        let pos = session.state.player.pos;
        session.state.obstacles.push(Obstacle {
            id: 900,
            kind: ObstacleKind::Rock,
            pos,
            speed: 0.0,
            warning: false,
            jump: None,
        });
        session.step_ticks(3);
        assert_eq!(session.state().phase, GamePhase::GameOver);
        assert_eq!(ends.borrow().len(), 1);
        assert_eq!(ends.borrow()[0].lives_used, STARTING_LIVES);
    }

    #[test]
    fn test_reset_restores_defaults_and_rearms_end_guard() {
        let mut session = Session::new(1);
        session.start();
        session.step_ticks(100);
        session.state.lives = 0;
        session.state.phase = GamePhase::GameOver;
        session.reset(2);

        let state = session.state();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(state.obstacles.is_empty());
        assert!(state.collectibles.is_empty());
        assert_eq!(state.time_ticks, 0);
        assert!(!session.end_reported);
    }

    #[test]
    fn test_item_usage_counts_into_summary() {
        let mut session = Session::new(1);
        session.start();
        session.state.invincibility_items = 2;
        assert!(session.use_invincibility());
        assert!(!session.use_invincibility(), "window already open");
        assert_eq!(session.items_used, 1);
    }
}
