//! Fixed timestep simulation tick
//!
//! One tick, in order: obstacle pass, collectible pass (movement, spawning,
//! pickups), score, progression. Player-obstacle collision is a separate
//! pass so it can also run reactively when the player moves between ticks;
//! both the tick and the collision pass check the pause gate first.

use super::collectibles;
use super::events::GameEvent;
use super::obstacles;
use super::progression;
use super::state::{GamePhase, GameState};
use crate::clamp_to_band;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Target player vertical position (from input handling)
    pub player_y: Option<f32>,
    /// External pause gate: held true while any modal is open
    pub pause: bool,
    /// Open the speed-boost window
    pub boost: bool,
    /// Consume a banked invincibility item
    pub use_invincibility: bool,
    /// Consume a banked magnet item
    pub use_magnet: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Terminal and idle phases ignore ticks; timer/teardown races make a
    // stray tick here reachable under normal operation
    match state.phase {
        GamePhase::Idle | GamePhase::GameOver | GamePhase::Victory => return,
        GamePhase::Running | GamePhase::Paused => {}
    }

    // Pause gate before any advancement; a frozen tick counter freezes every
    // derived timer, so resume is exact
    if input.pause {
        state.phase = GamePhase::Paused;
        return;
    }
    if state.phase == GamePhase::Paused {
        state.phase = GamePhase::Running;
    }

    apply_commands(state, input);

    state.time_ticks += 1;

    obstacles::update_obstacles(state);
    collectibles::update_collectibles(state);
    collectibles::resolve_pickups(state);
    state.score += SCORE_PER_TICK;
    progression::advance(state);
}

/// Apply player commands against the latest state
fn apply_commands(state: &mut GameState, input: &TickInput) {
    if let Some(y) = input.player_y {
        state.player.pos.y = clamp_to_band(y);
    }
    let now = state.now_ms();
    if input.boost && !state.boost_active() {
        state.boost_until_ms = now + state.tuning.boost_duration_ms;
    }
    if input.use_invincibility && state.invincibility_items > 0 && !state.invincible_active() {
        state.invincibility_items -= 1;
        state.invincible_until_ms = now + state.tuning.invincibility_duration_ms;
    }
    if input.use_magnet && state.magnet_items > 0 && !state.magnet_active() {
        state.magnet_items -= 1;
        state.magnet_until_ms = now + state.tuning.magnet_duration_ms;
    }
}

/// Resolve player-obstacle collisions against the current snapshot.
///
/// Kept separate from `tick` so it can run on its own cadence (reactively on
/// player movement). Each overlapping obstacle independently costs a life;
/// losing the last one ends the run. Colliding obstacles are removed either
/// way, including while invincibility is open.
pub fn resolve_obstacle_collisions(state: &mut GameState) {
    if state.phase != GamePhase::Running {
        return;
    }

    let player_box = state.player.hitbox();
    let invincible = state.invincible_active();

    let mut i = 0;
    while i < state.obstacles.len() {
        if !player_box.overlaps(&state.obstacles[i].hitbox()) {
            i += 1;
            continue;
        }
        state.obstacles.remove(i);
        if invincible {
            continue;
        }
        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::LifeLost {
            remaining: state.lives,
        });
        if state.lives == 0 {
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::GameOver { score: state.score });
            log::info!("game over at score {}", state.score);
            return;
        }
    }
}
