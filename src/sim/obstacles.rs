//! Obstacle population management
//!
//! Per tick: movement (with the whale jump arc), follow-mode steering,
//! despawning, then the spawn policy. Early levels throttle spawns by
//! interval, probability, per-level caps and anti-clustering; late levels
//! roll an independent per-tick chance.

use std::f32::consts::PI;

use rand::Rng;

use super::factory;
use super::state::{GameState, Obstacle};
use crate::consts::*;

/// Sinusoidal jump phase at an elapsed time: one full up-down arc over the
/// jump duration, zero at both ends.
#[inline]
fn jump_phase(elapsed_ms: u64) -> f32 {
    let t = (elapsed_ms.min(JUMP_DURATION_MS) as f32) / JUMP_DURATION_MS as f32;
    (PI * t).sin()
}

/// Advance all obstacles by one tick and run the spawn policy.
/// Returns whether a spawn occurred this tick.
pub fn update_obstacles(state: &mut GameState) -> bool {
    let now = state.now_ms();
    let player_y = state.player.pos.y;
    let follow = state.follow_mode();
    let follow_step = state.tuning.follow_step;

    for ob in &mut state.obstacles {
        ob.pos.x -= ob.speed;

        // Whale jump: incremental vertical displacement, so y returns to its
        // baseline when the arc completes. Horizontal motion is unaffected.
        if let Some(jump) = ob.jump {
            let elapsed = now.saturating_sub(jump.started_ms);
            let prev = elapsed.saturating_sub(TICK_MS);
            ob.pos.y += jump.direction * JUMP_AMPLITUDE * (jump_phase(elapsed) - jump_phase(prev));
            if elapsed >= JUMP_DURATION_MS {
                ob.jump = None;
            }
        } else if follow {
            // Capped proportional pursuit of the player's vertical position
            let dy = player_y - ob.pos.y;
            ob.pos.y += dy.clamp(-follow_step, follow_step);
        }
    }

    state.obstacles.retain(|ob| ob.pos.x >= DESPAWN_X);

    let spawned = if state.level <= state.tuning.early_level_max {
        try_early_spawn(state, now)
    } else {
        try_late_spawn(state, now)
    };
    if spawned {
        state.obstacles_this_level += 1;
        state.last_obstacle_spawn_ms = now;
    }
    spawned
}

/// Interval- and probability-throttled spawning for levels 1-4, gated by the
/// per-level cap and placed with anti-clustering.
fn try_early_spawn(state: &mut GameState, now: u64) -> bool {
    if let Some(cap) = state.tuning.spawn_cap(state.level) {
        if state.obstacles_this_level >= cap {
            return false;
        }
    }

    let elapsed = now.saturating_sub(state.last_obstacle_spawn_ms);
    if elapsed <= state.tuning.obstacle_interval_ms(state.level) {
        return false;
    }

    // An empty field forces the spawn; the probability draw is short-circuited
    // away in that case.
    if !state.obstacles.is_empty() {
        let chance = state.tuning.spawn_chance_base
            + state.tuning.spawn_chance_per_level * state.level as f32;
        if state.rng.random::<f32>() >= chance {
            return false;
        }
    }

    let attempts = state.tuning.placement_attempts.max(1);
    let min_dist = state.tuning.min_spawn_distance;
    let id = state.next_entity_id();

    let mut candidate = make_candidate(state, id, now);
    for _ in 1..attempts {
        if placement_clear(&candidate, &state.obstacles, min_dist) {
            break;
        }
        candidate = make_candidate(state, id, now);
    }
    // The final attempt spawns regardless of clearance
    state.obstacles.push(candidate);
    true
}

/// Independent per-tick roll for levels 5+: no interval, cap or clustering gate.
fn try_late_spawn(state: &mut GameState, now: u64) -> bool {
    if state.rng.random::<f32>() >= state.tuning.late_spawn_chance {
        return false;
    }
    let id = state.next_entity_id();
    let ob = make_candidate(state, id, now);
    state.obstacles.push(ob);
    true
}

fn make_candidate(state: &mut GameState, id: u32, now: u64) -> Obstacle {
    let boost = state.boost_active();
    factory::spawn_obstacle(
        id,
        &state.tuning,
        state.level,
        state.game_speed,
        boost,
        now,
        &mut state.rng,
    )
}

/// True when the candidate keeps the minimum Euclidean distance to every
/// existing obstacle.
fn placement_clear(candidate: &Obstacle, existing: &[Obstacle], min_dist: f32) -> bool {
    existing
        .iter()
        .all(|ob| ob.pos.distance(candidate.pos) >= min_dist)
}
