//! Collectible population management
//!
//! Per tick: straight-line leftward movement (plus the magnet assist while
//! that window is open), despawning, jittered interval spawning through the
//! weighted outcome bands, and batched pickup resolution against the player.

use rand::Rng;

use super::events::GameEvent;
use super::factory;
use super::state::{CollectibleKind, GameState};
use crate::consts::*;

/// Advance all collectibles by one tick and run the spawn policy.
/// Returns whether a spawn occurred this tick.
pub fn update_collectibles(state: &mut GameState) -> bool {
    let now = state.now_ms();
    let magnet = state.magnet_active();
    let player_pos = state.player.pos;
    let radius = state.tuning.magnet_radius;
    let pull = state.tuning.magnet_pull;

    for c in &mut state.collectibles {
        c.pos.x -= c.speed;
        if magnet {
            let to_player = player_pos - c.pos;
            let dist = to_player.length();
            if dist > 1.0 && dist < radius {
                c.pos += to_player / dist * pull;
            }
        }
    }

    state.collectibles.retain(|c| c.pos.x >= DESPAWN_X);

    try_spawn(state, now)
}

/// Spawn once the jittered interval has elapsed. One uniform draw selects the
/// outcome band: coin-family (with a nested double-coin draw, otherwise the
/// factory and its own coin/bubble split), bubble, starfish, magnet.
fn try_spawn(state: &mut GameState, now: u64) -> bool {
    let elapsed = now.saturating_sub(state.last_collectible_spawn_ms);
    if elapsed <= state.next_collectible_delay_ms {
        return false;
    }

    let id = state.next_entity_id();
    let band: f32 = state.rng.random();
    let collectible = if band < state.tuning.coin_family_band {
        if state.rng.random::<f32>() < state.tuning.double_coin_chance {
            factory::make_collectible(
                id,
                CollectibleKind::Coin,
                true,
                &state.tuning,
                state.game_speed,
                &mut state.rng,
            )
        } else {
            factory::spawn_collectible(id, &state.tuning, state.game_speed, &mut state.rng)
        }
    } else {
        let kind = if band < state.tuning.bubble_band {
            CollectibleKind::Bubble
        } else if band < state.tuning.starfish_band {
            CollectibleKind::Starfish
        } else {
            CollectibleKind::Magnet
        };
        factory::make_collectible(id, kind, false, &state.tuning, state.game_speed, &mut state.rng)
    };

    state.collectibles.push(collectible);
    state.last_collectible_spawn_ms = now;
    state.next_collectible_delay_ms = state.tuning.collectible_interval_ms(&mut state.rng);
    true
}

/// Resolve player pickups: apply each overlapping collectible's effect exactly
/// once, then remove all of them in one batch.
pub fn resolve_pickups(state: &mut GameState) {
    let player_box = state.player.hitbox();

    let mut collected: Vec<usize> = Vec::new();
    for (i, c) in state.collectibles.iter().enumerate() {
        if player_box.overlaps(&c.hitbox()) {
            collected.push(i);
        }
    }
    if collected.is_empty() {
        return;
    }

    for &i in &collected {
        let (kind, double) = (state.collectibles[i].kind, state.collectibles[i].double);
        match kind {
            CollectibleKind::Coin => {
                let units: u32 = if double { 2 } else { 1 };
                state.coins += u64::from(units);
                state.events.push(GameEvent::CoinCollected { units });
            }
            CollectibleKind::Bubble => {
                state.score += state.tuning.bubble_score;
            }
            CollectibleKind::Starfish => {
                state.invincibility_items += 1;
            }
            CollectibleKind::Magnet => {
                state.magnet_items += 1;
            }
        }
    }

    let mut idx = 0;
    state.collectibles.retain(|_| {
        let keep = !collected.contains(&idx);
        idx += 1;
        keep
    });
}
