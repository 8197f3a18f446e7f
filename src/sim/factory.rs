//! Entity factories
//!
//! Pure generators producing a fully specified obstacle or collectible from
//! the current level, base speed and boost state. All randomness comes from
//! the injected RNG so tests can force specific outcomes.

use glam::Vec2;
use rand::Rng;

use super::state::{Collectible, CollectibleKind, JumpState, Obstacle, ObstacleKind};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::clamp_to_band;

/// Variant whitelists for the early levels
const LEVEL_1_KINDS: [ObstacleKind; 3] = [
    ObstacleKind::Jellyfish,
    ObstacleKind::Crate,
    ObstacleKind::Seaweed,
];
const LEVEL_2_KINDS: [ObstacleKind; 4] = [
    ObstacleKind::Jellyfish,
    ObstacleKind::Crate,
    ObstacleKind::Seaweed,
    ObstacleKind::Rock,
];
const LEVEL_3_KINDS: [ObstacleKind; 4] = [
    ObstacleKind::Shark,
    ObstacleKind::Rock,
    ObstacleKind::Whirlpool,
    ObstacleKind::Crate,
];
const LEVEL_4_KINDS: [ObstacleKind; 4] = [
    ObstacleKind::Shark,
    ObstacleKind::Whale,
    ObstacleKind::Octopus,
    ObstacleKind::Rock,
];

fn pick_kind<R: Rng>(tuning: &Tuning, level: u32, rng: &mut R) -> ObstacleKind {
    if level <= tuning.early_level_max {
        let table: &[ObstacleKind] = match level {
            1 => &LEVEL_1_KINDS,
            2 => &LEVEL_2_KINDS,
            3 => &LEVEL_3_KINDS,
            _ => &LEVEL_4_KINDS,
        };
        table[rng.random_range(0..table.len())]
    } else {
        // Uniform over all variants, then the octopus bias override
        let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
        if rng.random::<f32>() < tuning.octopus_bias {
            ObstacleKind::Octopus
        } else {
            kind
        }
    }
}

/// Build a new obstacle at the right edge of the playfield.
pub fn spawn_obstacle<R: Rng>(
    id: u32,
    tuning: &Tuning,
    level: u32,
    game_speed: f32,
    boost_active: bool,
    now_ms: u64,
    rng: &mut R,
) -> Obstacle {
    let kind = pick_kind(tuning, level, rng);
    let early = level <= tuning.early_level_max;

    let mut speed = if early {
        game_speed * tuning.early_speed_factor(level)
    } else {
        game_speed + rng.random_range(0.0..tuning.late_speed_spread)
    };
    if !early {
        // Late-game difficulty drivers: these scale unboundedly with level
        match kind {
            ObstacleKind::Shark => speed *= 1.0 + level as f32 * tuning.shark_level_factor,
            ObstacleKind::Whale => speed *= 1.0 + level as f32 * tuning.whale_level_factor,
            _ => {}
        }
    }
    // Obstacles slow down while the player's boost window is open
    if boost_active {
        speed *= 0.5;
    }

    let y = if early {
        let lane = tuning.lanes[rng.random_range(0..tuning.lanes.len())];
        let jitter = if tuning.lane_jitter > 0.0 {
            rng.random_range(-tuning.lane_jitter..tuning.lane_jitter)
        } else {
            0.0
        };
        lane + jitter
    } else {
        rng.random_range(BAND_TOP..BAND_BOTTOM)
    };

    let jump = if kind == ObstacleKind::Whale
        && !early
        && rng.random::<f32>() < tuning.whale_jump_chance
    {
        Some(JumpState {
            started_ms: now_ms,
            direction: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
        })
    } else {
        None
    };

    debug_assert!(speed.is_finite() && speed > 0.0, "factory produced bad speed");
    debug_assert!(y.is_finite(), "factory produced bad position");
    let speed = if speed.is_finite() { speed.max(0.1) } else { game_speed.max(0.1) };

    Obstacle {
        id,
        kind,
        pos: Vec2::new(SPAWN_X, clamp_to_band(y)),
        speed,
        warning: early,
        jump,
    }
}

/// Build a new collectible: coin with the factory's coin probability, else bubble.
pub fn spawn_collectible<R: Rng>(
    id: u32,
    tuning: &Tuning,
    game_speed: f32,
    rng: &mut R,
) -> Collectible {
    let kind = if rng.random::<f32>() < tuning.coin_chance {
        CollectibleKind::Coin
    } else {
        CollectibleKind::Bubble
    };
    make_collectible(id, kind, false, tuning, game_speed, rng)
}

/// Build a collectible of a fixed kind at a random band position.
pub fn make_collectible<R: Rng>(
    id: u32,
    kind: CollectibleKind,
    double: bool,
    tuning: &Tuning,
    game_speed: f32,
    rng: &mut R,
) -> Collectible {
    let speed = game_speed * tuning.collectible_speed_factor;
    let y = rng.random_range(BAND_TOP..BAND_BOTTOM);
    debug_assert!(speed.is_finite() && speed > 0.0, "factory produced bad speed");
    let speed = if speed.is_finite() { speed.max(0.1) } else { game_speed.max(0.1) };

    Collectible {
        id,
        kind,
        pos: Vec2::new(SPAWN_X, clamp_to_band(y)),
        speed,
        double: double && kind == CollectibleKind::Coin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(1234)
    }

    #[test]
    fn test_level1_kinds_stay_on_whitelist() {
        let tuning = Tuning::default();
        let mut rng = rng();
        for i in 0..200 {
            let ob = spawn_obstacle(i, &tuning, 1, 3.0, false, 0, &mut rng);
            assert!(LEVEL_1_KINDS.contains(&ob.kind), "{:?} not allowed at level 1", ob.kind);
            assert!(ob.warning);
            assert!(ob.jump.is_none());
        }
    }

    #[test]
    fn test_early_speed_is_fixed_fraction() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let ob = spawn_obstacle(1, &tuning, 1, 3.0, false, 0, &mut rng);
        assert!((ob.speed - 1.5).abs() < 1e-6);
        let ob = spawn_obstacle(2, &tuning, 4, 3.0, false, 0, &mut rng);
        assert!((ob.speed - 2.85).abs() < 1e-6);
    }

    #[test]
    fn test_boost_halves_speed() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let ob = spawn_obstacle(1, &tuning, 1, 3.0, true, 0, &mut rng);
        assert!((ob.speed - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_early_positions_snap_to_lanes() {
        let tuning = Tuning::default();
        let mut rng = rng();
        for i in 0..200 {
            let ob = spawn_obstacle(i, &tuning, 2, 3.0, false, 0, &mut rng);
            let near_lane = tuning
                .lanes
                .iter()
                .any(|lane| (ob.pos.y - lane).abs() <= tuning.lane_jitter);
            assert!(near_lane, "y {} off every lane", ob.pos.y);
            assert_eq!(ob.pos.x, SPAWN_X);
        }
    }

    #[test]
    fn test_late_levels_bias_toward_octopus() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let octopi = (0..1000)
            .filter(|&i| {
                spawn_obstacle(i, &tuning, 6, 3.0, false, 0, &mut rng).kind
                    == ObstacleKind::Octopus
            })
            .count();
        // Expected rate is bias + (1 - bias)/8 ~= 0.475
        assert!(octopi > 350, "octopus bias too weak: {octopi}/1000");
    }

    #[test]
    fn test_late_shark_speed_scales_with_level() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let level = 6;
        let floor = 3.0 * (1.0 + level as f32 * tuning.shark_level_factor);
        let mut seen = 0;
        for i in 0..500 {
            let ob = spawn_obstacle(i, &tuning, level, 3.0, false, 0, &mut rng);
            if ob.kind == ObstacleKind::Shark {
                seen += 1;
                assert!(ob.speed >= floor - 1e-3, "shark speed {} below {floor}", ob.speed);
            }
        }
        assert!(seen > 0, "no sharks drawn in 500 spawns");
    }

    #[test]
    fn test_late_whales_sometimes_spawn_jumping() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut jumping = 0;
        let mut whales = 0;
        for i in 0..2000 {
            let ob = spawn_obstacle(i, &tuning, 5, 3.0, false, 4800, &mut rng);
            if ob.kind == ObstacleKind::Whale {
                whales += 1;
                if let Some(jump) = ob.jump {
                    jumping += 1;
                    assert_eq!(jump.started_ms, 4800);
                    assert!(jump.direction == 1.0 || jump.direction == -1.0);
                }
            }
        }
        assert!(whales > 0);
        assert!(jumping > 0, "no jumping whale in {whales} whales");
        assert!(jumping < whales, "every whale spawned jumping");
    }

    #[test]
    fn test_collectible_factory_split() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let mut coins = 0;
        for i in 0..1000 {
            let c = spawn_collectible(i, &tuning, 3.0, &mut rng);
            assert!((c.speed - 2.4).abs() < 1e-6);
            assert!(!c.double);
            match c.kind {
                CollectibleKind::Coin => coins += 1,
                CollectibleKind::Bubble => {}
                other => panic!("factory produced {other:?}"),
            }
        }
        assert!(coins > 800, "coin rate too low: {coins}/1000");
    }

    #[test]
    fn test_double_flag_restricted_to_coins() {
        let tuning = Tuning::default();
        let mut rng = rng();
        let c = make_collectible(1, CollectibleKind::Bubble, true, &tuning, 3.0, &mut rng);
        assert!(!c.double);
        let c = make_collectible(2, CollectibleKind::Coin, true, &tuning, 3.0, &mut rng);
        assert!(c.double);
    }
}
