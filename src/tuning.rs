//! Data-driven game balance
//!
//! Every spawn interval, probability band and threshold the simulation uses
//! lives here, so tests can force edge paths and balance passes never touch
//! simulation code. Defaults are the shipped values.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Balance parameters for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    // === Obstacles ===
    /// Minimum spawn interval at level 1
    pub obstacle_base_interval_ms: u64,
    /// Interval shrink per level
    pub obstacle_interval_step_ms: u64,
    /// Spawn probability once the interval has elapsed: base + per_level * level
    pub spawn_chance_base: f32,
    pub spawn_chance_per_level: f32,
    /// Independent per-tick spawn roll from the late levels on
    pub late_spawn_chance: f32,
    /// Spawns allowed per level for levels 1-4; uncapped thereafter
    pub early_level_caps: [u32; 4],
    /// Anti-clustering: minimum distance to any existing obstacle
    pub min_spawn_distance: f32,
    /// Anti-clustering: candidate attempts before giving up and spawning anyway
    pub placement_attempts: u32,
    /// Fraction of base speed per early level
    pub early_speed_factors: [f32; 4],
    /// Uniform random speed spread added at late levels
    pub late_speed_spread: f32,
    /// Late-level speed multipliers: 1 + factor * level
    pub shark_level_factor: f32,
    pub whale_level_factor: f32,
    /// Probability of overriding a late-level spawn to an octopus
    pub octopus_bias: f32,
    /// Probability a late-level whale spawns mid-jump
    pub whale_jump_chance: f32,
    /// Fixed lanes used at early levels
    pub lanes: [f32; 4],
    pub lane_jitter: f32,
    /// Last level using lanes, whitelists, warnings, caps and anti-clustering
    pub early_level_max: u32,

    // === Collectibles ===
    pub collectible_base_interval_ms: u64,
    pub collectible_jitter_ms: u64,
    /// Collectible speed as a fraction of base speed
    pub collectible_speed_factor: f32,
    /// Factory coin probability (else bubble)
    pub coin_chance: f32,
    /// Cumulative bands against one uniform draw
    pub coin_family_band: f32,
    pub bubble_band: f32,
    pub starfish_band: f32,
    /// Probability a coin-family draw is a double coin
    pub double_coin_chance: f32,
    /// Score granted by a bubble
    pub bubble_score: u64,

    // === Timed effects ===
    pub boost_duration_ms: u64,
    pub invincibility_duration_ms: u64,
    pub magnet_duration_ms: u64,
    /// Auto-collect assist range and per-tick pull while the magnet is active
    pub magnet_radius: f32,
    pub magnet_pull: f32,

    // === Progression ===
    /// Base speed gained per level-up
    pub speed_per_level: f32,
    pub follow_mode_level: u32,
    /// Maximum vertical steering step per tick in follow mode
    pub follow_step: f32,
    pub gear_tier2_level: u32,
    pub gear_tier3_level: u32,
    pub story_level: u32,
    pub boss_level: u32,
    pub victory_level: u32,
    pub victory_lives: u8,
    pub victory_score: u64,
    /// Guest sessions never progress past this level
    pub guest_level_cap: u32,
    pub score_event_threshold: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            obstacle_base_interval_ms: 2450,
            obstacle_interval_step_ms: 100,
            spawn_chance_base: 0.26,
            spawn_chance_per_level: 0.08,
            late_spawn_chance: 0.02,
            early_level_caps: [5, 15, 20, 25],
            min_spawn_distance: 130.0,
            placement_attempts: 7,
            early_speed_factors: [0.5, 0.65, 0.8, 0.95],
            late_speed_spread: 2.0,
            shark_level_factor: 0.3,
            whale_level_factor: 0.25,
            octopus_bias: 0.4,
            whale_jump_chance: 0.3,
            lanes: [150.0, 250.0, 350.0, 450.0],
            lane_jitter: 20.0,
            early_level_max: 4,

            collectible_base_interval_ms: 1500,
            collectible_jitter_ms: 1000,
            collectible_speed_factor: 0.8,
            coin_chance: 0.9,
            coin_family_band: 0.8,
            bubble_band: 0.93,
            starfish_band: 0.97,
            double_coin_chance: 0.12,
            bubble_score: 50,

            boost_duration_ms: 3000,
            invincibility_duration_ms: 6000,
            magnet_duration_ms: 8000,
            magnet_radius: 200.0,
            magnet_pull: 6.0,

            speed_per_level: 0.5,
            follow_mode_level: 5,
            follow_step: 1.5,
            gear_tier2_level: 5,
            gear_tier3_level: 8,
            story_level: 7,
            boss_level: 10,
            victory_level: 10,
            victory_lives: 3,
            victory_score: 50_000,
            guest_level_cap: 3,
            score_event_threshold: 500,
        }
    }
}

impl Tuning {
    /// Spawn cap for a level; `None` means uncapped
    pub fn spawn_cap(&self, level: u32) -> Option<u32> {
        if level >= 1 && level <= self.early_level_max {
            Some(self.early_level_caps[(level - 1) as usize])
        } else {
            None
        }
    }

    /// Minimum obstacle spawn interval for a level
    pub fn obstacle_interval_ms(&self, level: u32) -> u64 {
        self.obstacle_base_interval_ms
            .saturating_sub(self.obstacle_interval_step_ms * u64::from(level.saturating_sub(1)))
    }

    /// Fixed fraction of base speed at an early level
    pub fn early_speed_factor(&self, level: u32) -> f32 {
        let idx = (level.clamp(1, self.early_level_max) - 1) as usize;
        self.early_speed_factors[idx.min(self.early_speed_factors.len() - 1)]
    }

    /// Draw the next collectible spawn interval: base plus uniform jitter
    pub fn collectible_interval_ms<R: Rng>(&self, rng: &mut R) -> u64 {
        self.collectible_base_interval_ms + rng.random_range(0..self.collectible_jitter_ms)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("tuning serializes")
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
