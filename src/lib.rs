//! Reef Runner - a side-scrolling ocean arcade runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, progression)
//! - `session`: Fixed-timestep driver owning the authoritative state and callbacks
//! - `tuning`: Data-driven game balance

pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{Session, SessionSummary};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (62.5 Hz)
    pub const TICK_MS: u64 = 16;
    /// Maximum substeps per advance to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 900.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Vertical play band (entities and the player stay inside it)
    pub const BAND_TOP: f32 = 100.0;
    pub const BAND_BOTTOM: f32 = 520.0;

    /// Entities spawn at the right edge and despawn left of this x
    pub const SPAWN_X: f32 = PLAYFIELD_WIDTH;
    pub const DESPAWN_X: f32 = -150.0;

    /// Player swims at a fixed horizontal position
    pub const PLAYER_X: f32 = 120.0;
    /// Player hitbox edge length
    pub const PLAYER_HITBOX: f32 = 60.0;
    /// Collectible hitbox edge length
    pub const COLLECTIBLE_HITBOX: f32 = 40.0;

    /// Score gained per running tick
    pub const SCORE_PER_TICK: u64 = 10;
    /// Score span of one level
    pub const POINTS_PER_LEVEL: u64 = 5000;

    /// Starting lives
    pub const STARTING_LIVES: u8 = 3;
    /// Base horizontal speed scalar at level 1
    pub const BASE_GAME_SPEED: f32 = 3.0;

    /// Whale jump arc duration and amplitude
    pub const JUMP_DURATION_MS: u64 = 3000;
    pub const JUMP_AMPLITUDE: f32 = 100.0;
}

/// Clamp a vertical coordinate into the play band.
#[inline]
pub fn clamp_to_band(y: f32) -> f32 {
    y.clamp(consts::BAND_TOP, consts::BAND_BOTTOM)
}
