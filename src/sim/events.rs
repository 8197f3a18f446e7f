//! Events emitted by the simulation for the presentation layer
//!
//! The tick queues these on the state; the session drains them once per
//! advance. Nothing in the simulation ever blocks on an event being consumed.

use serde::{Deserialize, Serialize};

use super::progression::GearTier;

/// A discrete thing the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Level increased; fired exactly once per transition
    LevelUp { level: u32 },
    /// Gear tier changed alongside a level-up
    GearChanged { tier: GearTier },
    /// Obstacles start pursuing the player
    FollowModeEngaged,
    /// One-time narrative interstitial
    StoryInterstitial,
    /// One-time score-threshold event
    ScoreThreshold { score: u64 },
    /// Guest progression frozen; a sign-up prompt should be shown
    SignUpRequired,
    /// A coin was picked up; `units` is 1, or 2 for a double coin
    CoinCollected { units: u32 },
    /// An obstacle hit cost a life
    LifeLost { remaining: u8 },
    /// Terminal transitions
    GameOver { score: u64 },
    Victory { score: u64 },
}
