//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one `Pcg32` owned by the state, injected into factories)
//! - Timers are expiry timestamps against simulation time, never callbacks
//! - No rendering or platform dependencies

pub mod collectibles;
pub mod collision;
pub mod events;
pub mod factory;
pub mod obstacles;
pub mod progression;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use events::GameEvent;
pub use progression::{GearTier, MilestoneOffer, milestone_for};
pub use state::{
    Collectible, CollectibleKind, GamePhase, GameState, JumpState, Obstacle, ObstacleKind, Player,
};
pub use tick::{TickInput, resolve_obstacle_collisions, tick};
