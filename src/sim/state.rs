//! Game state and core simulation types
//!
//! All state that must be persisted for determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::events::GameEvent;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Session created, not started yet
    Idle,
    /// Active gameplay
    Running,
    /// Frozen by the external pause gate (modal open)
    Paused,
    /// Run ended by losing all lives
    GameOver,
    /// Run ended by meeting the victory conditions
    Victory,
}

impl GamePhase {
    /// Terminal phases are set once and gate all further ticking until reset
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Shark,
    Whale,
    Octopus,
    Rock,
    Jellyfish,
    Whirlpool,
    Crate,
    Seaweed,
}

impl ObstacleKind {
    /// All variants, in spawn-table order
    pub const ALL: [ObstacleKind; 8] = [
        ObstacleKind::Shark,
        ObstacleKind::Whale,
        ObstacleKind::Octopus,
        ObstacleKind::Rock,
        ObstacleKind::Jellyfish,
        ObstacleKind::Whirlpool,
        ObstacleKind::Crate,
        ObstacleKind::Seaweed,
    ];

    /// Hitbox dimensions (width, height) for this variant
    pub fn hitbox_size(&self) -> (f32, f32) {
        match self {
            ObstacleKind::Shark => (90.0, 40.0),
            ObstacleKind::Whale => (110.0, 60.0),
            ObstacleKind::Octopus => (70.0, 70.0),
            ObstacleKind::Rock => (60.0, 60.0),
            ObstacleKind::Jellyfish => (40.0, 60.0),
            ObstacleKind::Whirlpool => (80.0, 80.0),
            ObstacleKind::Crate => (50.0, 50.0),
            ObstacleKind::Seaweed => (40.0, 80.0),
        }
    }
}

/// Whale jump sub-state. Present as a group or absent as a group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpState {
    /// Simulation time when the jump began
    pub started_ms: u64,
    /// Vertical direction of the arc (+1 down, -1 up)
    pub direction: f32,
}

/// An obstacle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    /// Leftward speed per tick
    pub speed: f32,
    /// Cosmetic approach indicator, set only at early levels
    pub warning: bool,
    /// Jump arc state, only ever set on whales
    pub jump: Option<JumpState>,
}

impl Obstacle {
    /// Hitbox centered on the obstacle position
    pub fn hitbox(&self) -> Rect {
        let (w, h) = self.kind.hitbox_size();
        Rect::centered(self.pos, w, h)
    }

    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }
}

/// Collectible variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    Bubble,
    Starfish,
    Magnet,
}

/// A collectible entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub pos: Vec2,
    /// Leftward speed per tick
    pub speed: f32,
    /// Doubled reward, coin variant only
    pub double: bool,
}

impl Collectible {
    /// Hitbox centered on the collectible position
    pub fn hitbox(&self) -> Rect {
        Rect::centered(self.pos, COLLECTIBLE_HITBOX, COLLECTIBLE_HITBOX)
    }
}

/// The player entity. Horizontal position is constant; vertical position is
/// externally mutated by input handling and read by the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, PLAYFIELD_HEIGHT / 2.0),
        }
    }
}

impl Player {
    /// Hitbox centered on the player position
    pub fn hitbox(&self) -> Rect {
        Rect::centered(self.pos, PLAYER_HITBOX, PLAYER_HITBOX)
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Run RNG; every random decision draws from here
    pub rng: Pcg32,
    /// Balance parameters
    pub tuning: Tuning,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Score, +10 per running tick
    pub score: u64,
    /// Derived level, monotonic non-decreasing, guest-gated
    pub level: u32,
    /// Remaining lives
    pub lives: u8,
    /// Coins collected this run
    pub coins: u64,
    /// Base speed scalar, grows with level
    pub game_speed: f32,
    /// Speed-boost window end (0 = inactive)
    pub boost_until_ms: u64,
    /// Invincibility window end (0 = inactive)
    pub invincible_until_ms: u64,
    /// Magnet window end (0 = inactive)
    pub magnet_until_ms: u64,
    /// Banked invincibility pickups
    pub invincibility_items: u32,
    /// Banked magnet pickups
    pub magnet_items: u32,
    /// Guest sessions freeze progression at the guest level cap
    pub authenticated: bool,
    /// Player entity
    pub player: Player,
    /// Active obstacles
    pub obstacles: Vec<Obstacle>,
    /// Active collectibles
    pub collectibles: Vec<Collectible>,
    /// Spawn throttle timestamps
    pub last_obstacle_spawn_ms: u64,
    pub last_collectible_spawn_ms: u64,
    /// Jittered interval until the next collectible spawn
    pub next_collectible_delay_ms: u64,
    /// Obstacles spawned since the last level change
    pub obstacles_this_level: u32,
    /// One-shot guards
    pub story_shown: bool,
    pub score_event_fired: bool,
    pub signup_prompted: bool,
    /// Events emitted since the last drain, consumed by the session/presentation
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game state with explicit tuning
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let first_delay = tuning.collectible_interval_ms(&mut rng);
        Self {
            seed,
            rng,
            tuning,
            time_ticks: 0,
            phase: GamePhase::Idle,
            score: 0,
            level: 1,
            lives: STARTING_LIVES,
            coins: 0,
            game_speed: BASE_GAME_SPEED,
            boost_until_ms: 0,
            invincible_until_ms: 0,
            magnet_until_ms: 0,
            invincibility_items: 0,
            magnet_items: 0,
            authenticated: false,
            player: Player::default(),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            last_obstacle_spawn_ms: 0,
            last_collectible_spawn_ms: 0,
            next_collectible_delay_ms: first_delay,
            obstacles_this_level: 0,
            story_shown: false,
            score_event_fired: false,
            signup_prompted: false,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Simulation time in milliseconds, derived from the tick counter
    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.time_ticks * TICK_MS
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn boost_active(&self) -> bool {
        self.now_ms() < self.boost_until_ms
    }

    #[inline]
    pub fn invincible_active(&self) -> bool {
        self.now_ms() < self.invincible_until_ms
    }

    #[inline]
    pub fn magnet_active(&self) -> bool {
        self.now_ms() < self.magnet_until_ms
    }

    /// Obstacles steer toward the player from the follow-mode level on
    #[inline]
    pub fn follow_mode(&self) -> bool {
        self.level >= self.tuning.follow_mode_level
    }

    /// Boss encounter is active exactly during the boss level of a live run
    #[inline]
    pub fn boss_active(&self) -> bool {
        self.level == self.tuning.boss_level && !self.phase.is_terminal()
    }

    /// Queue an event for the presentation layer
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain all queued events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Atomically restore every default: populations, timers, counters and
    /// flags together. Tuning and authentication survive the reset.
    pub fn reset(&mut self, seed: u64) {
        let tuning = self.tuning.clone();
        let authenticated = self.authenticated;
        *self = Self::with_tuning(seed, tuning);
        self.authenticated = authenticated;
    }
}
