//! Progression state machine
//!
//! Level is a derived, monotonically non-decreasing function of score.
//! Level-up side effects fire exactly once per transition; victory and the
//! one-shot score events are re-checked every tick. Guest sessions freeze at
//! the guest level cap and request a sign-up instead.

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::state::{GamePhase, GameState};
use crate::consts::POINTS_PER_LEVEL;
use crate::tuning::Tuning;

/// Player gear tier, derived from level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GearTier {
    Basic,
    Reinforced,
    Elite,
}

/// Gear tier for a level
pub fn gear_tier_for(tuning: &Tuning, level: u32) -> GearTier {
    if level >= tuning.gear_tier3_level {
        GearTier::Elite
    } else if level >= tuning.gear_tier2_level {
        GearTier::Reinforced
    } else {
        GearTier::Basic
    }
}

/// Level implied by a score, before guest gating
#[inline]
pub fn level_for_score(score: u64) -> u32 {
    (score / POINTS_PER_LEVEL) as u32 + 1
}

/// Milestone offer bands over the currency balance, evaluated continuously
/// by the presentation layer (no transition gating).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MilestoneOffer {
    /// Balance covers the items outright
    FreeItems,
    /// Balance supports the standard purchase prompt
    Purchase,
    /// Balance supports the discounted purchase prompt
    DiscountedPurchase,
}

/// Offer for a currency balance, if any
pub fn milestone_for(balance: u64) -> Option<MilestoneOffer> {
    match balance {
        150.. => Some(MilestoneOffer::FreeItems),
        100..=149 => Some(MilestoneOffer::Purchase),
        50..=99 => Some(MilestoneOffer::DiscountedPurchase),
        _ => None,
    }
}

/// Run the per-tick progression pass: level derivation with guest gating,
/// level-up side effects, one-shot score events and the victory check.
pub fn advance(state: &mut GameState) {
    let computed = level_for_score(state.score);

    let target = if state.authenticated {
        computed
    } else {
        computed.min(state.tuning.guest_level_cap)
    };

    if !state.authenticated
        && computed > state.tuning.guest_level_cap
        && !state.signup_prompted
    {
        state.signup_prompted = true;
        state.events.push(GameEvent::SignUpRequired);
        log::info!("guest progression frozen at level {}", state.level);
    }

    while state.level < target {
        let prev = state.level;
        state.level += 1;
        state.game_speed += state.tuning.speed_per_level;
        state.obstacles_this_level = 0;
        state.events.push(GameEvent::LevelUp { level: state.level });
        log::info!("level {} reached (speed {:.1})", state.level, state.game_speed);

        let tier = gear_tier_for(&state.tuning, state.level);
        if tier != gear_tier_for(&state.tuning, prev) {
            state.events.push(GameEvent::GearChanged { tier });
        }
        if state.level == state.tuning.follow_mode_level {
            state.events.push(GameEvent::FollowModeEngaged);
        }
        if state.level == state.tuning.story_level && !state.story_shown {
            state.story_shown = true;
            state.events.push(GameEvent::StoryInterstitial);
        }
    }

    if state.score >= state.tuning.score_event_threshold && !state.score_event_fired {
        state.score_event_fired = true;
        state
            .events
            .push(GameEvent::ScoreThreshold { score: state.score });
    }

    // All three conditions must hold simultaneously
    if state.phase == GamePhase::Running
        && state.level >= state.tuning.victory_level
        && state.lives >= state.tuning.victory_lives
        && state.score >= state.tuning.victory_score
    {
        state.phase = GamePhase::Victory;
        state.events.push(GameEvent::Victory { score: state.score });
        log::info!("victory at score {}", state.score);
    }
}
