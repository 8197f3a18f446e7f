//! Reef Runner entry point
//!
//! Headless driver: runs a scripted demo session against a simulated clock
//! and logs the run. Rendering lives in a separate frontend; this binary
//! exists to exercise the simulation end to end.

use reef_runner::consts::*;
use reef_runner::sim::GameEvent;
use reef_runner::Session;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);
    log::info!("Reef Runner (headless) starting with seed {seed}");

    let mut session = Session::new(seed);
    session.set_authenticated(true);
    session.on_reward(|units| log::debug!("reward: {units} coin"));
    session.on_session_end(|summary| {
        log::info!(
            "run ended: score {} level {} after {:.1}s ({} lives used, {} items used)",
            summary.score,
            summary.level,
            summary.duration_ms as f64 / 1000.0,
            summary.lives_used,
            summary.items_used,
        );
    });
    session.start();

    // Scripted swim: sweep the play band for up to two simulated minutes
    let mut clock = 0.0;
    for frame in 0..7500u32 {
        clock += TICK_MS as f64;
        let mid = (BAND_TOP + BAND_BOTTOM) / 2.0;
        let span = (BAND_BOTTOM - BAND_TOP) / 2.0 - 10.0;
        session.set_player_y(mid + span * (frame as f32 * 0.013).sin());
        session.advance(clock);

        for event in session.poll_events() {
            match event {
                GameEvent::LevelUp { level } => log::info!("demo reached level {level}"),
                GameEvent::StoryInterstitial => log::info!("story interstitial triggered"),
                GameEvent::SignUpRequired => log::warn!("sign-up prompt requested"),
                _ => {}
            }
        }

        if session.state().phase.is_terminal() {
            break;
        }
    }

    let state = session.state();
    log::info!(
        "final snapshot: score {} level {} lives {} coins {} obstacles {} collectibles {}",
        state.score,
        state.level,
        state.lives,
        state.coins,
        state.obstacles.len(),
        state.collectibles.len(),
    );
}
