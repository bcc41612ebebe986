use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

mod engine;
mod game;

use engine::audio::LogSink;
use engine::game_loop::GameLoop;
use game::arena::Arena;
use game::combat::CombatTuning;

/// Wall-clock cap on a demo match.
const MATCH_TIME_LIMIT: Duration = Duration::from_secs(120);
/// Grace period after the match ends, long enough for the terminal animation.
const OUTRO: Duration = Duration::from_secs(4);

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Sword Bout...");

    let mut arena = Arena::new(
        CombatTuning::standard(),
        Box::new(LogSink),
        rand::thread_rng().gen(),
    )?;
    arena.start();

    // Stand-in for the wireless sword: random gesture codes at a human-ish
    // cadence, fed through the same debounced path real notifications take.
    let mut feed = ChaCha8Rng::from_entropy();
    let mut next_gesture = Instant::now() + Duration::from_millis(feed.gen_range(1000..2000));

    let mut game_loop = GameLoop::new();
    let mut ended_at: Option<Instant> = None;

    loop {
        let now = Instant::now();

        if arena.is_active() && now >= next_gesture {
            let code = feed.gen_range(0..=4);
            arena.notify(code, now);
            next_gesture = now + Duration::from_millis(feed.gen_range(1000..2000));
        }

        let steps = game_loop.begin_frame();
        for _ in 0..steps {
            arena.step(game_loop.fixed_timestep(), now);
        }

        if game_loop.frame_count() % 120 == 0 {
            info!(
                "fighter {:>4} hp  |  player {:>4} hp",
                arena.fighter().health.points(),
                arena.player().health.points()
            );
        }

        if !arena.is_active() && ended_at.is_none() {
            let winner = if arena.player().health.is_depleted() {
                "fighter"
            } else {
                "player"
            };
            info!("match over after {:.1}s, {winner} wins", game_loop.elapsed_secs());
            ended_at = Some(now);
        }

        if let Some(at) = ended_at {
            if now.duration_since(at) >= OUTRO {
                break;
            }
        }
        if game_loop.elapsed() >= MATCH_TIME_LIMIT {
            info!("time limit reached, calling it a draw");
            break;
        }

        thread::sleep(Duration::from_millis(4));
    }

    info!("Shutting down");
    Ok(())
}
