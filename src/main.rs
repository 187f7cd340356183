use std::{fs::File, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::EnvFilter;

use snake_wrap::clock::TickLimiter;
use snake_wrap::config::{Cli, Settings};
use snake_wrap::game::SnakeGame;
use snake_wrap::term::{merge_restore, TermManager};

fn main() -> Result<()> {
    let settings = Cli::parse().into_settings()?;
    init_logging(&settings)?;

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = SnakeGame::new(&settings, rng);
    let mut limiter = TickLimiter::new(settings.ticks_per_second);
    let mut term = TermManager::new(settings.grid);

    let result = term
        .setup(&settings.title)
        .and_then(|_| game.run(&mut term, &mut limiter));

    // Restore before anything gets printed about a failure
    let restored = term.restore();
    merge_restore(result, restored).map(|_| ())
}

/// Logs go to `--log-file` when given and nowhere otherwise: stderr is the
/// terminal the game is drawn on.
fn init_logging(settings: &Settings) -> Result<()> {
    let path = match &settings.log_file {
        Some(path) => path,
        None => return Ok(()),
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
