use std::collections::HashSet;

use anyhow::{Context, Result};
use rand::Rng;
use tracing::{debug, info, trace, warn};

use crate::clock::TickLimiter;
use crate::config::Settings;
use crate::food::Food;
use crate::grid::Cell;
use crate::snake::Snake;
use crate::surface::{Drawable, InputEvent, InputSource, Surface};

/// Input events looked at per tick; anything beyond stays queued.
pub const MAX_EVENTS_PER_TICK: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Moved,
    Ate,
    Collided,
}

/// Kept in memory for the log line at the end of a session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionStats {
    pub ticks: u64,
    pub apples: u64,
    pub resets: u64,
    pub best_length: usize,
    /// Ticks that started more than two periods after the previous one.
    pub overruns: u64,
}

pub struct SnakeGame<'a, R: Rng> {
    settings: &'a Settings,
    snake: Snake,
    food: Food,
    rng: R,
    stats: SessionStats,
}

impl<'a, R: Rng> SnakeGame<'a, R> {
    pub fn new(settings: &'a Settings, mut rng: R) -> Self {
        let snake = Snake::new(settings.start);
        let occupied = snake.body().iter().copied().collect();
        let food = Food::new(&settings.grid, &occupied, &mut rng);

        SnakeGame {
            settings,
            snake,
            food,
            rng,
            stats: SessionStats { best_length: 1, ..Default::default() },
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Runs the game until the input source reports a quit.
    pub fn run<P>(&mut self, platform: &mut P, limiter: &mut TickLimiter) -> Result<SessionStats>
    where
        P: Surface + InputSource,
    {
        let grid = &self.settings.grid;
        info!(
            columns = grid.columns(),
            rows = grid.rows(),
            tps = self.settings.ticks_per_second,
            "session started"
        );

        loop {
            let elapsed = limiter.wait();
            if elapsed > limiter.period() * 2 {
                self.stats.overruns += 1;
                warn!(?elapsed, period = ?limiter.period(), "tick overran its budget");
            }

            let events = platform
                .poll_events(MAX_EVENTS_PER_TICK)
                .context("Failed to poll input")?;
            if self.handle_input(&events) {
                info!(
                    ticks = self.stats.ticks,
                    apples = self.stats.apples,
                    resets = self.stats.resets,
                    best_length = self.stats.best_length,
                    overruns = self.stats.overruns,
                    "session over"
                );
                return Ok(self.stats);
            }

            self.tick();
            self.render(platform).context("Failed to draw frame")?;
        }
    }

    /// Feeds one tick's worth of input to the snake. Returns `true` if the
    /// player asked to quit, in which case nothing else in the batch counts.
    pub fn handle_input(&mut self, events: &[InputEvent]) -> bool {
        if events.contains(&InputEvent::Quit) {
            return true;
        }

        for event in events {
            if let InputEvent::KeyDown(dir) = *event {
                self.snake.set_pending_direction(dir);
            }
        }
        false
    }

    /// Moves the snake once and applies the food and collision rules.
    pub fn tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;
        let trimmed = self.snake.advance(&self.settings.grid);

        let head = self.snake.head();
        trace!(?head, ?trimmed, "snake moved");
        if head == self.food.position() {
            self.snake.grow();
            self.relocate_food();
            self.stats.apples += 1;
            self.stats.best_length = self.stats.best_length.max(self.snake.target_length());
            debug!(
                length = self.snake.target_length(),
                food = ?self.food.position(),
                "food eaten"
            );
            TickOutcome::Ate
        } else if self.snake.collides_with_self() {
            let lost = self.snake.len();
            self.snake.reset();
            self.relocate_food();
            self.stats.resets += 1;
            info!(length = lost, at = ?head, "snake ran into itself, starting over");
            TickOutcome::Collided
        } else {
            TickOutcome::Moved
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) -> Result<()> {
        let palette = &self.settings.palette;
        surface.clear(palette.background)?;
        self.food.draw(surface, palette)?;
        self.snake.draw(surface, palette)?;
        surface.present()
    }

    fn relocate_food(&mut self) {
        let occupied: HashSet<Cell> = self.snake.body().iter().copied().collect();
        self.food.relocate(&self.settings.grid, &occupied, &mut self.rng);
    }
}
