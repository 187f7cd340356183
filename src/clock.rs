use std::{
    thread::sleep,
    time::{Duration, Instant},
};

/// Paces a loop at a fixed number of ticks per second.
pub struct TickLimiter {
    period: Duration,
    last_tick: Option<Instant>,
}

impl TickLimiter {
    pub fn new(ticks_per_second: u32) -> Self {
        TickLimiter {
            period: Duration::from_secs(1) / ticks_per_second.max(1),
            last_tick: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Blocks until one period has passed since the previous call and returns
    /// the time actually elapsed. The first call returns immediately. A tick
    /// that overran its budget is not made up for.
    pub fn wait(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = match self.last_tick {
            Some(last) => {
                let since = now.duration_since(last);
                if since < self.period {
                    sleep(self.period - since);
                }
                last.elapsed()
            }
            None => Duration::from_secs(0),
        };

        self.last_tick = Some(Instant::now());
        elapsed
    }
}
