//! The tick loop.
//!
//! [`Cron`] owns the parsed entries and a virtual clock truncated to whole
//! ticks. Each iteration evaluates every entry against the virtual minute,
//! advances the clock by exactly one step, and sleeps until the wall clock
//! catches up. The wall clock is consulted only for pacing, so scheduling
//! overhead never accumulates across ticks and no virtual minute is
//! evaluated twice.

use chrono::{DateTime, Duration, Local, TimeZone};
use tracing::{debug, info};

use crate::types::Entry;

/// Drives the schedule for the life of the process.
pub struct Cron {
    entries: Vec<Entry>,
    step: Duration,
}

impl Cron {
    /// Entries are evaluated in list order, every tick.
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            step: Duration::minutes(1),
        }
    }

    /// Override the tick length. Production runs at the default one-minute
    /// step; tests inject something shorter.
    pub fn with_step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    /// Run forever.
    pub async fn run(&self) {
        self.run_until(|| false).await;
    }

    /// Run until `stop` returns true. The condition is checked once per
    /// tick, after that tick's entries have fired.
    pub async fn run_until<F>(&self, mut stop: F)
    where
        F: FnMut() -> bool,
    {
        info!(entries = self.entries.len(), "scheduler started");
        let mut tick = align_down(Local::now(), self.step);
        loop {
            for entry in &self.entries {
                if entry.matches(&tick) {
                    entry.fire();
                }
            }

            if stop() {
                return;
            }

            tick += self.step;

            // Sleep-and-recheck: a single sleep may end early (signal,
            // spurious wake), and a slow tick may already be overdue. The
            // wall clock is the only authority on when the next virtual
            // minute is due; an overdue tick is evaluated immediately, not
            // treated as an error.
            loop {
                let now = Local::now();
                if now >= tick {
                    break;
                }
                let remaining = (tick - now).to_std().unwrap_or_default();
                debug!(until = %tick, ?remaining, "sleeping until next tick");
                tokio::time::sleep(remaining).await;
            }
        }
    }
}

/// Truncate `now` down to a whole multiple of `step` — for the default
/// one-minute step this zeroes seconds and subseconds.
fn align_down(now: DateTime<Local>, step: Duration) -> DateTime<Local> {
    let step_ms = step.num_milliseconds().max(1);
    let ms = now.timestamp_millis();
    let aligned = ms - ms.rem_euclid(step_ms);
    Local
        .timestamp_millis_opt(aligned)
        .single()
        .unwrap_or(now)
}
