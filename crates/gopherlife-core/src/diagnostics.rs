//! Tick timing and counters.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Accumulating timer for one phase of the tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StopWatch {
    last: Duration,
    total: Duration,
    laps: u64,
}

impl StopWatch {
    /// Record the time since `started` as one lap.
    pub fn lap_since(&mut self, started: Instant) {
        self.record(started.elapsed());
    }

    /// Record one lap.
    pub fn record(&mut self, elapsed: Duration) {
        self.last = elapsed;
        self.total += elapsed;
        self.laps += 1;
    }

    /// Duration of the most recent lap.
    #[must_use]
    pub fn last(&self) -> Duration {
        self.last
    }

    /// Sum of all laps.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Number of laps recorded.
    #[must_use]
    pub fn laps(&self) -> u64 {
        self.laps
    }

    /// Mean lap, zero before the first lap.
    #[must_use]
    pub fn average(&self) -> Duration {
        match u32::try_from(self.laps) {
            Ok(0) => Duration::ZERO,
            Ok(laps) => self.total / laps,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.laps as f64),
        }
    }
}

/// What happened during apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TickCounters {
    /// Gophers admitted
    pub births: u64,
    /// Gophers removed
    pub deaths: u64,
    /// Food items eaten
    pub food_eaten: u64,
    /// Food items placed after a pickup
    pub food_respawned: u64,
    /// Decisions that failed or panicked
    pub compute_failures: u64,
    /// Actions whose preconditions no longer held
    pub rejected_actions: u64,
    /// Births with no free tile to land on
    pub dropped_births: u64,
}

impl TickCounters {
    fn accumulate(&mut self, other: &Self) {
        self.births += other.births;
        self.deaths += other.deaths;
        self.food_eaten += other.food_eaten;
        self.food_respawned += other.food_respawned;
        self.compute_failures += other.compute_failures;
        self.rejected_actions += other.rejected_actions;
        self.dropped_births += other.dropped_births;
    }
}

/// Per-world diagnostics.
///
/// `compute` covers the parallel decision phase, `apply` the serial action
/// phase and `tick` the whole tick. `world_time` is wall time since the world
/// was built.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    /// Whole tick
    pub tick: StopWatch,
    /// Parallel decisions
    pub compute: StopWatch,
    /// Serial apply
    pub apply: StopWatch,
    /// Counters for the last tick
    pub last: TickCounters,
    /// Counters since construction
    pub cumulative: TickCounters,
    #[serde(skip)]
    created: Instant,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            tick: StopWatch::default(),
            compute: StopWatch::default(),
            apply: StopWatch::default(),
            last: TickCounters::default(),
            cumulative: TickCounters::default(),
            created: Instant::now(),
        }
    }
}

impl Diagnostics {
    /// Wall time since the world was built.
    #[must_use]
    pub fn world_time(&self) -> Duration {
        self.created.elapsed()
    }

    /// Close out a tick's counters.
    pub(crate) fn finish_tick(&mut self, counters: TickCounters) {
        self.cumulative.accumulate(&counters);
        self.last = counters;
    }
}
