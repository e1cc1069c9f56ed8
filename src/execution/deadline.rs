//! Session Deadline
//!
//! Fixes the session cutoff once, at creation: `cutoff = start + budget`.
//! The cutoff is never extended. Checks are cooperative; the scheduler
//! consults [`Deadline::is_past`] on every pull, so a single slow page fetch
//! can overrun the cutoff by at most its own latency.

use std::time::{Duration, Instant};

/// Wall-clock budget for one query session
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start_time: Instant,
    budget: Duration,
    cutoff: Instant,
}

impl Deadline {
    /// Start the clock now
    pub fn new(budget: Duration) -> Self {
        Deadline::starting_at(Instant::now(), budget)
    }

    pub fn starting_at(start_time: Instant, budget: Duration) -> Self {
        Deadline {
            start_time,
            budget,
            cutoff: start_time + budget,
        }
    }

    /// True once the current instant is strictly after the cutoff
    pub fn is_past(&self) -> bool {
        Instant::now() > self.cutoff
    }

    pub fn cutoff(&self) -> Instant {
        self.cutoff
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time since the session was created
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
