use std::time::{Duration, Instant};

/// Wall-clock budget for one slice of cooperative work.
///
/// A slice checks `is_exhausted` after each unit of work and yields once the
/// allotted time has passed. At least one unit always runs, so a zero budget
/// still makes progress.
#[derive(Debug, Copy, Clone)]
pub struct TimeBudget {
    started: Instant,
    limit: Duration,
}

impl TimeBudget {
    pub fn start(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// A practically-unbounded budget, useful for running a task in one slice.
    pub fn unlimited() -> Self {
        Self::start(Duration::MAX)
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn is_exhausted(&self) -> bool {
        self.elapsed() > self.limit
    }
}
