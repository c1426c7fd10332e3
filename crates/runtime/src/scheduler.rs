use std::time::Duration;

use crate::budget::TimeBudget;
use crate::task::{CancelToken, Outcome, Resumable, Step};

/// How a [`Resumable`] task is sliced: the work time per slice and the pause
/// handed back to the host between slices.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SliceSchedule {
    pub slice: Duration,
    pub pause: Duration,
}

impl SliceSchedule {
    pub fn new(slice: Duration, pause: Duration) -> Self {
        Self { slice, pause }
    }
}

impl Default for SliceSchedule {
    fn default() -> Self {
        Self {
            slice: Duration::from_millis(100),
            pause: Duration::from_millis(25),
        }
    }
}

/// Drive `task` on the current thread, sleeping between slices.
///
/// Cancellation is checked before every slice. A canceled task is dropped
/// here, which releases whatever partial state it was holding.
pub fn run_blocking<T: Resumable>(
    mut task: T,
    schedule: SliceSchedule,
    cancel: &CancelToken,
) -> Result<Outcome<T::Output>, T::Error> {
    let mut slices = 0u32;
    loop {
        if cancel.is_canceled() {
            tracing::debug!(slices, "task canceled");
            return Ok(Outcome::Canceled);
        }
        slices += 1;
        match task.run_slice(&TimeBudget::start(schedule.slice))? {
            Step::Done(output) => {
                tracing::debug!(slices, "task completed");
                return Ok(Outcome::Completed(output));
            }
            Step::Continue => {
                tracing::debug!(slices, progress = task.progress(), "task yielded");
                std::thread::sleep(schedule.pause);
            }
        }
    }
}

/// Async counterpart of [`run_blocking`]; yields to the runtime between slices.
pub async fn run_async<T: Resumable>(
    mut task: T,
    schedule: SliceSchedule,
    cancel: &CancelToken,
) -> Result<Outcome<T::Output>, T::Error> {
    let mut slices = 0u32;
    loop {
        if cancel.is_canceled() {
            tracing::debug!(slices, "task canceled");
            return Ok(Outcome::Canceled);
        }
        slices += 1;
        match task.run_slice(&TimeBudget::start(schedule.slice))? {
            Step::Done(output) => {
                tracing::debug!(slices, "task completed");
                return Ok(Outcome::Completed(output));
            }
            Step::Continue => {
                tracing::debug!(slices, progress = task.progress(), "task yielded");
                tokio::time::sleep(schedule.pause).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SliceSchedule, run_async, run_blocking};
    use crate::budget::TimeBudget;
    use crate::task::{CancelToken, Outcome, Resumable, Step};
    use std::time::Duration;

    /// Counts to `target`, one unit per slice.
    struct Counter {
        done: u32,
        target: u32,
        cancel_at: Option<(u32, CancelToken)>,
    }

    impl Resumable for Counter {
        type Output = u32;
        type Error = String;

        fn run_slice(&mut self, _budget: &TimeBudget) -> Result<Step<u32>, String> {
            self.done += 1;
            if let Some((at, token)) = &self.cancel_at {
                if self.done == *at {
                    token.cancel();
                }
            }
            if self.done >= self.target {
                Ok(Step::Done(self.done))
            } else {
                Ok(Step::Continue)
            }
        }

        fn progress(&self) -> f64 {
            self.done as f64 / self.target as f64
        }
    }

    struct Failing;

    impl Resumable for Failing {
        type Output = ();
        type Error = String;

        fn run_slice(&mut self, _budget: &TimeBudget) -> Result<Step<()>, String> {
            Err("boom".to_string())
        }
    }

    fn fast() -> SliceSchedule {
        SliceSchedule::new(Duration::from_millis(5), Duration::from_millis(1))
    }

    #[test]
    fn runs_until_done() {
        let task = Counter {
            done: 0,
            target: 4,
            cancel_at: None,
        };
        let out = run_blocking(task, fast(), &CancelToken::new()).unwrap();
        assert_eq!(out, Outcome::Completed(4));
    }

    #[test]
    fn cancellation_between_slices_is_silent() {
        let token = CancelToken::new();
        let task = Counter {
            done: 0,
            target: 100,
            cancel_at: Some((2, token.clone())),
        };
        let out = run_blocking(task, fast(), &token).unwrap();
        assert_eq!(out, Outcome::Canceled);
    }

    #[test]
    fn pre_canceled_task_never_runs() {
        let token = CancelToken::new();
        token.cancel();
        let out = run_blocking(Failing, fast(), &token).unwrap();
        assert!(out.is_canceled());
    }

    #[test]
    fn errors_propagate() {
        let err = run_blocking(Failing, fast(), &CancelToken::new()).unwrap_err();
        assert_eq!(err, "boom");
    }

    #[tokio::test]
    async fn async_driver_matches_blocking() {
        let task = Counter {
            done: 0,
            target: 3,
            cancel_at: None,
        };
        let out = run_async(task, fast(), &CancelToken::new()).await.unwrap();
        assert_eq!(out, Outcome::Completed(3));
    }

    #[tokio::test]
    async fn async_driver_honors_cancel() {
        let token = CancelToken::new();
        let task = Counter {
            done: 0,
            target: 50,
            cancel_at: Some((1, token.clone())),
        };
        let out = run_async(task, fast(), &token).await.unwrap();
        assert_eq!(out, Outcome::Canceled);
    }
}
