use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::budget::TimeBudget;

/// Result of running one slice of a [`Resumable`] task.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<T> {
    /// The task finished; no further slices are needed.
    Done(T),
    /// The budget ran out; the task keeps its cursor and wants another slice.
    Continue,
}

/// Final result of driving a task to the end.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Completed(T),
    /// Cancellation was observed between slices. Not an error.
    Canceled,
}

impl<T> Outcome<T> {
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(v) => Some(v),
            Outcome::Canceled => None,
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, Outcome::Canceled)
    }
}

/// Work that can be split into time-boxed slices.
///
/// Implementations keep their own resumption state; each call to `run_slice`
/// continues where the previous one stopped.
pub trait Resumable {
    type Output;
    type Error;

    fn run_slice(&mut self, budget: &TimeBudget) -> Result<Step<Self::Output>, Self::Error>;

    /// Fraction of the work completed so far, in `[0, 1]`.
    fn progress(&self) -> f64 {
        0.0
    }
}

/// Shared flag used to abandon a running task between slices.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    requested: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_canceled(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::{CancelToken, Outcome};

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_canceled());
        token.cancel();
        assert!(other.is_canceled());
    }

    #[test]
    fn outcome_accessors() {
        assert_eq!(Outcome::Completed(3).completed(), Some(3));
        assert!(Outcome::<u8>::Canceled.is_canceled());
        assert_eq!(Outcome::<u8>::Canceled.completed(), None);
    }
}
