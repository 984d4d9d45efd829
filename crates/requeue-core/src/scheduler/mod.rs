//! Delayed execution used by the retry stage.
//!
//! The stage never touches a global timer facility: it receives a [`SchedulerHandle`] and asks it to
//! run a callback once a delay has elapsed. [`TokioScheduler`] backs production use, while
//! [`ManualScheduler`] is a virtual clock for deterministic tests.
mod manual;
pub use manual::ManualScheduler;

mod runtime;
pub use runtime::TokioScheduler;

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

/// Work to run when a timer fires.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// Runs callbacks after a delay.
///
/// Implementations must:
/// - fire every callback exactly once, never before its delay elapsed;
/// - keep timers independent: scheduling or cancelling one never affects another;
/// - skip a callback whose [`TimerHandle`] was cancelled before it fired.
pub trait Scheduler: Send + Sync {
    /// Enqueue `callback` to run once `delay` has elapsed.
    fn schedule(&self, delay: Duration, callback: Callback) -> TimerHandle;
}

/// Shared handle to a scheduler implementation.
pub type SchedulerHandle = Arc<dyn Scheduler>;

/// Cancellation handle returned for each scheduled timer.
///
/// Dropping the handle does not cancel the timer.
#[derive(Clone, Debug, Default)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Prevent the callback from running if it has not fired yet.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` once [`TimerHandle::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}
