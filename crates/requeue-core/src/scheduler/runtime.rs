use std::time::Duration;

use tokio::runtime::Handle;
use tracing::trace;

use super::{Callback, Scheduler, TimerHandle};
use crate::error::{CoreError, CoreResult};

/// Scheduler backed by `tokio::time`.
///
/// Every timer is a separate task on the captured runtime, so timers neither block nor observe each other.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Bind to the runtime of the calling context.
    ///
    /// Fails when called outside a Tokio runtime.
    pub fn current() -> CoreResult<Self> {
        Handle::try_current()
            .map(Self::with_handle)
            .map_err(|e| CoreError::NoRuntime(e.to_string()))
    }

    /// Bind to an explicit runtime handle.
    pub fn with_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, callback: Callback) -> TimerHandle {
        let timer = TimerHandle::new();
        let token = timer.token();

        self.handle.spawn(async move {
            match token.run_until_cancelled(tokio::time::sleep(delay)).await {
                Some(()) => callback(),
                None => trace!(?delay, "timer cancelled before firing"),
            }
        });
        timer
    }
}
