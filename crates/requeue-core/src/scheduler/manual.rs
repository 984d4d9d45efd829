use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio_util::sync::CancellationToken;

use super::{Callback, Scheduler, TimerHandle};

/// Virtual-clock scheduler.
///
/// Time only moves when [`ManualScheduler::advance`] is called. Timers fire in due-time order,
/// ties broken by scheduling order. Clones share the same clock and timer queue.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualState>>,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    seq: u64,
    timers: BTreeMap<(Duration, u64), Entry>,
}

struct Entry {
    token: CancellationToken,
    callback: Callback,
}

impl ManualScheduler {
    /// Create a scheduler with the clock at zero and no timers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.state().now
    }

    /// Number of timers that are neither fired nor cancelled.
    pub fn pending(&self) -> usize {
        self.state()
            .timers
            .values()
            .filter(|e| !e.token.is_cancelled())
            .count()
    }

    /// Move the clock forward by `by`, firing every timer that falls due.
    ///
    /// Callbacks run without the internal lock held, so they may schedule new timers;
    /// those fire within the same call when they fall due before the target time.
    /// Returns the number of callbacks executed.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now().saturating_add(by);
        let mut fired = 0;

        loop {
            let next = {
                let mut state = self.state();
                let due = match state.timers.keys().next() {
                    Some(&key) if key.0 <= target => key,
                    _ => break,
                };
                state.now = due.0;
                state.timers.remove(&due)
            };
            let Some(entry) = next else { continue };
            if !entry.token.is_cancelled() {
                (entry.callback)();
                fired += 1;
            }
        }

        let mut state = self.state();
        if state.now < target {
            state.now = target;
        }
        fired
    }

    fn state(&self) -> MutexGuard<'_, ManualState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, callback: Callback) -> TimerHandle {
        let timer = TimerHandle::new();
        let mut state = self.state();

        let due = state.now.saturating_add(delay);
        let seq = state.seq;
        state.seq += 1;
        state.timers.insert(
            (due, seq),
            Entry {
                token: timer.token(),
                callback,
            },
        );
        timer
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("timers", &state.timers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Callback) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let make = move |name: &'static str| -> Callback {
            let sink = Arc::clone(&sink);
            Box::new(move || sink.lock().unwrap().push(name))
        };
        (log, make)
    }

    #[test]
    fn does_not_fire_early() {
        let sched = ManualScheduler::new();
        let (log, cb) = recorder();

        sched.schedule(Duration::from_millis(1_000), cb("a"));

        assert_eq!(sched.advance(Duration::from_millis(999)), 0);
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(sched.pending(), 1);

        assert_eq!(sched.advance(Duration::from_millis(1)), 1);
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
        assert_eq!(sched.now(), Duration::from_millis(1_000));
    }

    #[test]
    fn fires_exactly_once() {
        let sched = ManualScheduler::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        sched.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }),
        );

        sched.advance(Duration::from_secs(1));
        sched.advance(Duration::from_secs(1));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn fires_in_due_order_then_schedule_order() {
        let sched = ManualScheduler::new();
        let (log, cb) = recorder();

        sched.schedule(Duration::from_millis(30), cb("late"));
        sched.schedule(Duration::from_millis(10), cb("first"));
        sched.schedule(Duration::from_millis(10), cb("second"));

        sched.advance(Duration::from_millis(100));
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "late"]);
    }

    #[test]
    fn cancel_skips_only_that_timer() {
        let sched = ManualScheduler::new();
        let (log, cb) = recorder();

        let a = sched.schedule(Duration::from_millis(5), cb("a"));
        sched.schedule(Duration::from_millis(5), cb("b"));
        a.cancel();

        assert_eq!(sched.pending(), 1);
        assert_eq!(sched.advance(Duration::from_millis(5)), 1);
        assert_eq!(*log.lock().unwrap(), vec!["b"]);
    }

    #[test]
    fn callbacks_may_schedule_follow_ups() {
        let sched = ManualScheduler::new();
        let (log, cb) = recorder();

        let inner = sched.clone();
        let first = cb("first");
        let follow_up = cb("follow-up");
        sched.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                first();
                inner.schedule(Duration::from_millis(10), follow_up);
            }),
        );

        sched.advance(Duration::from_millis(15));
        assert_eq!(*log.lock().unwrap(), vec!["first"]);
        assert_eq!(sched.pending(), 1);

        sched.advance(Duration::from_millis(5));
        assert_eq!(*log.lock().unwrap(), vec!["first", "follow-up"]);
    }

    #[test]
    fn zero_delay_fires_on_next_advance() {
        let sched = ManualScheduler::new();
        let (log, cb) = recorder();

        sched.schedule(Duration::ZERO, cb("now"));
        assert_eq!(sched.advance(Duration::ZERO), 1);
        assert_eq!(*log.lock().unwrap(), vec!["now"]);
    }
}
