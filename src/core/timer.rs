//! Scheduled-task queue.
//!
//! Status countdowns and deferred command lists are queued here instead of
//! on ambient runtime timers. The queue keeps its own clock; the owner moves
//! it forward and drains due tasks one at a time with [`TimerQueue::pop_due`],
//! so a task fired earlier in the same advance can cancel one that is due
//! later.
//!
//! ```
//! use std::time::Duration;
//! use rust_ifgame::core::TimerQueue;
//!
//! let mut timers = TimerQueue::new();
//! let handle = timers.start_once(Duration::from_secs(5), "ring");
//! assert!(timers.pop_due(Duration::from_secs(4)).is_none());
//! assert_eq!(timers.pop_due(Duration::from_secs(5)), Some((handle, "ring")));
//! ```

use std::collections::BTreeSet;
use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Shortest interval a recurring task runs at.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a scheduled task. Owners keep it to cancel the task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

#[derive(Clone, Debug)]
struct Scheduled<T> {
    task: T,
    deadline: Duration,
    interval: Option<Duration>,
}

/// Deadline-ordered queue of tasks.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_handle: u64,
    order: BTreeSet<(Duration, TimerHandle)>,
    tasks: FxHashMap<TimerHandle, Scheduled<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            order: BTreeSet::new(),
            tasks: FxHashMap::default(),
        }
    }
}

impl<T: Clone> TimerQueue<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current queue time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to fire every `interval`, first after one interval.
    /// Intervals shorter than [`MIN_INTERVAL`] are raised to it.
    pub fn start_recurring(&mut self, interval: Duration, task: T) -> TimerHandle {
        let interval = interval.max(MIN_INTERVAL);
        self.schedule(interval, Some(interval), task)
    }

    /// Schedule `task` to fire once after `delay`.
    pub fn start_once(&mut self, delay: Duration, task: T) -> TimerHandle {
        self.schedule(delay, None, task)
    }

    fn schedule(&mut self, delay: Duration, interval: Option<Duration>, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;

        let deadline = self.now + delay;
        self.order.insert((deadline, handle));
        self.tasks.insert(handle, Scheduled { task, deadline, interval });
        handle
    }

    /// Cancel a task. Returns false if it already fired (one-shot) or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.tasks.remove(&handle) {
            Some(scheduled) => {
                self.order.remove(&(scheduled.deadline, handle));
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.tasks.contains_key(&handle)
    }

    /// Number of scheduled tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Remove and return the earliest task due at or before `until`.
    ///
    /// Moves the clock to that task's deadline. Recurring tasks are
    /// rescheduled one interval later under the same handle. When nothing is
    /// due the clock moves to `until` and `None` is returned.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, T)> {
        let &(deadline, handle) = match self.order.first() {
            Some(first) if first.0 <= until => first,
            _ => {
                self.now = self.now.max(until);
                return None;
            }
        };
        self.order.remove(&(deadline, handle));
        self.now = self.now.max(deadline);

        let scheduled = self.tasks.get_mut(&handle)?;
        match scheduled.interval {
            Some(interval) => {
                scheduled.deadline = deadline + interval;
                self.order.insert((scheduled.deadline, handle));
                Some((handle, scheduled.task.clone()))
            }
            None => {
                let scheduled = self.tasks.remove(&handle)?;
                Some((handle, scheduled.task))
            }
        }
    }
}
