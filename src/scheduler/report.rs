/// Single-task cooperative scheduler for the report cycle
use log::{debug, warn};

use crate::models::Tick;

/// Lifecycle of the report task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Never planned, or finished without replanning
    Idle,
    /// Waiting for the nominal wake tick
    Pending { wake_at: Tick },
    /// Executing; `nominal` is the tick it was planned for
    Running { nominal: Tick },
}

/// Holds the one pending wake of the report task
///
/// Every plan overwrites the previous one. Relative replanning from inside
/// the task is anchored on the planned tick rather than the tick the task
/// actually ran at, so execution latency does not accumulate as drift.
#[derive(Debug, Clone)]
pub struct ReportScheduler {
    state: TaskState,
}

impl ReportScheduler {
    pub fn new() -> Self {
        ReportScheduler {
            state: TaskState::Idle,
        }
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Tick of the pending wake, if any
    pub fn next_wake(&self) -> Option<Tick> {
        match self.state {
            TaskState::Pending { wake_at } => Some(wake_at),
            _ => None,
        }
    }

    /// Wake at an absolute tick, independent of any earlier plan
    pub fn plan_absolute(&mut self, tick: Tick) {
        debug!("Report task planned at tick {}", tick);
        self.state = TaskState::Pending { wake_at: tick };
    }

    /// Wake `offset` ticks after `now`
    pub fn plan_relative(&mut self, now: Tick, offset: Tick) {
        self.plan_absolute(now.saturating_add(offset));
    }

    /// Wake as soon as possible, overriding any pending wait
    pub fn plan_now(&mut self, now: Tick) {
        self.plan_relative(now, 0);
    }

    /// Replan the running task `offset` ticks after its nominal wake
    ///
    /// Only meaningful while the task is running; otherwise it is ignored.
    /// Because the anchor is the planned tick, wakes missed while the host
    /// was stalled are not skipped: they come due back-to-back until the
    /// plan catches up with the clock.
    pub fn plan_current_relative(&mut self, offset: Tick) {
        match self.state {
            TaskState::Running { nominal } => {
                self.plan_absolute(nominal.saturating_add(offset));
            }
            state => {
                warn!("Relative replan outside the report task ignored ({:?})", state);
            }
        }
    }

    /// Start the task if its wake tick has been reached
    ///
    /// # Returns
    /// The nominal tick the task was planned for, or None if nothing is due
    pub fn begin_due(&mut self, now: Tick) -> Option<Tick> {
        match self.state {
            TaskState::Pending { wake_at } if wake_at <= now => {
                self.state = TaskState::Running { nominal: wake_at };
                Some(wake_at)
            }
            _ => None,
        }
    }

    /// Leave the running state; a task that did not replan goes idle
    pub fn finish(&mut self) {
        if let TaskState::Running { .. } = self.state {
            self.state = TaskState::Idle;
        }
    }
}

impl Default for ReportScheduler {
    fn default() -> Self {
        ReportScheduler::new()
    }
}
