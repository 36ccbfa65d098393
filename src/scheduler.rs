//! Cooperative scheduler.
//!
//! Interleaves the periodic tasks on a single thread by comparing the
//! monotonic clock against each task's last-fire timestamp.  There is no
//! preemption: a task runs (or is polled) to its next yield point, then
//! the scheduler moves on.  The scheduler notifies a [`SchedulerDelegate`]
//! for every due task; it knows nothing about the hardware or the network.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   Scheduler::tick(now)                       │
//! │                                                              │
//! │  1. indicator  (167 ms)  ──▶ on_task_due(Indicator)          │
//! │  2. sample     (500 ms)  ──▶ on_task_due(Sample)             │
//! │  3. homing    (3000 ms)  ──▶ on_task_due(Homing)             │
//! │  4. network   (every tick) ▶ on_network_poll                 │
//! │                                                              │
//! │  TaskPoll::Done    → deadline advances to `now`              │
//! │  TaskPoll::Pending → deadline stays due; polled next tick    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use crate::app::ports::{SchedulerDelegate, TaskId, TaskPoll};
use crate::config::SystemConfig;

// ═══════════════════════════════════════════════════════════════
//  Deadlines
// ═══════════════════════════════════════════════════════════════

/// Last-fire timestamp and fixed period of one periodic task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    last_fire_ms: u64,
    period_ms: u64,
}

impl Deadline {
    /// A deadline that last fired at boot (t = 0).
    pub fn new(period_ms: u32) -> Self {
        Self {
            last_fire_ms: 0,
            period_ms: u64::from(period_ms),
        }
    }

    /// Strictly more than one period has elapsed since the last fire.
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_fire_ms) > self.period_ms
    }

    pub fn mark(&mut self, now_ms: u64) {
        self.last_fire_ms = now_ms;
    }

    pub fn last_fire_ms(&self) -> u64 {
        self.last_fire_ms
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Evaluation order is fixed.
const TASK_ORDER: [TaskId; 3] = [TaskId::Indicator, TaskId::Sample, TaskId::Homing];

/// The scheduler engine.
///
/// Owns every task deadline exclusively; deadlines are mutated only from
/// [`tick`](Self::tick).
pub struct Scheduler {
    indicator: Deadline,
    sample: Deadline,
    homing: Deadline,
    ticks: u64,
}

impl Scheduler {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            indicator: Deadline::new(config.indicator_period_ms),
            sample: Deadline::new(config.sample_period_ms),
            homing: Deadline::new(config.homing_period_ms),
            ticks: 0,
        }
    }

    /// Run one loop iteration.
    ///
    /// Each due task is handed to `delegate.on_task_due()`; a task that
    /// reports [`TaskPoll::Done`] has its deadline advanced to `now_ms`.
    /// The network is polled once at the end regardless of task state.
    pub fn tick(&mut self, now_ms: u64, delegate: &mut dyn SchedulerDelegate) {
        self.ticks += 1;

        for task in TASK_ORDER {
            if !self.deadline(task).is_due(now_ms) {
                continue;
            }
            if delegate.on_task_due(task, now_ms) == TaskPoll::Done {
                self.deadline_mut(task).mark(now_ms);
            }
        }

        delegate.on_network_poll(now_ms);
    }

    pub fn deadline(&self, task: TaskId) -> &Deadline {
        match task {
            TaskId::Indicator => &self.indicator,
            TaskId::Sample => &self.sample,
            TaskId::Homing => &self.homing,
        }
    }

    fn deadline_mut(&mut self, task: TaskId) -> &mut Deadline {
        match task {
            TaskId::Indicator => &mut self.indicator,
            TaskId::Sample => &mut self.sample,
            TaskId::Homing => &mut self.homing,
        }
    }

    /// Loop iterations executed since startup.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
