//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the [`Scheduler`] and every task it drives: the
//! status indicator, the sample/servo/display refresh, the homing cycle and
//! the HTTP responder.  All I/O flows through port traits injected at call
//! sites, making the entire service testable with mock adapters.
//!
//! ```text
//!   SensorPort ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                  │          AppService         │
//! ActuatorPort ◀── │  Scheduler                  │
//! IndicatorPort ◀──│  indicator · sample · homing│
//!  DisplayPort ◀── │  HTTP responder             │ ◀──▶ NetworkPort
//!                  └─────────────────────────────┘
//! ```

use log::info;

use crate::config::SystemConfig;
use crate::control::homing::{HomingPoll, HomingTask};
use crate::control::mapper::map_to_position;
use crate::http::HttpResponder;
use crate::scheduler::Scheduler;
use crate::sensors::voltage;

use super::events::AppEvent;
use super::ports::{
    ActuatorPort, DisplayPort, EventSink, IndicatorPort, NetworkPort, SchedulerDelegate,
    SensorPort, TaskId, TaskPoll,
};
use super::tasks::{render_voltage, StatusIndicator};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
///
/// `N` is the listening socket.  A service built without one runs in
/// network-less mode: sensing, servo, display and indicator only.
pub struct AppService<N: NetworkPort> {
    scheduler: Scheduler,
    tasks: TaskSet<N>,
}

/// Everything the scheduler's delegate needs, split from the scheduler so
/// both can be borrowed during a tick.
struct TaskSet<N: NetworkPort> {
    config: SystemConfig,
    indicator: StatusIndicator,
    homing: HomingTask,
    http: Option<HttpResponder<N>>,
}

impl<N: NetworkPort> AppService<N> {
    pub fn new(config: SystemConfig, listener: Option<N>) -> Self {
        Self {
            scheduler: Scheduler::new(&config),
            tasks: TaskSet {
                config,
                indicator: StatusIndicator::new(),
                homing: HomingTask::new(),
                http: listener.map(HttpResponder::new),
            },
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        let network = self.has_network();
        sink.emit(&AppEvent::Started { network });
        info!(
            "AppService started ({})",
            if network { "HTTP enabled" } else { "network-less" }
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one scheduler iteration at `now_ms`.
    pub fn tick<H, S>(&mut self, now_ms: u64, hw: &mut H, sink: &mut S)
    where
        H: SensorPort + ActuatorPort + IndicatorPort + DisplayPort,
        S: EventSink,
    {
        let Self { scheduler, tasks } = self;
        let mut ctx = TickContext { tasks, hw, sink };
        scheduler.tick(now_ms, &mut ctx);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn config(&self) -> &SystemConfig {
        &self.tasks.config
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn has_network(&self) -> bool {
        self.tasks.http.is_some()
    }

    pub fn indicator_on(&self) -> bool {
        self.tasks.indicator.is_on()
    }

    /// `true` while a homing cycle holds the servo at zero.
    pub fn is_homing(&self) -> bool {
        self.tasks.homing.is_holding()
    }

    /// `true` while a client is being serviced.
    pub fn is_serving(&self) -> bool {
        self.tasks.http.as_ref().is_some_and(HttpResponder::is_busy)
    }

    /// Responses sent since startup.
    pub fn responses_sent(&self) -> u32 {
        self.tasks.http.as_ref().map_or(0, HttpResponder::served)
    }
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate
// ───────────────────────────────────────────────────────────────

struct TickContext<'a, N: NetworkPort, H, S> {
    tasks: &'a mut TaskSet<N>,
    hw: &'a mut H,
    sink: &'a mut S,
}

impl<N, H, S> TickContext<'_, N, H, S>
where
    N: NetworkPort,
    H: SensorPort + ActuatorPort + IndicatorPort + DisplayPort,
    S: EventSink,
{
    /// Sample → servo → display.  The servo is left alone while homing
    /// holds it at zero.
    fn run_sample(&mut self) {
        let cfg = &self.tasks.config;
        let v = voltage::sample(self.hw, cfg);
        let position = map_to_position(v, cfg);
        let commanded = !self.tasks.homing.is_holding();

        render_voltage(v, self.hw);
        if commanded {
            self.hw.set_position(position);
        }
        self.sink.emit(&AppEvent::Sample {
            voltage: v,
            position,
            commanded,
        });
    }

    fn run_homing(&mut self, now_ms: u64) -> TaskPoll {
        match self.tasks.homing.poll(now_ms, self.hw, &self.tasks.config) {
            HomingPoll::Started { target } => {
                self.sink.emit(&AppEvent::HomingStarted { target });
                TaskPoll::Pending
            }
            HomingPoll::Holding => TaskPoll::Pending,
            HomingPoll::Restored { target } => {
                self.sink.emit(&AppEvent::HomingRestored { target });
                TaskPoll::Done
            }
        }
    }
}

impl<N, H, S> SchedulerDelegate for TickContext<'_, N, H, S>
where
    N: NetworkPort,
    H: SensorPort + ActuatorPort + IndicatorPort + DisplayPort,
    S: EventSink,
{
    fn on_task_due(&mut self, task: TaskId, now_ms: u64) -> TaskPoll {
        match task {
            TaskId::Indicator => {
                self.tasks.indicator.tick(self.hw);
                TaskPoll::Done
            }
            TaskId::Sample => {
                self.run_sample();
                TaskPoll::Done
            }
            TaskId::Homing => self.run_homing(now_ms),
        }
    }

    fn on_network_poll(&mut self, now_ms: u64) {
        let Some(http) = self.tasks.http.as_mut() else {
            return;
        };
        let tick = http.poll(now_ms, self.hw, &self.tasks.config);
        if tick.accepted {
            self.sink.emit(&AppEvent::ClientConnected);
        }
        if let Some(summary) = tick.finished {
            self.sink.emit(&AppEvent::ResponseSent {
                voltage: summary.voltage,
                position: summary.position,
                outcome: summary.outcome,
            });
        }
    }
}
