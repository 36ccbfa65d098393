//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (ADC, servo, LED, matrix, TCP listener, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one raw ADC conversion.
pub trait SensorPort {
    /// Raw code in `[0, adc_max]`.  The converter cannot fail by hardware
    /// contract, so there is no error channel.
    fn read_raw(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Output ports (driven adapters: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Servo command port.
pub trait ActuatorPort {
    /// Command the servo to `degrees` (already clamped by the caller).
    fn set_position(&mut self, degrees: i32);
}

/// Binary status indicator (LED).
pub trait IndicatorPort {
    fn set_state(&mut self, on: bool);
}

/// Pixel display that can show a short line of text.
pub trait DisplayPort {
    fn render_text(&mut self, text: &str);
}

// ───────────────────────────────────────────────────────────────
// Network ports
// ───────────────────────────────────────────────────────────────

/// A listening socket polled once per scheduler tick.
pub trait NetworkPort {
    type Conn: Connection;

    /// Non-blocking accept.  `None` when no client is waiting.
    fn accept_pending(&mut self) -> Option<Self::Conn>;
}

/// One accepted client connection.
pub trait Connection {
    /// Non-blocking single-byte read.  `None` when nothing is buffered
    /// (or the peer has gone away; check [`is_connected`](Self::is_connected)).
    fn read_byte(&mut self) -> Option<u8>;

    /// `false` once the peer closed its side or the socket errored.
    fn is_connected(&self) -> bool;

    /// Write the whole buffer.
    fn write(&mut self, data: &[u8]) -> Result<(), ConnectionError>;

    /// Push any buffered output to the peer.
    fn flush(&mut self) -> Result<(), ConnectionError>;

    /// Close the connection.  Idempotent.
    fn close(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples the cadence engine from the tasks)
// ───────────────────────────────────────────────────────────────

/// Identifies one of the periodic tasks owned by the
/// [`Scheduler`](crate::scheduler::Scheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskId {
    /// Status LED toggle.
    Indicator,
    /// Sample → servo → display refresh.
    Sample,
    /// Servo homing cycle.
    Homing,
}

/// Result of running or polling a task for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPoll {
    /// The task has more work; poll it again next tick.
    Pending,
    /// The task finished; its deadline advances to now.
    Done,
}

/// Callback trait the scheduler invokes for every due task, in the fixed
/// order indicator → sample → homing, followed by one network poll.
pub trait SchedulerDelegate {
    fn on_task_due(&mut self, task: TaskId, now_ms: u64) -> TaskPoll;

    /// Called once per tick after the periodic tasks.
    fn on_network_poll(&mut self, now_ms: u64);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`Connection`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionError {
    /// The peer closed the connection.
    Closed,
    /// Generic socket I/O error.
    Io,
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "connection closed by peer"),
            Self::Io => write!(f, "socket I/O error"),
        }
    }
}
