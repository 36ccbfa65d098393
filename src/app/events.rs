//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::http::ExchangeOutcome;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The application service has started.
    Started { network: bool },

    /// Periodic sample: the voltage, the angle it maps to, and whether the
    /// servo was actually commanded (it is not while homing holds at zero).
    Sample {
        voltage: f32,
        position: i32,
        commanded: bool,
    },

    /// Homing cycle drove the servo to zero and captured `target`.
    HomingStarted { target: i32 },

    /// Homing cycle restored the servo to `target`.
    HomingRestored { target: i32 },

    /// A client connection was accepted.
    ClientConnected,

    /// A response was written and the connection closed.
    ResponseSent {
        voltage: f32,
        position: i32,
        outcome: ExchangeOutcome,
    },
}
