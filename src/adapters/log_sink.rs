//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one structured line per application
//! event to the ESP-IDF logger (UART / USB-CDC in production).

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// The console line for `event`.
pub fn format(event: &AppEvent) -> String {
    match event {
        AppEvent::Started { network } => {
            format!("START | http={}", if *network { "enabled" } else { "disabled" })
        }
        AppEvent::Sample {
            voltage,
            position,
            commanded: true,
        } => format!("SAMPLE | {:.2} V | servo {} deg", voltage, position),
        AppEvent::Sample {
            voltage,
            position,
            commanded: false,
        } => format!("SAMPLE | {:.2} V | servo {} deg (homing)", voltage, position),
        AppEvent::HomingStarted { .. } => "HOMING | reset to 0 deg".to_owned(),
        AppEvent::HomingRestored { target } => format!("HOMING | return to {} deg", target),
        AppEvent::ClientConnected => "HTTP | client connected".to_owned(),
        AppEvent::ResponseSent {
            voltage,
            position,
            outcome,
        } => format!(
            "HTTP | response sent | {:.2} V | servo {} deg | {}",
            voltage, position, outcome
        ),
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        info!("{}", format(event));
    }
}
