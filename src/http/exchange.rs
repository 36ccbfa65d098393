//! One request/response exchange on an accepted connection.
//!
//! Polled once per scheduler tick; never blocks.
//!
//! ```text
//!   Reading ──(blank line | timeout | peer gone)──▶ respond ──▶ Flushing
//!   Flushing ──(now ≥ close_at)──▶ close ──▶ Done
//! ```
//!
//! The voltage is sampled when the response is built, not when the
//! connection is accepted.

use log::{debug, warn};

use super::request::RequestParser;
use super::response::render_page;
use super::ExchangeOutcome;
use crate::app::ports::{Connection, SensorPort};
use crate::config::SystemConfig;
use crate::control::mapper::map_to_position;
use crate::sensors::voltage;

/// Upper bound on bytes drained per poll so one chatty client cannot
/// monopolise a tick.
const MAX_BYTES_PER_POLL: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExchangeState {
    Reading,
    Flushing { close_at_ms: u64 },
    Closed,
}

/// What the response carried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeSummary {
    pub voltage: f32,
    pub position: i32,
    pub outcome: ExchangeOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExchangePoll {
    Pending,
    Done(ExchangeSummary),
}

pub struct HttpExchange<C: Connection> {
    conn: C,
    parser: RequestParser,
    accepted_ms: u64,
    state: ExchangeState,
    summary: Option<ExchangeSummary>,
}

impl<C: Connection> HttpExchange<C> {
    pub fn new(conn: C, accepted_ms: u64) -> Self {
        Self {
            conn,
            parser: RequestParser::new(),
            accepted_ms,
            state: ExchangeState::Reading,
            summary: None,
        }
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    pub fn connection(&self) -> &C {
        &self.conn
    }

    pub fn poll(
        &mut self,
        now_ms: u64,
        sensor: &mut impl SensorPort,
        cfg: &SystemConfig,
    ) -> ExchangePoll {
        if self.state == ExchangeState::Reading {
            match self.read_request(now_ms, cfg) {
                Some(outcome) => self.respond(now_ms, outcome, sensor, cfg),
                None => return ExchangePoll::Pending,
            }
        }

        match (self.state, self.summary) {
            (ExchangeState::Flushing { close_at_ms }, Some(summary)) if now_ms >= close_at_ms => {
                self.conn.close();
                self.state = ExchangeState::Closed;
                ExchangePoll::Done(summary)
            }
            (ExchangeState::Closed, Some(summary)) => ExchangePoll::Done(summary),
            _ => ExchangePoll::Pending,
        }
    }

    /// Drain whatever is buffered.  Returns the reason reading stopped, or
    /// `None` if the request is still incomplete and time remains.
    fn read_request(&mut self, now_ms: u64, cfg: &SystemConfig) -> Option<ExchangeOutcome> {
        for _ in 0..MAX_BYTES_PER_POLL {
            let Some(byte) = self.conn.read_byte() else {
                break;
            };
            if self.parser.feed(byte) == super::request::ParseState::Complete {
                debug!(
                    "HTTP: request '{}' ({} bytes)",
                    self.parser.request_line(),
                    self.parser.bytes_seen()
                );
                return Some(ExchangeOutcome::Complete);
            }
        }

        if now_ms.saturating_sub(self.accepted_ms) >= u64::from(cfg.http_timeout_ms) {
            return Some(ExchangeOutcome::TimedOut);
        }
        if !self.conn.is_connected() {
            return Some(ExchangeOutcome::PeerClosed);
        }
        None
    }

    fn respond(
        &mut self,
        now_ms: u64,
        outcome: ExchangeOutcome,
        sensor: &mut impl SensorPort,
        cfg: &SystemConfig,
    ) {
        let v = voltage::sample(sensor, cfg);
        let position = map_to_position(v, cfg);
        let page = render_page(v, position);

        let sent = self
            .conn
            .write(page.as_bytes())
            .and_then(|()| self.conn.flush());
        if let Err(e) = sent {
            warn!("HTTP: response write failed ({}), closing", e);
        }

        self.summary = Some(ExchangeSummary {
            voltage: v,
            position,
            outcome,
        });
        self.state = ExchangeState::Flushing {
            close_at_ms: now_ms + u64::from(cfg.http_flush_delay_ms),
        };
    }
}
