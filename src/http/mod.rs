//! Inline HTTP responder.
//!
//! A severely reduced HTTP/1.1 surface: every request, whatever its
//! method, path or headers, receives the same `200 OK` status page.
//!
//! At most one connection is serviced at a time.  While an exchange is in
//! flight the listener is not polled; further clients wait in the socket
//! backlog until the current exchange closes.

pub mod exchange;
pub mod request;
pub mod response;

use core::fmt;

use log::debug;

use crate::app::ports::{NetworkPort, SensorPort};
use crate::config::SystemConfig;
use exchange::{ExchangePoll, ExchangeSummary, HttpExchange};

/// Why reading the request stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// Blank line seen (end of headers).
    Complete,
    /// The read timeout elapsed first.
    TimedOut,
    /// The client went away before finishing its request.
    PeerClosed,
}

impl fmt::Display for ExchangeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::TimedOut => write!(f, "timeout"),
            Self::PeerClosed => write!(f, "peer closed"),
        }
    }
}

/// What happened on one [`HttpResponder::poll`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResponderTick {
    /// A new client was accepted this tick.
    pub accepted: bool,
    /// An exchange finished (response written, connection closed).
    pub finished: Option<ExchangeSummary>,
}

/// Owns the listening socket and the single in-flight exchange.
pub struct HttpResponder<N: NetworkPort> {
    listener: N,
    exchange: Option<HttpExchange<N::Conn>>,
    served: u32,
}

impl<N: NetworkPort> HttpResponder<N> {
    pub fn new(listener: N) -> Self {
        Self {
            listener,
            exchange: None,
            served: 0,
        }
    }

    /// `true` while a client is being serviced.
    pub fn is_busy(&self) -> bool {
        self.exchange.is_some()
    }

    /// Responses sent since startup.
    pub fn served(&self) -> u32 {
        self.served
    }

    pub fn listener(&self) -> &N {
        &self.listener
    }

    /// Accept at most one pending client, then advance the in-flight
    /// exchange by one step.
    pub fn poll(
        &mut self,
        now_ms: u64,
        sensor: &mut impl SensorPort,
        cfg: &SystemConfig,
    ) -> ResponderTick {
        let mut tick = ResponderTick::default();

        if self.exchange.is_none() {
            match self.listener.accept_pending() {
                Some(conn) => {
                    debug!("HTTP: new client connected");
                    self.exchange = Some(HttpExchange::new(conn, now_ms));
                    tick.accepted = true;
                }
                None => return tick,
            }
        }

        if let Some(exchange) = self.exchange.as_mut() {
            if let ExchangePoll::Done(summary) = exchange.poll(now_ms, sensor, cfg) {
                self.exchange = None;
                self.served = self.served.wrapping_add(1);
                tick.finished = Some(summary);
            }
        }
        tick
    }
}
