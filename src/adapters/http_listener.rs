//! TCP listener adapter for the status page.
//!
//! Implements [`NetworkPort`] and [`Connection`] over `std::net`, which
//! ESP-IDF backs with lwIP, so the same code runs on target and host.
//!
//! ## Connection model
//!
//! 1. `bind()` opens a non-blocking listener on `0.0.0.0:<port>`.
//! 2. `accept_pending()` polls for one waiting client; the accepted socket
//!    is switched to non-blocking as well.
//! 3. Reads never block: `read_byte()` returns `None` when nothing is
//!    buffered, and EOF marks the connection as gone.
//! 4. The response write is the one bounded blocking step: the socket is
//!    briefly made blocking with a write timeout so a full page goes out
//!    in one call.

use core::fmt;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

use log::{debug, info, warn};

use crate::app::ports::{Connection, ConnectionError, NetworkPort};

/// Receive staging buffer per connection.
const RX_CHUNK: usize = 256;
/// Upper bound on a single response write.
const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

// ───────────────────────────────────────────────────────────────
// Error type
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// `bind()` failed (port in use, no interface).
    Bind(u16),
    /// The socket could not be made non-blocking.
    Configure,
}

impl fmt::Display for ListenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(port) => write!(f, "could not bind TCP port {}", port),
            Self::Configure => write!(f, "could not configure listener socket"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Listener
// ───────────────────────────────────────────────────────────────

pub struct HttpListener {
    listener: TcpListener,
}

impl HttpListener {
    /// Listen on every interface.  Port `0` lets the OS pick (tests).
    pub fn bind(port: u16) -> Result<Self, ListenerError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).map_err(|_| ListenerError::Bind(port))?;
        listener
            .set_nonblocking(true)
            .map_err(|_| ListenerError::Configure)?;
        info!("HTTP: server started on port {}", port);
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.local_addr().ok()
    }
}

impl NetworkPort for HttpListener {
    type Conn = TcpConnection;

    fn accept_pending(&mut self) -> Option<TcpConnection> {
        match self.listener.accept() {
            Ok((stream, addr)) => {
                if stream.set_nonblocking(true).is_err() {
                    warn!("HTTP: failed to set non-blocking on client socket");
                    return None;
                }
                debug!("HTTP: client {} accepted", addr);
                Some(TcpConnection::new(stream))
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => None,
            Err(e) => {
                warn!("HTTP: accept error: {}", e);
                None
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Connection
// ───────────────────────────────────────────────────────────────

pub struct TcpConnection {
    stream: Option<TcpStream>,
    rx: [u8; RX_CHUNK],
    rx_pos: usize,
    rx_len: usize,
    peer_open: bool,
}

impl TcpConnection {
    fn new(stream: TcpStream) -> Self {
        Self {
            stream: Some(stream),
            rx: [0; RX_CHUNK],
            rx_pos: 0,
            rx_len: 0,
            peer_open: true,
        }
    }

    fn refill(&mut self) {
        let Some(stream) = self.stream.as_mut() else {
            return;
        };
        match stream.read(&mut self.rx) {
            Ok(0) => self.peer_open = false,
            Ok(n) => {
                self.rx_pos = 0;
                self.rx_len = n;
            }
            Err(ref e) if e.kind() == ErrorKind::WouldBlock => {}
            Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                debug!("HTTP: read error: {}", e);
                self.peer_open = false;
            }
        }
    }
}

impl Connection for TcpConnection {
    fn read_byte(&mut self) -> Option<u8> {
        if self.rx_pos == self.rx_len && self.peer_open {
            self.refill();
        }
        if self.rx_pos < self.rx_len {
            let b = self.rx[self.rx_pos];
            self.rx_pos += 1;
            return Some(b);
        }
        None
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some() && (self.peer_open || self.rx_pos < self.rx_len)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), ConnectionError> {
        let stream = self.stream.as_mut().ok_or(ConnectionError::Closed)?;
        stream
            .set_nonblocking(false)
            .and_then(|()| stream.set_write_timeout(Some(WRITE_TIMEOUT)))
            .map_err(|_| ConnectionError::Io)?;
        let sent = stream.write_all(data).map_err(|e| match e.kind() {
            ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => {
                ConnectionError::Closed
            }
            _ => ConnectionError::Io,
        });
        // Best effort: the connection is closed right after anyway.
        let _ = stream.set_nonblocking(true);
        sent
    }

    fn flush(&mut self) -> Result<(), ConnectionError> {
        let stream = self.stream.as_mut().ok_or(ConnectionError::Closed)?;
        stream.flush().map_err(|_| ConnectionError::Io)
    }

    fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
            debug!("HTTP: client disconnected");
        }
        self.peer_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const SETTLE: Duration = Duration::from_millis(50);

    fn listener() -> (HttpListener, SocketAddr) {
        let l = HttpListener::bind(0).unwrap();
        let port = l.local_addr().unwrap().port();
        (l, SocketAddr::from(([127, 0, 0, 1], port)))
    }

    #[test]
    fn accept_when_no_client_returns_none() {
        let (mut l, _) = listener();
        assert!(l.accept_pending().is_none());
    }

    #[test]
    fn reads_request_bytes_without_blocking() {
        let (mut l, addr) = listener();
        let mut client = TcpStream::connect(addr).unwrap();
        sleep(SETTLE);
        let mut conn = l.accept_pending().unwrap();

        assert_eq!(conn.read_byte(), None);
        assert!(conn.is_connected());

        client.write_all(b"GET /").unwrap();
        sleep(SETTLE);
        let got: Vec<u8> = std::iter::from_fn(|| conn.read_byte()).collect();
        assert_eq!(got, b"GET /");
    }

    #[test]
    fn response_reaches_client_and_close_ends_stream() {
        let (mut l, addr) = listener();
        let mut client = TcpStream::connect(addr).unwrap();
        sleep(SETTLE);
        let mut conn = l.accept_pending().unwrap();

        conn.write(b"HTTP/1.1 200 OK\r\n\r\n").unwrap();
        conn.flush().unwrap();
        conn.close();
        assert!(!conn.is_connected());

        let mut reply = String::new();
        client.read_to_string(&mut reply).unwrap();
        assert_eq!(reply, "HTTP/1.1 200 OK\r\n\r\n");
    }

    #[test]
    fn peer_hangup_is_detected() {
        let (mut l, addr) = listener();
        let client = TcpStream::connect(addr).unwrap();
        sleep(SETTLE);
        let mut conn = l.accept_pending().unwrap();

        drop(client);
        sleep(SETTLE);
        assert_eq!(conn.read_byte(), None);
        assert!(!conn.is_connected());
    }

    #[test]
    fn write_after_close_is_rejected() {
        let (mut l, addr) = listener();
        let _client = TcpStream::connect(addr).unwrap();
        sleep(SETTLE);
        let mut conn = l.accept_pending().unwrap();
        conn.close();
        assert_eq!(conn.write(b"x"), Err(ConnectionError::Closed));
    }
}
