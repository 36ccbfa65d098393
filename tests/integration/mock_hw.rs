//! Mock adapters for integration tests.
//!
//! [`MockHardware`] records every actuator, indicator and display call so
//! tests can assert on the full command history without touching real
//! GPIO/PWM/I²C.  [`MockNetwork`] hands out scripted connections whose
//! state stays observable through a [`ClientHandle`] after the service
//! has taken ownership of them.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use voltservo::app::events::AppEvent;
use voltservo::app::ports::{
    ActuatorPort, Connection, ConnectionError, DisplayPort, EventSink, IndicatorPort, NetworkPort,
    SensorPort,
};

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HwCall {
    SetPosition(i32),
    SetIndicator(bool),
    Render(String),
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub adc: u16,
    pub reads: u32,
    pub calls: Vec<HwCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn with_adc(adc: u16) -> Self {
        Self {
            adc,
            reads: 0,
            calls: Vec::new(),
        }
    }

    pub fn positions(&self) -> Vec<i32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::SetPosition(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn last_position(&self) -> Option<i32> {
        self.positions().last().copied()
    }

    pub fn indicator_toggles(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, HwCall::SetIndicator(_)))
            .count()
    }

    pub fn renders(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Render(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl SensorPort for MockHardware {
    fn read_raw(&mut self) -> u16 {
        self.reads += 1;
        self.adc
    }
}

impl ActuatorPort for MockHardware {
    fn set_position(&mut self, degrees: i32) {
        self.calls.push(HwCall::SetPosition(degrees));
    }
}

impl IndicatorPort for MockHardware {
    fn set_state(&mut self, on: bool) {
        self.calls.push(HwCall::SetIndicator(on));
    }
}

impl DisplayPort for MockHardware {
    fn render_text(&mut self, text: &str) {
        self.calls.push(HwCall::Render(text.to_owned()));
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Scripted network ──────────────────────────────────────────

#[derive(Default)]
pub struct ClientState {
    pub inbox: VecDeque<u8>,
    pub outbox: Vec<u8>,
    pub peer_open: bool,
    pub closed: bool,
}

/// Test-side view of one scripted client.
#[derive(Clone)]
pub struct ClientHandle(Rc<RefCell<ClientState>>);

#[allow(dead_code)]
impl ClientHandle {
    pub fn send(&self, bytes: &[u8]) {
        self.0.borrow_mut().inbox.extend(bytes.iter().copied());
    }

    pub fn hang_up(&self) {
        self.0.borrow_mut().peer_open = false;
    }

    pub fn response(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow().outbox).into_owned()
    }

    pub fn is_closed(&self) -> bool {
        self.0.borrow().closed
    }
}

pub struct MockConn(Rc<RefCell<ClientState>>);

impl Connection for MockConn {
    fn read_byte(&mut self) -> Option<u8> {
        self.0.borrow_mut().inbox.pop_front()
    }

    fn is_connected(&self) -> bool {
        let s = self.0.borrow();
        !s.closed && (s.peer_open || !s.inbox.is_empty())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), ConnectionError> {
        let mut s = self.0.borrow_mut();
        if s.closed || !s.peer_open {
            return Err(ConnectionError::Closed);
        }
        s.outbox.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ConnectionError> {
        Ok(())
    }

    fn close(&mut self) {
        self.0.borrow_mut().closed = true;
    }
}

/// Listener whose backlog tests fill by hand.
#[derive(Clone, Default)]
pub struct MockNetwork {
    backlog: Rc<RefCell<VecDeque<MockConn>>>,
    accept_calls: Rc<Cell<u32>>,
}

#[allow(dead_code)]
impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a client that will be handed out by the next accept.
    pub fn connect(&self) -> ClientHandle {
        let state = Rc::new(RefCell::new(ClientState {
            peer_open: true,
            ..ClientState::default()
        }));
        self.backlog
            .borrow_mut()
            .push_back(MockConn(Rc::clone(&state)));
        ClientHandle(state)
    }

    pub fn accept_calls(&self) -> u32 {
        self.accept_calls.get()
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.borrow().len()
    }
}

impl NetworkPort for MockNetwork {
    type Conn = MockConn;

    fn accept_pending(&mut self) -> Option<MockConn> {
        self.accept_calls.set(self.accept_calls.get() + 1);
        self.backlog.borrow_mut().pop_front()
    }
}
