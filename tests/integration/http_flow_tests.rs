//! Integration tests for the HTTP responder running inside AppService.
//!
//! Clients are scripted through [`MockNetwork`]; the service is ticked one
//! millisecond at a time exactly like the firmware loop.

use crate::mock_hw::{MockHardware, MockNetwork, RecordingSink};

use voltservo::app::events::AppEvent;
use voltservo::app::service::AppService;
use voltservo::config::SystemConfig;
use voltservo::http::ExchangeOutcome;

struct Rig {
    app: AppService<MockNetwork>,
    hw: MockHardware,
    sink: RecordingSink,
    net: MockNetwork,
}

impl Rig {
    fn new(adc: u16) -> Self {
        let net = MockNetwork::new();
        let mut app = AppService::new(SystemConfig::default(), Some(net.clone()));
        let mut sink = RecordingSink::default();
        app.start(&mut sink);
        Self {
            app,
            hw: MockHardware::with_adc(adc),
            sink,
            net,
        }
    }

    fn run(&mut self, from_ms: u64, to_ms: u64) {
        for now in from_ms..=to_ms {
            self.app.tick(now, &mut self.hw, &mut self.sink);
        }
    }

    fn sent(&self) -> Vec<ExchangeOutcome> {
        self.sink
            .events
            .iter()
            .filter_map(|e| match e {
                AppEvent::ResponseSent { outcome, .. } => Some(*outcome),
                _ => None,
            })
            .collect()
    }
}

#[test]
fn start_reports_http_enabled() {
    let rig = Rig::new(0);
    assert!(rig.app.has_network());
    assert_eq!(rig.sink.events, vec![AppEvent::Started { network: true }]);
}

#[test]
fn complete_request_gets_status_page() {
    let mut rig = Rig::new(512);
    let client = rig.net.connect();
    client.send(b"GET / HTTP/1.1\r\nHost: voltservo\r\n\r\n");

    rig.run(0, 0);
    assert!(rig.app.is_serving());
    assert!(!client.is_closed());

    rig.run(1, 1);
    assert!(!rig.app.is_serving());
    assert!(client.is_closed());
    assert_eq!(rig.app.responses_sent(), 1);
    assert_eq!(rig.sent(), vec![ExchangeOutcome::Complete]);

    let page = client.response();
    assert!(page.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(page.contains("Connection: close\r\n"));
    assert!(page.contains("<div class='voltage'>2.33 V</div>"));
    assert!(page.contains("<div class='servo'>90 &deg;</div>"));
    assert!(page.contains("<meta http-equiv='refresh' content='1'>"));
}

#[test]
fn request_without_blank_line_times_out_with_one_response() {
    let mut rig = Rig::new(0);
    let client = rig.net.connect();
    client.send(b"GET / HTTP/1.1\r\n");

    rig.run(10, 2_000);
    // Voltage changes while the client dawdles; the page reflects the
    // value sampled when the response is built.
    rig.hw.adc = 1023;
    rig.run(2_001, 3_009);
    assert!(rig.app.is_serving());
    assert!(client.response().is_empty());

    rig.run(3_010, 3_011);
    assert!(client.is_closed());
    assert_eq!(rig.sent(), vec![ExchangeOutcome::TimedOut]);

    let page = client.response();
    assert_eq!(page.matches("HTTP/1.1 200 OK").count(), 1);
    assert!(page.contains("<div class='voltage'>4.66 V</div>"));
    assert!(page.contains("<div class='servo'>180 &deg;</div>"));
}

#[test]
fn slow_client_does_not_stall_other_tasks() {
    let mut rig = Rig::new(512);
    let _client = rig.net.connect();

    rig.run(0, 2_999);
    assert!(rig.app.is_serving());
    // Indicator and sample kept running for the whole read window.
    assert!(rig.hw.indicator_toggles() >= 17);
    assert_eq!(rig.hw.renders().len(), 5);
}

#[test]
fn second_client_waits_until_first_is_closed() {
    let mut rig = Rig::new(512);
    let first = rig.net.connect();
    let second = rig.net.connect();
    first.send(b"GET / HTT");

    rig.run(0, 100);
    assert_eq!(rig.net.accept_calls(), 1);
    assert_eq!(rig.net.backlog_len(), 1);

    first.send(b"P/1.1\r\n\r\n");
    rig.run(101, 102);
    assert!(first.is_closed());
    assert_eq!(rig.net.backlog_len(), 1);

    rig.run(103, 103);
    assert_eq!(rig.net.backlog_len(), 0);
    assert!(rig.app.is_serving());

    second.send(b"\r\n");
    rig.run(104, 105);
    assert!(second.is_closed());
    assert_eq!(rig.app.responses_sent(), 2);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::ClientConnected)),
        2
    );
}

#[test]
fn client_that_hangs_up_is_closed_without_error() {
    let mut rig = Rig::new(512);
    let client = rig.net.connect();
    client.send(b"GET");
    client.hang_up();

    rig.run(0, 1);
    assert!(client.is_closed());
    assert!(client.response().is_empty());
    assert_eq!(rig.sent(), vec![ExchangeOutcome::PeerClosed]);
    assert!(!rig.app.is_serving());
}

#[test]
fn idle_listener_is_polled_every_tick() {
    let mut rig = Rig::new(0);
    rig.run(0, 49);
    assert_eq!(rig.net.accept_calls(), 50);
    assert_eq!(rig.app.responses_sent(), 0);
}
