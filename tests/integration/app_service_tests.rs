//! Integration tests for the AppService → Scheduler → ports pipeline.
//!
//! Drive the service one millisecond at a time against mock hardware and
//! check the cadence of every periodic task plus the homing cycle.

use crate::mock_hw::{HwCall, MockHardware, MockNetwork, RecordingSink};

use voltservo::app::events::AppEvent;
use voltservo::app::ports::TaskId;
use voltservo::app::service::AppService;
use voltservo::config::SystemConfig;

fn make_app(adc: u16) -> (AppService<MockNetwork>, MockHardware, RecordingSink) {
    let mut app = AppService::new(SystemConfig::default(), None);
    let mut sink = RecordingSink::default();
    app.start(&mut sink);
    (app, MockHardware::with_adc(adc), sink)
}

fn run(
    app: &mut AppService<MockNetwork>,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    from_ms: u64,
    to_ms: u64,
) {
    for now in from_ms..=to_ms {
        app.tick(now, hw, sink);
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_reports_network_less_mode() {
    let (app, _hw, sink) = make_app(0);
    assert!(!app.has_network());
    assert_eq!(sink.events, vec![AppEvent::Started { network: false }]);
}

#[test]
fn nothing_fires_on_the_first_tick() {
    let (mut app, mut hw, mut sink) = make_app(512);
    app.tick(0, &mut hw, &mut sink);
    assert!(hw.calls.is_empty());
    assert_eq!(hw.reads, 0);
}

// ── Status indicator ──────────────────────────────────────────

#[test]
fn indicator_toggles_once_per_period() {
    let (mut app, mut hw, mut sink) = make_app(0);
    let t = 5_000;
    run(&mut app, &mut hw, &mut sink, 0, t);

    let expected = (t / 167) as i64;
    let got = hw.indicator_toggles() as i64;
    assert!((got - expected).abs() <= 1, "{got} toggles, expected ~{expected}");
}

#[test]
fn indicator_alternates_starting_high() {
    let (mut app, mut hw, mut sink) = make_app(0);
    run(&mut app, &mut hw, &mut sink, 0, 700);

    let states: Vec<bool> = hw
        .calls
        .iter()
        .filter_map(|c| match c {
            HwCall::SetIndicator(on) => Some(*on),
            _ => None,
        })
        .collect();
    assert_eq!(states, vec![true, false, true, false]);
}

#[test]
fn indicator_keeps_toggling_while_homing_holds() {
    let (mut app, mut hw, mut sink) = make_app(512);
    run(&mut app, &mut hw, &mut sink, 0, 3001);
    assert!(app.is_homing());

    hw.clear();
    run(&mut app, &mut hw, &mut sink, 3002, 3500);
    assert!(app.is_homing());
    assert!(hw.indicator_toggles() >= 2);
}

// ── Sample → servo → display ──────────────────────────────────

#[test]
fn sample_commands_servo_and_display() {
    let (mut app, mut hw, mut sink) = make_app(512);
    run(&mut app, &mut hw, &mut sink, 0, 501);

    assert_eq!(hw.positions(), vec![90]);
    assert_eq!(hw.renders(), vec!["2.33V"]);
    assert!(sink.events.contains(&AppEvent::Sample {
        voltage: 512.0 / 1023.0 * 4.66,
        position: 90,
        commanded: true,
    }));
}

#[test]
fn sample_cadence_is_every_half_second() {
    let (mut app, mut hw, mut sink) = make_app(0);
    run(&mut app, &mut hw, &mut sink, 0, 2_600);

    // 501, 1002, 1503, 2004, 2505
    assert_eq!(hw.renders().len(), 5);
    assert_eq!(app.scheduler().deadline(TaskId::Sample).last_fire_ms(), 2_505);
}

#[test]
fn display_follows_voltage_changes() {
    let (mut app, mut hw, mut sink) = make_app(0);
    run(&mut app, &mut hw, &mut sink, 0, 501);
    hw.adc = 1023;
    run(&mut app, &mut hw, &mut sink, 502, 1002);

    assert_eq!(hw.renders(), vec!["0.00V", "4.66V"]);
    assert_eq!(hw.positions(), vec![0, 180]);
}

// ── Homing ────────────────────────────────────────────────────

#[test]
fn homing_parks_at_zero_then_restores() {
    let (mut app, mut hw, mut sink) = make_app(512);
    run(&mut app, &mut hw, &mut sink, 0, 3_000);
    assert!(!app.is_homing());

    hw.clear();
    run(&mut app, &mut hw, &mut sink, 3_001, 3_001);
    assert_eq!(hw.positions(), vec![0]);
    assert!(app.is_homing());

    run(&mut app, &mut hw, &mut sink, 3_002, 3_501);
    assert!(!app.is_homing());
    assert_eq!(hw.positions(), vec![0, 90]);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::HomingStarted { target: 90 })), 1);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::HomingRestored { target: 90 })), 1);
}

#[test]
fn homing_restores_target_sampled_at_cycle_start() {
    let (mut app, mut hw, mut sink) = make_app(512);
    run(&mut app, &mut hw, &mut sink, 0, 3_200);
    assert!(app.is_homing());

    // Voltage jumps mid-hold; the restore still uses the captured target.
    hw.adc = 1023;
    run(&mut app, &mut hw, &mut sink, 3_201, 3_501);
    assert_eq!(hw.last_position(), Some(90));

    // The next regular sample picks up the new voltage.
    run(&mut app, &mut hw, &mut sink, 3_502, 4_100);
    assert_eq!(hw.last_position(), Some(180));
}

#[test]
fn sample_during_hold_does_not_move_servo() {
    let (mut app, mut hw, mut sink) = make_app(1023);
    run(&mut app, &mut hw, &mut sink, 0, 3_001);

    hw.clear();
    run(&mut app, &mut hw, &mut sink, 3_002, 3_500);
    assert!(hw.positions().is_empty());
    // Display still refreshed (sample at 3006).
    assert_eq!(hw.renders(), vec!["4.66V"]);
    assert!(sink.events.contains(&AppEvent::Sample {
        voltage: 4.66,
        position: 180,
        commanded: false,
    }));
}

#[test]
fn homing_deadline_advances_at_completion() {
    let (mut app, mut hw, mut sink) = make_app(512);
    run(&mut app, &mut hw, &mut sink, 0, 3_501);
    assert_eq!(app.scheduler().deadline(TaskId::Homing).last_fire_ms(), 3_501);

    hw.clear();
    run(&mut app, &mut hw, &mut sink, 3_502, 6_501);
    assert!(hw.positions().iter().all(|&p| p != 0), "no homing before 6502");

    run(&mut app, &mut hw, &mut sink, 6_502, 6_502);
    assert_eq!(hw.last_position(), Some(0));
}

#[test]
fn gap_in_ticks_fires_each_task_once() {
    let (mut app, mut hw, mut sink) = make_app(512);
    // A single late tick: every task is overdue but fires only once.
    app.tick(10_000, &mut hw, &mut sink);
    assert_eq!(hw.indicator_toggles(), 1);
    assert_eq!(hw.renders().len(), 1);
    assert!(app.is_homing());
}
