//! VoltServo Firmware: Main Entry Point
//!
//! Reads a voltage, mirrors it on a servo and an LED matrix, blinks a
//! status LED, and serves a self-refreshing status page on port 80.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter            HttpListener     LogEventSink      │
//! │  (Sensor+Actuator+          (NetworkPort)    (EventSink)       │
//! │   Indicator+Display)        WifiAdapter      Esp32TimeAdapter  │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  indicator · sample · homing · HTTP responder          │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (delegate-driven, non-blocking)                     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::ledc::config::TimerConfig;
use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::prelude::*;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{error, info, warn};

use voltservo::adapters::hardware::HardwareAdapter;
use voltservo::adapters::http_listener::HttpListener;
use voltservo::adapters::log_sink::LogEventSink;
use voltservo::adapters::time::Esp32TimeAdapter;
use voltservo::adapters::wifi::{self, WifiAdapter, WifiCredentials};
use voltservo::app::ports::{ActuatorPort, IndicatorPort};
use voltservo::app::service::AppService;
use voltservo::config::SystemConfig;
use voltservo::drivers::hw_init;
use voltservo::drivers::matrix::LedMatrix;
use voltservo::drivers::servo::ServoDriver;
use voltservo::drivers::status_led::StatusLed;
use voltservo::drivers::watchdog::Watchdog;
use voltservo::error::Error;
use voltservo::pins;
use voltservo::sensors::voltage::VoltageSensor;

/// Serial console attach time before the first log line.
const BOOT_SETTLE: Duration = Duration::from_secs(2);

/// Park the main task forever.  Used when boot cannot continue.
fn halt(err: &Error) -> ! {
    error!("{}, halting", err);
    loop {
        std::thread::sleep(Duration::from_secs(1));
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    std::thread::sleep(BOOT_SETTLE);

    info!("╔══════════════════════════════════════╗");
    info!("║  VoltServo v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    if let Err(msg) = config.validate() {
        halt(&Error::Config(msg));
    }
    info!("Config: {}", serde_json::to_string(&config)?);

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        halt(&Error::from(e));
    }

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()
        .inspect_err(|e| warn!("NVS partition unavailable ({}), WiFi calibration not cached", e))
        .ok();

    // Typed pin fields below must agree with the pin map.
    const _: () = assert!(pins::SERVO_PWM_GPIO == 9);
    const _: () = assert!(pins::I2C_SDA_GPIO == 14 && pins::I2C_SCL_GPIO == 15);

    // Servo: LEDC timer 0 / channel 0 on pins::SERVO_PWM_GPIO.
    let servo_timer = LedcTimerDriver::new(
        peripherals.ledc.timer0,
        &TimerConfig::default()
            .frequency(pins::SERVO_PWM_FREQ_HZ.Hz())
            .resolution(Resolution::Bits14),
    )?;
    let servo_pwm = LedcDriver::new(peripherals.ledc.channel0, servo_timer, peripherals.pins.gpio9)?;
    info!("Servo: LEDC ch0 on GPIO{} at {} Hz", pins::SERVO_PWM_GPIO, pins::SERVO_PWM_FREQ_HZ);

    // Matrix: I2C0 on pins::I2C_SDA_GPIO / pins::I2C_SCL_GPIO.
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio14,
        peripherals.pins.gpio15,
        &I2cConfig::new().baudrate(pins::I2C_FREQ_HZ.Hz()),
    )?;
    info!(
        "Matrix: I2C0 SDA=GPIO{} SCL=GPIO{} addr=0x{:02X}",
        pins::I2C_SDA_GPIO,
        pins::I2C_SCL_GPIO,
        pins::MATRIX_I2C_ADDR
    );
    let mut matrix = LedMatrix::new(i2c, pins::MATRIX_I2C_ADDR);
    if let Err(e) = matrix.init() {
        warn!("Matrix: init failed ({:?}), display will keep retrying", e);
    }

    let mut hw = HardwareAdapter::new(
        VoltageSensor::new(pins::VOLTAGE_ADC_CHANNEL),
        ServoDriver::new(servo_pwm),
        StatusLed::new(),
        matrix,
    );
    hw.set_state(false);
    hw.set_position(config.min_angle);

    // ── 4. Network bring-up ───────────────────────────────────
    let creds = WifiCredentials::from_build_env();
    let bringup = WifiAdapter::start(peripherals.modem, sysloop, nvs, &creds, &config);
    wifi::log_bringup(&bringup, config.http_port);

    // `_wifi` keeps the station up for the life of the loop.
    let (_wifi, listener) = match bringup {
        Ok(w) => match HttpListener::bind(config.http_port) {
            Ok(l) => (Some(w), Some(l)),
            Err(e) => {
                warn!("{}, running without the status page", Error::from(e));
                (Some(w), None)
            }
        },
        Err(e) if e.is_fatal() => halt(&Error::from(e)),
        Err(_) => {
            warn!("Running without network");
            (None, None)
        }
    };

    // ── 5. Watchdog ───────────────────────────────────────────
    // Subscribed after bring-up: the association and DHCP windows are
    // longer than the timeout.
    let mut watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 6. App service + loop ─────────────────────────────────
    let time = Esp32TimeAdapter::new();
    let mut sink = LogEventSink::new();
    let idle = Duration::from_millis(u64::from(config.loop_idle_ms));
    let mut app = AppService::new(config, listener);
    app.start(&mut sink);

    info!("System ready. Entering main loop.");

    loop {
        app.tick(time.uptime_ms(), &mut hw, &mut sink);
        watchdog.feed();
        std::thread::sleep(idle);
    }
}
