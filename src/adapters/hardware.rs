//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the voltage sensor and every output driver, exposing them through
//! [`SensorPort`], [`ActuatorPort`], [`IndicatorPort`] and [`DisplayPort`].
//! This is the only module in the system that touches actual hardware.
//! On non-espidf targets the ADC and LED use cfg-gated simulation stubs;
//! the servo PWM channel and matrix bus are whatever the caller injects.

use embedded_hal::i2c::I2c;
use embedded_hal::pwm::SetDutyCycle;
use log::{info, warn};

use crate::app::ports::{ActuatorPort, DisplayPort, IndicatorPort, SensorPort};
use crate::drivers::matrix::LedMatrix;
use crate::drivers::servo::ServoDriver;
use crate::drivers::status_led::StatusLed;
use crate::sensors::voltage::VoltageSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P: SetDutyCycle, I: I2c> {
    sensor: VoltageSensor,
    servo: ServoDriver<P>,
    led: StatusLed,
    matrix: LedMatrix<I>,
    display_ok: bool,
}

impl<P: SetDutyCycle, I: I2c> HardwareAdapter<P, I> {
    pub fn new(
        sensor: VoltageSensor,
        servo: ServoDriver<P>,
        led: StatusLed,
        matrix: LedMatrix<I>,
    ) -> Self {
        Self {
            sensor,
            servo,
            led,
            matrix,
            display_ok: true,
        }
    }

    pub fn servo(&self) -> &ServoDriver<P> {
        &self.servo
    }

    pub fn matrix(&self) -> &LedMatrix<I> {
        &self.matrix
    }

    pub fn led(&self) -> &StatusLed {
        &self.led
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P: SetDutyCycle, I: I2c> SensorPort for HardwareAdapter<P, I> {
    fn read_raw(&mut self) -> u16 {
        self.sensor.read_raw()
    }
}

// ── Output port implementations ───────────────────────────────

impl<P: SetDutyCycle, I: I2c> ActuatorPort for HardwareAdapter<P, I> {
    fn set_position(&mut self, degrees: i32) {
        self.servo.set_angle(degrees);
    }
}

impl<P: SetDutyCycle, I: I2c> IndicatorPort for HardwareAdapter<P, I> {
    fn set_state(&mut self, on: bool) {
        self.led.set(on);
    }
}

impl<P: SetDutyCycle, I: I2c> DisplayPort for HardwareAdapter<P, I> {
    fn render_text(&mut self, text: &str) {
        match self.matrix.show_text(text) {
            Ok(()) if !self.display_ok => {
                info!("Matrix: display back");
                self.display_ok = true;
            }
            Ok(()) => {}
            // Warn once per outage, not every refresh.
            Err(e) if self.display_ok => {
                warn!("Matrix: I2C write failed ({:?})", e);
                self.display_ok = false;
            }
            Err(_) => {}
        }
    }
}
