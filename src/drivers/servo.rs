//! Hobby servo driver (50 Hz PWM, 500–2500 µs pulse).
//!
//! Generic over any `embedded_hal::pwm::SetDutyCycle` channel.  On the
//! target that is an `esp-idf-hal` `LedcDriver`; tests use an in-memory
//! channel.
//!
//! The driver is a dumb actuator: it clamps to the mechanical range and
//! remembers the last commanded angle, nothing more.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

/// Pulse width at 0°.
pub const MIN_PULSE_US: u32 = 500;
/// Pulse width at 180°.
pub const MAX_PULSE_US: u32 = 2500;
/// One frame at 50 Hz.
pub const PERIOD_US: u32 = 20_000;
/// Mechanical range.
pub const MAX_ANGLE: i32 = 180;

/// Pulse width for `angle`, clamped to `0..=180`.
pub fn angle_to_pulse_us(angle: i32) -> u32 {
    let angle = angle.clamp(0, MAX_ANGLE) as u32;
    MIN_PULSE_US + angle * (MAX_PULSE_US - MIN_PULSE_US) / MAX_ANGLE as u32
}

/// Duty register value for `angle` on a channel whose full scale is `max_duty`.
pub fn angle_to_duty(angle: i32, max_duty: u16) -> u16 {
    let duty = angle_to_pulse_us(angle) * u32::from(max_duty) / PERIOD_US;
    // pulse ≤ period, so duty ≤ max_duty
    duty as u16
}

pub struct ServoDriver<P: SetDutyCycle> {
    pwm: P,
    angle: Option<i32>,
}

impl<P: SetDutyCycle> ServoDriver<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, angle: None }
    }

    /// Move to `angle` degrees.  Out-of-range values are clamped.
    pub fn set_angle(&mut self, angle: i32) {
        let angle = angle.clamp(0, MAX_ANGLE);
        let duty = angle_to_duty(angle, self.pwm.max_duty_cycle());
        if let Err(e) = self.pwm.set_duty_cycle(duty) {
            warn!("Servo: duty update failed ({:?})", e);
            return;
        }
        self.angle = Some(angle);
    }

    /// Last angle successfully commanded, `None` before the first command.
    pub fn angle(&self) -> Option<i32> {
        self.angle
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }
}
