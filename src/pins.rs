//! GPIO / peripheral pin assignments for the controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Voltage input (ADC1)
// ---------------------------------------------------------------------------

/// Measured voltage, through a resistive divider.
/// ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const VOLTAGE_ADC_GPIO: i32 = 1;
/// ADC1 channel number for [`VOLTAGE_ADC_GPIO`].
pub const VOLTAGE_ADC_CHANNEL: u32 = 0;

// ---------------------------------------------------------------------------
// Servo (hobby servo, 50 Hz PWM)
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the servo signal line.
pub const SERVO_PWM_GPIO: i32 = 9;
/// Servo frame rate.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;

// ---------------------------------------------------------------------------
// Status LED (red, active HIGH)
// ---------------------------------------------------------------------------

pub const STATUS_LED_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// LED matrix (12×8, HT16K33 backpack on I²C)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;
pub const I2C_FREQ_HZ: u32 = 400_000;
pub const MATRIX_I2C_ADDR: u8 = 0x70;
