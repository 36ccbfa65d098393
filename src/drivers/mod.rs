//! Actuator/display drivers, hardware initialisation, and the watchdog.

pub mod hw_init;
pub mod matrix;
pub mod servo;
pub mod status_led;
pub mod watchdog;
