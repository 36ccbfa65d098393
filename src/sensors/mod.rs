//! Sensor subsystem.
//!
//! A single analog input: the voltage being mirrored onto the servo.

pub mod voltage;
