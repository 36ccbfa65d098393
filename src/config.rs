//! System configuration parameters
//!
//! Every tunable constant of the controller lives here.  The values are
//! fixed at build time; [`SystemConfig::default()`] is the configuration
//! the firmware runs with.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Voltage sensing ---
    /// Full-scale ADC code (10-bit converter → 1023)
    pub adc_max: u16,
    /// Reference voltage at full scale (volts)
    pub vref: f32,

    // --- Servo ---
    /// Servo angle at 0 V (degrees)
    pub min_angle: i32,
    /// Servo angle at VREF (degrees)
    pub max_angle: i32,

    // --- Cooperative scheduler ---
    /// Status LED toggle period (milliseconds)
    pub indicator_period_ms: u32,
    /// Sample → servo → display refresh period (milliseconds)
    pub sample_period_ms: u32,
    /// Servo homing period (milliseconds)
    pub homing_period_ms: u32,
    /// Time the servo is held at zero during homing (milliseconds)
    pub homing_hold_ms: u32,
    /// Sleep at the end of each loop iteration (milliseconds)
    pub loop_idle_ms: u32,

    // --- HTTP ---
    /// TCP listen port for the status page
    pub http_port: u16,
    /// Request read timeout measured from accept (milliseconds)
    pub http_timeout_ms: u32,
    /// Delay between writing the response and closing (milliseconds)
    pub http_flush_delay_ms: u32,

    // --- Network bring-up ---
    /// Association window (seconds, polled once per second)
    pub wifi_connect_window_secs: u32,
    /// DHCP address polls (one per second)
    pub dhcp_poll_attempts: u32,

    // --- Watchdog ---
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Voltage sensing
            adc_max: 1023,
            vref: 4.66,

            // Servo
            min_angle: 0,
            max_angle: 180,

            // Scheduler
            indicator_period_ms: 167,
            sample_period_ms: 500,
            homing_period_ms: 3000,
            homing_hold_ms: 500,
            loop_idle_ms: 1,

            // HTTP
            http_port: 80,
            http_timeout_ms: 3000,
            http_flush_delay_ms: 1,

            // Network bring-up
            wifi_connect_window_secs: 20,
            dhcp_poll_attempts: 10,

            // Watchdog
            watchdog_timeout_ms: 10_000,
        }
    }
}

impl SystemConfig {
    /// Reject combinations the mapping and scheduling code cannot work with.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.adc_max == 0 {
            return Err("adc_max must be non-zero");
        }
        if self.vref.is_nan() || self.vref <= 0.0 {
            return Err("vref must be positive");
        }
        if self.min_angle >= self.max_angle {
            return Err("min_angle must be below max_angle");
        }
        if self.indicator_period_ms == 0 || self.sample_period_ms == 0 || self.homing_period_ms == 0 {
            return Err("task periods must be non-zero");
        }
        if self.homing_hold_ms >= self.homing_period_ms {
            return Err("homing hold must be shorter than the homing period");
        }
        if self.http_timeout_ms == 0 {
            return Err("http_timeout_ms must be non-zero");
        }
        if self.watchdog_timeout_ms <= self.homing_hold_ms.max(self.http_timeout_ms) {
            return Err("watchdog timeout must exceed every task deadline");
        }
        Ok(())
    }

    /// VREF scaled by 100 (centivolts, truncated), the integer range used
    /// by the voltage → angle mapping.
    pub fn vref_centivolts(&self) -> i32 {
        (self.vref * 100.0) as i32
    }
}
