//! Analog voltage input.
//!
//! Converts raw ADC codes to volts with `raw / adc_max * vref`.  The
//! conversion is stateless; a fresh sample is taken every time a reading
//! is needed.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init) and
//! reduces the 12-bit result to the 10-bit range the mapping expects.
//! On host/test: reads from a static `AtomicU16` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

use crate::app::ports::SensorPort;
use crate::config::SystemConfig;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_VOLTAGE_ADC: AtomicU16 = AtomicU16::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_voltage_adc(raw: u16) {
    SIM_VOLTAGE_ADC.store(raw, Ordering::Relaxed);
}

/// Convert a raw code to volts.  Codes above `adc_max` are treated as
/// full scale so the result never exceeds `vref`.
pub fn voltage_from_raw(raw: u16, cfg: &SystemConfig) -> f32 {
    let raw = raw.min(cfg.adc_max);
    (raw as f32 / cfg.adc_max as f32) * cfg.vref
}

/// Take one fresh sample through `sensor` and convert it.
pub fn sample(sensor: &mut impl SensorPort, cfg: &SystemConfig) -> f32 {
    voltage_from_raw(sensor.read_raw(), cfg)
}

/// ADC-backed voltage input.
pub struct VoltageSensor {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    adc_channel: u32,
}

impl VoltageSensor {
    pub fn new(adc_channel: u32) -> Self {
        Self { adc_channel }
    }

    #[cfg(target_os = "espidf")]
    pub fn read_raw(&mut self) -> u16 {
        // 12-bit oneshot conversion → 10-bit code.
        hw_init::adc1_read(self.adc_channel) >> 2
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_raw(&mut self) -> u16 {
        SIM_VOLTAGE_ADC.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedAdc(u16);

    impl SensorPort for FixedAdc {
        fn read_raw(&mut self) -> u16 {
            self.0
        }
    }

    #[test]
    fn zero_code_is_zero_volts() {
        let cfg = SystemConfig::default();
        assert_eq!(voltage_from_raw(0, &cfg), 0.0);
    }

    #[test]
    fn full_scale_is_vref() {
        let cfg = SystemConfig::default();
        assert!((voltage_from_raw(cfg.adc_max, &cfg) - cfg.vref).abs() < 1e-6);
    }

    #[test]
    fn midscale_matches_reference_scenario() {
        let cfg = SystemConfig::default();
        let v = sample(&mut FixedAdc(512), &cfg);
        assert!((v - 2.33).abs() < 0.01, "got {v}");
    }

    #[test]
    fn out_of_range_code_saturates() {
        let cfg = SystemConfig::default();
        assert!(voltage_from_raw(u16::MAX, &cfg) <= cfg.vref);
    }
}
