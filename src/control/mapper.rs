//! Voltage → servo angle mapping.
//!
//! Integer linear interpolation on the voltage expressed in centivolts
//! (truncated to two decimal digits), followed by a clamp to the servo range.
//! The mapping is monotonically non-decreasing and idempotent.

use crate::config::SystemConfig;

/// Integer linear re-scale of `x` from `[in_min, in_max]` to
/// `[out_min, out_max]`.  Division truncates toward zero.
pub fn rescale(x: i32, in_min: i32, in_max: i32, out_min: i32, out_max: i32) -> i32 {
    if in_max == in_min {
        return out_min;
    }
    let num = (i64::from(x) - i64::from(in_min)) * (i64::from(out_max) - i64::from(out_min));
    (num / (i64::from(in_max) - i64::from(in_min)) + i64::from(out_min)) as i32
}

/// Map a voltage in `[0, vref]` to a servo angle in
/// `[min_angle, max_angle]`.
pub fn map_to_position(voltage: f32, cfg: &SystemConfig) -> i32 {
    // Truncates toward zero; NaN becomes 0.
    let centivolts = (voltage * 100.0) as i32;
    let angle = rescale(
        centivolts,
        0,
        cfg.vref_centivolts(),
        cfg.min_angle,
        cfg.max_angle,
    );
    angle.clamp(cfg.min_angle, cfg.max_angle)
}
