//! Small periodic tasks: status indicator and display updater.

use core::fmt::Write;

use super::ports::{DisplayPort, IndicatorPort};

/// Blinking status LED.  Independent of all sensor data.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    on: bool,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self { on: false }
    }

    /// Flip the state and drive the output.  Returns the new state.
    pub fn tick(&mut self, out: &mut impl IndicatorPort) -> bool {
        self.on = !self.on;
        out.set_state(self.on);
        self.on
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

/// Display text for a voltage, e.g. `"2.33V"`.
pub fn format_voltage(voltage: f32) -> heapless::String<16> {
    let mut text = heapless::String::new();
    // 16 bytes fit any voltage the ADC range can produce.
    let _ = write!(text, "{voltage:.2}V");
    text
}

/// Draw the voltage on the display.
pub fn render_voltage(voltage: f32, display: &mut impl DisplayPort) {
    display.render_text(&format_voltage(voltage));
}
