//! 12×8 monochrome LED matrix (HT16K33 backpack on I²C).
//!
//! Drawing happens in a RAM [`Framebuffer`] that implements
//! `embedded_graphics::DrawTarget`; [`LedMatrix::flush`] pushes the whole
//! frame to the controller in one I²C transaction.
//!
//! Text is drawn with the 4×6 mono font from the top-left corner, one pixel
//! down.  Anything past column 12 is clipped.

use embedded_graphics::mono_font::ascii::FONT_4X6;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::i2c::I2c;

pub const WIDTH: u32 = 12;
pub const HEIGHT: u32 = 8;

/// Where text starts.
const TEXT_ORIGIN: Point = Point::new(0, 1);

// HT16K33 commands
const CMD_OSCILLATOR_ON: u8 = 0x21;
const CMD_DISPLAY_ON: u8 = 0x81;
const CMD_BRIGHTNESS: u8 = 0xE0;
const DEFAULT_BRIGHTNESS: u8 = 8;
const RAM_START: u8 = 0x00;

// ───────────────────────────────────────────────────────────────
// Framebuffer
// ───────────────────────────────────────────────────────────────

/// One bit per LED; bit `x` of `rows[y]` is column `x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Framebuffer {
    rows: [u16; HEIGHT as usize],
}

impl Framebuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_lit(&self, x: u32, y: u32) -> bool {
        x < WIDTH && y < HEIGHT && self.rows[y as usize] & (1 << x) != 0
    }

    pub fn lit_count(&self) -> u32 {
        self.rows.iter().map(|r| r.count_ones()).sum()
    }

    pub fn rows(&self) -> &[u16; HEIGHT as usize] {
        &self.rows
    }

    /// Clear, then draw `text` at the text origin.
    pub fn draw_text(&mut self, text: &str) {
        self.rows = [0; HEIGHT as usize];
        let style = MonoTextStyle::new(&FONT_4X6, BinaryColor::On);
        // Infallible target.
        let _ = Text::with_baseline(text, TEXT_ORIGIN, style, Baseline::Top).draw(self);
    }

    /// Controller RAM image: address byte, then low/high byte per row.
    fn encode(&self) -> [u8; 1 + 2 * HEIGHT as usize] {
        let mut out = [0u8; 1 + 2 * HEIGHT as usize];
        out[0] = RAM_START;
        for (i, row) in self.rows.iter().enumerate() {
            let [lo, hi] = row.to_le_bytes();
            out[1 + 2 * i] = lo;
            out[2 + 2 * i] = hi;
        }
        out
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(p.x), u32::try_from(p.y)) else {
                continue;
            };
            if x >= WIDTH || y >= HEIGHT {
                continue;
            }
            let bit = 1u16 << x;
            match color {
                BinaryColor::On => self.rows[y as usize] |= bit,
                BinaryColor::Off => self.rows[y as usize] &= !bit,
            }
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Device
// ───────────────────────────────────────────────────────────────

pub struct LedMatrix<I: I2c> {
    i2c: I,
    addr: u8,
    frame: Framebuffer,
    /// Oscillator and display are on.  Cleared whenever a wake-up fails.
    awake: bool,
}

impl<I: I2c> LedMatrix<I> {
    pub fn new(i2c: I, addr: u8) -> Self {
        Self {
            i2c,
            addr,
            frame: Framebuffer::new(),
            awake: false,
        }
    }

    /// Wake the controller and switch the display on, blank.
    pub fn init(&mut self) -> Result<(), I::Error> {
        self.frame = Framebuffer::new();
        self.wake()?;
        self.flush()
    }

    /// Replace the frame with `text` and push it.  A controller that never
    /// woke up (bus down at boot) is woken first.
    pub fn show_text(&mut self, text: &str) -> Result<(), I::Error> {
        self.frame.draw_text(text);
        if !self.awake {
            self.wake()?;
        }
        self.flush()
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    fn wake(&mut self) -> Result<(), I::Error> {
        self.awake = false;
        self.i2c.write(self.addr, &[CMD_OSCILLATOR_ON])?;
        self.i2c.write(self.addr, &[CMD_BRIGHTNESS | DEFAULT_BRIGHTNESS])?;
        self.i2c.write(self.addr, &[CMD_DISPLAY_ON])?;
        self.awake = true;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), I::Error> {
        self.i2c.write(self.addr, &self.frame.encode())
    }

    pub fn frame(&self) -> &Framebuffer {
        &self.frame
    }

    pub fn bus(&self) -> &I {
        &self.i2c
    }

    pub fn i2c_mut(&mut self) -> &mut I {
        &mut self.i2c
    }
}
