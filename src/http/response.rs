//! Fixed status page.
//!
//! One template, rendered from `(voltage, position)`.  The page refreshes
//! itself once per second.

use core::fmt::{self, Write};

const STATUS_LINE: &str = "HTTP/1.1 200 OK";
const CONTENT_TYPE: &str = "Content-Type: text/html; charset=utf-8";
const CONNECTION: &str = "Connection: close";

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; background: #f0f0f0; }\r\n\
.container { max-width: 600px; margin: 0 auto; background: white; padding: 30px; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }\r\n\
h1 { color: #00979D; text-align: center; }\r\n\
.voltage { font-size: 72px; font-weight: bold; text-align: center; color: #00979D; margin: 30px 0; }\r\n\
.servo { font-size: 48px; font-weight: bold; text-align: center; color: #FF6B35; margin: 20px 0; }\r\n\
.info { text-align: center; color: #666; margin-top: 20px; }\r\n\
.label { text-align: center; color: #999; font-size: 14px; margin-bottom: 10px; }\r\n";

/// Write the full response (status line, headers, HTML body) to `w`.
pub fn write_response(w: &mut impl Write, voltage: f32, position: i32) -> fmt::Result {
    write!(w, "{STATUS_LINE}\r\n{CONTENT_TYPE}\r\n{CONNECTION}\r\n\r\n")?;

    w.write_str("<!DOCTYPE html>\r\n<html><head>\r\n")?;
    w.write_str("<meta name='viewport' content='width=device-width, initial-scale=1'>\r\n")?;
    w.write_str("<meta http-equiv='refresh' content='1'>\r\n")?;
    w.write_str("<title>Voltage A0</title>\r\n<style>\r\n")?;
    w.write_str(STYLE)?;
    w.write_str("</style>\r\n</head><body>\r\n<div class='container'>\r\n")?;
    w.write_str("<h1>Arduino Readings</h1>\r\n")?;
    w.write_str("<div class='label'>VOLTAGE (A0)</div>\r\n")?;
    write!(w, "<div class='voltage'>{voltage:.2} V</div>\r\n")?;
    w.write_str("<div class='label'>SERVO ANGLE</div>\r\n")?;
    write!(w, "<div class='servo'>{position} &deg;</div>\r\n")?;
    w.write_str("<div class='info'>Auto refresh: 1 second</div>\r\n")?;
    w.write_str("</div>\r\n</body></html>\r\n")
}

/// Render the response into an owned buffer.
pub fn render_page(voltage: f32, position: i32) -> String {
    let mut page = String::with_capacity(2048);
    // Writing into a String cannot fail.
    let _ = write_response(&mut page, voltage, position);
    page
}
