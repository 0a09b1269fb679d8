//! Diagnostic log stream
//!
//! Human-readable text lines written to a serial port (USART on the board).
//! This is the device's product log, separate from the developer `defmt`
//! output. Writes are best effort: a failing port never stalls the loop.

use core::fmt::{self, Write as _};

use heapless::String;

/// Longest line emitted in one piece; longer output is cut
pub const LINE_CAPACITY: usize = 96;

/// Line writer over any blocking `embedded_io::Write` port
pub struct SerialLog<W> {
    port: W,
}

impl<W: embedded_io::Write> SerialLog<W> {
    /// Wrap a serial port
    pub fn new(port: W) -> Self {
        Self { port }
    }

    /// Write text without ending the line
    pub fn print(&mut self, args: fmt::Arguments<'_>) {
        self.emit(args, false);
    }

    /// Write text followed by `\r\n`
    pub fn println(&mut self, args: fmt::Arguments<'_>) {
        self.emit(args, true);
    }

    /// Borrow the underlying port
    pub fn port(&self) -> &W {
        &self.port
    }

    /// Release the underlying port
    pub fn into_inner(self) -> W {
        self.port
    }

    fn emit(&mut self, args: fmt::Arguments<'_>, newline: bool) {
        let mut line: String<LINE_CAPACITY> = String::new();
        // A full buffer drops the remaining pieces; what fit is still sent.
        let _ = line.write_fmt(args);
        let _ = self.port.write_all(line.as_bytes());
        if newline {
            let _ = self.port.write_all(b"\r\n");
        }
        let _ = self.port.flush();
    }
}
