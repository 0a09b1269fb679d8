//! Fixed row texts for the 16x2 panel

use core::fmt::Write as _;

use heapless::String;

/// Visible columns per row
pub const ROW_WIDTH: usize = 16;

/// Second row while alarming (one column wider than the panel; the last
/// character lands in off-screen display memory)
pub const ALERT_TEXT: &str = "Alert! Temp > 40C";

/// Second row when not alarming
pub const BLANK_ROW: &str = "                ";

/// First row while waiting for the network
pub const CONNECTING_TEXT: &str = "Connecting...   ";

/// Second row once the network is up
pub const CONNECTED_TEXT: &str = "WiFi Connected  ";

/// First row for a reading: `Temp: <value> C`, padded or cut to the row
///
/// Exactly [`ROW_WIDTH`] characters so a shorter value overwrites every
/// column of a longer one.
pub fn reading_row(celsius: f32) -> String<ROW_WIDTH> {
    let mut full: String<32> = String::new();
    let _ = write!(full, "Temp: {:.2} C   ", celsius);

    let mut row = String::new();
    for ch in full.chars().take(ROW_WIDTH) {
        let _ = row.push(ch);
    }
    while row.len() < ROW_WIDTH {
        let _ = row.push(' ');
    }
    row
}
