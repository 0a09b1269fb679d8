//! Character display support
//!
//! - **`hd44780`**: `CharacterDisplay` adapter over `hd44780-driver`
//! - **`rows`**: the fixed texts shown on the 16x2 panel

pub mod hd44780;
pub mod rows;

pub use hd44780::{cursor_address, Hd44780, Hd44780Pins};
pub use rows::{reading_row, ALERT_TEXT, BLANK_ROW, CONNECTED_TEXT, CONNECTING_TEXT, ROW_WIDTH};
