//! Character display port

/// Port for a character display with a fixed grid (e.g. 16x2 HD44780)
///
/// Writes land at the cursor and advance it. There is no scrolling and no
/// buffering beyond the device's own memory, so callers overwrite stale
/// characters themselves.
pub trait CharacterDisplay {
    /// Error raised by the underlying bus
    type Error: core::fmt::Debug;

    /// Number of visible columns per row
    fn columns(&self) -> u8;

    /// Number of rows
    fn rows(&self) -> u8;

    /// Blank the whole display and home the cursor
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Move the cursor to `col` on `row` (both zero based)
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error>;

    /// Write text at the cursor
    fn write_str(&mut self, text: &str) -> Result<(), Self::Error>;
}
