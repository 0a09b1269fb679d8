//! HD44780 character LCD on a 4-bit parallel bus
//!
//! The controller itself is driven by `hd44780-driver`. This adapter owns the
//! delay the driver wants on every call and maps the panel geometry onto
//! display memory addresses for [`CharacterDisplay`].

use embedded_hal_02::blocking::delay::{DelayMs, DelayUs};
use embedded_hal_02::digital::v2::OutputPin;
use hal_abstractions::CharacterDisplay;
use hd44780_driver::bus::{DataBus, FourBitBus};
use hd44780_driver::error::Error;
use hd44780_driver::{Cursor, CursorBlink, Display, DisplayMode, HD44780};

/// DDRAM start address of each row
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Character ROM A00 code for the degree sign
const DEGREE_SIGN: u8 = 0xDF;

/// Control and data lines of a 4-bit bus
pub struct Hd44780Pins<P> {
    pub rs: P,
    pub en: P,
    pub d4: P,
    pub d5: P,
    pub d6: P,
    pub d7: P,
}

/// Character display over an `hd44780-driver` instance
pub struct Hd44780<B: DataBus, D> {
    lcd: HD44780<B>,
    delay: D,
    columns: u8,
    rows: u8,
}

impl<P, D> Hd44780<FourBitBus<P, P, P, P, P, P>, D>
where
    P: OutputPin,
    D: DelayUs<u16> + DelayMs<u8>,
{
    /// Bring up a panel wired in 4-bit mode with RW tied to ground
    pub fn new_4bit(
        pins: Hd44780Pins<P>,
        mut delay: D,
        columns: u8,
        rows: u8,
    ) -> Result<Self, Error> {
        let Hd44780Pins {
            rs,
            en,
            d4,
            d5,
            d6,
            d7,
        } = pins;
        let lcd = HD44780::new_4bit(rs, en, d4, d5, d6, d7, &mut delay)?;
        Self::new(lcd, delay, columns, rows)
    }
}

impl<B, D> Hd44780<B, D>
where
    B: DataBus,
    D: DelayUs<u16> + DelayMs<u8>,
{
    /// Wrap an already created driver
    ///
    /// Leaves the display on, cleared, with the cursor hidden.
    pub fn new(mut lcd: HD44780<B>, mut delay: D, columns: u8, rows: u8) -> Result<Self, Error> {
        lcd.reset(&mut delay)?;
        lcd.clear(&mut delay)?;
        lcd.set_display_mode(
            DisplayMode {
                display: Display::On,
                cursor_visibility: Cursor::Invisible,
                cursor_blink: CursorBlink::Off,
            },
            &mut delay,
        )?;
        Ok(Self {
            lcd,
            delay,
            columns,
            rows: rows.clamp(1, ROW_OFFSETS.len() as u8),
        })
    }

    /// Give back the driver and delay
    pub fn release(self) -> (HD44780<B>, D) {
        (self.lcd, self.delay)
    }
}

/// Display memory address of `col` on `row`; rows past the last are clamped
pub fn cursor_address(col: u8, row: u8, rows: u8) -> u8 {
    let last = rows.clamp(1, ROW_OFFSETS.len() as u8) - 1;
    ROW_OFFSETS[row.min(last) as usize].wrapping_add(col)
}

/// Map a char to the A00 character ROM
fn rom_code(ch: char) -> u8 {
    match ch {
        ' '..='}' => ch as u8,
        '°' => DEGREE_SIGN,
        _ => b'?',
    }
}

impl<B, D> CharacterDisplay for Hd44780<B, D>
where
    B: DataBus,
    D: DelayUs<u16> + DelayMs<u8>,
{
    type Error = Error;

    fn columns(&self) -> u8 {
        self.columns
    }

    fn rows(&self) -> u8 {
        self.rows
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.lcd.clear(&mut self.delay)
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        let address = cursor_address(col, row, self.rows);
        self.lcd.set_cursor_pos(address, &mut self.delay)
    }

    fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
        for ch in text.chars() {
            self.lcd.write_byte(rom_code(ch), &mut self.delay)?;
        }
        Ok(())
    }
}
