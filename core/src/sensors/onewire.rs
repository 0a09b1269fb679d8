//! Bit-banged one-wire bus master (standard speed)
//!
//! The pin must be open drain with an external pull-up: `set_low` pulls
//! the line down, `set_high` releases it, and `is_low` samples it.
//! Slot timings follow Maxim application note 126.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Skip ROM: address every device on the bus
pub const CMD_SKIP_ROM: u8 = 0xCC;

/// One-wire errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OneWireError {
    /// The bus pin failed to drive or sample
    Pin,
    /// The line was held low before the reset pulse (short or missing pull-up)
    BusLow,
    /// No device answered the reset pulse
    NoPresence,
    /// Received data failed its CRC
    CrcMismatch,
}

impl core::fmt::Display for OneWireError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pin => write!(f, "Bus pin error"),
            Self::BusLow => write!(f, "Bus held low"),
            Self::NoPresence => write!(f, "No device present"),
            Self::CrcMismatch => write!(f, "CRC mismatch"),
        }
    }
}

impl core::error::Error for OneWireError {}

/// One-wire bus master
pub struct OneWire<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> OneWire<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    /// Take the bus pin and release the line
    pub fn new(mut pin: P, delay: D) -> Result<Self, OneWireError> {
        pin.set_high().map_err(|_| OneWireError::Pin)?;
        Ok(Self { pin, delay })
    }

    /// Issue a reset pulse and report whether a device answered
    ///
    /// Fails with `BusLow` if the released line does not read high, since a
    /// stuck line would otherwise look like a presence pulse.
    pub fn reset(&mut self) -> Result<bool, OneWireError> {
        if !self.pin.is_high().map_err(|_| OneWireError::Pin)? {
            return Err(OneWireError::BusLow);
        }
        self.drive_low()?;
        self.delay.delay_us(480);
        self.release()?;
        self.delay.delay_us(70);
        let present = self.pin.is_low().map_err(|_| OneWireError::Pin)?;
        self.delay.delay_us(410);
        Ok(present)
    }

    /// Reset and fail with `NoPresence` if nobody answered
    pub fn reset_expect_presence(&mut self) -> Result<(), OneWireError> {
        if self.reset()? {
            Ok(())
        } else {
            Err(OneWireError::NoPresence)
        }
    }

    /// Write one time slot
    pub fn write_bit(&mut self, bit: bool) -> Result<(), OneWireError> {
        self.drive_low()?;
        if bit {
            self.delay.delay_us(6);
            self.release()?;
            self.delay.delay_us(64);
        } else {
            self.delay.delay_us(60);
            self.release()?;
            self.delay.delay_us(10);
        }
        Ok(())
    }

    /// Read one time slot
    pub fn read_bit(&mut self) -> Result<bool, OneWireError> {
        self.drive_low()?;
        self.delay.delay_us(6);
        self.release()?;
        self.delay.delay_us(9);
        let bit = self.pin.is_high().map_err(|_| OneWireError::Pin)?;
        self.delay.delay_us(55);
        Ok(bit)
    }

    /// Write a byte, least significant bit first
    pub fn write_byte(&mut self, value: u8) -> Result<(), OneWireError> {
        for i in 0..8 {
            self.write_bit(value & (1 << i) != 0)?;
        }
        Ok(())
    }

    /// Read a byte, least significant bit first
    pub fn read_byte(&mut self) -> Result<u8, OneWireError> {
        let mut value = 0u8;
        for i in 0..8 {
            if self.read_bit()? {
                value |= 1 << i;
            }
        }
        Ok(value)
    }

    /// Fill `buf` with bytes read from the bus
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<(), OneWireError> {
        for byte in buf.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(())
    }

    /// Release the pin and delay
    pub fn release_bus(self) -> (P, D) {
        (self.pin, self.delay)
    }

    fn drive_low(&mut self) -> Result<(), OneWireError> {
        self.pin.set_low().map_err(|_| OneWireError::Pin)
    }

    fn release(&mut self) -> Result<(), OneWireError> {
        self.pin.set_high().map_err(|_| OneWireError::Pin)
    }
}

/// Dallas/Maxim CRC-8 (x^8 + x^5 + x^4 + 1, reflected)
///
/// Running it over data followed by its CRC yields zero.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut byte = byte;
        for _ in 0..8 {
            let mix = (crc ^ byte) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            byte >>= 1;
        }
    }
    crc
}
