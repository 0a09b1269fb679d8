//! DS18B20 digital thermometer on a single-drop one-wire bus
//!
//! The device is addressed with Skip ROM, so only bus index 0 exists.
//! Anything that prevents a trustworthy reading (a stuck or silent bus, a
//! pin fault, a bad scratchpad, another index) reports [`DISCONNECTED_C`]
//! instead of an error.

use embedded_hal::delay::DelayNs as BlockingDelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use hal_abstractions::{TemperatureSource, DISCONNECTED_C};

use super::onewire::{crc8, OneWire, OneWireError, CMD_SKIP_ROM};
use crate::wait::{wait_until, ReadyCheck, WaitPolicy};

const CMD_CONVERT_T: u8 = 0x44;
const CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// Scratchpad length including CRC
pub const SCRATCHPAD_LEN: usize = 9;

/// Longest conversion time (12-bit resolution)
pub const MAX_CONVERSION_MS: u32 = 750;

/// Conversion status poll interval
const CONVERSION_POLL_MS: u32 = 10;

/// DS18B20 driver
///
/// `D` times the bus slots (blocking, microseconds); `A` sleeps while the
/// conversion runs.
pub struct Ds18b20<P, D, A> {
    bus: OneWire<P, D>,
    delay: A,
}

impl<P, D, A> Ds18b20<P, D, A>
where
    P: InputPin + OutputPin,
    D: BlockingDelayNs,
    A: DelayNs,
{
    pub fn new(bus: OneWire<P, D>, delay: A) -> Self {
        Self { bus, delay }
    }

    /// Start a conversion and wait for the device to finish it
    pub async fn convert(&mut self) -> Result<(), OneWireError> {
        self.bus.reset_expect_presence()?;
        self.bus.write_byte(CMD_SKIP_ROM)?;
        self.bus.write_byte(CMD_CONVERT_T)?;

        let mut check = ConversionDone {
            bus: &mut self.bus,
            fault: None,
        };
        // A timed out conversion still leaves the previous value readable.
        let _ = wait_until(
            &mut check,
            &mut self.delay,
            WaitPolicy::bounded(CONVERSION_POLL_MS, MAX_CONVERSION_MS),
        )
        .await;
        match check.fault {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Read and check the scratchpad, then decode it
    pub fn read_temperature(&mut self) -> Result<f32, OneWireError> {
        self.bus.reset_expect_presence()?;
        self.bus.write_byte(CMD_SKIP_ROM)?;
        self.bus.write_byte(CMD_READ_SCRATCHPAD)?;
        let mut scratchpad = [0u8; SCRATCHPAD_LEN];
        self.bus.read_bytes(&mut scratchpad)?;
        decode_scratchpad(&scratchpad).ok_or(OneWireError::CrcMismatch)
    }

    /// Release the bus and delay
    pub fn release(self) -> (OneWire<P, D>, A) {
        (self.bus, self.delay)
    }
}

impl<P, D, A> TemperatureSource for Ds18b20<P, D, A>
where
    P: InputPin + OutputPin,
    D: BlockingDelayNs,
    A: DelayNs,
{
    async fn request_conversion(&mut self) {
        // An absent device shows up on the following read.
        let _ = self.convert().await;
    }

    async fn read_celsius(&mut self, index: u8) -> f32 {
        if index != 0 {
            return DISCONNECTED_C;
        }
        self.read_temperature().unwrap_or(DISCONNECTED_C)
    }
}

/// A conversion in progress holds the bus low on read slots
struct ConversionDone<'a, P, D> {
    bus: &'a mut OneWire<P, D>,
    fault: Option<OneWireError>,
}

impl<P, D> ReadyCheck for ConversionDone<'_, P, D>
where
    P: InputPin + OutputPin,
    D: BlockingDelayNs,
{
    async fn is_ready(&mut self) -> bool {
        match self.bus.read_bit() {
            Ok(done) => done,
            Err(e) => {
                self.fault = Some(e);
                true
            }
        }
    }
}

/// Decode a scratchpad into Celsius, `None` if its CRC does not match
///
/// An all-zero scratchpad passes the CRC but is what a line stuck low reads,
/// so it is rejected too. Undefined low bits at 9, 10 and 11-bit resolution
/// are masked off.
pub fn decode_scratchpad(scratchpad: &[u8; SCRATCHPAD_LEN]) -> Option<f32> {
    if scratchpad.iter().all(|&b| b == 0) {
        return None;
    }
    if crc8(&scratchpad[..8]) != scratchpad[8] {
        return None;
    }
    let raw = i16::from_le_bytes([scratchpad[0], scratchpad[1]]);
    let resolution_bits = (scratchpad[4] >> 5) & 0x03;
    let mask: i16 = match resolution_bits {
        0 => !0x07,
        1 => !0x03,
        2 => !0x01,
        _ => !0x00,
    };
    Some(f32::from(raw & mask) / 16.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{SimBus, TickDelay};
    use embassy_futures::block_on;

    const POWER_ON: [u8; 9] = [0x50, 0x05, 0x4B, 0x46, 0x7F, 0xFF, 0x0C, 0x10, 0x1C];
    const ROOM: [u8; 9] = [0x91, 0x01, 0x4B, 0x46, 0x7F, 0xFF, 0x0F, 0x10, 0x25];
    const BELOW_ZERO: [u8; 9] = [0x5E, 0xFF, 0x4B, 0x46, 0x7F, 0xFF, 0x02, 0x10, 0xB6];
    const ROOM_9_BIT: [u8; 9] = [0x91, 0x01, 0x4B, 0x46, 0x1F, 0xFF, 0x0F, 0x10, 0x00];

    #[test]
    fn test_decode_power_on_value() {
        assert_eq!(decode_scratchpad(&POWER_ON), Some(85.0));
    }

    #[test]
    fn test_decode_positive_fraction() {
        assert_eq!(decode_scratchpad(&ROOM), Some(25.0625));
    }

    #[test]
    fn test_decode_negative() {
        assert_eq!(decode_scratchpad(&BELOW_ZERO), Some(-10.125));
    }

    #[test]
    fn test_decode_masks_low_resolution_bits() {
        let mut pad = ROOM_9_BIT;
        pad[8] = crc8(&pad[..8]);
        assert_eq!(decode_scratchpad(&pad), Some(25.0));
    }

    #[test]
    fn test_decode_rejects_bad_crc() {
        let mut pad = ROOM;
        pad[8] ^= 0xFF;
        assert_eq!(decode_scratchpad(&pad), None);
    }

    #[test]
    fn test_decode_rejects_all_zero() {
        assert_eq!(decode_scratchpad(&[0; 9]), None);
    }

    #[test]
    fn test_request_then_read() {
        let sim = SimBus::with_device(ROOM);
        sim.set_conversion_polls(3);
        let bus = OneWire::new(sim.pin(), sim.delay()).unwrap();
        let mut sensor = Ds18b20::new(bus, TickDelay::default());

        block_on(sensor.request_conversion());
        let celsius = block_on(sensor.read_celsius(0));

        assert_eq!(celsius, 25.0625);
        assert_eq!(
            sim.received(),
            [CMD_SKIP_ROM, CMD_CONVERT_T, CMD_SKIP_ROM, CMD_READ_SCRATCHPAD]
        );
        let (_, delay) = sensor.release();
        assert_eq!(delay.calls, [CONVERSION_POLL_MS; 3]);
    }

    #[test]
    fn test_missing_device_reads_sentinel() {
        let sim = SimBus::empty();
        let bus = OneWire::new(sim.pin(), sim.delay()).unwrap();
        let mut sensor = Ds18b20::new(bus, TickDelay::default());

        block_on(sensor.request_conversion());
        assert_eq!(block_on(sensor.read_celsius(0)), DISCONNECTED_C);
    }

    #[test]
    fn test_shorted_bus_reads_sentinel() {
        let sim = SimBus::shorted();
        let bus = OneWire::new(sim.pin(), sim.delay()).unwrap();
        let mut sensor = Ds18b20::new(bus, TickDelay::default());

        block_on(sensor.request_conversion());
        assert_eq!(sensor.read_temperature(), Err(OneWireError::BusLow));
        assert_eq!(block_on(sensor.read_celsius(0)), DISCONNECTED_C);
    }

    #[test]
    fn test_other_index_reads_sentinel() {
        let sim = SimBus::with_device(ROOM);
        let bus = OneWire::new(sim.pin(), sim.delay()).unwrap();
        let mut sensor = Ds18b20::new(bus, TickDelay::default());
        assert_eq!(block_on(sensor.read_celsius(1)), DISCONNECTED_C);
    }
}
