//! Temperature source port

use core::future::Future;

/// Reading reported for a sensor that did not answer on the bus.
///
/// Matches the value common one-wire temperature libraries report, so an
/// unplugged sensor shows up as an ordinary (very cold) reading.
pub const DISCONNECTED_C: f32 = -127.0;

/// Port for a digital temperature sensor bus
///
/// Sampling is split in two steps: start a conversion on every device on
/// the bus, then fetch the converted value of one device by index. There is
/// no error path; implementations report [`DISCONNECTED_C`] when a device is
/// absent or its data cannot be trusted.
pub trait TemperatureSource {
    /// Start a temperature conversion and wait until it has completed
    fn request_conversion(&mut self) -> impl Future<Output = ()>;

    /// Fetch the last converted value, in Celsius, of the device at `index`
    fn read_celsius(&mut self, index: u8) -> impl Future<Output = f32>;
}
