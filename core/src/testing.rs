//! Fakes for unit tests

use core::cell::RefCell;
use core::convert::Infallible;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use embedded_hal::digital::{ErrorType as PinErrorType, InputPin, OutputPin};
use hal_abstractions::{
    CharacterDisplay, NetworkLink, RemoteStore, StoreError, TemperatureSource, ToneOutput,
    WifiCredentials,
};

// ---------------------------------------------------------------------------
// Delays
// ---------------------------------------------------------------------------

/// Blocking embedded-hal 0.2 delay that returns at once, for the LCD driver
pub struct NoopDelay;

impl embedded_hal_02::blocking::delay::DelayUs<u16> for NoopDelay {
    fn delay_us(&mut self, _us: u16) {}
}

impl embedded_hal_02::blocking::delay::DelayMs<u8> for NoopDelay {
    fn delay_ms(&mut self, _ms: u8) {}
}

/// Async delay recording every `delay_ms` call
///
/// A yielding delay returns `Pending` once per call so an endless future can
/// be stepped with `poll_once`.
#[derive(Default)]
pub struct TickDelay {
    pub calls: Vec<u32>,
    yielding: bool,
}

impl TickDelay {
    pub fn yielding() -> Self {
        Self {
            calls: Vec::new(),
            yielding: true,
        }
    }

    pub fn total_ms(&self) -> u32 {
        self.calls.iter().sum()
    }
}

impl embedded_hal_async::delay::DelayNs for TickDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.calls.push(ms);
        if self.yielding {
            embassy_futures::yield_now().await;
        }
    }
}

// ---------------------------------------------------------------------------
// Serial
// ---------------------------------------------------------------------------

/// Serial port capturing everything written
#[derive(Default)]
pub struct SerialSink {
    bytes: Vec<u8>,
}

impl SerialSink {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Complete lines, without terminators
    pub fn lines(&self) -> Vec<String> {
        self.text()
            .split_terminator("\r\n")
            .map(String::from)
            .collect()
    }
}

impl embedded_io::ErrorType for SerialSink {
    type Error = Infallible;
}

impl embedded_io::Write for SerialSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Character display modelled as 40-column display memory per row
pub struct FakeDisplay {
    memory: Vec<Vec<char>>,
    columns: u8,
    cursor: (usize, usize),
}

const DDRAM_ROW: usize = 40;

impl FakeDisplay {
    pub fn new(columns: u8, rows: u8) -> Self {
        Self {
            memory: (0..rows).map(|_| std::vec![' '; DDRAM_ROW]).collect(),
            columns,
            cursor: (0, 0),
        }
    }

    /// Everything written to a row, trailing blanks removed
    pub fn line(&self, row: usize) -> String {
        let text: String = self.memory[row].iter().collect();
        text.trim_end().into()
    }

    /// The columns a viewer sees
    pub fn visible(&self, row: usize) -> String {
        self.memory[row]
            .iter()
            .take(self.columns as usize)
            .collect()
    }
}

impl CharacterDisplay for FakeDisplay {
    type Error = Infallible;

    fn columns(&self) -> u8 {
        self.columns
    }

    fn rows(&self) -> u8 {
        self.memory.len() as u8
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        for row in self.memory.iter_mut() {
            row.fill(' ');
        }
        self.cursor = (0, 0);
        Ok(())
    }

    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        let row = (row as usize).min(self.memory.len() - 1);
        self.cursor = (col as usize, row);
        Ok(())
    }

    fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
        let (mut col, row) = self.cursor;
        for ch in text.chars() {
            if col < DDRAM_ROW {
                self.memory[row][col] = ch;
            }
            col += 1;
        }
        self.cursor = (col, row);
        Ok(())
    }
}

/// Tone output remembering its state and how often it was started
#[derive(Default)]
pub struct FakeTone {
    pub frequency: Option<u32>,
    pub starts: u32,
}

impl FakeTone {
    pub fn sounding(&self) -> bool {
        self.frequency.is_some()
    }
}

impl ToneOutput for FakeTone {
    fn start_tone(&mut self, frequency_hz: u32) {
        self.frequency = Some(frequency_hz);
        self.starts += 1;
    }

    fn stop_tone(&mut self) {
        self.frequency = None;
    }
}

/// Remote store recording every write, optionally failing all of them
#[derive(Default)]
pub struct FakeStore {
    calls: Vec<(String, f32)>,
    failure: Option<StoreError>,
}

impl FakeStore {
    pub fn failing(error: StoreError) -> Self {
        Self {
            calls: Vec::new(),
            failure: Some(error),
        }
    }

    pub fn writes(&self) -> Vec<f32> {
        self.calls.iter().map(|(_, v)| *v).collect()
    }

    pub fn paths_are(&self, path: &str) -> bool {
        self.calls.iter().all(|(p, _)| p == path)
    }
}

impl RemoteStore for FakeStore {
    async fn set(&mut self, path: &str, value: f32) -> Result<(), StoreError> {
        self.calls.push((path.into(), value));
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

/// Sensor replaying a fixed list of readings
pub struct FakeSensor {
    readings: VecDeque<f32>,
    pub requests: u32,
    pub indices: Vec<u8>,
}

impl FakeSensor {
    pub fn new(readings: &[f32]) -> Self {
        Self {
            readings: readings.iter().copied().collect(),
            requests: 0,
            indices: Vec::new(),
        }
    }
}

impl TemperatureSource for FakeSensor {
    async fn request_conversion(&mut self) {
        self.requests += 1;
    }

    async fn read_celsius(&mut self, index: u8) -> f32 {
        self.indices.push(index);
        self.readings
            .pop_front()
            .unwrap_or(hal_abstractions::DISCONNECTED_C)
    }
}

/// Link that comes up after a number of status polls (or never)
pub struct FakeLink {
    connect_after: Option<u32>,
    pub polls: u32,
    pub begun_with: Option<WifiCredentials>,
    pub fail_begin: bool,
}

impl FakeLink {
    pub fn connecting_after(polls: u32) -> Self {
        Self {
            connect_after: Some(polls),
            polls: 0,
            begun_with: None,
            fail_begin: false,
        }
    }

    pub fn never() -> Self {
        Self {
            connect_after: None,
            polls: 0,
            begun_with: None,
            fail_begin: false,
        }
    }
}

#[derive(Debug)]
pub struct AuthFailed;

impl NetworkLink for FakeLink {
    type Error = AuthFailed;

    async fn begin(&mut self, credentials: &WifiCredentials) -> Result<(), Self::Error> {
        self.begun_with = Some(*credentials);
        if self.fail_begin {
            Err(AuthFailed)
        } else {
            Ok(())
        }
    }

    async fn is_connected(&mut self) -> bool {
        let ready = matches!(self.connect_after, Some(n) if self.polls >= n);
        self.polls += 1;
        ready
    }
}

// ---------------------------------------------------------------------------
// LCD pins
// ---------------------------------------------------------------------------

/// embedded-hal 0.2 output pin that accepts every level, or rejects all
pub struct LcdPin {
    pub broken: bool,
}

impl LcdPin {
    pub fn bus(broken: bool) -> crate::display::Hd44780Pins<LcdPin> {
        let pin = || LcdPin { broken };
        crate::display::Hd44780Pins {
            rs: pin(),
            en: pin(),
            d4: pin(),
            d5: pin(),
            d6: pin(),
            d7: pin(),
        }
    }

    fn level(&self) -> Result<(), ()> {
        if self.broken {
            Err(())
        } else {
            Ok(())
        }
    }
}

impl embedded_hal_02::digital::v2::OutputPin for LcdPin {
    type Error = ();

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level()
    }
}

// ---------------------------------------------------------------------------
// One-wire device simulator
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq)]
enum DeviceMode {
    AwaitRom,
    AwaitFunction,
    Converting,
    Transmitting(usize),
    Idle,
}

struct SimState {
    now_us: u64,
    line_low: bool,
    low_since: u64,
    released_at: u64,
    shorted: bool,
    present: bool,
    presence_window: bool,
    short_slot_pending: bool,
    shift: u8,
    bit_count: u8,
    received: Vec<u8>,
    mode: DeviceMode,
    scratchpad: [u8; 9],
    busy_polls: u32,
}

impl SimState {
    fn finish_short_slot(&mut self) {
        if self.short_slot_pending {
            self.short_slot_pending = false;
            self.take_bit(true);
        }
    }

    fn take_bit(&mut self, bit: bool) {
        if !self.present {
            return;
        }
        if bit {
            self.shift |= 1 << self.bit_count;
        }
        self.bit_count += 1;
        if self.bit_count == 8 {
            let byte = self.shift;
            self.shift = 0;
            self.bit_count = 0;
            self.take_byte(byte);
        }
    }

    fn take_byte(&mut self, byte: u8) {
        self.received.push(byte);
        self.mode = match (self.mode, byte) {
            (DeviceMode::AwaitRom, 0xCC) => DeviceMode::AwaitFunction,
            (DeviceMode::AwaitFunction, 0x44) => DeviceMode::Converting,
            (DeviceMode::AwaitFunction, 0xBE) => DeviceMode::Transmitting(0),
            _ => DeviceMode::Idle,
        };
    }

    /// Level the device leaves on the line during a read slot
    fn output_bit(&mut self) -> bool {
        if !self.present {
            return true;
        }
        match self.mode {
            DeviceMode::Converting if self.busy_polls > 0 => {
                self.busy_polls -= 1;
                false
            }
            DeviceMode::Transmitting(bit) if bit < 72 => {
                self.mode = DeviceMode::Transmitting(bit + 1);
                self.scratchpad[bit / 8] & (1 << (bit % 8)) != 0
            }
            _ => true,
        }
    }

    fn sample(&mut self) -> bool {
        if self.shorted {
            return false;
        }
        if self.presence_window {
            self.presence_window = false;
            return !self.present;
        }
        if self.line_low {
            return false;
        }
        if self.short_slot_pending {
            // sampled inside the slot: a read; later: the slot was a write 1
            if self.now_us - self.released_at < 15 {
                self.short_slot_pending = false;
                return self.output_bit();
            }
            self.finish_short_slot();
        }
        true
    }
}

/// Single DS18B20 (or none) on a simulated open-drain line
///
/// Slots are decoded from how long the master holds the line low, using
/// the time advanced by [`SimBus::delay`].
pub struct SimBus {
    state: Rc<RefCell<SimState>>,
}

pub struct SimPin(Rc<RefCell<SimState>>);

pub struct SimDelay(Rc<RefCell<SimState>>);

impl SimBus {
    fn build(present: bool, shorted: bool, scratchpad: [u8; 9]) -> Self {
        Self {
            state: Rc::new(RefCell::new(SimState {
                now_us: 0,
                line_low: false,
                low_since: 0,
                released_at: 0,
                shorted,
                present,
                presence_window: false,
                short_slot_pending: false,
                shift: 0,
                bit_count: 0,
                received: Vec::new(),
                mode: DeviceMode::Idle,
                scratchpad,
                busy_polls: 0,
            })),
        }
    }

    pub fn with_device(scratchpad: [u8; 9]) -> Self {
        Self::build(true, false, scratchpad)
    }

    pub fn empty() -> Self {
        Self::build(false, false, [0; 9])
    }

    /// Line shorted to ground: every sample reads low
    pub fn shorted() -> Self {
        Self::build(false, true, [0; 9])
    }

    /// Read slots answered "busy" after a Convert T
    pub fn set_conversion_polls(&self, polls: u32) {
        self.state.borrow_mut().busy_polls = polls;
    }

    pub fn pin(&self) -> SimPin {
        SimPin(Rc::clone(&self.state))
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(Rc::clone(&self.state))
    }

    /// Bytes the device has received
    pub fn received(&self) -> Vec<u8> {
        let mut state = self.state.borrow_mut();
        state.finish_short_slot();
        state.received.clone()
    }
}

impl PinErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut s = self.0.borrow_mut();
        if !s.line_low {
            s.finish_short_slot();
            s.presence_window = false;
            s.line_low = true;
            s.low_since = s.now_us;
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut s = self.0.borrow_mut();
        if s.line_low {
            s.line_low = false;
            s.released_at = s.now_us;
            let held = s.now_us - s.low_since;
            if held >= 480 {
                s.presence_window = true;
                if s.present {
                    s.mode = DeviceMode::AwaitRom;
                    s.shift = 0;
                    s.bit_count = 0;
                }
            } else if held >= 15 {
                s.take_bit(false);
            } else {
                s.short_slot_pending = true;
            }
        }
        Ok(())
    }
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.0.borrow_mut().sample())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.borrow_mut().sample())
    }
}

impl embedded_hal::delay::DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().now_us += u64::from(ns / 1000);
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().now_us += u64::from(us);
    }
}

// ---------------------------------------------------------------------------
// Byte stream
// ---------------------------------------------------------------------------

/// Async stream serving a canned reply in fixed-size chunks
pub struct FakeStream {
    written: Vec<u8>,
    reply: &'static [u8],
    position: usize,
    chunk: usize,
    write_failure: Option<embedded_io_async::ErrorKind>,
}

impl FakeStream {
    pub fn replying(reply: &'static [u8], chunk: usize) -> Self {
        Self {
            written: Vec::new(),
            reply,
            position: 0,
            chunk,
            write_failure: None,
        }
    }

    pub fn failing_writes(kind: embedded_io_async::ErrorKind) -> Self {
        Self {
            written: Vec::new(),
            reply: b"",
            position: 0,
            chunk: 1,
            write_failure: Some(kind),
        }
    }

    pub fn written_text(&self) -> String {
        String::from_utf8_lossy(&self.written).into_owned()
    }
}

impl embedded_io_async::ErrorType for FakeStream {
    type Error = embedded_io_async::ErrorKind;
}

impl embedded_io_async::Read for FakeStream {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = &self.reply[self.position..];
        let n = remaining.len().min(self.chunk).min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.position += n;
        Ok(n)
    }
}

impl embedded_io_async::Write for FakeStream {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if let Some(kind) = self.write_failure {
            return Err(kind);
        }
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
