//! Temperature control loop
//!
//! One cycle: sample the sensor, log and display the reading, switch the
//! alarm, mirror the value to the remote store when it changed, then sleep.
//! The loop owns every device it drives; nothing else touches them.
//!
//! ## Change detection
//!
//! A write is attempted iff the reading differs from the last *attempted*
//! write (exact float comparison, no hysteresis). The remembered value
//! advances even when the write fails, so a failed value is only retried
//! once the reading moves away and back.

use embedded_hal_async::delay::DelayNs;
use hal_abstractions::{CharacterDisplay, RemoteStore, StoreError, TemperatureSource, ToneOutput};

use crate::config::MonitorConfig;
use crate::console::SerialLog;
use crate::display::{reading_row, ALERT_TEXT, BLANK_ROW};

/// State carried from one cycle to the next
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorState {
    /// Value of the most recent write attempt (0.0 before the first)
    pub previous_c: f32,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self { previous_c: 0.0 }
    }
}

/// What one cycle did
#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    pub reading_c: f32,
    pub alerting: bool,
    /// `None` when the reading was unchanged and no write was attempted
    pub write: Option<Result<(), StoreError>>,
}

/// Strictly above the threshold
pub fn is_alert(reading_c: f32, threshold_c: f32) -> bool {
    reading_c > threshold_c
}

/// Exact inequality; NaN always counts as changed
#[allow(clippy::float_cmp)]
pub fn needs_write(current_c: f32, previous_c: f32) -> bool {
    current_c != previous_c
}

/// The control loop and the devices it owns
pub struct Monitor<S, L, T, R, W> {
    sensor: S,
    display: L,
    tone: T,
    store: R,
    log: SerialLog<W>,
    config: MonitorConfig,
    state: MonitorState,
}

impl<S, L, T, R, W> Monitor<S, L, T, R, W>
where
    S: TemperatureSource,
    L: CharacterDisplay,
    T: ToneOutput,
    R: RemoteStore,
    W: embedded_io::Write,
{
    pub fn new(
        sensor: S,
        display: L,
        tone: T,
        store: R,
        log: SerialLog<W>,
        config: MonitorConfig,
    ) -> Self {
        Self {
            sensor,
            display,
            tone,
            store,
            log,
            config,
            state: MonitorState::default(),
        }
    }

    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn display(&self) -> &L {
        &self.display
    }

    pub fn tone(&self) -> &T {
        &self.tone
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    pub fn log(&self) -> &SerialLog<W> {
        &self.log
    }

    /// Run one cycle without the trailing sleep
    pub async fn step(&mut self) -> Cycle {
        self.sensor.request_conversion().await;
        let reading_c = self.sensor.read_celsius(self.config.sensor_index).await;
        self.log.println(format_args!("Temperature: {:.2}", reading_c));

        let row = reading_row(reading_c);
        self.write_row(0, row.as_str());

        let alerting = is_alert(reading_c, self.config.alert_threshold_c);
        if alerting {
            self.write_row(1, ALERT_TEXT);
            self.tone.start_tone(self.config.alert_tone_hz);
            self.log.println(format_args!(
                "Temperature exceeded {}°C, turning buzzer ON!",
                self.config.alert_threshold_c
            ));
        } else {
            self.tone.stop_tone();
            self.write_row(1, BLANK_ROW);
        }

        let write = if needs_write(reading_c, self.state.previous_c) {
            let outcome = self.publish(reading_c).await;
            self.state.previous_c = reading_c;
            Some(outcome)
        } else {
            None
        };

        Cycle {
            reading_c,
            alerting,
            write,
        }
    }

    /// Cycle forever at the configured period
    pub async fn run<D: DelayNs>(&mut self, delay: &mut D) -> ! {
        loop {
            self.step().await;
            delay.delay_ms(self.config.poll_period_ms).await;
        }
    }

    async fn publish(&mut self, reading_c: f32) -> Result<(), StoreError> {
        self.log.print(format_args!("Saving temperature value... "));
        let outcome = self.store.set(self.config.store_path, reading_c).await;
        match &outcome {
            Ok(()) => self.log.println(format_args!("ok")),
            Err(e) => self
                .log
                .println(format_args!("Error {}: {}", e.code(), e.message())),
        }
        outcome
    }

    fn write_row(&mut self, row: u8, text: &str) {
        // The panel has no error channel to the user; a bus fault only
        // costs this frame.
        let _ = self
            .display
            .set_cursor(0, row)
            .and_then(|()| self.display.write_str(text));
    }
}
