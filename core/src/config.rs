//! Compile-time configuration defaults

/// Readings strictly above this raise the alarm
pub const ALERT_THRESHOLD_C: f32 = 40.0;

/// Buzzer frequency while alarming
pub const ALERT_TONE_HZ: u32 = 1000;

/// Control loop period
pub const POLL_PERIOD_MS: u32 = 1000;

/// Remote store key the reading is mirrored to
pub const TEMPERATURE_PATH: &str = "/temperature";

/// Diagnostic serial baud rate
pub const SERIAL_BAUD: u32 = 115_200;

/// Control loop configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorConfig {
    /// Alarm threshold in Celsius (exclusive)
    pub alert_threshold_c: f32,
    /// Buzzer frequency in Hz
    pub alert_tone_hz: u32,
    /// Delay between two cycles
    pub poll_period_ms: u32,
    /// Store path for the current reading
    pub store_path: &'static str,
    /// Bus index of the sensor to read
    pub sensor_index: u8,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            alert_threshold_c: ALERT_THRESHOLD_C,
            alert_tone_hz: ALERT_TONE_HZ,
            poll_period_ms: POLL_PERIOD_MS,
            store_path: TEMPERATURE_PATH,
            sensor_index: 0,
        }
    }
}

/// Startup configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootConfig {
    /// Settle time before the display is cleared
    pub display_settle_ms: u32,
    /// Interval between two link status polls
    pub connect_poll_ms: u32,
    /// Pause after the link came up, so the message stays readable
    pub connected_hold_ms: u32,
    /// Give up waiting for the link after this long (`None` waits forever)
    pub connect_timeout_ms: Option<u32>,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            display_settle_ms: 500,
            connect_poll_ms: 1000,
            connected_hold_ms: 1000,
            connect_timeout_ms: None,
        }
    }
}
