#![deny(unsafe_code)]
#![deny(warnings)]
//! Board configuration
//!
//! Everything here is fixed at build time. Credentials and the database URL
//! come from the build environment (`WIFI_SSID`, `WIFI_PASSWORD`,
//! `DATABASE_URL`) and fall back to placeholders.
//!
//! ## Pin map (Feather silkscreen in brackets)
//!
//! | Function          | Pin  |       |
//! |-------------------|------|-------|
//! | LCD RS            | PA5  | [A1]  |
//! | LCD EN            | PA6  | [A2]  |
//! | LCD D4..D7        | PA7, PC4, PC5, PB9 | [A3, A4, A5, D10] |
//! | DS18B20 data      | PA4  | [A0]  |
//! | Buzzer (TIM4 CH3) | PB8  | [D9]  |
//! | Console TX        | PB10 | [TX]  |
//! | ESP32 SPI2        | PB13, PB15, PB14 | [SCK, MO, MI] |
//! | ESP32 CS          | PC6  | [D6]  |
//! | ESP32 reset       | PC3  | [D11] |
//! | ESP32 handshake   | PC2  | [D12] |
//! | ESP32 data ready  | PC7  | [D5]  |

use hal_abstractions::WifiCredentials;
use thermo_core::config::SERIAL_BAUD;

/// Character LCD geometry
pub const LCD_COLUMNS: u8 = 16;
pub const LCD_ROWS: u8 = 2;

const fn env_or(value: Option<&'static str>, fallback: &'static str) -> &'static str {
    match value {
        Some(v) => v,
        None => fallback,
    }
}

/// Wireless network to join
#[derive(Clone)]
pub struct WifiConfig {
    pub ssid: &'static str,
    pub password: &'static str,
}

impl WifiConfig {
    pub fn credentials(&self) -> WifiCredentials {
        WifiCredentials {
            ssid: self.ssid,
            password: self.password,
        }
    }
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: env_or(option_env!("WIFI_SSID"), "your-ssid"),
            password: env_or(option_env!("WIFI_PASSWORD"), "your-password"),
        }
    }
}

/// Remote store client configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Realtime Database URL, e.g. `https://<project>-default-rtdb.firebaseio.com/`
    pub database_url: &'static str,
    /// Verify the server certificate (not supported yet, must stay false)
    pub verify_server: bool,
    /// Budget for one complete write (DNS, connect, handshake, request)
    pub request_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: env_or(
                option_env!("DATABASE_URL"),
                "https://your-project-default-rtdb.firebaseio.com/",
            ),
            verify_server: false,
            request_timeout_ms: 15_000,
        }
    }
}

/// Diagnostic console
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: SERIAL_BAUD,
        }
    }
}
