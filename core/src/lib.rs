//! Platform-agnostic core logic for the temperature monitor firmware
//!
//! This crate contains the control loop and the drivers that only need
//! `embedded-hal` traits. It has NO board dependencies and its tests run on
//! the host.
//!
//! - **`monitor`**: the read / display / alert / publish loop
//! - **`boot`**: one-shot network bring-up before the loop starts
//! - **`wait`**: poll-until-ready helper with optional timeout
//! - **`display`**: HD44780 adapter over `hd44780-driver` and fixed row texts
//! - **`sensors`**: one-wire bus and DS18B20 driver
//! - **`store`**: HTTP PUT codec for a Realtime-Database style REST store
//! - **`console`**: line-oriented diagnostic log over a serial port
//! - **`config`**: compile-time defaults

#![no_std]
#![deny(unsafe_code)]
#![deny(warnings)]

#[cfg(test)]
extern crate std;

pub mod boot;
pub mod config;
pub mod console;
pub mod display;
pub mod monitor;
pub mod sensors;
pub mod store;
pub mod wait;

#[cfg(test)]
mod testing;

pub use boot::{connect_network, prepare_display};
pub use config::{BootConfig, MonitorConfig};
pub use console::SerialLog;
pub use monitor::{Cycle, Monitor, MonitorState};
