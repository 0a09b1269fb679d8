//! Hardware abstraction traits for the temperature monitor firmware
//!
//! This crate defines the capabilities the control loop is generic over.
//! BSPs implement these traits; tests implement them with fakes.
//!
//! - **`sensor`**: one-wire style temperature source (request, then read)
//! - **`display`**: fixed-size character display
//! - **`tone`**: tone-capable alert output
//! - **`network`**: wireless link bring-up and status polling
//! - **`store`**: remote key-value store client

#![no_std]
#![deny(unsafe_code)]
#![deny(warnings)]

pub mod display;
pub mod network;
pub mod sensor;
pub mod store;
pub mod tone;

pub use display::CharacterDisplay;
pub use network::{NetworkLink, WifiCredentials};
pub use sensor::{TemperatureSource, DISCONNECTED_C};
pub use store::{RemoteStore, StoreError, STORE_MESSAGE_CAPACITY};
pub use tone::ToneOutput;
