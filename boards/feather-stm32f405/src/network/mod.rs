#![deny(warnings)]
//! Network side of the firmware
//!
//! - **`wifi`**: esp-hosted bring-up and the `NetworkLink` adapter
//! - **`store`**: Realtime Database client implementing `RemoteStore`
//! - **`socket`**: Async TCP socket wrapper for embedded-io-async
//! - **`tls`**: TLS 1.3 crypto provider and connection buffers
//! - **`error`**: Transport error enum and its store error codes
//!
//! The embassy-net stack and the esp-hosted runner are owned by the monitor
//! task; these types only borrow the stack handle.

pub mod error;
pub mod socket;
pub mod store;
pub mod tls;
pub mod wifi;

pub use store::FirebaseStore;
pub use wifi::WifiLink;
