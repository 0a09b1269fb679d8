//! Remote key-value store port

use core::future::Future;
use heapless::String;

/// Capacity of the human-readable message carried by [`StoreError`]
pub const STORE_MESSAGE_CAPACITY: usize = 48;

/// Failure reported by a remote store write
///
/// Mirrors what hosted database clients expose after a failed call: a
/// numeric code (HTTP status for server replies, negative for transport
/// failures) and a short message. Messages longer than
/// [`STORE_MESSAGE_CAPACITY`] are truncated on a character boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StoreError {
    code: i16,
    message: String<STORE_MESSAGE_CAPACITY>,
}

impl StoreError {
    /// Create an error from a code and message
    pub fn new(code: i16, message: &str) -> Self {
        let mut text = String::new();
        for ch in message.chars() {
            if text.push(ch).is_err() {
                break;
            }
        }
        Self {
            code,
            message: text,
        }
    }

    /// Numeric error code
    pub fn code(&self) -> i16 {
        self.code
    }

    /// Human-readable description
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl core::error::Error for StoreError {}

/// Port for a remote key-value store
///
/// A `set` is a single blocking round trip. Implementations do not retry
/// or queue; the caller decides what a failure means.
pub trait RemoteStore {
    /// Store `value` at `path` (e.g. `/temperature`), replacing what was there
    fn set(&mut self, path: &str, value: f32) -> impl Future<Output = Result<(), StoreError>>;
}
