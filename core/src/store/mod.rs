//! Realtime-Database style REST store codec
//!
//! The board owns the transport (TCP + TLS); this module only turns a
//! `set(path, value)` into an HTTP/1.1 exchange over any
//! `embedded-io-async` stream and maps the outcome to a `StoreError`.

pub mod http;
pub mod url;

pub use http::{encode_put, parse_status_line, put_value, HttpError, StatusLine};
pub use url::{parse_database_url, DatabaseEndpoint, UrlError};

/// Error codes for failures that never produced an HTTP status
pub mod codes {
    /// Socket could not be opened or the peer went away
    pub const CONNECTION_FAILED: i16 = -1;
    /// Host name did not resolve
    pub const DNS_FAILED: i16 = -2;
    /// TLS handshake failed
    pub const TLS_FAILED: i16 = -3;
    /// No answer in time
    pub const TIMEOUT: i16 = -4;
    /// Reply was not HTTP
    pub const INVALID_RESPONSE: i16 = -5;
    /// Request did not fit the buffer
    pub const REQUEST_TOO_LARGE: i16 = -6;
}
