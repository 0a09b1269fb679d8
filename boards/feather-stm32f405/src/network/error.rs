#![deny(unsafe_code)]
#![deny(warnings)]
//! Network error types

use defmt::Format;
use hal_abstractions::StoreError;
use thermo_core::store::codes;

/// Transport failures below the HTTP layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Format)]
pub enum NetworkError {
    /// DNS resolution failed or returned nothing
    DnsError,
    /// TCP connect refused or the socket failed
    SocketError,
    /// The write did not finish within its budget
    Timeout,
    /// TLS handshake failed
    TlsHandshakeFailed,
    /// TLS connection closed unexpectedly
    TlsConnectionClosed,
}

impl core::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DnsError => write!(f, "DNS resolution failed"),
            Self::SocketError => write!(f, "Socket error"),
            Self::Timeout => write!(f, "Request timeout"),
            Self::TlsHandshakeFailed => write!(f, "TLS handshake failed"),
            Self::TlsConnectionClosed => write!(f, "TLS connection closed"),
        }
    }
}

impl core::error::Error for NetworkError {}

impl embedded_io_async::Error for NetworkError {
    fn kind(&self) -> embedded_io_async::ErrorKind {
        match self {
            Self::SocketError | Self::TlsConnectionClosed => {
                embedded_io_async::ErrorKind::BrokenPipe
            }
            Self::Timeout => embedded_io_async::ErrorKind::TimedOut,
            _ => embedded_io_async::ErrorKind::Other,
        }
    }
}

impl From<NetworkError> for StoreError {
    fn from(e: NetworkError) -> Self {
        let code = match e {
            NetworkError::DnsError => codes::DNS_FAILED,
            NetworkError::SocketError | NetworkError::TlsConnectionClosed => {
                codes::CONNECTION_FAILED
            }
            NetworkError::Timeout => codes::TIMEOUT,
            NetworkError::TlsHandshakeFailed => codes::TLS_FAILED,
        };
        let message = match e {
            NetworkError::DnsError => "DNS lookup failed",
            NetworkError::SocketError => "connection refused",
            NetworkError::Timeout => "timeout",
            NetworkError::TlsHandshakeFailed => "TLS handshake failed",
            NetworkError::TlsConnectionClosed => "connection lost",
        };
        StoreError::new(code, message)
    }
}
