#![deny(unsafe_code)]
#![deny(warnings)]
//! TLS 1.3 plumbing for the store client
//!
//! # Limitations
//!
//! - Certificate verification is disabled (`NoVerify`); the connection is
//!   encrypted but the server is not authenticated.
//! - One connection at a time: the record buffers are a single static
//!   allocation handed to the store client.
//!
//! # Memory Usage
//!
//! - TLS read buffer: 18 KB, write buffer: 16 KB
//! - TCP socket buffers: 8 KB (4 KB RX + 4 KB TX)
//! - HTTP request/status line buffer: 512 bytes

use embedded_tls::{Aes128GcmSha256, CryptoProvider, NoVerify, TlsVerifier};
use static_cell::ConstStaticCell;

/// Sized to handle a maximum TLS 1.3 record (16384 bytes) plus header,
/// AEAD tag and padding
pub const TLS_READ_BUF_SIZE: usize = 18 * 1024;

/// We control outgoing record sizes
pub const TLS_WRITE_BUF_SIZE: usize = 16 * 1024;

const TCP_BUF_SIZE: usize = 4096;
const REQUEST_BUF_SIZE: usize = 512;

/// Every buffer one store connection needs
pub struct ConnectionBuffers {
    pub tls_read: [u8; TLS_READ_BUF_SIZE],
    pub tls_write: [u8; TLS_WRITE_BUF_SIZE],
    pub tcp_rx: [u8; TCP_BUF_SIZE],
    pub tcp_tx: [u8; TCP_BUF_SIZE],
    pub request: [u8; REQUEST_BUF_SIZE],
}

impl ConnectionBuffers {
    const fn new() -> Self {
        Self {
            tls_read: [0; TLS_READ_BUF_SIZE],
            tls_write: [0; TLS_WRITE_BUF_SIZE],
            tcp_rx: [0; TCP_BUF_SIZE],
            tcp_tx: [0; TCP_BUF_SIZE],
            request: [0; REQUEST_BUF_SIZE],
        }
    }
}

// Lives in .bss, never on the task stack
static BUFFERS: ConstStaticCell<ConnectionBuffers> =
    ConstStaticCell::new(ConnectionBuffers::new());

/// Claim the connection buffers; `None` once they have been handed out
pub fn take_buffers() -> Option<&'static mut ConnectionBuffers> {
    BUFFERS.try_take()
}

/// Crypto provider that wraps an RNG and trusts any server certificate
pub struct InsecureProvider<RNG> {
    rng: RNG,
    verifier: NoVerify,
}

impl<RNG> InsecureProvider<RNG> {
    pub fn new(rng: RNG) -> Self {
        Self {
            rng,
            verifier: NoVerify,
        }
    }
}

impl<RNG> CryptoProvider for InsecureProvider<RNG>
where
    RNG: rand_core::CryptoRngCore,
{
    type CipherSuite = Aes128GcmSha256;
    type Signature = &'static [u8];

    fn rng(&mut self) -> impl rand_core::CryptoRngCore {
        &mut self.rng
    }

    fn verifier(
        &mut self,
    ) -> Result<&mut impl TlsVerifier<Self::CipherSuite>, embedded_tls::TlsError> {
        Ok(&mut self.verifier)
    }
}
