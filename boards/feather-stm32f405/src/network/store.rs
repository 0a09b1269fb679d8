#![deny(unsafe_code)]
#![deny(warnings)]
//! Realtime Database client
//!
//! Every write opens a fresh connection: DNS lookup, TCP connect, TLS 1.3
//! handshake, one `PUT <path>.json`, close. The whole exchange runs under a
//! single timeout.

use defmt::{debug, error, info, Debug2Format};
use embassy_net::dns::DnsQueryType;
use embassy_net::{IpAddress, IpEndpoint, Stack};
use embassy_time::{with_timeout, Duration};
use embedded_tls::{Aes128GcmSha256, TlsConfig, TlsConnection, TlsContext};
use hal_abstractions::{RemoteStore, StoreError};
use thermo_core::store::{parse_database_url, put_value, DatabaseEndpoint, UrlError};

use super::error::NetworkError;
use super::socket::AsyncTcpSocket;
use super::tls::{take_buffers, ConnectionBuffers, InsecureProvider};
use crate::config::StoreConfig;

/// Anonymous REST client for one database
pub struct FirebaseStore<RNG> {
    stack: Stack<'static>,
    rng: RNG,
    endpoint: DatabaseEndpoint<'static>,
    buffers: &'static mut ConnectionBuffers,
    timeout: Duration,
}

impl<RNG> FirebaseStore<RNG>
where
    RNG: rand_core::RngCore + rand_core::CryptoRng,
{
    /// Parse the database URL and claim the connection buffers
    ///
    /// # Panics
    ///
    /// If called twice; there is one set of connection buffers.
    pub fn new(stack: Stack<'static>, rng: RNG, config: &StoreConfig) -> Result<Self, UrlError> {
        let endpoint = parse_database_url(config.database_url)?;
        let Some(buffers) = take_buffers() else {
            defmt::panic!("TLS buffers already in use");
        };
        info!("Remote store at {}:{}", endpoint.host, endpoint.port);
        Ok(Self {
            stack,
            rng,
            endpoint,
            buffers,
            timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    async fn resolve(&self) -> Result<IpAddress, NetworkError> {
        self.stack
            .dns_query(self.endpoint.host, DnsQueryType::A)
            .await
            .map_err(|e| {
                error!("DNS query failed: {:?}", Debug2Format(&e));
                NetworkError::DnsError
            })?
            .first()
            .copied()
            .ok_or_else(|| {
                error!("DNS returned no results for {}", self.endpoint.host);
                NetworkError::DnsError
            })
    }

    async fn put(&mut self, path: &str, value: f32) -> Result<(), StoreError> {
        let address = self.resolve().await?;
        let endpoint = IpEndpoint::new(address, self.endpoint.port);

        let buffers = &mut *self.buffers;
        let mut socket =
            AsyncTcpSocket::new(self.stack, &mut buffers.tcp_rx, &mut buffers.tcp_tx);
        socket.connect(endpoint).await?;
        debug!("TCP connection established to {}", Debug2Format(&endpoint));

        let config = TlsConfig::new().with_server_name(self.endpoint.host);
        let mut tls = TlsConnection::<AsyncTcpSocket, Aes128GcmSha256>::new(
            socket,
            &mut buffers.tls_read,
            &mut buffers.tls_write,
        );
        let context = TlsContext::new(&config, InsecureProvider::new(&mut self.rng));
        tls.open(context).await.map_err(|e| {
            error!("TLS handshake failed: {:?}", Debug2Format(&e));
            NetworkError::TlsHandshakeFailed
        })?;

        let result = put_value(
            &mut tls,
            &self.endpoint,
            path,
            value,
            &mut buffers.request,
        )
        .await;

        if let Err((_socket, e)) = tls.close().await {
            debug!("TLS close returned error: {:?}", Debug2Format(&e));
        }
        result
    }
}

impl<RNG> RemoteStore for FirebaseStore<RNG>
where
    RNG: rand_core::RngCore + rand_core::CryptoRng,
{
    async fn set(&mut self, path: &str, value: f32) -> Result<(), StoreError> {
        match with_timeout(self.timeout, self.put(path, value)).await {
            Ok(result) => result,
            Err(_) => Err(NetworkError::Timeout.into()),
        }
    }
}
