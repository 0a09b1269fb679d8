//! Wireless network link port

use core::future::Future;

/// Station credentials for joining a wireless network
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WifiCredentials {
    /// Network name
    pub ssid: &'static str,
    /// WPA passphrase (empty for open networks)
    pub password: &'static str,
}

#[cfg(feature = "defmt")]
impl defmt::Format for WifiCredentials {
    fn format(&self, f: defmt::Formatter) {
        // never print the passphrase
        defmt::write!(f, "WifiCredentials(ssid={})", self.ssid)
    }
}

/// Port for the link the remote store is reached through
///
/// `begin` starts a connection attempt; `is_connected` is polled until the
/// link is usable (associated and addressed). Implementations may keep
/// retrying the association in the background between polls.
pub trait NetworkLink {
    /// Error reported by a failed connection attempt
    type Error: core::fmt::Debug;

    /// Start joining the network with `credentials`
    fn begin(
        &mut self,
        credentials: &WifiCredentials,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Whether the link is up and ready to carry traffic
    fn is_connected(&mut self) -> impl Future<Output = bool>;
}
