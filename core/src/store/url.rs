//! Database URL parsing

/// HTTPS port used when the URL carries none
pub const DEFAULT_HTTPS_PORT: u16 = 443;

/// Where the database is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DatabaseEndpoint<'a> {
    /// Host name, also used for SNI and the `Host` header
    pub host: &'a str,
    pub port: u16,
}

/// URL errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UrlError {
    /// Only `https://` (or no scheme) is accepted
    UnsupportedScheme,
    /// Nothing between the scheme and the path
    MissingHost,
    /// Port is not a number in 1..=65535
    InvalidPort,
}

impl core::fmt::Display for UrlError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnsupportedScheme => write!(f, "Unsupported URL scheme"),
            Self::MissingHost => write!(f, "Missing host"),
            Self::InvalidPort => write!(f, "Invalid port"),
        }
    }
}

impl core::error::Error for UrlError {}

/// Split a database URL such as `https://example-rtdb.firebaseio.com/`
/// into host and port. Any path part is ignored.
pub fn parse_database_url(url: &str) -> Result<DatabaseEndpoint<'_>, UrlError> {
    let rest = match url.split_once("://") {
        Some(("https", rest)) => rest,
        Some(_) => return Err(UrlError::UnsupportedScheme),
        None => url,
    };
    let authority = rest.split('/').next().unwrap_or_default();
    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => {
            let port: u16 = port.parse().map_err(|_| UrlError::InvalidPort)?;
            if port == 0 {
                return Err(UrlError::InvalidPort);
            }
            (host, port)
        }
        None => (authority, DEFAULT_HTTPS_PORT),
    };
    if host.is_empty() {
        return Err(UrlError::MissingHost);
    }
    Ok(DatabaseEndpoint { host, port })
}
