//! HTTP/1.1 PUT of a single JSON number
//!
//! Request: `PUT <path>.json` with the value as body, anonymous (no auth
//! query parameter), `Connection: close`. Only the status line of the reply
//! is read; 2xx means stored.

use core::fmt::{self, Write as _};

use embedded_io_async::{ErrorKind, Read, Write};
use hal_abstractions::StoreError;
use heapless::String;

use super::codes;
use super::url::{DatabaseEndpoint, DEFAULT_HTTPS_PORT};

/// HTTP exchange errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpError {
    /// Request does not fit the buffer
    RequestTooLarge,
    /// Transport read or write failed
    Io(ErrorKind),
    /// Peer closed before sending anything
    Closed,
    /// Reply did not start with a valid status line
    InvalidResponse,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestTooLarge => write!(f, "Request too large"),
            Self::Io(kind) => write!(f, "I/O error: {:?}", kind),
            Self::Closed => write!(f, "Connection closed"),
            Self::InvalidResponse => write!(f, "Invalid response"),
        }
    }
}

impl core::error::Error for HttpError {}

impl From<HttpError> for StoreError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::RequestTooLarge => {
                StoreError::new(codes::REQUEST_TOO_LARGE, "request too large")
            }
            HttpError::Io(ErrorKind::TimedOut) => StoreError::new(codes::TIMEOUT, "timeout"),
            HttpError::Io(_) => StoreError::new(codes::CONNECTION_FAILED, "connection lost"),
            HttpError::Closed => StoreError::new(codes::CONNECTION_FAILED, "connection closed"),
            HttpError::InvalidResponse => {
                StoreError::new(codes::INVALID_RESPONSE, "invalid response")
            }
        }
    }
}

/// Parsed `HTTP/1.x <code> <reason>` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine<'a> {
    pub code: u16,
    pub reason: &'a str,
}

impl StatusLine<'_> {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// `fmt::Write` into a byte slice, failing instead of truncating
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// JSON text for a float; non-finite values have no JSON number form
fn json_number(value: f32) -> Result<String<48>, HttpError> {
    let mut body = String::new();
    let written = if value.is_finite() {
        write!(body, "{}", value)
    } else {
        body.write_str("null")
    };
    written.map_err(|_| HttpError::RequestTooLarge)?;
    Ok(body)
}

/// `Host` header value; the port is only spelled out when it is not 443
struct HostHeader<'a>(&'a DatabaseEndpoint<'a>);

impl fmt::Display for HostHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.port == DEFAULT_HTTPS_PORT {
            f.write_str(self.0.host)
        } else {
            write!(f, "{}:{}", self.0.host, self.0.port)
        }
    }
}

/// Encode the PUT request for `value` at `path` into `buf`
///
/// Returns the request length.
pub fn encode_put(
    buf: &mut [u8],
    endpoint: &DatabaseEndpoint<'_>,
    path: &str,
    value: f32,
) -> Result<usize, HttpError> {
    let body = json_number(value)?;
    let path = path.trim_end_matches('/');
    let slash = if path.starts_with('/') { "" } else { "/" };

    let mut w = SliceWriter { buf, len: 0 };
    write!(
        w,
        "PUT {}{}.json HTTP/1.1\r\n\
         Host: {}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        slash,
        path,
        HostHeader(endpoint),
        body.len(),
        body
    )
    .map_err(|_| HttpError::RequestTooLarge)?;
    Ok(w.len)
}

/// Parse the first line of a reply (with or without its `\r\n`)
pub fn parse_status_line(head: &[u8]) -> Result<StatusLine<'_>, HttpError> {
    let line = match find_crlf(head) {
        Some(end) => &head[..end],
        None => head,
    };
    let line = core::str::from_utf8(line).map_err(|_| HttpError::InvalidResponse)?;
    let mut parts = line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/1.") {
        return Err(HttpError::InvalidResponse);
    }
    let code = parts.next().unwrap_or_default();
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HttpError::InvalidResponse);
    }
    let code: u16 = code.parse().map_err(|_| HttpError::InvalidResponse)?;
    let reason = parts.next().unwrap_or_default().trim();
    Ok(StatusLine { code, reason })
}

fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(2).position(|w| w == b"\r\n")
}

fn io_error<E: embedded_io_async::Error>(e: E) -> HttpError {
    HttpError::Io(e.kind())
}

/// Perform one PUT over `io`, using `buf` for both request and reply head
///
/// A non-2xx status becomes a `StoreError` carrying the status code and
/// reason phrase.
pub async fn put_value<T>(
    io: &mut T,
    endpoint: &DatabaseEndpoint<'_>,
    path: &str,
    value: f32,
    buf: &mut [u8],
) -> Result<(), StoreError>
where
    T: Read + Write,
{
    let len = encode_put(buf, endpoint, path, value)?;
    io.write_all(&buf[..len]).await.map_err(io_error)?;
    io.flush().await.map_err(io_error)?;

    let mut filled = 0;
    let end = loop {
        if let Some(end) = find_crlf(&buf[..filled]) {
            break end;
        }
        if filled == buf.len() {
            return Err(HttpError::InvalidResponse.into());
        }
        let n = io.read(&mut buf[filled..]).await.map_err(io_error)?;
        if n == 0 {
            let e = if filled == 0 {
                HttpError::Closed
            } else {
                HttpError::InvalidResponse
            };
            return Err(e.into());
        }
        filled += n;
    };

    let status = parse_status_line(&buf[..end])?;
    if status.is_success() {
        Ok(())
    } else {
        Err(StoreError::new(status.code as i16, status.reason))
    }
}
