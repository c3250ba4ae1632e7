//! WebSocket opening handshake (RFC 6455 section 4.2).
//!
//! The HTTP layer hands over the request headers; [`negotiate`] checks the
//! upgrade tokens and produces the headers of the `101 Switching Protocols`
//! response.

use std::collections::HashMap;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use sha1::{Digest, Sha1};

use crate::error::{Error, Result};

/// The WebSocket GUID used in the Sec-WebSocket-Accept calculation (RFC 6455).
pub const WS_GUID: &str = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11";

/// Case-insensitive view of HTTP request headers.
///
/// Names are stored lowercased; values are trimmed. A repeated header keeps
/// its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    /// Create an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse header lines up to the first empty line.
    ///
    /// Lines without a `:` are skipped.
    pub fn parse<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut headers = Self::new();
        for line in lines {
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim(), value.trim());
            }
        }
        headers
    }

    /// Insert a header, replacing any previous value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.inner.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Look up a header by name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Check whether a header's value list contains `token`.
    ///
    /// Values are split on commas and whitespace; comparison ignores case.
    #[must_use]
    pub fn has_token(&self, name: &str, token: &str) -> bool {
        self.get(name).is_some_and(|value| {
            value
                .split(|c: char| c == ',' || c.is_ascii_whitespace())
                .any(|t| t.eq_ignore_ascii_case(token))
        })
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name.as_ref(), value);
        }
        headers
    }
}

/// Computes the Sec-WebSocket-Accept value from the client's Sec-WebSocket-Key.
///
/// The accept key is calculated as: Base64(SHA-1(key + GUID))
///
/// # Example
///
/// ```
/// use rawsock_ws::protocol::handshake::compute_accept_key;
///
/// let key = "dGhlIHNhbXBsZSBub25jZQ==";
/// let accept = compute_accept_key(key);
/// assert_eq!(accept, "s3pPLMBiTxaQ9kYGzzhZRbK+xOo=");
/// ```
pub fn compute_accept_key(key: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(key.as_bytes());
    hasher.update(WS_GUID.as_bytes());
    let hash = hasher.finalize();
    BASE64.encode(hash)
}

/// Validate an upgrade request and build the switching-protocols response.
///
/// Checks run in order and the first failure wins:
///
/// 1. `Upgrade` must contain the token `websocket`.
/// 2. `Connection` must contain the token `upgrade`.
/// 3. `Sec-WebSocket-Key` must be present.
///
/// # Errors
///
/// - [`Error::InvalidUpgradeHeader`] with the offending value
/// - [`Error::InvalidConnectionHeader`] with the offending value
/// - [`Error::MissingWebSocketKey`]
pub fn negotiate(headers: &Headers) -> Result<HandshakeResponse> {
    if !headers.has_token("upgrade", "websocket") {
        return Err(Error::InvalidUpgradeHeader(
            headers.get("upgrade").map(str::to_owned),
        ));
    }
    if !headers.has_token("connection", "upgrade") {
        return Err(Error::InvalidConnectionHeader(
            headers.get("connection").map(str::to_owned),
        ));
    }
    let key = headers
        .get("sec-websocket-key")
        .ok_or(Error::MissingWebSocketKey)?;

    Ok(HandshakeResponse {
        accept: compute_accept_key(key),
    })
}

/// WebSocket handshake response from server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeResponse {
    /// The Sec-WebSocket-Accept value.
    pub accept: String,
}

impl HandshakeResponse {
    /// Response headers in the order they are written.
    #[must_use]
    pub fn headers(&self) -> [(&'static str, &str); 3] {
        [
            ("Upgrade", "WebSocket"),
            ("Connection", "Upgrade"),
            ("Sec-WebSocket-Accept", &self.accept),
        ]
    }

    /// Write the HTTP response head to a buffer.
    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(b"HTTP/1.1 101 Switching Protocols\r\n");
        for (name, value) in self.headers() {
            buf.extend_from_slice(format!("{name}: {value}\r\n").as_bytes());
        }
        buf.extend_from_slice(b"\r\n");
    }
}
