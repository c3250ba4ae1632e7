//! Error types for the WebSocket server.
//!
//! This module defines every failure the socket layer, the opening handshake
//! and the frame codec can report. Errors fall into four groups:
//!
//! - **Socket errors** carry the OS error code of the failing call.
//! - **Handshake errors** map to a `400 Bad Request` for the client.
//! - **Protocol errors** end the offending session only.
//! - **I/O errors** end the session and are treated as a normal disconnect.

use std::io;

use thiserror::Error;

/// Result type alias for WebSocket server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving WebSocket connections.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// `socket(2)` failed.
    #[error("Socket creation failed (os error {0})")]
    SocketCreation(i32),

    /// Setting `SO_REUSEADDR` failed.
    #[error("Setting SO_REUSEADDR failed (os error {0})")]
    ReuseAddress(i32),

    /// Turning off SIGPIPE for the listening socket failed.
    #[error("Disabling SIGPIPE failed (os error {0})")]
    NoSigPipe(i32),

    /// `bind(2)` failed.
    #[error("Bind failed (os error {0})")]
    Bind(i32),

    /// `listen(2)` failed.
    #[error("Listen failed (os error {0})")]
    Listen(i32),

    /// `accept(2)` failed. The listening socket remains usable.
    #[error("Accept failed (os error {0})")]
    Accept(i32),

    /// The `Upgrade` header is missing or lacks the `websocket` token.
    #[error("Invalid value of 'Upgrade' header: {0:?}")]
    InvalidUpgradeHeader(Option<String>),

    /// The `Connection` header is missing or lacks the `upgrade` token.
    #[error("Invalid value of 'Connection' header: {0:?}")]
    InvalidConnectionHeader(Option<String>),

    /// The `Sec-WebSocket-Key` header is missing.
    #[error("Invalid value of 'Sec-WebSocket-Key' header: None")]
    MissingWebSocketKey,

    /// The request head could not be read as an HTTP/1.1 request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Request head exceeds the configured maximum.
    #[error("Handshake too large: {size} bytes (max: {max})")]
    HandshakeTooLarge {
        /// Bytes read so far.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },

    /// Opcode nibble is not one of the six defined values.
    #[error("Unknown opcode: {0:#x}")]
    UnknownOpcode(u8),

    /// Client frame arrived without the mask bit set.
    #[error("Client frame must be masked")]
    UnmaskedFrame,

    /// Frame payload exceeds the configured maximum.
    #[error("Frame too large: {size} bytes (max: {max})")]
    FrameTooLarge {
        /// Announced payload length.
        size: u64,
        /// Maximum allowed size.
        max: usize,
    },

    /// Announced payload length does not fit in memory on this platform.
    #[error("Payload length {size} exceeds platform maximum {max}")]
    PayloadTooLargeForPlatform {
        /// Announced payload length.
        size: u64,
        /// Largest addressable length.
        max: u64,
    },

    /// The peer closed or reset the connection.
    #[error("Connection closed")]
    ConnectionClosed,

    /// Any other I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// The OS error code carried by socket errors.
    #[must_use]
    pub const fn os_error(&self) -> Option<i32> {
        match self {
            Error::SocketCreation(code)
            | Error::ReuseAddress(code)
            | Error::NoSigPipe(code)
            | Error::Bind(code)
            | Error::Listen(code)
            | Error::Accept(code) => Some(*code),
            _ => None,
        }
    }

    /// True if a socket error was caused by `EADDRINUSE`.
    #[must_use]
    pub fn is_addr_in_use(&self) -> bool {
        self.os_error().is_some_and(|code| {
            io::Error::from_raw_os_error(code).kind() == io::ErrorKind::AddrInUse
        })
    }

    /// True for handshake failures that should be answered with `400 Bad Request`.
    #[must_use]
    pub const fn is_bad_request(&self) -> bool {
        matches!(
            self,
            Error::InvalidUpgradeHeader(_)
                | Error::InvalidConnectionHeader(_)
                | Error::MissingWebSocketKey
                | Error::InvalidRequest(_)
                | Error::HandshakeTooLarge { .. }
        )
    }

    /// True for frame-level protocol violations.
    #[must_use]
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Error::UnknownOpcode(_)
                | Error::UnmaskedFrame
                | Error::FrameTooLarge { .. }
                | Error::PayloadTooLargeForPlatform { .. }
        )
    }
}

/// Extracts the raw OS code, falling back to `0` for synthetic errors.
pub(crate) fn os_code(err: &io::Error) -> i32 {
    err.raw_os_error().unwrap_or_default()
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => Error::ConnectionClosed,
            _ => Error::Io(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::FrameTooLarge {
            size: 20_000_000,
            max: 16_000_000,
        };
        assert_eq!(
            err.to_string(),
            "Frame too large: 20000000 bytes (max: 16000000)"
        );
        assert_eq!(Error::UnknownOpcode(0x3).to_string(), "Unknown opcode: 0x3");
        assert_eq!(
            Error::ReuseAddress(13).to_string(),
            "Setting SO_REUSEADDR failed (os error 13)"
        );
        assert_eq!(
            Error::NoSigPipe(22).to_string(),
            "Disabling SIGPIPE failed (os error 22)"
        );
    }

    #[test]
    fn test_error_from_io() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(Error::from(eof), Error::ConnectionClosed);

        let reset = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        assert_eq!(Error::from(reset), Error::ConnectionClosed);

        let other = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(Error::from(other), Error::Io(_)));
    }

    #[test]
    fn test_os_error_codes() {
        assert_eq!(Error::Bind(98).os_error(), Some(98));
        assert_eq!(Error::Accept(24).os_error(), Some(24));
        assert_eq!(Error::NoSigPipe(22).os_error(), Some(22));
        assert_eq!(Error::UnmaskedFrame.os_error(), None);
    }

    #[test]
    fn test_is_addr_in_use() {
        assert!(Error::Bind(libc::EADDRINUSE).is_addr_in_use());
        assert!(!Error::Bind(libc::EACCES).is_addr_in_use());
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::MissingWebSocketKey.is_bad_request());
        assert!(Error::InvalidUpgradeHeader(Some("h2c".into())).is_bad_request());
        assert!(!Error::UnmaskedFrame.is_bad_request());
        assert!(Error::UnmaskedFrame.is_protocol_violation());
        assert!(Error::UnknownOpcode(0xB).is_protocol_violation());
        assert!(!Error::ConnectionClosed.is_protocol_violation());
    }

    #[test]
    fn test_error_clone() {
        let err = Error::InvalidConnectionHeader(None);
        let cloned = err.clone();
        assert_eq!(err, cloned);
    }
}
