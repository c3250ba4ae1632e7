//! Owned OS socket with byte-level read/write primitives.

use std::io::{self, Read, Write};
use std::net::SocketAddr;

/// Flags passed to every `send(2)`.
///
/// Linux has no per-socket SIGPIPE switch, so each send asks for EPIPE
/// instead of the signal.
#[cfg(any(target_os = "linux", target_os = "android"))]
const SEND_FLAGS: libc::c_int = libc::MSG_NOSIGNAL;
#[cfg(not(any(target_os = "linux", target_os = "android")))]
const SEND_FLAGS: libc::c_int = 0;

/// One OS socket descriptor.
///
/// The descriptor is owned exclusively and closed exactly once, when the
/// `Socket` is dropped. Reads and writes go through `&Socket`, so callers
/// that share a socket across threads must serialize access themselves.
#[derive(Debug)]
pub struct Socket {
    inner: socket2::Socket,
}

impl Socket {
    pub(crate) fn new(inner: socket2::Socket) -> Self {
        Self { inner }
    }

    pub(crate) fn as_raw(&self) -> &socket2::Socket {
        &self.inner
    }

    /// Local address the socket is bound to.
    ///
    /// # Errors
    ///
    /// Returns the OS error, or `InvalidData` for non-IP sockets.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner
            .local_addr()?
            .as_socket()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "not an IP socket"))
    }

    /// Address of the connected peer.
    ///
    /// # Errors
    ///
    /// Returns the OS error, or `InvalidData` for non-IP sockets.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.inner
            .peer_addr()?
            .as_socket()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "not an IP socket"))
    }

    /// Read a single byte.
    ///
    /// # Errors
    ///
    /// `UnexpectedEof` if the peer closed the connection.
    pub fn read_u8(&self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        (&*self).read_exact(&mut byte)?;
        Ok(byte[0])
    }

    /// Write the whole buffer.
    ///
    /// # Errors
    ///
    /// Returns the OS error of the failing `send`.
    pub fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        (&*self).write_all(buf)
    }

    /// Shut down both halves of the connection.
    ///
    /// The descriptor itself stays open until drop.
    ///
    /// # Errors
    ///
    /// Returns the OS error, e.g. `NotConnected`.
    pub fn shutdown(&self) -> io::Result<()> {
        self.inner.shutdown(std::net::Shutdown::Both)
    }
}

impl Read for &Socket {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (&self.inner).read(buf)
    }
}

impl Write for &Socket {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.send_with_flags(buf, SEND_FLAGS)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Turn off SIGPIPE delivery for writes on `socket`.
///
/// Apple platforms support the `SO_NOSIGPIPE` option; elsewhere the
/// `MSG_NOSIGNAL` send flag covers it.
pub(crate) fn disable_sigpipe(socket: &socket2::Socket) -> io::Result<()> {
    #[cfg(any(target_os = "macos", target_os = "ios"))]
    socket.set_nosigpipe(true)?;
    #[cfg(not(any(target_os = "macos", target_os = "ios")))]
    let _ = socket;
    Ok(())
}
