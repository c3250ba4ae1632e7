//! Listening socket setup and connection acceptance.

use socket2::{Protocol, Type};
use tracing::{debug, trace};

use crate::config::ServerConfig;
use crate::error::{Error, Result, os_code};
use crate::net::addr::AddressFamily;
use crate::net::socket::{Socket, disable_sigpipe};

/// Create a TCP socket listening on the wildcard address of `port`.
///
/// Uses IPv4 when `force_ipv4` is set and IPv6 otherwise. Address reuse is
/// enabled.
///
/// # Errors
///
/// - `Error::SocketCreation` if `socket(2)` fails
/// - `Error::ReuseAddress` if `SO_REUSEADDR` cannot be set
/// - `Error::NoSigPipe` if SIGPIPE cannot be turned off
/// - `Error::Bind` if `bind(2)` fails, e.g. the port is in use
/// - `Error::Listen` if `listen(2)` fails
pub fn listen(port: u16, force_ipv4: bool, backlog: i32) -> Result<Socket> {
    let config = ServerConfig::new()
        .with_port(port)
        .with_force_ipv4(force_ipv4)
        .with_backlog(backlog);
    listen_with(&config)
}

/// Create a listening socket from a [`ServerConfig`].
///
/// On any failure the partially set up descriptor is closed before the
/// error is returned.
///
/// # Errors
///
/// Same as [`listen`].
pub fn listen_with(config: &ServerConfig) -> Result<Socket> {
    let family = AddressFamily::select(config.force_ipv4);

    let socket = socket2::Socket::new(family.domain(), Type::STREAM, Some(Protocol::TCP))
        .map_err(|e| Error::SocketCreation(os_code(&e)))?;

    // From here on, returning early drops `socket` and closes the descriptor.
    if config.reuse_address {
        socket
            .set_reuse_address(true)
            .map_err(|e| Error::ReuseAddress(os_code(&e)))?;
    }
    disable_sigpipe(&socket).map_err(|e| Error::NoSigPipe(os_code(&e)))?;

    socket
        .bind(&family.wildcard(config.port))
        .map_err(|e| Error::Bind(os_code(&e)))?;
    socket
        .listen(config.backlog)
        .map_err(|e| Error::Listen(os_code(&e)))?;

    let socket = Socket::new(socket);
    debug!(
        family = ?family,
        addr = ?socket.local_addr().ok(),
        backlog = config.backlog,
        "Listening"
    );
    Ok(socket)
}

/// Block until a client connects to `listener` and return its socket.
///
/// # Errors
///
/// `Error::Accept` with the OS error code. `listener` stays usable.
pub fn accept(listener: &Socket) -> Result<Socket> {
    let (socket, addr) = listener
        .as_raw()
        .accept()
        .map_err(|e| Error::Accept(os_code(&e)))?;
    disable_sigpipe(&socket).map_err(|e| Error::Accept(os_code(&e)))?;

    trace!(peer = ?addr.as_socket(), "Accepted connection");
    Ok(Socket::new(socket))
}
