//! Blocking WebSocket server: accept loop and upgrade front-end.
//!
//! Each accepted connection gets its own thread. That thread reads the HTTP
//! upgrade request, answers it, and then runs the [`Session`] decode loop
//! until the connection ends.

use std::io::{self, BufRead, BufReader, Read};
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::connection::{Session, SessionHandler};
use crate::error::{Error, Result};
use crate::net::{self, Socket};
use crate::protocol::{Headers, negotiate};

/// Read an HTTP/1.1 request head and return its headers.
///
/// Reads up to and including the empty line that ends the head; anything
/// after it is left in `reader`.
///
/// # Errors
///
/// - `Error::HandshakeTooLarge` if the head exceeds `max_size` bytes
/// - `Error::InvalidRequest` if the request line is malformed or not UTF-8
/// - `Error::ConnectionClosed` if the stream ends before the empty line
pub fn read_request_head<R: BufRead>(reader: &mut R, max_size: usize) -> Result<Headers> {
    let mut head = Vec::new();

    loop {
        let remaining = max_size.saturating_sub(head.len());
        let start = head.len();
        let n = reader
            .by_ref()
            .take(remaining as u64)
            .read_until(b'\n', &mut head)?;

        if n == 0 || !head.ends_with(b"\n") {
            if n == remaining {
                return Err(Error::HandshakeTooLarge {
                    size: head.len(),
                    max: max_size,
                });
            }
            return Err(Error::ConnectionClosed);
        }
        if matches!(&head[start..], b"\r\n" | b"\n") {
            break;
        }
    }

    let text = std::str::from_utf8(&head)
        .map_err(|_| Error::InvalidRequest("Invalid UTF-8".into()))?;
    let mut lines = text.lines();

    // Request line: "GET /path HTTP/1.1"
    let request_line = lines
        .next()
        .filter(|line| !line.is_empty())
        .ok_or_else(|| Error::InvalidRequest("Empty request".into()))?;
    let parts: Vec<&str> = request_line.split_whitespace().collect();
    if parts.len() != 3 || !parts[2].starts_with("HTTP/1.") {
        return Err(Error::InvalidRequest(format!(
            "Invalid request line: {request_line}"
        )));
    }

    Ok(Headers::parse(lines))
}

/// Render a `400 Bad Request` response with `reason` as the body.
#[must_use]
pub fn bad_request_response(reason: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 400 Bad Request\r\n\
         Content-Type: text/plain; charset=utf-8\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {reason}",
        reason.len()
    )
    .into_bytes()
}

/// A listening WebSocket server.
///
/// ## Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use rawsock_ws::{ServerConfig, WebSocketServer};
///
/// let server = WebSocketServer::bind(ServerConfig::new().with_port(9001), Arc::new(Echo))?;
/// server.serve();
/// ```
pub struct WebSocketServer {
    listener: Socket,
    config: ServerConfig,
    handler: Arc<dyn SessionHandler>,
}

impl WebSocketServer {
    /// Create the listening socket described by `config`.
    ///
    /// # Errors
    ///
    /// Any socket error from [`net::listen_with`].
    pub fn bind(config: ServerConfig, handler: Arc<dyn SessionHandler>) -> Result<Self> {
        let listener = net::listen_with(&config)?;
        Ok(Self {
            listener,
            config,
            handler,
        })
    }

    /// Address the server is listening on.
    ///
    /// # Errors
    ///
    /// Returns the OS error from `getsockname(2)`.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Accept connections forever, one thread per connection.
    ///
    /// A failed accept is logged and the loop keeps going.
    pub fn serve(&self) -> ! {
        info!(addr = ?self.local_addr().ok(), "WebSocket server accepting connections");
        loop {
            if let Err(err) = self.accept_one() {
                warn!(error = %err, "Accept failed");
            }
        }
    }

    /// Accept one connection and serve it on a new thread.
    ///
    /// # Errors
    ///
    /// `Error::Accept` if accepting fails, `Error::Io` if the thread cannot
    /// be spawned.
    pub fn accept_one(&self) -> Result<JoinHandle<()>> {
        let socket = net::accept(&self.listener)?;
        let peer = socket.peer_addr().ok();
        let config = self.config.clone();
        let handler = Arc::clone(&self.handler);

        let name = match peer {
            Some(addr) => format!("ws-session-{addr}"),
            None => "ws-session".to_owned(),
        };
        let handle = thread::Builder::new().name(name).spawn(move || {
            if let Err(err) = handle_connection(socket, &config, handler) {
                debug!(peer = ?peer, error = %err, "Connection ended with error");
            }
        })?;
        Ok(handle)
    }
}

/// Upgrade `socket` to WebSocket and run its session on the calling thread.
///
/// Bad upgrade requests are answered with `400 Bad Request` before the error
/// is returned.
///
/// # Errors
///
/// The handshake error, or whatever ended the session (see
/// [`Session::run`]).
pub fn handle_connection(
    socket: Socket,
    config: &ServerConfig,
    handler: Arc<dyn SessionHandler>,
) -> Result<()> {
    let mut reader = BufReader::with_capacity(config.read_buffer_size, &socket);

    let response = read_request_head(&mut reader, config.limits.max_handshake_size)
        .and_then(|headers| negotiate(&headers));
    let response = match response {
        Ok(response) => response,
        Err(err) if err.is_bad_request() => {
            debug!(peer = ?socket.peer_addr().ok(), error = %err, "Rejecting upgrade request");
            if let Err(write_err) = socket.write_bytes(&bad_request_response(&err.to_string())) {
                debug!(error = %write_err, "Failed to send 400 response");
            }
            return Err(err);
        }
        Err(err) => return Err(err),
    };

    // Whatever the client sent after the request head belongs to the session.
    let prefix = reader.buffer().to_vec();
    drop(reader);

    let mut head = Vec::new();
    response.write(&mut head);
    socket.write_bytes(&head)?;

    let session = Arc::new(
        Session::new(socket)
            .with_handler(Arc::clone(&handler))
            .with_limits(config.limits.clone())
            .with_read_buffer_size(config.read_buffer_size),
    );
    handler.on_open(&session);
    let result = session.run_with_prefix(prefix);
    handler.on_close(&session);
    result
}
