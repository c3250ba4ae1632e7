use std::io::{BufReader, Cursor, Read};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace, warn};

use crate::codec::FrameCodec;
use crate::config::Limits;
use crate::connection::SessionState;
use crate::error::{Error, Result};
use crate::net::Socket;
use crate::protocol::{Frame, OpCode};

/// Application callbacks for a [`Session`].
///
/// Every method has a no-op default, so implementers only override what
/// they need. Callbacks run on the session's own thread, in frame order.
pub trait SessionHandler: Send + Sync {
    /// Called for each text frame. Invalid UTF-8 is replaced with U+FFFD.
    fn on_text(&self, session: &Session, text: String) {
        let _ = (session, text);
    }

    /// Called for each binary frame with the unmasked payload.
    fn on_binary(&self, session: &Session, data: Vec<u8>) {
        let _ = (session, data);
    }

    /// Called by the server once the handshake succeeded, before any frame is
    /// read. Keep a clone of `session` to push frames from other threads.
    fn on_open(&self, session: &Arc<Session>) {
        let _ = session;
    }

    /// Called by the server after the decode loop has exited.
    fn on_close(&self, session: &Session) {
        let _ = session;
    }
}

/// One WebSocket connection after a successful handshake.
///
/// The session owns its socket for its whole lifetime. When the decode loop
/// exits the socket is shut down and later writes fail; the descriptor
/// itself is closed when the session is dropped. Only [`run`](Session::run) reads from the
/// socket. Writes may come from any thread holding the session and are
/// serialized by a lock that covers the write path only.
///
/// ## Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use rawsock_ws::{Session, SessionHandler};
///
/// struct Echo;
///
/// impl SessionHandler for Echo {
///     fn on_text(&self, session: &Session, text: String) {
///         session.write_text(&text);
///     }
/// }
///
/// let session = Session::new(socket).with_handler(Arc::new(Echo));
/// session.run()?;
/// ```
pub struct Session {
    socket: Socket,
    codec: FrameCodec,
    handler: Option<Arc<dyn SessionHandler>>,
    write_lock: Mutex<()>,
    terminated: AtomicBool,
    read_buffer_size: usize,
    peer: Option<SocketAddr>,
}

impl Session {
    /// Wrap an accepted socket whose handshake has completed.
    pub fn new(socket: Socket) -> Self {
        let peer = socket.peer_addr().ok();
        Self {
            socket,
            codec: FrameCodec::default(),
            handler: None,
            write_lock: Mutex::new(()),
            terminated: AtomicBool::new(false),
            read_buffer_size: 8192,
            peer,
        }
    }

    /// Register the callbacks that receive decoded frames.
    #[must_use]
    pub fn with_handler(mut self, handler: Arc<dyn SessionHandler>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Set the limits applied while decoding.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.codec = FrameCodec::new(limits);
        self
    }

    /// Set the read buffer size used by [`run`](Session::run).
    #[must_use]
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Get the current session state.
    pub fn state(&self) -> SessionState {
        if self.terminated.load(Ordering::Acquire) {
            SessionState::Terminated
        } else {
            SessionState::Running
        }
    }

    /// Returns `true` until the decode loop has exited.
    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }

    /// Address of the connected peer, if known.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Decode frames from the socket until the first failure.
    ///
    /// Text and binary frames go to the handler; continuation, close, ping
    /// and pong frames are read and dropped. The loop has no timeout.
    ///
    /// ## Errors
    ///
    /// Returns `Ok(())` when the peer closed the connection, otherwise the
    /// protocol or I/O error that ended the session. Either way the session
    /// is terminated and its socket shut down afterwards, even while other
    /// threads still hold the session.
    pub fn run(&self) -> Result<()> {
        let reader = BufReader::with_capacity(self.read_buffer_size, &self.socket);
        self.run_from(reader)
    }

    /// Like [`run`](Session::run), but first decodes `prefix`.
    ///
    /// `prefix` holds bytes that were read past the end of the handshake
    /// request and belong to the first frames.
    ///
    /// ## Errors
    ///
    /// Same as [`run`](Session::run).
    pub fn run_with_prefix(&self, prefix: Vec<u8>) -> Result<()> {
        let socket = BufReader::with_capacity(self.read_buffer_size, &self.socket);
        self.run_from(Cursor::new(prefix).chain(socket))
    }

    /// Like [`run`](Session::run), but reads frames from `reader`.
    ///
    /// ## Errors
    ///
    /// Same as [`run`](Session::run).
    pub fn run_from<R: Read>(&self, mut reader: R) -> Result<()> {
        debug!(peer = ?self.peer, "Session started");

        let result = loop {
            match self.codec.read_frame(&mut reader) {
                Ok(frame) => self.dispatch(frame),
                Err(err) => break err,
            }
        };
        self.terminated.store(true, Ordering::Release);
        if let Err(err) = self.socket.shutdown() {
            trace!(peer = ?self.peer, error = %err, "Socket shutdown failed");
        }

        match result {
            Error::ConnectionClosed => {
                debug!(peer = ?self.peer, "Session ended: peer closed connection");
                Ok(())
            }
            err => {
                debug!(peer = ?self.peer, error = %err, "Session ended");
                Err(err)
            }
        }
    }

    fn dispatch(&self, frame: Frame) {
        match frame.opcode {
            OpCode::Text => {
                if let Some(handler) = &self.handler {
                    let text = match String::from_utf8(frame.into_payload()) {
                        Ok(text) => text,
                        Err(err) => {
                            debug!(peer = ?self.peer, "Text frame is not valid UTF-8");
                            String::from_utf8_lossy(err.as_bytes()).into_owned()
                        }
                    };
                    handler.on_text(self, text);
                }
            }
            OpCode::Binary => {
                if let Some(handler) = &self.handler {
                    handler.on_binary(self, frame.into_payload());
                }
            }
            opcode @ (OpCode::Continuation | OpCode::Close | OpCode::Ping | OpCode::Pong) => {
                trace!(
                    peer = ?self.peer,
                    %opcode,
                    control = opcode.is_control(),
                    len = frame.payload().len(),
                    "Ignoring frame"
                );
            }
        }
    }

    /// Send a text frame. Failures are logged and otherwise ignored.
    pub fn write_text(&self, text: &str) {
        self.report(self.try_write_text(text));
    }

    /// Send a binary frame. Failures are logged and otherwise ignored.
    pub fn write_binary(&self, data: &[u8]) {
        self.report(self.try_write_binary(data));
    }

    /// Send a text frame and return the write result.
    ///
    /// ## Errors
    ///
    /// `Error::ConnectionClosed` or `Error::Io` if the session is
    /// terminated or the socket write fails.
    pub fn try_write_text(&self, text: &str) -> Result<()> {
        self.try_write_frame(&Frame::text(text))
    }

    /// Send a binary frame and return the write result.
    ///
    /// ## Errors
    ///
    /// `Error::ConnectionClosed` or `Error::Io` if the session is
    /// terminated or the socket write fails.
    pub fn try_write_binary(&self, data: &[u8]) -> Result<()> {
        self.try_write_frame(&Frame::binary(data))
    }

    /// Write one complete frame while holding the write lock.
    ///
    /// ## Errors
    ///
    /// `Error::ConnectionClosed` or `Error::Io` if the session is
    /// terminated or the socket write fails.
    pub fn try_write_frame(&self, frame: &Frame) -> Result<()> {
        // The lock guards no data, so a poisoned lock is still usable.
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_running() {
            return Err(Error::ConnectionClosed);
        }
        let mut writer = &self.socket;
        self.codec.write_frame(&mut writer, frame)
    }

    fn report(&self, result: Result<()>) {
        if let Err(err) = result {
            warn!(peer = ?self.peer, error = %err, "Failed to write frame");
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("peer", &self.peer)
            .field("state", &self.state())
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}
