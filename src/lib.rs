//! # rawsock-ws - Minimal WebSocket server over raw TCP sockets
//!
//! `rawsock-ws` implements the server side of RFC 6455 on blocking sockets:
//! the opening handshake, the frame codec, and a per-connection session
//! loop, running on a listen/accept layer built with `socket2`.
//!
//! ## Features
//!
//! - **IPv4 and IPv6 listeners** with address reuse and SIGPIPE suppression
//! - **Opening handshake** validation and `Sec-WebSocket-Accept` computation
//! - **Frame codec** with 7/16/64-bit lengths, mask enforcement and limits
//! - **Thread-per-connection sessions** with serialized writes
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rawsock_ws::{ServerConfig, Session, SessionHandler, WebSocketServer};
//!
//! struct Echo;
//!
//! impl SessionHandler for Echo {
//!     fn on_text(&self, session: &Session, text: String) {
//!         session.write_text(&text);
//!     }
//! }
//!
//! let server = WebSocketServer::bind(ServerConfig::new().with_port(9001), Arc::new(Echo))?;
//! server.serve();
//! ```

pub mod codec;
pub mod config;
pub mod connection;
pub mod error;
pub mod net;
pub mod protocol;
pub mod server;

pub use codec::FrameCodec;
pub use config::{Limits, ServerConfig};
pub use connection::{Session, SessionHandler, SessionState};
pub use error::{Error, Result};
pub use net::{Socket, accept, listen, listen_with};
pub use protocol::{Frame, HandshakeResponse, Headers, OpCode, WS_GUID, compute_accept_key, negotiate};
pub use server::WebSocketServer;
