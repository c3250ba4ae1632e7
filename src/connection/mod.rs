//! Per-connection WebSocket session.
//!
//! This module provides the [`Session`] type that owns an accepted socket,
//! runs the frame decode loop and hands text and binary payloads to a
//! [`SessionHandler`].
//!
//! ## Session Lifecycle
//!
//! 1. **Running** - from construction until the first read failure
//! 2. **Terminated** - the loop exited; the socket closes when the session drops
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rawsock_ws::{Session, SessionHandler};
//!
//! struct Printer;
//!
//! impl SessionHandler for Printer {
//!     fn on_text(&self, _session: &Session, text: String) {
//!         println!("Received: {text}");
//!     }
//! }
//!
//! let session = Session::new(socket).with_handler(Arc::new(Printer));
//! session.run()?;
//! ```

mod session;
mod state;

pub use session::{Session, SessionHandler};
pub use state::SessionState;
