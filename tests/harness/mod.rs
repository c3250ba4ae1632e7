//! Test harness utilities for end-to-end WebSocket testing.
//!
//! This module provides a raw-socket client that speaks just enough of the
//! protocol to drive the server, and a server fixture on an ephemeral port.

mod client;
mod server;

pub use client::TestClient;
pub use server::{Echo, TestServer};
