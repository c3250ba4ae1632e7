//! WebSocket echo server.
//!
//! Run with: `cargo run --example echo_server -- --port 9001`
//! Every text and binary frame is sent straight back to its sender.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use clap::Parser;
use rawsock_ws::{Limits, ServerConfig, Session, SessionHandler, WebSocketServer};
use tracing::info;

/// Echo server command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TCP port to listen on
    #[arg(short, long, env = "ECHO_SERVER_PORT", default_value_t = 9001)]
    port: u16,

    /// Listen on IPv4 instead of IPv6
    #[arg(short = '4', long)]
    ipv4: bool,

    /// Largest accepted frame payload in bytes
    #[arg(long, default_value_t = 16 * 1024 * 1024)]
    max_frame_size: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ECHO_SERVER_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Default)]
struct Echo {
    sessions: AtomicU64,
}

impl SessionHandler for Echo {
    fn on_text(&self, session: &Session, text: String) {
        session.write_text(&text);
    }

    fn on_binary(&self, session: &Session, data: Vec<u8>) {
        session.write_binary(&data);
    }

    fn on_open(&self, session: &Arc<Session>) {
        let n = self.sessions.fetch_add(1, Ordering::Relaxed) + 1;
        info!(peer = ?session.peer_addr(), sessions = n, "Session opened");
    }

    fn on_close(&self, session: &Session) {
        info!(peer = ?session.peer_addr(), "Session closed");
    }
}

fn main() -> Result<(), rawsock_ws::Error> {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let max_frame_size = usize::try_from(args.max_frame_size).unwrap_or(usize::MAX);
    let config = ServerConfig::new()
        .with_port(args.port)
        .with_force_ipv4(args.ipv4)
        .with_limits(Limits::new(max_frame_size, Limits::default().max_handshake_size));

    let server = WebSocketServer::bind(config, Arc::new(Echo::default()))?;
    info!(addr = ?server.local_addr().ok(), "Echo server ready");
    server.serve()
}
