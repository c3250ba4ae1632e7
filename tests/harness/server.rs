//! WebSocket test server.
//!
//! Binds a [`WebSocketServer`] to an ephemeral IPv4 port and runs its accept
//! loop on a background thread for the rest of the test process.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::thread;

use rawsock_ws::{ServerConfig, Session, SessionHandler, WebSocketServer};

/// Echoes every text and binary frame back to the sender.
pub struct Echo;

impl SessionHandler for Echo {
    fn on_text(&self, session: &Session, text: String) {
        session.write_text(&text);
    }

    fn on_binary(&self, session: &Session, data: Vec<u8>) {
        session.write_binary(&data);
    }
}

pub struct TestServer;

impl TestServer {
    /// Spawn an echo server and return the address clients should dial.
    pub fn spawn() -> SocketAddr {
        Self::spawn_with(Arc::new(Echo))
    }

    pub fn spawn_with(handler: Arc<dyn SessionHandler>) -> SocketAddr {
        Self::spawn_with_config(ServerConfig::new(), handler)
    }

    pub fn spawn_with_config(config: ServerConfig, handler: Arc<dyn SessionHandler>) -> SocketAddr {
        let config = config.with_port(0).with_force_ipv4(true);
        let server = WebSocketServer::bind(config, handler).expect("bind test server");
        let port = server.local_addr().expect("local addr").port();

        thread::Builder::new()
            .name("test-server".into())
            .spawn(move || {
                server.serve();
            })
            .expect("spawn server thread");

        SocketAddr::from((Ipv4Addr::LOCALHOST, port))
    }
}
