//! Raw TCP socket layer: listening, accepting and byte-level I/O.
//!
//! Sockets are created through `socket2` so the options the protocol needs
//! (address reuse, SIGPIPE suppression) are set before `bind(2)`.

mod addr;
mod listener;
mod socket;

pub use addr::AddressFamily;
pub use listener::{accept, listen, listen_with};
pub use socket::Socket;
