//! WebSocket protocol core (RFC 6455): opcodes, frames, masking and the
//! opening handshake.

pub mod frame;
pub mod handshake;
pub mod mask;
pub mod opcode;

pub use frame::Frame;
pub use handshake::{HandshakeResponse, Headers, WS_GUID, compute_accept_key, negotiate};
pub use mask::{apply_mask, apply_mask_fast, apply_mask_from};
pub use opcode::OpCode;
