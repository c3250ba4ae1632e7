//! WebSocket frame representation and serialization (RFC 6455).
//!
//! Frames are written into a [`BytesMut`] so a single `write_all` puts the
//! whole frame on the wire. Decoding from a byte stream lives in
//! [`crate::codec`].

use bytes::{BufMut, BytesMut};

use crate::protocol::OpCode;
use crate::protocol::mask::apply_mask_fast;

/// Largest payload length that fits in the 7-bit length field.
pub const MAX_INLINE_LEN: usize = 125;

/// Length selector announcing a 16-bit extended length.
pub const LEN_16: u8 = 0x7E;

/// Length selector announcing a 64-bit extended length.
pub const LEN_64: u8 = 0x7F;

/// A single WebSocket frame as defined in RFC 6455.
///
/// This is one physical frame. A message split across several frames
/// (`fin == false` followed by continuation frames) is not reassembled.
///
/// ## Frame Structure
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-------+-+-------------+-------------------------------+
/// |F|R|R|R| opcode |M| Payload len |    Extended payload length    |
/// |I|S|S|S|  (4)   |A|     (7)     |             (16/64)           |
/// |N|V|V|V|       |S|             |   (if payload len==126/127)   |
/// | |1|2|3|       |K|             |                               |
/// +-+-+-+-+-------+-+-------------+-------------------------------+
/// |                         Masking key (if present)              |
/// +---------------------------------------------------------------+
/// |                     Payload data                              |
/// +---------------------------------------------------------------+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Frame opcode defining the interpretation of payload data.
    pub opcode: OpCode,
    /// Final fragment flag.
    pub fin: bool,
    /// Unmasked payload bytes.
    pub payload: Vec<u8>,
}

impl Frame {
    /// Create a new frame with the given parameters.
    #[must_use]
    pub fn new(fin: bool, opcode: OpCode, payload: Vec<u8>) -> Self {
        Self {
            opcode,
            fin,
            payload,
        }
    }

    /// Create a final text frame.
    #[must_use]
    pub fn text(data: impl Into<Vec<u8>>) -> Self {
        Self::new(true, OpCode::Text, data.into())
    }

    /// Create a final binary frame.
    #[must_use]
    pub fn binary(data: impl Into<Vec<u8>>) -> Self {
        Self::new(true, OpCode::Binary, data.into())
    }

    /// Get the payload bytes.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Take ownership of the payload.
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Serialize the frame the way a server sends it: no mask bit, no key.
    #[must_use]
    pub fn encode(&self) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.wire_size(false));
        self.encode_into(&mut buf, None);
        buf
    }

    /// Serialize the frame the way a client sends it, masked with `mask`.
    #[must_use]
    pub fn encode_masked(&self, mask: [u8; 4]) -> BytesMut {
        let mut buf = BytesMut::with_capacity(self.wire_size(true));
        self.encode_into(&mut buf, Some(mask));
        buf
    }

    /// Append the serialized frame to `buf`.
    pub fn encode_into(&self, buf: &mut BytesMut, mask: Option<[u8; 4]>) {
        let payload_len = self.payload.len();
        buf.reserve(self.wire_size(mask.is_some()));

        let mut byte0 = self.opcode.as_u8();
        if self.fin {
            byte0 |= 0x80;
        }
        buf.put_u8(byte0);

        let mask_bit = if mask.is_some() { 0x80 } else { 0x00 };
        if payload_len <= MAX_INLINE_LEN {
            buf.put_u8(mask_bit | payload_len as u8);
        } else if payload_len <= usize::from(u16::MAX) {
            buf.put_u8(mask_bit | LEN_16);
            buf.put_u16(payload_len as u16);
        } else {
            buf.put_u8(mask_bit | LEN_64);
            buf.put_u64(payload_len as u64);
        }

        match mask {
            Some(key) => {
                buf.put_slice(&key);
                let start = buf.len();
                buf.put_slice(&self.payload);
                apply_mask_fast(&mut buf[start..], key);
            }
            None => buf.put_slice(&self.payload),
        }
    }

    /// Calculate the size needed to write this frame.
    #[must_use]
    pub fn wire_size(&self, masked: bool) -> usize {
        let payload_len = self.payload.len();
        let extended_len_size = if payload_len <= MAX_INLINE_LEN {
            0
        } else if payload_len <= usize::from(u16::MAX) {
            2
        } else {
            8
        };
        let mask_size = if masked { 4 } else { 0 };
        2 + extended_len_size + mask_size + payload_len
    }
}
