use std::io::{Read, Write};

use crate::config::Limits;
use crate::error::{Error, Result};
use crate::protocol::frame::{LEN_16, LEN_64};
use crate::protocol::mask::apply_mask_from;
use crate::protocol::{Frame, OpCode};

/// Payload bytes read and unmasked per step.
const READ_CHUNK: usize = 8192;

/// Reads client frames from and writes server frames to a blocking stream.
///
/// The codec itself is stateless apart from its limits; the same instance
/// can decode from one stream and encode to another.
#[derive(Debug, Clone, Default)]
pub struct FrameCodec {
    limits: Limits,
}

impl FrameCodec {
    /// Create a codec that enforces `limits` while decoding.
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// Decode one masked client frame.
    ///
    /// Reads exactly the bytes of one frame. A protocol error is returned as
    /// soon as the offending header byte is seen; the rest of the frame is
    /// left unread.
    ///
    /// ## Errors
    ///
    /// - `Error::UnknownOpcode` if the opcode nibble is undefined
    /// - `Error::UnmaskedFrame` if the mask bit is clear
    /// - `Error::FrameTooLarge` if the length exceeds `max_frame_size`
    /// - `Error::ConnectionClosed` / `Error::Io` if the stream ends or fails
    pub fn read_frame<R: Read>(&self, reader: &mut R) -> Result<Frame> {
        let [byte0] = read_array::<_, 1>(reader)?;
        let fin = (byte0 & 0x80) != 0;
        let opcode = OpCode::from_u8(byte0 & 0x0F)?;

        let [byte1] = read_array::<_, 1>(reader)?;
        if (byte1 & 0x80) == 0 {
            return Err(Error::UnmaskedFrame);
        }

        let payload_len = match byte1 & 0x7F {
            LEN_16 => u64::from(u16::from_be_bytes(read_array(reader)?)),
            LEN_64 => u64::from_be_bytes(read_array(reader)?),
            len => u64::from(len),
        };
        self.limits.check_frame_size(payload_len)?;
        let payload_len =
            usize::try_from(payload_len).map_err(|_| Error::PayloadTooLargeForPlatform {
                size: payload_len,
                max: usize::MAX as u64,
            })?;

        let mask: [u8; 4] = read_array(reader)?;

        let mut payload = vec![0u8; payload_len];
        let mut offset = 0;
        for chunk in payload.chunks_mut(READ_CHUNK) {
            reader.read_exact(chunk)?;
            apply_mask_from(chunk, mask, offset);
            offset += chunk.len();
        }

        Ok(Frame::new(fin, opcode, payload))
    }

    /// Encode `frame` unmasked and write it in a single `write_all`.
    ///
    /// ## Errors
    ///
    /// Returns `Error::ConnectionClosed` or `Error::Io` if the write fails.
    pub fn write_frame<W: Write>(&self, writer: &mut W, frame: &Frame) -> Result<()> {
        let buf = frame.encode();
        writer.write_all(&buf)?;
        writer.flush()?;
        Ok(())
    }
}

fn read_array<R: Read, const N: usize>(reader: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}
