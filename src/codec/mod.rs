//! Frame codec over blocking byte streams.
//!
//! This module decodes client frames from any `Read` and encodes server
//! frames to any `Write`.

mod framed;

pub use framed::FrameCodec;
