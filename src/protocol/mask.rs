//! Payload masking (RFC 6455 section 5.3).
//!
//! Masking XORs payload byte `i` with `key[i % 4]`. Applying the same key
//! twice restores the original data.

/// Scalar byte-by-byte XOR masking.
#[inline]
pub fn apply_mask(data: &mut [u8], mask: [u8; 4]) {
    apply_mask_from(data, mask, 0);
}

/// Mask a chunk that starts `offset` bytes into the payload.
///
/// Lets a payload be unmasked piecewise as it is read off the socket.
#[inline]
pub fn apply_mask_from(data: &mut [u8], mask: [u8; 4], offset: usize) {
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= mask[(offset + i) % 4];
    }
}

/// Word-at-a-time masking, processing 4 bytes per step with `u32` XOR.
#[inline]
pub fn apply_mask_fast(data: &mut [u8], mask: [u8; 4]) {
    let mask_u32 = u32::from_ne_bytes(mask);
    let mut chunks = data.chunks_exact_mut(4);

    for chunk in &mut chunks {
        let val = u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        chunk.copy_from_slice(&(val ^ mask_u32).to_ne_bytes());
    }

    // Tail always starts at a multiple of 4, so the key restarts at index 0.
    for (i, byte) in chunks.into_remainder().iter_mut().enumerate() {
        *byte ^= mask[i];
    }
}
