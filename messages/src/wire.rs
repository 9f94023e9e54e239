// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Little-endian packing primitives for the fixed frame layouts.

use crate::Error;

/// Encode `n` as a `width`-byte little-endian buffer.
///
/// Widths above 8 are zero-padded. Returns [`Error::ValueTooWide`] if `n`
/// does not fit in `width` bytes.
pub fn encode_uint(n: u64, width: usize) -> Result<Vec<u8>, Error> {
    if width < 8 && n >> (8 * width as u32) != 0 {
        return Err(Error::ValueTooWide { value: n, width });
    }
    let le = n.to_le_bytes();
    let mut out = vec![0u8; width];
    let used = width.min(le.len());
    out[..used].copy_from_slice(&le[..used]);
    Ok(out)
}

/// Decode a little-endian buffer of any length as an unsigned integer.
///
/// Never fails. Buffers longer than 8 bytes contribute only their low 8
/// bytes; callers are expected to pass the exact slice the layout requires.
pub fn decode_uint(buf: &[u8]) -> u64 {
    buf.iter()
        .take(8)
        .rev()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Write a little-endian IEEE-754 single into the first 4 bytes of `buf`.
pub fn put_f32_le(buf: &mut [u8], value: f32) {
    buf[..4].copy_from_slice(&value.to_le_bytes());
}

/// Read a little-endian IEEE-754 single from the first 4 bytes of `buf`.
pub fn get_f32_le(buf: &[u8]) -> f32 {
    f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])
}

/// Read a little-endian `u16` from the first 2 bytes of `buf`.
pub fn get_u16_le(buf: &[u8]) -> u16 {
    u16::from_le_bytes([buf[0], buf[1]])
}

/// Read a little-endian `u32` from the first 4 bytes of `buf`.
pub fn get_u32_le(buf: &[u8]) -> u32 {
    u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]])
}
