// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The frame checksum engine.
//!
//! The protocol protects every frame with a CRC-32 computed over the whole
//! frame with the header's own checksum field forced to zero. The same
//! computation serves both directions: compute-then-insert on encode,
//! compute-then-compare on decode.

use crate::CHECKSUM_LEN;
use crate::CHECKSUM_OFFSET;
use crc::Crc;
use crc::CRC_32_ISO_HDLC;

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Compute the checksum of `frame` with its checksum field treated as zero.
///
/// The input is not mutated; the zeroed field is fed to the digest in place
/// of the frame's bytes at `[CHECKSUM_OFFSET, CHECKSUM_OFFSET + 4)`. Inputs
/// shorter than the checksum field are hashed as-is; `parse_frame` rejects
/// such frames before trusting any field.
pub fn frame_checksum(frame: &[u8]) -> u32 {
    if frame.len() <= CHECKSUM_OFFSET {
        return CRC32.checksum(frame);
    }
    let field_end = (CHECKSUM_OFFSET + CHECKSUM_LEN).min(frame.len());
    let mut digest = CRC32.digest();
    digest.update(&frame[..CHECKSUM_OFFSET]);
    digest.update(&[0u8; CHECKSUM_LEN][..field_end - CHECKSUM_OFFSET]);
    digest.update(&frame[field_end..]);
    digest.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_deterministic() {
        let frame = [0xabu8; 32];
        assert_eq!(frame_checksum(&frame), frame_checksum(&frame));
    }

    #[test]
    fn test_checksum_matches_plain_crc_when_field_is_zero() {
        let mut frame = [0x5au8; 24];
        frame[CHECKSUM_OFFSET..CHECKSUM_OFFSET + CHECKSUM_LEN].fill(0);
        assert_eq!(frame_checksum(&frame), CRC32.checksum(&frame));
    }

    #[test]
    fn test_checksum_ignores_the_checksum_field_itself() {
        let mut frame = [0x11u8; 24];
        let baseline = frame_checksum(&frame);
        frame[CHECKSUM_OFFSET..CHECKSUM_OFFSET + CHECKSUM_LEN]
            .copy_from_slice(&baseline.to_le_bytes());
        assert_eq!(frame_checksum(&frame), baseline);
    }

    #[test]
    fn test_checksum_is_position_sensitive() {
        let mut frame = [0u8; 24];
        frame[20] = 1;
        frame[21] = 2;
        let before = frame_checksum(&frame);
        frame.swap(20, 21);
        assert_ne!(frame_checksum(&frame), before);
    }

    #[test]
    fn test_checksum_of_short_input() {
        // Inputs at or below the field offset hash their bytes directly.
        assert_eq!(frame_checksum(b"12345678"), CRC32.checksum(b"12345678"));
        assert_eq!(frame_checksum(&[]), CRC32.checksum(&[]));
    }
}
