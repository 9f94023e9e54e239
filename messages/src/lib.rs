// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire format for the virtual controller-state protocol.
//!
//! The protocol is a fixed-layout, checksum-protected binary format carried in
//! single UDP datagrams. Every frame is a 16-byte header, a 4-byte message
//! code, and a variable-length body; all multi-byte integers are
//! little-endian. Clients query a server for the set of available virtual
//! controller slots and for the live input state of individual slots.
//!
//! This crate is pure codec: no sockets, no async. The server crate drives it
//! per arriving datagram.

pub mod checksum;
pub mod message;
pub mod payload;
pub mod state;
pub mod wire;

use crate::message::MessageKind;

/// The ASCII tag opening every server-originated frame.
pub const SERVER_TAG: [u8; 4] = *b"DSUS";

/// The ASCII tag opening every client-originated frame.
pub const CLIENT_TAG: [u8; 4] = *b"DSUC";

/// The single protocol version spoken by both sides.
pub const PROTOCOL_VERSION: u16 = 1001;

/// The UDP port on which servers conventionally listen.
pub const PORT: u16 = 26760;

/// Size of the fixed frame header.
pub const HEADER_LEN: usize = 16;

/// Size of the message code following the header.
pub const CODE_LEN: usize = 4;

/// Offset of the checksum field within the header.
pub const CHECKSUM_OFFSET: usize = 8;

/// Size of the checksum field.
pub const CHECKSUM_LEN: usize = 4;

/// The number of virtual controller slots a server reports on.
pub const NUM_SLOTS: usize = 4;

/// The largest frame this protocol version produces: header, message code,
/// and a full controller-data payload.
pub const MAX_FRAME_SIZE: usize = HEADER_LEN + CODE_LEN + payload::STATE_PAYLOAD_LEN;

/// Errors arising from the wire format.
///
/// Frame-level failures (`Truncated`, `LengthMismatch`, `ChecksumMismatch`)
/// are expected outcomes on a lossy, adversarial network. They abort decoding
/// of the single offending datagram and nothing else.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The datagram is too short to hold a header and message code.
    #[error("datagram of {actual} bytes is too short for a frame")]
    Truncated { actual: usize },

    /// The header's body-length field disagrees with the trailing byte count.
    #[error("declared body length {declared} does not match {actual} trailing bytes")]
    LengthMismatch { declared: u16, actual: usize },

    /// The frame checksum does not match its declared value.
    #[error("checksum mismatch: computed {computed:#010x}, declared {declared:#010x}")]
    ChecksumMismatch { computed: u32, declared: u32 },

    /// A slot index outside the fixed range `[0, 3]`.
    #[error("controller slot index {0} is out of range")]
    SlotIndexOutOfRange(u8),

    /// A value does not fit the requested encoding width.
    #[error("value {value} does not fit in {width} bytes")]
    ValueTooWide { value: u64, width: usize },

    /// An attempt to encode a message kind that has no canonical wire code.
    #[error("message kind {0:?} has no wire encoding")]
    UnencodableKind(MessageKind),
}
