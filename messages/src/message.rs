// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Message kinds and the frame codec.

use crate::checksum::frame_checksum;
use crate::wire;
use crate::Error;
use crate::CHECKSUM_LEN;
use crate::CHECKSUM_OFFSET;
use crate::CODE_LEN;
use crate::HEADER_LEN;
use crate::PROTOCOL_VERSION;
use crate::SERVER_TAG;

/// The 4-byte little-endian wire codes of the known message kinds.
pub mod code {
    pub const VERSION_INFO: u32 = 0x0010_0000;
    pub const CONNECTED_CONTROLLERS: u32 = 0x0010_0001;
    pub const CONTROLLER_DATA: u32 = 0x0010_0002;
    pub const CONTROLLER_MOTOR: u32 = 110_001;
    pub const RUMBLE: u32 = 110_002;
}

/// The kind of one protocol message.
///
/// The set is closed; there is no negotiation. Every kind except
/// [`MessageKind::Unrecognized`] maps to a unique wire code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    /// Protocol-version query and response.
    VersionInfo,
    /// Query for, and report of, the populated controller slots.
    ConnectedControllers,
    /// Subscription to, and report of, one slot's input state.
    ControllerData,
    /// Motor command addressed to a controller. Observed only.
    ControllerMotor,
    /// Rumble command addressed to a controller. Observed only.
    Rumble,
    /// Any other 4-byte code. Produced only on decode; it has no canonical
    /// wire code and cannot be re-encoded.
    Unrecognized,
}

impl MessageKind {
    /// Map a wire code to a message kind.
    ///
    /// Total: codes outside the known set decode to
    /// [`MessageKind::Unrecognized`].
    pub fn from_wire(code: u32) -> Self {
        match code {
            code::VERSION_INFO => Self::VersionInfo,
            code::CONNECTED_CONTROLLERS => Self::ConnectedControllers,
            code::CONTROLLER_DATA => Self::ControllerData,
            code::CONTROLLER_MOTOR => Self::ControllerMotor,
            code::RUMBLE => Self::Rumble,
            _ => Self::Unrecognized,
        }
    }

    /// The canonical wire code for this kind, or `None` for
    /// [`MessageKind::Unrecognized`].
    pub fn wire_code(self) -> Option<u32> {
        match self {
            Self::VersionInfo => Some(code::VERSION_INFO),
            Self::ConnectedControllers => Some(code::CONNECTED_CONTROLLERS),
            Self::ControllerData => Some(code::CONTROLLER_DATA),
            Self::ControllerMotor => Some(code::CONTROLLER_MOTOR),
            Self::Rumble => Some(code::RUMBLE),
            Self::Unrecognized => None,
        }
    }
}

/// The fixed 16-byte header opening every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// ASCII role tag: `DSUS` from servers, `DSUC` from clients.
    pub tag: [u8; 4],
    /// The protocol version.
    pub version: u16,
    /// Count of bytes following the header: message code plus body.
    pub body_len: u16,
    /// CRC-32 of the frame, computed with this field zeroed.
    pub checksum: u32,
    /// Opaque identifier chosen once per sender process.
    pub sender_id: u32,
}

/// A parsed and fully validated frame, borrowing its body from the datagram.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub header: Header,
    pub kind: MessageKind,
    pub body: &'a [u8],
}

/// Build a complete server frame: header, message code, and `body`.
///
/// The checksum is written last, after every other byte (including the
/// length field) is in place. Fails with [`Error::UnencodableKind`] for
/// [`MessageKind::Unrecognized`], which has no wire code.
pub fn build_response(kind: MessageKind, body: &[u8], sender_id: u32) -> Result<Vec<u8>, Error> {
    build_frame(SERVER_TAG, kind, body, sender_id)
}

/// Build a complete frame opening with the given role tag.
///
/// Servers answer with [`SERVER_TAG`] via [`build_response`]; test peers and
/// query tools frame with [`crate::CLIENT_TAG`].
pub fn build_frame(
    tag: [u8; 4],
    kind: MessageKind,
    body: &[u8],
    sender_id: u32,
) -> Result<Vec<u8>, Error> {
    let code = kind.wire_code().ok_or(Error::UnencodableKind(kind))?;
    debug_assert!(CODE_LEN + body.len() <= usize::from(u16::MAX));

    let mut frame = vec![0u8; HEADER_LEN + CODE_LEN + body.len()];
    frame[0..4].copy_from_slice(&tag);
    frame[4..6].copy_from_slice(&PROTOCOL_VERSION.to_le_bytes());
    frame[6..8].copy_from_slice(&((CODE_LEN + body.len()) as u16).to_le_bytes());
    frame[12..16].copy_from_slice(&sender_id.to_le_bytes());
    frame[16..20].copy_from_slice(&code.to_le_bytes());
    frame[20..].copy_from_slice(body);

    let sum = frame_checksum(&frame);
    frame[CHECKSUM_OFFSET..CHECKSUM_OFFSET + CHECKSUM_LEN].copy_from_slice(&sum.to_le_bytes());
    Ok(frame)
}

/// Split and validate a raw datagram into a [`Frame`].
///
/// The header occupies `[0, 16)`, the message code `[16, 20)`, the body the
/// rest. Validation order: the datagram must be long enough to frame at all,
/// the declared body length must equal the actual trailing byte count, and
/// the checksum must match. Either failure aborts decoding with no partial
/// result; nothing in the body is trusted before both checks pass.
pub fn parse_frame(raw: &[u8]) -> Result<Frame<'_>, Error> {
    if raw.len() < HEADER_LEN + CODE_LEN {
        return Err(Error::Truncated { actual: raw.len() });
    }

    let header = Header {
        tag: [raw[0], raw[1], raw[2], raw[3]],
        version: wire::get_u16_le(&raw[4..]),
        body_len: wire::get_u16_le(&raw[6..]),
        checksum: wire::get_u32_le(&raw[CHECKSUM_OFFSET..]),
        sender_id: wire::get_u32_le(&raw[12..]),
    };

    let actual = raw.len() - HEADER_LEN;
    if usize::from(header.body_len) != actual {
        return Err(Error::LengthMismatch {
            declared: header.body_len,
            actual,
        });
    }

    let computed = frame_checksum(raw);
    if computed != header.checksum {
        return Err(Error::ChecksumMismatch {
            computed,
            declared: header.checksum,
        });
    }

    let kind = MessageKind::from_wire(wire::get_u32_le(&raw[HEADER_LEN..]));
    Ok(Frame {
        header,
        kind,
        body: &raw[HEADER_LEN + CODE_LEN..],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CLIENT_TAG;

    const SENDER_ID: u32 = 0xdead_beef;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            MessageKind::VersionInfo,
            MessageKind::ConnectedControllers,
            MessageKind::ControllerData,
            MessageKind::ControllerMotor,
            MessageKind::Rumble,
        ] {
            let code = kind.wire_code().unwrap();
            assert_eq!(MessageKind::from_wire(code), kind);
        }
        assert_eq!(MessageKind::from_wire(0x1234_5678), MessageKind::Unrecognized);
        assert_eq!(MessageKind::Unrecognized.wire_code(), None);
    }

    #[test]
    fn test_build_then_parse_round_trip() {
        let body = [0x01u8, 0x02, 0x03, 0x04, 0x05];
        let raw = build_response(MessageKind::ControllerData, &body, SENDER_ID).unwrap();
        assert_eq!(raw.len(), HEADER_LEN + CODE_LEN + body.len());

        let frame = parse_frame(&raw).unwrap();
        assert_eq!(frame.header.tag, SERVER_TAG);
        assert_eq!(frame.header.version, PROTOCOL_VERSION);
        assert_eq!(frame.header.sender_id, SENDER_ID);
        assert_eq!(frame.kind, MessageKind::ControllerData);
        assert_eq!(frame.body, &body[..]);
    }

    #[test]
    fn test_build_refuses_unrecognized_kind() {
        assert_eq!(
            build_response(MessageKind::Unrecognized, &[], SENDER_ID),
            Err(Error::UnencodableKind(MessageKind::Unrecognized))
        );
    }

    #[test]
    fn test_parse_rejects_truncated_datagrams() {
        assert_eq!(parse_frame(&[]).unwrap_err(), Error::Truncated { actual: 0 });
        let raw = build_response(MessageKind::VersionInfo, &[], SENDER_ID).unwrap();
        let err = parse_frame(&raw[..19]).unwrap_err();
        assert_eq!(err, Error::Truncated { actual: 19 });
    }

    #[test]
    fn test_parse_rejects_flipped_body_byte() {
        let body = [7u8; 12];
        let mut raw = build_response(MessageKind::ConnectedControllers, &body, SENDER_ID).unwrap();
        raw[25] ^= 0x40;
        let err = parse_frame(&raw).unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { .. }), "{err:?}");
    }

    #[test]
    fn test_parse_rejects_altered_length_field() {
        let mut raw = build_response(MessageKind::ControllerData, &[0u8; 8], SENDER_ID).unwrap();
        raw[6] = raw[6].wrapping_add(1);
        let err = parse_frame(&raw).unwrap_err();
        assert_eq!(
            err,
            Error::LengthMismatch {
                declared: u16::from(raw[6]) | (u16::from(raw[7]) << 8),
                actual: CODE_LEN + 8,
            }
        );
    }

    #[test]
    fn test_length_check_runs_before_checksum_check() {
        // A frame with both a bad length and a bad checksum reports the
        // length first.
        let mut raw = build_response(MessageKind::VersionInfo, &[1, 2], SENDER_ID).unwrap();
        raw[6] = 0;
        raw[CHECKSUM_OFFSET] ^= 0xff;
        assert!(matches!(
            parse_frame(&raw).unwrap_err(),
            Error::LengthMismatch { .. }
        ));
    }

    #[test]
    fn test_parse_accepts_client_frames() {
        // Inbound queries carry the client tag; the codec validates framing,
        // not roles.
        let raw = build_frame(CLIENT_TAG, MessageKind::ControllerData, &[1, 2], SENDER_ID).unwrap();
        let frame = parse_frame(&raw).unwrap();
        assert_eq!(frame.header.tag, CLIENT_TAG);
        assert_eq!(frame.kind, MessageKind::ControllerData);
    }

    #[test]
    fn test_unknown_code_decodes_to_unrecognized() {
        let mut raw = build_response(MessageKind::Rumble, &[], SENDER_ID).unwrap();
        raw[16..20].copy_from_slice(&0x7777_7777u32.to_le_bytes());
        raw[CHECKSUM_OFFSET..CHECKSUM_OFFSET + CHECKSUM_LEN].fill(0);
        let sum = frame_checksum(&raw);
        raw[CHECKSUM_OFFSET..CHECKSUM_OFFSET + CHECKSUM_LEN].copy_from_slice(&sum.to_le_bytes());

        let frame = parse_frame(&raw).unwrap();
        assert_eq!(frame.kind, MessageKind::Unrecognized);
    }
}
