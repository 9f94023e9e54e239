// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Classification of inbound frames and construction of their responses.

use crate::Error;
use crate::SlotStore;
use padcast_messages::message::build_response;
use padcast_messages::message::parse_frame;
use padcast_messages::message::MessageKind;
use padcast_messages::payload;
use padcast_messages::state::SlotIndex;
use padcast_messages::wire;
use slog::debug;
use slog::trace;
use slog::Logger;

// Selection modes of a controller-data query.
const SELECT_BY_SLOT: u8 = 1;
const SELECT_BY_HARDWARE_ID: u8 = 2;

// Body offsets of a controller-data query: the slot index in mode 1, and the
// last byte of the 6-byte hardware identifier in mode 2, which embeds the
// slot index.
const SLOT_OFFSET: usize = 1;
const HARDWARE_ID_SLOT_OFFSET: usize = 7;

/// Turns one validated inbound frame into the outbound frames that answer it.
///
/// The dispatcher is synchronous and does no I/O: the transport hands it each
/// datagram and owns sending every returned buffer back to the originating
/// peer. It may be driven sequentially or from several tasks at once; the
/// only shared state is the [`SlotStore`].
#[derive(Clone, Debug)]
pub struct Dispatcher {
    log: Logger,
    store: SlotStore,
    sender_id: u32,
}

impl Dispatcher {
    /// Create a dispatcher reading controller state from `store`.
    ///
    /// `sender_id` is the opaque 4-byte identifier stamped into every
    /// outgoing header, chosen once at server startup.
    pub fn new(log: Logger, store: SlotStore, sender_id: u32) -> Self {
        Self { log, store, sender_id }
    }

    /// The sender identifier stamped into outgoing frames.
    pub fn sender_id(&self) -> u32 {
        self.sender_id
    }

    /// Handle one inbound datagram, returning zero or more response frames.
    ///
    /// Responses are unordered with respect to each other and are all
    /// addressed to the originating peer. Frame-level validation failures
    /// are returned as errors for the transport to log and discard; nothing
    /// about a bad datagram reaches the slot store.
    pub fn handle(&self, datagram: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
        let frame = parse_frame(datagram)?;
        trace!(
            self.log,
            "frame received";
            "kind" => ?frame.kind,
            "sender_id" => frame.header.sender_id,
            "body_len" => frame.body.len(),
        );
        match frame.kind {
            MessageKind::ConnectedControllers => self.connected_controllers(frame.body),
            MessageKind::ControllerData => self.controller_data(frame.body),
            kind => {
                // Version queries, motor and rumble commands, and unknown
                // codes are observed traffic with no response defined.
                debug!(self.log, "no response defined for frame"; "kind" => ?kind);
                Ok(Vec::new())
            }
        }
    }

    // Answer a connected-controllers query: 4-byte LE requested-slot count,
    // then one byte per requested slot. One response per valid slot, built
    // from the slot's connection flag at response time.
    fn connected_controllers(&self, body: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
        if body.len() < 4 {
            debug!(self.log, "slot-count field missing"; "body_len" => body.len());
            return Ok(Vec::new());
        }
        let count = wire::decode_uint(&body[..4]) as usize;
        let connected = self.store.connected_flags();

        let mut responses = Vec::new();
        for i in 0..count {
            let Some(&requested) = body.get(4 + i) else {
                debug!(
                    self.log,
                    "query names more slots than it carries";
                    "count" => count,
                    "present" => body.len() - 4,
                );
                break;
            };
            let slot = match SlotIndex::try_from(requested) {
                Ok(slot) => slot,
                Err(_) => {
                    debug!(self.log, "skipping out-of-range requested slot"; "slot" => requested);
                    continue;
                }
            };
            let summary = payload::slot_summary(slot, connected[slot.as_usize()], self.sender_id);
            responses.push(build_response(
                MessageKind::ConnectedControllers,
                &summary,
                self.sender_id,
            )?);
        }
        Ok(responses)
    }

    // Answer a controller-data query. Byte 0 selects the addressing mode;
    // an unknown mode is a silent no-op, not an error.
    fn controller_data(&self, body: &[u8]) -> Result<Vec<Vec<u8>>, Error> {
        let requested = match body.first() {
            Some(&SELECT_BY_SLOT) => body.get(SLOT_OFFSET),
            Some(&SELECT_BY_HARDWARE_ID) => body.get(HARDWARE_ID_SLOT_OFFSET),
            Some(&mode) => {
                debug!(self.log, "ignoring unknown selection mode"; "mode" => mode);
                return Ok(Vec::new());
            }
            None => {
                debug!(self.log, "empty controller-data query");
                return Ok(Vec::new());
            }
        };
        let Some(&requested) = requested else {
            debug!(self.log, "controller-data query too short for its mode");
            return Ok(Vec::new());
        };
        let Ok(slot) = SlotIndex::try_from(requested) else {
            debug!(self.log, "ignoring out-of-range requested slot"; "slot" => requested);
            return Ok(Vec::new());
        };

        let state = self.store.snapshot(slot);
        let payload = payload::state_payload(slot, &state, self.sender_id);
        Ok(vec![build_response(
            MessageKind::ControllerData,
            &payload,
            self.sender_id,
        )?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use padcast_messages::message::build_frame;
    use padcast_messages::state::ControllerState;
    use padcast_messages::Error as ProtocolError;
    use padcast_messages::CLIENT_TAG;

    const SERVER_ID: u32 = 0x0bad_cafe;
    const CLIENT_ID: u32 = 0x1111_2222;

    fn dispatcher() -> (Dispatcher, SlotStore) {
        let log = Logger::root(slog::Discard, slog::o!());
        let store = SlotStore::new();
        (Dispatcher::new(log, store.clone(), SERVER_ID), store)
    }

    fn query(kind: MessageKind, body: &[u8]) -> Vec<u8> {
        build_frame(CLIENT_TAG, kind, body, CLIENT_ID).unwrap()
    }

    #[test]
    fn test_connected_controllers_query() {
        let (dispatcher, store) = dispatcher();
        store
            .set_slot(1, ControllerState { connected: true, ..Default::default() })
            .unwrap();

        let datagram = query(MessageKind::ConnectedControllers, &[0x02, 0, 0, 0, 0x00, 0x01]);
        let responses = dispatcher.handle(&datagram).unwrap();
        assert_eq!(responses.len(), 2);

        for (raw, slot_index) in responses.iter().zip([0u8, 1]) {
            let frame = parse_frame(raw).unwrap();
            assert_eq!(frame.kind, MessageKind::ConnectedControllers);
            assert_eq!(frame.header.sender_id, SERVER_ID);
            let slot = SlotIndex::new(slot_index).unwrap();
            let expected = payload::slot_summary(slot, slot_index == 1, SERVER_ID);
            assert_eq!(frame.body, &expected[..]);
        }
    }

    #[test]
    fn test_connected_controllers_skips_invalid_slots() {
        let (dispatcher, _store) = dispatcher();
        // Requests slots 9 and 2; only slot 2 gets an answer.
        let datagram = query(MessageKind::ConnectedControllers, &[0x02, 0, 0, 0, 0x09, 0x02]);
        let responses = dispatcher.handle(&datagram).unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(parse_frame(&responses[0]).unwrap().body[0], 2);
    }

    #[test]
    fn test_connected_controllers_truncated_slot_list() {
        let (dispatcher, _store) = dispatcher();
        // Claims 4 slots but carries 1.
        let datagram = query(MessageKind::ConnectedControllers, &[0x04, 0, 0, 0, 0x00]);
        let responses = dispatcher.handle(&datagram).unwrap();
        assert_eq!(responses.len(), 1);

        // No count field at all.
        let datagram = query(MessageKind::ConnectedControllers, &[0x01]);
        assert!(dispatcher.handle(&datagram).unwrap().is_empty());
    }

    #[test]
    fn test_controller_data_by_slot() {
        let (dispatcher, store) = dispatcher();
        let state = ControllerState {
            connected: true,
            left_stick: (7, 9),
            ..Default::default()
        };
        store.set_slot(2, state).unwrap();

        let datagram = query(MessageKind::ControllerData, &[0x01, 0x02]);
        let responses = dispatcher.handle(&datagram).unwrap();
        assert_eq!(responses.len(), 1);

        let frame = parse_frame(&responses[0]).unwrap();
        assert_eq!(frame.kind, MessageKind::ControllerData);
        let slot = SlotIndex::new(2).unwrap();
        let expected = payload::state_payload(slot, &state, SERVER_ID);
        assert_eq!(frame.body, &expected[..]);
    }

    #[test]
    fn test_controller_data_by_hardware_id() {
        let (dispatcher, store) = dispatcher();
        store
            .set_slot(3, ControllerState { connected: true, ..Default::default() })
            .unwrap();

        // Mode 2: the identifier's last byte carries the slot index.
        let body = [0x02, 0, 0, 0, 0, 0, 0, 0x03];
        let datagram = query(MessageKind::ControllerData, &body);
        let responses = dispatcher.handle(&datagram).unwrap();
        assert_eq!(responses.len(), 1);
        assert_eq!(parse_frame(&responses[0]).unwrap().body[0], 3);
    }

    #[test]
    fn test_controller_data_unknown_mode_is_a_no_op() {
        let (dispatcher, _store) = dispatcher();
        let datagram = query(MessageKind::ControllerData, &[0x09, 0x00]);
        assert!(dispatcher.handle(&datagram).unwrap().is_empty());
    }

    #[test]
    fn test_controller_data_out_of_range_slot_is_a_no_op() {
        let (dispatcher, _store) = dispatcher();
        let datagram = query(MessageKind::ControllerData, &[0x01, 0x04]);
        assert!(dispatcher.handle(&datagram).unwrap().is_empty());

        // Mode 1 with no slot byte at all.
        let datagram = query(MessageKind::ControllerData, &[0x01]);
        assert!(dispatcher.handle(&datagram).unwrap().is_empty());
    }

    #[test]
    fn test_observed_kinds_get_no_response() {
        let (dispatcher, _store) = dispatcher();
        for kind in [
            MessageKind::VersionInfo,
            MessageKind::ControllerMotor,
            MessageKind::Rumble,
        ] {
            let datagram = query(kind, &[]);
            assert!(dispatcher.handle(&datagram).unwrap().is_empty(), "{kind:?}");
        }
    }

    #[test]
    fn test_corrupt_datagram_is_rejected() {
        let (dispatcher, _store) = dispatcher();
        let mut datagram = query(MessageKind::ControllerData, &[0x01, 0x00]);
        datagram[20] ^= 0xff;
        let err = dispatcher.handle(&datagram).unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_data_response_reflects_state_at_response_time() {
        let (dispatcher, store) = dispatcher();
        let datagram = query(MessageKind::ControllerData, &[0x01, 0x00]);

        let before = dispatcher.handle(&datagram).unwrap();
        store
            .set_slot(0, ControllerState { connected: true, ..Default::default() })
            .unwrap();
        let after = dispatcher.handle(&datagram).unwrap();

        assert_eq!(parse_frame(&before[0]).unwrap().body[11], 0);
        assert_eq!(parse_frame(&after[0]).unwrap().body[11], 1);
    }
}
