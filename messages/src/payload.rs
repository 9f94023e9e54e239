// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serialization of controller state into the protocol's response payloads.
//!
//! The offset tables implemented here are the wire contract: every labeled
//! byte must land exactly where clients expect it, and every unlabeled byte
//! stays zero.

use crate::state::ControllerState;
use crate::state::SlotIndex;
use crate::wire;

/// Length of the slot-info summary payload.
pub const SLOT_SUMMARY_LEN: usize = 12;

/// Length of the full controller-data payload.
pub const STATE_PAYLOAD_LEN: usize = 80;

// Constant bytes reported in the summary of a connected slot.
const SLOT_STATE_CONNECTED: u8 = 2;
const DEVICE_MODEL_FULL_GYRO: u8 = 2;
const CONNECTION_TYPE_USB: u8 = 1;
const BATTERY_FULL: u8 = 5;

/// Synthesize the 6-byte hardware-style identifier for a slot.
///
/// The sender identifier provides the first four bytes; the last byte is the
/// slot index, so the four slots report distinct identifiers within one
/// server process.
fn slot_hardware_id(slot: SlotIndex, sender_id: u32) -> [u8; 6] {
    let id = sender_id.to_le_bytes();
    [id[0], id[1], id[2], id[3], 0, slot.get()]
}

/// Render the 12-byte slot-info summary.
///
/// Byte 0 is the slot index. A disconnected slot reports nothing else; a
/// connected slot carries the slot-state, device-model, and connection-type
/// constants at bytes 1-3, the synthesized identifier at bytes 4-9, and the
/// battery constant at byte 10. Byte 11 is always zero here.
pub fn slot_summary(slot: SlotIndex, connected: bool, sender_id: u32) -> [u8; SLOT_SUMMARY_LEN] {
    let mut out = [0u8; SLOT_SUMMARY_LEN];
    out[0] = slot.get();
    if connected {
        out[1] = SLOT_STATE_CONNECTED;
        out[2] = DEVICE_MODEL_FULL_GYRO;
        out[3] = CONNECTION_TYPE_USB;
        out[4..10].copy_from_slice(&slot_hardware_id(slot, sender_id));
        out[10] = BATTERY_FULL;
    }
    out
}

/// Render the fixed 80-byte controller-data payload for one slot.
///
/// Layout:
///
/// | offset  | contents                                              |
/// |---------|-------------------------------------------------------|
/// | 0-10    | [`slot_summary`] bytes 0-10                           |
/// | 11      | connection flag, `1` iff connected                    |
/// | 12-14   | sender-identifier bytes 0-2 (packet-counter placeholder) |
/// | 15      | slot index                                            |
/// | 16      | [`crate::state::Buttons`] mask                        |
/// | 18      | Home button                                           |
/// | 20-23   | left stick X, Y; right stick X, Y                     |
/// | 24-27   | analog D-pad Left, Down, Right, Up                    |
/// | 28-35   | analog Y, B, A, X, R1, L1, R2, L2                     |
/// | 48-55   | motion timestamp, u64 LE milliseconds                 |
/// | 56-67   | accelerometer X, Y, Z, f32 LE                         |
/// | 68-79   | gyroscope pitch, yaw, roll, f32 LE                    |
///
/// Bytes 17, 19, and 36-47 are reserved and zero.
pub fn state_payload(
    slot: SlotIndex,
    state: &ControllerState,
    sender_id: u32,
) -> [u8; STATE_PAYLOAD_LEN] {
    let mut out = [0u8; STATE_PAYLOAD_LEN];
    out[..SLOT_SUMMARY_LEN].copy_from_slice(&slot_summary(slot, state.connected, sender_id));
    out[11] = u8::from(state.connected);

    out[12..15].copy_from_slice(&sender_id.to_le_bytes()[..3]);
    out[15] = slot.get();

    out[16] = state.buttons.bits();
    out[18] = u8::from(state.home);

    out[20] = state.left_stick.0;
    out[21] = state.left_stick.1;
    out[22] = state.right_stick.0;
    out[23] = state.right_stick.1;
    out[24..28].copy_from_slice(&state.analog_dpad);
    out[28..36].copy_from_slice(&state.analog_buttons);

    out[48..56].copy_from_slice(&state.motion.timestamp_ms.to_le_bytes());
    for (i, v) in state.motion.accel.iter().enumerate() {
        wire::put_f32_le(&mut out[56 + 4 * i..], *v);
    }
    for (i, v) in state.motion.gyro.iter().enumerate() {
        wire::put_f32_le(&mut out[68 + 4 * i..], *v);
    }
    out
}
