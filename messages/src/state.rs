// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The in-memory model of one virtual controller's input state.

use crate::Error;
use crate::NUM_SLOTS;

bitflags::bitflags! {
    /// The digital button mask carried at byte 16 of the controller-data
    /// payload, packed LSB-first.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Buttons: u8 {
        const DPAD_LEFT  = 0b0000_0001;
        const DPAD_DOWN  = 0b0000_0010;
        const DPAD_RIGHT = 0b0000_0100;
        const DPAD_UP    = 0b0000_1000;
        const OPTIONS    = 0b0001_0000;
        const R3         = 0b0010_0000;
        const L3         = 0b0100_0000;
        const SHARE      = 0b1000_0000;
    }
}

/// One motion-sensor sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionSample {
    /// Sample timestamp in milliseconds.
    pub timestamp_ms: u64,
    /// Accelerometer X, Y, Z.
    pub accel: [f32; 3],
    /// Gyroscope pitch, yaw, roll, in degrees per second.
    pub gyro: [f32; 3],
}

/// The full input state of one virtual controller slot.
///
/// Created at server startup as four disconnected, all-zero states, replaced
/// by the state-update feed at any time, and read (never mutated) when
/// building a response.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControllerState {
    /// Whether a controller occupies this slot.
    pub connected: bool,
    /// The digital buttons currently held.
    pub buttons: Buttons,
    /// The Home button, reported separately from the mask.
    pub home: bool,
    /// Left stick X and Y, raw analog `0..=255`.
    pub left_stick: (u8, u8),
    /// Right stick X and Y, raw analog `0..=255`.
    pub right_stick: (u8, u8),
    /// Analog D-pad pressures: Left, Down, Right, Up.
    pub analog_dpad: [u8; 4],
    /// Analog face and shoulder pressures: Y, B, A, X, R1, L1, R2, L2.
    pub analog_buttons: [u8; 8],
    /// The most recent motion-sensor sample.
    pub motion: MotionSample,
}

/// Index of one of the four fixed virtual controller slots.
///
/// Construction validates the range, so holders of a `SlotIndex` may index
/// the slot array without further checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotIndex(u8);

impl SlotIndex {
    /// Every valid slot, in order.
    pub const ALL: [SlotIndex; NUM_SLOTS] =
        [SlotIndex(0), SlotIndex(1), SlotIndex(2), SlotIndex(3)];

    /// Validate `index` as a slot index.
    pub const fn new(index: u8) -> Result<Self, Error> {
        if (index as usize) < NUM_SLOTS {
            Ok(Self(index))
        } else {
            Err(Error::SlotIndexOutOfRange(index))
        }
    }

    /// The raw index, in `[0, 3]`.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The index as a `usize`, for slot-array access.
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for SlotIndex {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self, Error> {
        Self::new(index)
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_index_range() {
        for i in 0..4u8 {
            assert_eq!(SlotIndex::new(i).unwrap().get(), i);
        }
        assert_eq!(SlotIndex::new(4), Err(Error::SlotIndexOutOfRange(4)));
        assert_eq!(SlotIndex::try_from(0xff), Err(Error::SlotIndexOutOfRange(0xff)));
    }

    #[test]
    fn test_default_state_is_disconnected_and_zeroed() {
        let state = ControllerState::default();
        assert!(!state.connected);
        assert!(state.buttons.is_empty());
        assert_eq!(state.left_stick, (0, 0));
        assert_eq!(state.motion, MotionSample::default());
    }

    #[test]
    fn test_button_bit_positions() {
        assert_eq!(Buttons::DPAD_LEFT.bits(), 1 << 0);
        assert_eq!(Buttons::DPAD_DOWN.bits(), 1 << 1);
        assert_eq!(Buttons::DPAD_RIGHT.bits(), 1 << 2);
        assert_eq!(Buttons::DPAD_UP.bits(), 1 << 3);
        assert_eq!(Buttons::OPTIONS.bits(), 1 << 4);
        assert_eq!(Buttons::R3.bits(), 1 << 5);
        assert_eq!(Buttons::L3.bits(), 1 << 6);
        assert_eq!(Buttons::SHARE.bits(), 1 << 7);
    }
}
