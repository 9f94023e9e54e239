// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The shared store of the four controller slot states.

use crate::Error;
use padcast_messages::state::ControllerState;
use padcast_messages::state::SlotIndex;
use padcast_messages::NUM_SLOTS;
use std::sync::Arc;
use std::sync::RwLock;

/// A shared handle to the process's four controller slot states.
///
/// The dispatcher reads slot snapshots per request while a state feed
/// replaces slots asynchronously. The lock guarantees every response is
/// built from one consistent snapshot, never a mix of old and new fields.
/// Critical sections are pure copies; the lock is never held across an
/// `.await`, so a std `RwLock` suffices under tokio.
#[derive(Clone, Debug, Default)]
pub struct SlotStore {
    slots: Arc<RwLock<[ControllerState; NUM_SLOTS]>>,
}

impl SlotStore {
    /// Create a store with all four slots disconnected and zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the state of a single slot.
    ///
    /// Fails with [`padcast_messages::Error::SlotIndexOutOfRange`] for
    /// indices outside `[0, 3]`. That is a bug in the calling state feed,
    /// not wire input, so it is reported rather than swallowed.
    pub fn set_slot(&self, index: u8, state: ControllerState) -> Result<(), Error> {
        let slot = SlotIndex::try_from(index)?;
        let mut slots = self.slots.write().unwrap();
        slots[slot.as_usize()] = state;
        Ok(())
    }

    /// Replace all four slots at once, atomically with respect to readers.
    pub fn set_all(&self, states: [ControllerState; NUM_SLOTS]) {
        *self.slots.write().unwrap() = states;
    }

    /// Return a consistent snapshot of one slot.
    pub fn snapshot(&self, slot: SlotIndex) -> ControllerState {
        self.slots.read().unwrap()[slot.as_usize()]
    }

    /// Return the connection flag of every slot.
    pub fn connected_flags(&self) -> [bool; NUM_SLOTS] {
        let slots = self.slots.read().unwrap();
        [
            slots[0].connected,
            slots[1].connected,
            slots[2].connected,
            slots[3].connected,
        ]
    }
}
