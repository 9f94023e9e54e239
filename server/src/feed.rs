// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A synthetic state feed for demonstration.
//!
//! Marks all four slots connected and walks their sticks, pressures, and
//! motion sample over time, so a client subscribing to any slot sees live
//! changing data without real input hardware attached.

use crate::SlotStore;
use padcast_messages::state::Buttons;
use padcast_messages::state::ControllerState;
use padcast_messages::NUM_SLOTS;
use rand::Rng;
use slog::debug;
use slog::Logger;
use std::time::Duration;
use std::time::Instant;
use tokio::time::interval;
use tokio::time::MissedTickBehavior;

/// Periodically replaces every slot's state with a random walk.
#[derive(Debug)]
pub struct SyntheticFeed {
    log: Logger,
    store: SlotStore,
    period: Duration,
}

impl SyntheticFeed {
    /// Create a feed updating `store` once per `period`.
    pub fn new(log: Logger, store: SlotStore, period: Duration) -> Self {
        Self { log, store, period }
    }

    /// Drive the feed until the task is dropped.
    pub async fn run(self) {
        debug!(self.log, "synthetic feed starting"; "period" => ?self.period);
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let started = Instant::now();
        let mut states = [ControllerState::default(); NUM_SLOTS];
        for state in &mut states {
            state.connected = true;
            state.left_stick = (0x80, 0x80);
            state.right_stick = (0x80, 0x80);
        }

        loop {
            ticker.tick().await;
            // ThreadRng is !Send; acquire the thread-local handle per tick so
            // the future stays Send for tokio::spawn.
            let mut rng = rand::thread_rng();
            let timestamp_ms = started.elapsed().as_millis() as u64;
            for state in &mut states {
                step(&mut rng, state, timestamp_ms);
            }
            self.store.set_all(states);
        }
    }
}

// Advance one slot's state by a small random amount.
fn step(rng: &mut impl Rng, state: &mut ControllerState, timestamp_ms: u64) {
    state.left_stick.0 = drift(rng, state.left_stick.0);
    state.left_stick.1 = drift(rng, state.left_stick.1);
    state.right_stick.0 = drift(rng, state.right_stick.0);
    state.right_stick.1 = drift(rng, state.right_stick.1);
    for v in &mut state.analog_dpad {
        *v = drift(rng, *v);
    }
    for v in &mut state.analog_buttons {
        *v = drift(rng, *v);
    }

    if rng.gen_bool(0.05) {
        state.buttons.toggle(Buttons::from_bits_truncate(1 << rng.gen_range(0..8)));
    }
    if rng.gen_bool(0.01) {
        state.home = !state.home;
    }

    state.motion.timestamp_ms = timestamp_ms;
    state.motion.accel = [
        rng.gen_range(-0.1..0.1),
        rng.gen_range(-0.1..0.1),
        1.0 + rng.gen_range(-0.1..0.1),
    ];
    state.motion.gyro = [
        rng.gen_range(-30.0..30.0),
        rng.gen_range(-30.0..30.0),
        rng.gen_range(-30.0..30.0),
    ];
}

// Random walk on a raw analog byte, saturating at the ends of the range.
fn drift(rng: &mut impl Rng, v: u8) -> u8 {
    let delta = rng.gen_range(-8i16..=8);
    i16::from(v).saturating_add(delta).clamp(0, 255) as u8
}
