// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A UDP server for the virtual controller-state protocol.
//!
//! The server answers connected-controllers and controller-data queries for
//! four fixed virtual controller slots. The wire format lives in
//! `padcast-messages`; this crate owns the slot store, the request
//! dispatcher, the UDP loop, and the synthetic state feed used for
//! demonstration.

mod config;
mod dispatch;
mod feed;
mod server;
mod store;

pub use config::Config;
pub use config::ConfigBuilder;
pub use dispatch::Dispatcher;
pub use feed::SyntheticFeed;
pub use server::Server;
pub use store::SlotStore;

/// Errors produced by the server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A wire-format error. On the receive path these are expected, logged,
    /// and never fatal.
    #[error(transparent)]
    Protocol(#[from] padcast_messages::Error),

    /// A network I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
