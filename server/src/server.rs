// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The UDP transport loop.

use crate::Config;
use crate::Dispatcher;
use crate::Error;
use slog::debug;
use slog::error;
use slog::trace;
use slog::Logger;
use std::net::SocketAddr;
use tokio::net::UdpSocket;

// Receive buffer size. Generously above MAX_FRAME_SIZE so oversized garbage
// arrives whole and fails validation rather than being silently truncated.
const RX_BUF_SIZE: usize = 2048;

/// The server: one UDP socket and the dispatcher answering its traffic.
#[derive(Debug)]
pub struct Server {
    log: Logger,
    socket: UdpSocket,
    dispatcher: Dispatcher,
}

impl Server {
    /// Bind the listening socket described by `config`.
    pub async fn bind(config: &Config, log: Logger, dispatcher: Dispatcher) -> Result<Self, Error> {
        let socket = UdpSocket::bind((config.address, config.port)).await?;
        debug!(
            log,
            "bound UDP socket";
            "local_addr" => ?socket.local_addr(),
        );
        Ok(Self { log, socket, dispatcher })
    }

    /// The bound local address.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.socket.local_addr()?)
    }

    /// Receive datagrams and answer them until the task is dropped.
    ///
    /// Each inbound datagram is handled independently: malformed or corrupt
    /// frames are logged and discarded, and a failed send is logged without
    /// tearing the loop down. Loss is the peer's problem; there are no
    /// retries.
    pub async fn run(self) {
        let mut rx_buf = [0; RX_BUF_SIZE];
        loop {
            let (n_bytes, peer) = match self.socket.recv_from(&mut rx_buf).await {
                Err(e) => {
                    error!(self.log, "I/O error receiving UDP packet: {e:?}");
                    continue;
                }
                Ok((n_bytes, peer)) => {
                    trace!(
                        self.log,
                        "packet received";
                        "n_bytes" => n_bytes,
                        "peer" => %peer,
                    );
                    (n_bytes, peer)
                }
            };

            let responses = match self.dispatcher.handle(&rx_buf[..n_bytes]) {
                Ok(responses) => responses,
                Err(e) => {
                    debug!(
                        self.log,
                        "discarding invalid datagram";
                        "peer" => %peer,
                        "reason" => %e,
                    );
                    continue;
                }
            };

            for frame in responses {
                match self.socket.send_to(&frame, peer).await {
                    Err(e) => {
                        error!(
                            self.log,
                            "failed to send response";
                            "peer" => %peer,
                            "reason" => ?e,
                        );
                    }
                    Ok(n_sent) => {
                        trace!(
                            self.log,
                            "sent response";
                            "peer" => %peer,
                            "n_bytes" => n_sent,
                        );
                    }
                }
            }
        }
    }
}
