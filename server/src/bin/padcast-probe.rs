// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimal query client for poking a running server by hand.

use clap::Parser;
use padcast_messages::message::build_frame;
use padcast_messages::message::parse_frame;
use padcast_messages::message::MessageKind;
use padcast_messages::wire;
use padcast_messages::CLIENT_TAG;
use padcast_messages::NUM_SLOTS;
use std::net::Ipv4Addr;
use std::net::SocketAddr;
use tokio::net::UdpSocket;

/// Query a controller-state server and print what it reports.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// The server to query.
    #[arg(short, long, default_value_t = SocketAddr::from(([127, 0, 0, 1], padcast_messages::PORT)))]
    server: SocketAddr,

    /// The slot whose input state to fetch.
    #[arg(long, default_value_t = 0)]
    slot: u8,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let sock = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).await.unwrap();
    let sender_id: u32 = rand::random();
    let mut buf = [0u8; 2048];

    // Ask about every slot.
    let query = build_frame(
        CLIENT_TAG,
        MessageKind::ConnectedControllers,
        &[NUM_SLOTS as u8, 0, 0, 0, 0, 1, 2, 3],
        sender_id,
    )
    .unwrap();
    sock.send_to(&query, args.server).await.unwrap();
    for _ in 0..NUM_SLOTS {
        let (n_bytes, _) = sock.recv_from(&mut buf).await.unwrap();
        let frame = parse_frame(&buf[..n_bytes]).unwrap();
        let body = frame.body;
        println!(
            "slot {}: connected={} id={:02x?} battery={}",
            body[0],
            body[1] != 0,
            &body[4..10],
            body[10],
        );
    }

    // Fetch one slot's state.
    let query = build_frame(
        CLIENT_TAG,
        MessageKind::ControllerData,
        &[1, args.slot],
        sender_id,
    )
    .unwrap();
    sock.send_to(&query, args.server).await.unwrap();
    let (n_bytes, _) = sock.recv_from(&mut buf).await.unwrap();
    let frame = parse_frame(&buf[..n_bytes]).unwrap();
    let body = frame.body;
    println!(
        "slot {} data: connected={} buttons={:#010b} home={} \
        left=({}, {}) right=({}, {}) t={}ms accel=({:.3}, {:.3}, {:.3})",
        body[0],
        body[11] != 0,
        body[16],
        body[18],
        body[20],
        body[21],
        body[22],
        body[23],
        wire::decode_uint(&body[48..56]),
        wire::get_f32_le(&body[56..]),
        wire::get_f32_le(&body[60..]),
        wire::get_f32_le(&body[64..]),
    );
}
