// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::Context;
use clap::Parser;
use padcast_server::ConfigBuilder;
use padcast_server::Dispatcher;
use padcast_server::Server;
use padcast_server::SlotStore;
use padcast_server::SyntheticFeed;
use slog::Drain;
use slog::Level;
use std::net::IpAddr;
use std::time::Duration;

fn parse_log_level(s: &str) -> Result<Level, String> {
    s.parse().map_err(|_| String::from("invalid log level"))
}

/// Serve virtual controller state over UDP.
///
/// Answers connected-controllers and controller-data queries for four
/// virtual controller slots, fed by a synthetic input generator.
#[derive(Parser)]
#[command(version, about, long_about)]
struct Args {
    /// The address on which to listen for queries.
    #[arg(short, long, default_value_t = padcast_server::Config::default().address)]
    address: IpAddr,

    /// The UDP port on which to listen.
    #[arg(short, long, default_value_t = padcast_messages::PORT)]
    port: u16,

    /// The synthetic feed update interval, in milliseconds.
    #[arg(
        short,
        long,
        default_value_t = 20,
        value_parser = clap::value_parser!(u64).range(1..=1000)
    )]
    update_interval: u64,

    /// The log-level.
    #[arg(
        short,
        long,
        default_value_t = Level::Info,
        value_parser = parse_log_level
    )]
    log_level: Level,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = ConfigBuilder::new()
        .address(args.address)
        .port(args.port)
        .build();

    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog::LevelFilter::new(drain, args.log_level).fuse();
    let log = slog::Logger::root(drain, slog::o!());

    // The sender identifier is chosen once per process and stamped into
    // every outgoing header.
    let sender_id: u32 = rand::random();

    let store = SlotStore::new();
    let dispatcher = Dispatcher::new(
        log.new(slog::o!("task" => "dispatch")),
        store.clone(),
        sender_id,
    );
    let server = Server::bind(&config, log.new(slog::o!("task" => "io")), dispatcher)
        .await
        .context("failed to bind listening socket")?;
    let local_addr = server.local_addr()?;
    slog::info!(
        log,
        "listening";
        "local_addr" => %local_addr,
        "sender_id" => format!("{sender_id:#010x}"),
    );

    let feed = SyntheticFeed::new(
        log.new(slog::o!("task" => "feed")),
        store,
        Duration::from_millis(args.update_interval),
    );
    let feed_task = tokio::spawn(feed.run());
    let server_task = tokio::spawn(server.run());

    tokio::select! {
        result = feed_task => result.context("feed task panicked")?,
        result = server_task => result.context("server task panicked")?,
        _ = tokio::signal::ctrl_c() => {
            slog::info!(log, "received interrupt, shutting down");
        }
    }
    Ok(())
}
