// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration of the controller-state server.

use padcast_messages::PORT;
use std::net::IpAddr;
use std::net::Ipv4Addr;

/// Return the default address on which the server listens.
pub const fn default_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

/// Return the default UDP port on which the server listens.
pub const fn default_port() -> u16 {
    PORT
}

/// Configuration for a [`crate::Server`].
#[derive(Clone, Debug)]
pub struct Config {
    /// The address on which to listen for queries.
    pub address: IpAddr,

    /// The UDP port on which to listen.
    ///
    /// Clients discover servers on [`default_port`]; anything else is only
    /// useful for testing.
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::default().build()
    }
}

/// A builder interface for generating server configuration.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    address: Option<IpAddr>,
    port: Option<u16>,
}

impl ConfigBuilder {
    /// Create a builder with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listen address.
    pub fn address(mut self, address: impl Into<IpAddr>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Set the listen port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Build a `Config` from `self`.
    pub fn build(self) -> Config {
        Config {
            address: self.address.unwrap_or_else(default_address),
            port: self.port.unwrap_or_else(default_port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = ConfigBuilder::new().build();
        assert_eq!(config.address, default_address());
        assert_eq!(config.port, PORT);
    }

    #[test]
    fn test_config_builder_overrides() {
        let config = ConfigBuilder::new()
            .address(Ipv4Addr::LOCALHOST)
            .port(0)
            .build();
        assert_eq!(config.address, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.port, 0);
    }
}
