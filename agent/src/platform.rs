// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The platform provider: the few facts about the underlying hardware the
//! applier needs. Implemented by the hardware layer; tests supply a fixed
//! in-memory platform.

use config::port::{AdminState, PortConfig};
use net::Mac;
use state::interface::Interface;
use state::port::Port;

/// Hardware facts consumed by the applier.
pub trait Platform {
    /// The switch's own MAC address. Used as the default interface MAC and
    /// as the default LACP actor system id.
    fn local_mac(&self) -> Mac;

    /// Number of egress queues the hardware provides on `port`. Queue ids in
    /// the config must be below this count.
    fn queue_count(&self, port: &Port) -> usize;

    /// The configuration applied to a port the document does not mention:
    /// keep its identity, shut it down, drop everything else to defaults.
    fn default_port_config(&self, port: &Port) -> PortConfig {
        PortConfig {
            logical_id: port.id().raw(),
            name: port.name().to_string(),
            state: AdminState::Disabled,
            ingress_vlan: port.ingress_vlan().raw(),
            ..PortConfig::default()
        }
    }

    /// MTU for interfaces whose config does not specify one.
    fn default_mtu(&self) -> u16 {
        Interface::DEFAULT_MTU
    }
}
