// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VLAN state nodes: member ports, neighbor response tables and DHCP relay
//! settings.

use std::collections::BTreeMap;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use net::Mac;

use crate::types::{InterfaceId, PortId, VlanId};

/// Per-port membership attributes of a VLAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortInfo {
    /// Whether frames leave the member port tagged.
    pub emit_tags: bool,
}

/// The set of ports belonging to a VLAN.
pub type MemberPorts = BTreeMap<PortId, PortInfo>;

/// What the switch answers on behalf of an address it owns: the MAC of the
/// owning interface and that interface's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborResponseEntry {
    pub mac: Mac,
    pub interface_id: InterfaceId,
}

/// Addresses the switch answers ARP requests for on a VLAN.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ArpResponseTable {
    table: BTreeMap<Ipv4Addr, NeighborResponseEntry>,
}

impl ArpResponseTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn from_table(table: BTreeMap<Ipv4Addr, NeighborResponseEntry>) -> Self {
        Self { table }
    }
    #[must_use]
    pub fn table(&self) -> &BTreeMap<Ipv4Addr, NeighborResponseEntry> {
        &self.table
    }
}

/// Addresses the switch answers NDP neighbor solicitations for on a VLAN,
/// including the derived link-local address of each interface.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NdpResponseTable {
    table: BTreeMap<Ipv6Addr, NeighborResponseEntry>,
}

impl NdpResponseTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn from_table(table: BTreeMap<Ipv6Addr, NeighborResponseEntry>) -> Self {
        Self { table }
    }
    #[must_use]
    pub fn table(&self) -> &BTreeMap<Ipv6Addr, NeighborResponseEntry> {
        &self.table
    }
}

/// State of one VLAN.
#[derive(Debug, Clone, PartialEq)]
pub struct Vlan {
    id: VlanId,
    name: String,
    /// The routed interface on this VLAN; 0 when the VLAN has none.
    interface_id: InterfaceId,
    ports: MemberPorts,
    arp_response_table: Arc<ArpResponseTable>,
    ndp_response_table: Arc<NdpResponseTable>,
    dhcp_v4_relay: Ipv4Addr,
    dhcp_v6_relay: Ipv6Addr,
    dhcp_v4_overrides: BTreeMap<Mac, Ipv4Addr>,
    dhcp_v6_overrides: BTreeMap<Mac, Ipv6Addr>,
}

impl Vlan {
    #[must_use]
    pub fn new(id: VlanId, name: impl Into<String>, ports: MemberPorts) -> Self {
        Self {
            id,
            name: name.into(),
            interface_id: InterfaceId(0),
            ports,
            arp_response_table: Arc::new(ArpResponseTable::new()),
            ndp_response_table: Arc::new(NdpResponseTable::new()),
            dhcp_v4_relay: Ipv4Addr::UNSPECIFIED,
            dhcp_v6_relay: Ipv6Addr::UNSPECIFIED,
            dhcp_v4_overrides: BTreeMap::new(),
            dhcp_v6_overrides: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> VlanId {
        self.id
    }
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[must_use]
    pub fn interface_id(&self) -> InterfaceId {
        self.interface_id
    }
    #[must_use]
    pub fn ports(&self) -> &MemberPorts {
        &self.ports
    }
    #[must_use]
    pub fn arp_response_table(&self) -> &Arc<ArpResponseTable> {
        &self.arp_response_table
    }
    #[must_use]
    pub fn ndp_response_table(&self) -> &Arc<NdpResponseTable> {
        &self.ndp_response_table
    }
    #[must_use]
    pub fn dhcp_v4_relay(&self) -> Ipv4Addr {
        self.dhcp_v4_relay
    }
    #[must_use]
    pub fn dhcp_v6_relay(&self) -> Ipv6Addr {
        self.dhcp_v6_relay
    }
    #[must_use]
    pub fn dhcp_v4_overrides(&self) -> &BTreeMap<Mac, Ipv4Addr> {
        &self.dhcp_v4_overrides
    }
    #[must_use]
    pub fn dhcp_v6_overrides(&self) -> &BTreeMap<Mac, Ipv6Addr> {
        &self.dhcp_v6_overrides
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
    pub fn set_interface_id(&mut self, id: InterfaceId) {
        self.interface_id = id;
    }
    pub fn set_ports(&mut self, ports: MemberPorts) {
        self.ports = ports;
    }
    pub fn set_arp_response_table(&mut self, table: Arc<ArpResponseTable>) {
        self.arp_response_table = table;
    }
    pub fn set_ndp_response_table(&mut self, table: Arc<NdpResponseTable>) {
        self.ndp_response_table = table;
    }
    pub fn set_dhcp_v4_relay(&mut self, relay: Ipv4Addr) {
        self.dhcp_v4_relay = relay;
    }
    pub fn set_dhcp_v6_relay(&mut self, relay: Ipv6Addr) {
        self.dhcp_v6_relay = relay;
    }
    pub fn set_dhcp_v4_overrides(&mut self, overrides: BTreeMap<Mac, Ipv4Addr>) {
        self.dhcp_v4_overrides = overrides;
    }
    pub fn set_dhcp_v6_overrides(&mut self, overrides: BTreeMap<Mac, Ipv6Addr>) {
        self.dhcp_v6_overrides = overrides;
    }
}

/// The VLAN collection, iterated in id order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VlanMap {
    vlans: BTreeMap<VlanId, Arc<Vlan>>,
}

impl VlanMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn from_vlans(vlans: BTreeMap<VlanId, Arc<Vlan>>) -> Self {
        Self { vlans }
    }
    #[must_use]
    pub fn get(&self, id: VlanId) -> Option<&Arc<Vlan>> {
        self.vlans.get(&id)
    }
    pub fn values(&self) -> impl Iterator<Item = &Arc<Vlan>> {
        self.vlans.values()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.vlans.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vlans.is_empty()
    }

    /// Register a VLAN at boot time.
    pub fn add_vlan(&mut self, vlan: Vlan) {
        self.vlans.insert(vlan.id(), Arc::new(vlan));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn new_vlan_has_empty_tables_and_unspecified_relays() {
        let vlan = Vlan::new(VlanId(10), "front", MemberPorts::new());
        assert!(vlan.arp_response_table().table().is_empty());
        assert!(vlan.ndp_response_table().table().is_empty());
        assert_eq!(vlan.dhcp_v4_relay(), Ipv4Addr::UNSPECIFIED);
        assert_eq!(vlan.dhcp_v6_relay(), Ipv6Addr::UNSPECIFIED);
        assert_eq!(vlan.interface_id(), InterfaceId(0));
    }

    #[test]
    fn response_tables_share_until_replaced() {
        let vlan = Vlan::new(VlanId(10), "front", MemberPorts::new());
        let clone = vlan.clone();
        assert!(Arc::ptr_eq(
            vlan.arp_response_table(),
            clone.arp_response_table()
        ));
    }
}
