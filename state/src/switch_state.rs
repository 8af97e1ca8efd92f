// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The root of the switch-state tree.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use std::time::Duration;

use crate::acl::AclMap;
use crate::aggregate_port::AggregatePortMap;
use crate::control_plane::ControlPlane;
use crate::interface::InterfaceMap;
use crate::load_balancer::LoadBalancerMap;
use crate::port::PortMap;
use crate::route::RouteTableMap;
use crate::sflow_collector::SflowCollectorMap;
use crate::types::VlanId;
use crate::vlan::VlanMap;

/// The complete, immutable state of the switch. `clone()` shares every child
/// collection; a `reset_*` call replaces exactly one child. A state that has
/// been published must never be mutated again; the applier only mutates the
/// private clone it is preparing.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchState {
    ports: Arc<PortMap>,
    vlans: Arc<VlanMap>,
    interfaces: Arc<InterfaceMap>,
    acls: Arc<AclMap>,
    aggregate_ports: Arc<AggregatePortMap>,
    sflow_collectors: Arc<SflowCollectorMap>,
    route_tables: Arc<RouteTableMap>,
    load_balancers: Arc<LoadBalancerMap>,
    control_plane: Arc<ControlPlane>,
    default_vlan: VlanId,
    arp_ager_interval: Duration,
    arp_timeout: Duration,
    ndp_timeout: Duration,
    max_neighbor_probes: u32,
    stale_entry_interval: Duration,
    dhcp_v4_relay_src: Ipv4Addr,
    dhcp_v6_relay_src: Ipv6Addr,
    dhcp_v4_reply_src: Ipv4Addr,
    dhcp_v6_reply_src: Ipv6Addr,
}

impl Default for SwitchState {
    fn default() -> Self {
        Self::new()
    }
}

impl SwitchState {
    /// A boot state: empty collections, conventional timer defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ports: Arc::new(PortMap::new()),
            vlans: Arc::new(VlanMap::new()),
            interfaces: Arc::new(InterfaceMap::new()),
            acls: Arc::new(AclMap::new()),
            aggregate_ports: Arc::new(AggregatePortMap::new()),
            sflow_collectors: Arc::new(SflowCollectorMap::new()),
            route_tables: Arc::new(RouteTableMap::new()),
            load_balancers: Arc::new(LoadBalancerMap::new()),
            control_plane: Arc::new(ControlPlane::new()),
            default_vlan: VlanId(0),
            arp_ager_interval: Duration::from_secs(5),
            arp_timeout: Duration::from_secs(60),
            ndp_timeout: Duration::from_secs(60),
            max_neighbor_probes: 300,
            stale_entry_interval: Duration::from_secs(10),
            dhcp_v4_relay_src: Ipv4Addr::UNSPECIFIED,
            dhcp_v6_relay_src: Ipv6Addr::UNSPECIFIED,
            dhcp_v4_reply_src: Ipv4Addr::UNSPECIFIED,
            dhcp_v6_reply_src: Ipv6Addr::UNSPECIFIED,
        }
    }

    #[must_use]
    pub fn ports(&self) -> &Arc<PortMap> {
        &self.ports
    }
    #[must_use]
    pub fn vlans(&self) -> &Arc<VlanMap> {
        &self.vlans
    }
    #[must_use]
    pub fn interfaces(&self) -> &Arc<InterfaceMap> {
        &self.interfaces
    }
    #[must_use]
    pub fn acls(&self) -> &Arc<AclMap> {
        &self.acls
    }
    #[must_use]
    pub fn aggregate_ports(&self) -> &Arc<AggregatePortMap> {
        &self.aggregate_ports
    }
    #[must_use]
    pub fn sflow_collectors(&self) -> &Arc<SflowCollectorMap> {
        &self.sflow_collectors
    }
    #[must_use]
    pub fn route_tables(&self) -> &Arc<RouteTableMap> {
        &self.route_tables
    }
    #[must_use]
    pub fn load_balancers(&self) -> &Arc<LoadBalancerMap> {
        &self.load_balancers
    }
    #[must_use]
    pub fn control_plane(&self) -> &Arc<ControlPlane> {
        &self.control_plane
    }
    #[must_use]
    pub fn default_vlan(&self) -> VlanId {
        self.default_vlan
    }
    #[must_use]
    pub fn arp_ager_interval(&self) -> Duration {
        self.arp_ager_interval
    }
    #[must_use]
    pub fn arp_timeout(&self) -> Duration {
        self.arp_timeout
    }
    #[must_use]
    pub fn ndp_timeout(&self) -> Duration {
        self.ndp_timeout
    }
    #[must_use]
    pub fn max_neighbor_probes(&self) -> u32 {
        self.max_neighbor_probes
    }
    #[must_use]
    pub fn stale_entry_interval(&self) -> Duration {
        self.stale_entry_interval
    }
    #[must_use]
    pub fn dhcp_v4_relay_src(&self) -> Ipv4Addr {
        self.dhcp_v4_relay_src
    }
    #[must_use]
    pub fn dhcp_v6_relay_src(&self) -> Ipv6Addr {
        self.dhcp_v6_relay_src
    }
    #[must_use]
    pub fn dhcp_v4_reply_src(&self) -> Ipv4Addr {
        self.dhcp_v4_reply_src
    }
    #[must_use]
    pub fn dhcp_v6_reply_src(&self) -> Ipv6Addr {
        self.dhcp_v6_reply_src
    }

    pub fn reset_ports(&mut self, ports: Arc<PortMap>) {
        self.ports = ports;
    }
    pub fn reset_vlans(&mut self, vlans: Arc<VlanMap>) {
        self.vlans = vlans;
    }
    pub fn reset_interfaces(&mut self, interfaces: Arc<InterfaceMap>) {
        self.interfaces = interfaces;
    }
    pub fn reset_acls(&mut self, acls: Arc<AclMap>) {
        self.acls = acls;
    }
    pub fn reset_aggregate_ports(&mut self, ports: Arc<AggregatePortMap>) {
        self.aggregate_ports = ports;
    }
    pub fn reset_sflow_collectors(&mut self, collectors: Arc<SflowCollectorMap>) {
        self.sflow_collectors = collectors;
    }
    pub fn reset_route_tables(&mut self, tables: Arc<RouteTableMap>) {
        self.route_tables = tables;
    }
    pub fn reset_load_balancers(&mut self, balancers: Arc<LoadBalancerMap>) {
        self.load_balancers = balancers;
    }
    pub fn reset_control_plane(&mut self, control_plane: Arc<ControlPlane>) {
        self.control_plane = control_plane;
    }

    pub fn set_default_vlan(&mut self, vlan: VlanId) {
        self.default_vlan = vlan;
    }
    pub fn set_arp_ager_interval(&mut self, interval: Duration) {
        self.arp_ager_interval = interval;
    }
    pub fn set_arp_timeout(&mut self, timeout: Duration) {
        self.arp_timeout = timeout;
    }
    pub fn set_ndp_timeout(&mut self, timeout: Duration) {
        self.ndp_timeout = timeout;
    }
    pub fn set_max_neighbor_probes(&mut self, probes: u32) {
        self.max_neighbor_probes = probes;
    }
    pub fn set_stale_entry_interval(&mut self, interval: Duration) {
        self.stale_entry_interval = interval;
    }
    pub fn set_dhcp_v4_relay_src(&mut self, src: Ipv4Addr) {
        self.dhcp_v4_relay_src = src;
    }
    pub fn set_dhcp_v6_relay_src(&mut self, src: Ipv6Addr) {
        self.dhcp_v6_relay_src = src;
    }
    pub fn set_dhcp_v4_reply_src(&mut self, src: Ipv4Addr) {
        self.dhcp_v4_reply_src = src;
    }
    pub fn set_dhcp_v6_reply_src(&mut self, src: Ipv6Addr) {
        self.dhcp_v6_reply_src = src;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::port::{Port, PortMap};
    use crate::types::PortId;

    #[test]
    fn clone_shares_children_until_reset() {
        let mut boot = SwitchState::new();
        let mut ports = PortMap::new();
        ports.add_port(Port::new(PortId(1), "eth1"));
        boot.reset_ports(Arc::new(ports));

        let mut next = boot.clone();
        assert!(Arc::ptr_eq(boot.ports(), next.ports()));
        assert!(Arc::ptr_eq(boot.vlans(), next.vlans()));

        next.reset_ports(Arc::new(PortMap::new()));
        assert!(!Arc::ptr_eq(boot.ports(), next.ports()));
        assert!(Arc::ptr_eq(boot.vlans(), next.vlans()));
        assert_eq!(boot.ports().len(), 1);
    }

    #[test]
    fn boot_defaults_match_conventions() {
        let state = SwitchState::new();
        assert_eq!(state.default_vlan(), VlanId(0));
        assert_eq!(state.arp_timeout(), Duration::from_secs(60));
        assert_eq!(state.ndp_timeout(), Duration::from_secs(60));
        assert_eq!(state.arp_ager_interval(), Duration::from_secs(5));
        assert_eq!(state.max_neighbor_probes(), 300);
        assert_eq!(state.stale_entry_interval(), Duration::from_secs(10));
    }
}
