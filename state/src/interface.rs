// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Routed interface state nodes.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;

use config::interface::NdpConfig;
use net::Mac;

use crate::types::{InterfaceId, RouterId, VlanId};

/// Interface addresses, keyed by address with the mask length as value.
/// Every interface implicitly carries the IPv6 link-local address derived
/// from its MAC.
pub type Addresses = BTreeMap<IpAddr, u8>;

/// State of one routed interface.
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    id: InterfaceId,
    router_id: RouterId,
    vlan_id: VlanId,
    name: String,
    mac: Mac,
    mtu: u16,
    is_virtual: bool,
    is_state_sync_disabled: bool,
    addresses: Addresses,
    ndp_config: NdpConfig,
}

impl Interface {
    /// Default MTU of interfaces whose config and platform specify none.
    pub const DEFAULT_MTU: u16 = 1500;

    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        id: InterfaceId,
        router_id: RouterId,
        vlan_id: VlanId,
        name: impl Into<String>,
        mac: Mac,
        mtu: u16,
        is_virtual: bool,
        is_state_sync_disabled: bool,
    ) -> Self {
        Self {
            id,
            router_id,
            vlan_id,
            name: name.into(),
            mac,
            mtu,
            is_virtual,
            is_state_sync_disabled,
            addresses: Addresses::new(),
            ndp_config: NdpConfig::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> InterfaceId {
        self.id
    }
    #[must_use]
    pub fn router_id(&self) -> RouterId {
        self.router_id
    }
    #[must_use]
    pub fn vlan_id(&self) -> VlanId {
        self.vlan_id
    }
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[must_use]
    pub fn mac(&self) -> Mac {
        self.mac
    }
    #[must_use]
    pub fn mtu(&self) -> u16 {
        self.mtu
    }
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }
    #[must_use]
    pub fn is_state_sync_disabled(&self) -> bool {
        self.is_state_sync_disabled
    }
    #[must_use]
    pub fn addresses(&self) -> &Addresses {
        &self.addresses
    }
    #[must_use]
    pub fn ndp_config(&self) -> &NdpConfig {
        &self.ndp_config
    }

    pub fn set_router_id(&mut self, router_id: RouterId) {
        self.router_id = router_id;
    }
    pub fn set_vlan_id(&mut self, vlan_id: VlanId) {
        self.vlan_id = vlan_id;
    }
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
    pub fn set_mac(&mut self, mac: Mac) {
        self.mac = mac;
    }
    pub fn set_mtu(&mut self, mtu: u16) {
        self.mtu = mtu;
    }
    pub fn set_is_virtual(&mut self, is_virtual: bool) {
        self.is_virtual = is_virtual;
    }
    pub fn set_is_state_sync_disabled(&mut self, disabled: bool) {
        self.is_state_sync_disabled = disabled;
    }
    pub fn set_addresses(&mut self, addresses: Addresses) {
        self.addresses = addresses;
    }
    pub fn set_ndp_config(&mut self, ndp: NdpConfig) {
        self.ndp_config = ndp;
    }
}

/// The interface collection, iterated in id order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InterfaceMap {
    interfaces: BTreeMap<InterfaceId, Arc<Interface>>,
}

impl InterfaceMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn from_interfaces(interfaces: BTreeMap<InterfaceId, Arc<Interface>>) -> Self {
        Self { interfaces }
    }
    #[must_use]
    pub fn get(&self, id: InterfaceId) -> Option<&Arc<Interface>> {
        self.interfaces.get(&id)
    }
    pub fn values(&self) -> impl Iterator<Item = &Arc<Interface>> {
        self.interfaces.values()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> Interface {
        Interface::new(
            InterfaceId(100),
            RouterId(0),
            VlanId(10),
            "Interface 100",
            Mac([0x02, 0, 0, 0, 0, 1]),
            Interface::DEFAULT_MTU,
            false,
            false,
        )
    }

    #[test]
    fn interface_equality_covers_addresses() {
        let a = sample();
        let mut b = sample();
        assert_eq!(a, b);
        let mut addrs = Addresses::new();
        addrs.insert("10.0.0.1".parse().unwrap(), 24);
        b.set_addresses(addrs);
        assert_ne!(a, b);
    }
}
