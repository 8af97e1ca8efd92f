// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VLAN family updater, including the derivations folded into each VLAN:
//! neighbor (ARP/NDP) response tables from the VLAN/interface index and
//! DHCP relay override maps from the document. Runs after the interface
//! updater so the index is complete.

use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use tracing::error;

use config::vlan::VlanConfig;
use net::Mac;
use state::types::{InterfaceId, VlanId};
use state::vlan::{
    ArpResponseTable, NdpResponseTable, NeighborResponseEntry, Vlan, VlanMap,
};

use super::{update_map, ConfigApplier};
use crate::errors::ApplyError;

impl ConfigApplier<'_> {
    pub(crate) fn update_vlans(&mut self) -> Result<Option<VlanMap>, ApplyError> {
        let orig_vlans = self.orig.vlans();
        let mut new_vlans = BTreeMap::new();
        let mut changed = false;
        let mut num_existing_processed = 0;

        for vlan_cfg in &self.cfg.vlans {
            let id = VlanId(vlan_cfg.id);
            let orig_vlan = orig_vlans.get(id);
            let new_vlan = match orig_vlan {
                Some(orig) => {
                    num_existing_processed += 1;
                    self.update_vlan(orig, vlan_cfg)?
                }
                None => Some(Arc::new(self.create_vlan(vlan_cfg)?)),
            };
            changed |= update_map(&mut new_vlans, orig_vlan, new_vlan, id)?;
        }

        if num_existing_processed != orig_vlans.len() {
            // some existing VLANs were removed
            changed = true;
        }
        if !changed {
            return Ok(None);
        }
        Ok(Some(VlanMap::from_vlans(new_vlans)))
    }

    fn create_vlan(&self, cfg: &VlanConfig) -> Result<Vlan, ApplyError> {
        let id = VlanId(cfg.id);
        let ports = self.vlan_ports.get(&id).cloned().unwrap_or_default();
        let mut vlan = Vlan::new(id, cfg.name.clone(), ports);
        self.update_neighbor_response_tables(&mut vlan, cfg);
        update_dhcp_overrides(&mut vlan, cfg)?;
        vlan.set_dhcp_v4_relay(cfg.dhcp_relay_address_v4.unwrap_or(Ipv4Addr::UNSPECIFIED));
        vlan.set_dhcp_v6_relay(cfg.dhcp_relay_address_v6.unwrap_or(Ipv6Addr::UNSPECIFIED));
        vlan.set_interface_id(self.resolve_vlan_interface(cfg));
        Ok(vlan)
    }

    fn update_vlan(
        &self,
        orig: &Arc<Vlan>,
        cfg: &VlanConfig,
    ) -> Result<Option<Arc<Vlan>>, ApplyError> {
        let ports = self
            .vlan_ports
            .get(&orig.id())
            .cloned()
            .unwrap_or_default();

        let mut new_vlan = (**orig).clone();
        let changed_neighbor_tables = self.update_neighbor_response_tables(&mut new_vlan, cfg);
        let changed_dhcp_overrides = update_dhcp_overrides(&mut new_vlan, cfg)?;

        let new_dhcp_v4_relay = cfg.dhcp_relay_address_v4.unwrap_or(Ipv4Addr::UNSPECIFIED);
        let new_dhcp_v6_relay = cfg.dhcp_relay_address_v6.unwrap_or(Ipv6Addr::UNSPECIFIED);
        let new_interface_id = self.resolve_vlan_interface(cfg);

        if orig.name() == cfg.name
            && orig.interface_id() == new_interface_id
            && *orig.ports() == ports
            && orig.dhcp_v4_relay() == new_dhcp_v4_relay
            && orig.dhcp_v6_relay() == new_dhcp_v6_relay
            && !changed_neighbor_tables
            && !changed_dhcp_overrides
        {
            return Ok(None);
        }

        new_vlan.set_name(cfg.name.clone());
        new_vlan.set_interface_id(new_interface_id);
        new_vlan.set_ports(ports);
        new_vlan.set_dhcp_v4_relay(new_dhcp_v4_relay);
        new_vlan.set_dhcp_v6_relay(new_dhcp_v6_relay);
        Ok(Some(Arc::new(new_vlan)))
    }

    /// The VLAN's routed interface: the configured one, else the first
    /// interface that references the VLAN, else none (0).
    fn resolve_vlan_interface(&self, cfg: &VlanConfig) -> InterfaceId {
        if let Some(intf_id) = cfg.intf_id {
            return InterfaceId(intf_id);
        }
        self.vlan_interfaces
            .get(&VlanId(cfg.id))
            .and_then(|entry| entry.interfaces.iter().next().copied())
            .unwrap_or(InterfaceId(0))
    }

    /// Rebuild the ARP and NDP response tables of a VLAN from the addresses
    /// of its interfaces. Unchanged tables keep the shared node.
    fn update_neighbor_response_tables(&self, vlan: &mut Vlan, cfg: &VlanConfig) -> bool {
        let mut arp_table = BTreeMap::new();
        let mut ndp_table = BTreeMap::new();

        if let Some(info) = self.vlan_interfaces.get(&VlanId(cfg.id)) {
            for (addr, ip_info) in &info.addresses {
                let entry = NeighborResponseEntry {
                    mac: ip_info.mac,
                    interface_id: ip_info.interface_id,
                };
                match addr {
                    IpAddr::V4(v4) => {
                        arp_table.insert(*v4, entry);
                    }
                    IpAddr::V6(v6) => {
                        ndp_table.insert(*v6, entry);
                    }
                }
            }
        }

        let mut changed = false;
        if *vlan.arp_response_table().table() != arp_table {
            vlan.set_arp_response_table(Arc::new(ArpResponseTable::from_table(arp_table)));
            changed = true;
        }
        if *vlan.ndp_response_table().table() != ndp_table {
            vlan.set_ndp_response_table(Arc::new(NdpResponseTable::from_table(ndp_table)));
            changed = true;
        }
        changed
    }
}

/// Rebuild the DHCP relay override maps of a VLAN from the document.
fn update_dhcp_overrides(vlan: &mut Vlan, cfg: &VlanConfig) -> Result<bool, ApplyError> {
    let mut v4_overrides: BTreeMap<Mac, Ipv4Addr> = BTreeMap::new();
    for (mac, addr) in &cfg.dhcp_relay_overrides_v4 {
        let mac = Mac::try_from(mac.as_str()).map_err(|_| bad_override("v4", "MAC address", mac))?;
        let addr: Ipv4Addr = addr
            .parse()
            .map_err(|_| bad_override("v4", "IPv4 address", addr))?;
        v4_overrides.insert(mac, addr);
    }

    let mut v6_overrides: BTreeMap<Mac, Ipv6Addr> = BTreeMap::new();
    for (mac, addr) in &cfg.dhcp_relay_overrides_v6 {
        let mac = Mac::try_from(mac.as_str()).map_err(|_| bad_override("v6", "MAC address", mac))?;
        let addr: Ipv6Addr = addr
            .parse()
            .map_err(|_| bad_override("v6", "IPv6 address", addr))?;
        v6_overrides.insert(mac, addr);
    }

    let mut changed = false;
    if *vlan.dhcp_v4_overrides() != v4_overrides {
        vlan.set_dhcp_v4_overrides(v4_overrides);
        changed = true;
    }
    if *vlan.dhcp_v6_overrides() != v6_overrides {
        vlan.set_dhcp_v6_overrides(v6_overrides);
        changed = true;
    }
    Ok(changed)
}

fn bad_override(family: &'static str, kind: &'static str, value: &str) -> ApplyError {
    error!("invalid {kind} in DHCP{family} relay override map: {value}");
    ApplyError::BadDhcpOverride {
        family,
        kind,
        value: value.to_string(),
    }
}
