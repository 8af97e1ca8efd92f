// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The port/VLAN membership index and the VLAN/interface index. The former
//! is read straight off the document; the latter is accumulated while the
//! interface updater runs and feeds the VLAN updater, the neighbor response
//! tables and the final cross-entity validation.

use std::collections::{BTreeMap, BTreeSet};
use std::net::IpAddr;

use tracing::error;

use net::ip::LINK_LOCAL_MASK_LEN;
use net::Mac;
use state::interface::Interface;
use state::port::VlanInfo;
use state::types::{InterfaceId, PortId, RouterId, VlanId};
use state::vlan::PortInfo;

use super::ConfigApplier;
use crate::errors::ApplyError;

/// What one interface address contributes to its VLAN.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VlanIpInfo {
    pub mask: u8,
    pub mac: Mac,
    pub interface_id: InterfaceId,
}

/// Everything known about the interfaces attached to one VLAN.
#[derive(Debug, Default)]
pub(crate) struct VlanInterfaceInfo {
    /// All interfaces on a VLAN must share one virtual router.
    pub router_id: RouterId,
    pub interfaces: BTreeSet<InterfaceId>,
    pub addresses: BTreeMap<IpAddr, VlanIpInfo>,
}

impl ConfigApplier<'_> {
    /// Build the bidirectional port/VLAN membership maps from the
    /// `vlan_ports[]` list. The document stores these edges flat; the state
    /// tree carries them on both the port and the VLAN nodes.
    pub(crate) fn process_vlan_ports(&mut self) -> Result<(), ApplyError> {
        for vlan_port in &self.cfg.vlan_ports {
            let port = PortId(vlan_port.logical_port);
            let vlan = VlanId(vlan_port.vlan_id);
            let prior = self.port_vlans.entry(port).or_default().insert(
                vlan,
                VlanInfo {
                    emit_tags: vlan_port.emit_tags,
                },
            );
            if prior.is_some() {
                error!("duplicate VlanPort for port {port}, vlan {vlan}");
                return Err(ApplyError::DuplicateVlanPort(port, vlan));
            }
            let prior = self.vlan_ports.entry(vlan).or_default().insert(
                port,
                PortInfo {
                    emit_tags: vlan_port.emit_tags,
                },
            );
            if prior.is_some() {
                // cannot fail if the first insert succeeded
                return Err(ApplyError::DuplicateVlanPort(port, vlan));
            }
        }
        Ok(())
    }

    /// Fold one interface into the VLAN/interface index, enforcing the
    /// one-router-per-VLAN and address-consistency invariants and recording
    /// the derived IPv6 link-local address.
    pub(crate) fn update_vlan_interfaces(&mut self, intf: &Interface) -> Result<(), ApplyError> {
        let vlan = intf.vlan_id();
        let entry = self.vlan_interfaces.entry(vlan).or_default();

        // Each VLAN can only be used with a single virtual router
        if entry.interfaces.is_empty() {
            entry.router_id = intf.router_id();
        } else if intf.router_id() != entry.router_id {
            error!(
                "VLAN {vlan} configured in multiple different virtual routers: {} and {}",
                entry.router_id,
                intf.router_id()
            );
            return Err(ApplyError::VlanMultiRouter(
                vlan,
                entry.router_id,
                intf.router_id(),
            ));
        }

        if !entry.interfaces.insert(intf.id()) {
            // this should not happen
            return Err(ApplyError::InterfaceProcessedTwice(intf.id(), vlan));
        }

        for (ip, mask) in intf.addresses() {
            let info = VlanIpInfo {
                mask: *mask,
                mac: intf.mac(),
                interface_id: intf.id(),
            };
            match entry.addresses.get(ip) {
                None => {
                    entry.addresses.insert(*ip, info);
                }
                // Multiple interfaces on the same VLAN may share an IP, as
                // long as they agree on mask and MAC.
                Some(old) if old.mask != info.mask => {
                    return Err(ApplyError::VlanIpInconsistent {
                        vlan,
                        ip: *ip,
                        field: "masks",
                        first: old.mask.to_string(),
                        second: info.mask.to_string(),
                    });
                }
                Some(old) if old.mac != info.mac => {
                    return Err(ApplyError::VlanIpInconsistent {
                        vlan,
                        ip: *ip,
                        field: "MACs",
                        first: old.mac.to_string(),
                        second: info.mac.to_string(),
                    });
                }
                Some(_) => {}
            }
        }

        // the derived link-local address answers NDP like any other address
        let link_local = IpAddr::V6(intf.mac().link_local_ipv6());
        entry.addresses.entry(link_local).or_insert(VlanIpInfo {
            mask: LINK_LOCAL_MASK_LEN,
            mac: intf.mac(),
            interface_id: intf.id(),
        });

        Ok(())
    }
}
