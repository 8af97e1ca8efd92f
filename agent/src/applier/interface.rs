// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Interface family updater. Besides rebuilding the interface nodes this
//! populates the VLAN/interface index and the interface-connected route
//! tables, so it must run before the VLAN updater and the route synthesis.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::error;

use config::interface::InterfaceConfig;
use net::ip::{is_ipv6_link_local, mask_network, parse_network, LINK_LOCAL_MASK_LEN};
use net::Mac;
use state::interface::{Addresses, Interface, InterfaceMap};
use state::route::RoutePrefix;
use state::types::{InterfaceId, RouterId, VlanId};

use super::{update_map, ConfigApplier};
use crate::errors::ApplyError;

impl ConfigApplier<'_> {
    pub(crate) fn update_interfaces(&mut self) -> Result<Option<InterfaceMap>, ApplyError> {
        let orig_intfs = Arc::clone(self.orig.interfaces());
        let mut new_intfs = BTreeMap::new();
        let mut changed = false;
        let mut num_existing_processed = 0;

        for intf_cfg in &self.cfg.interfaces {
            let id = InterfaceId(intf_cfg.intf_id);
            let orig_intf = orig_intfs.get(id);
            let addresses = self.interface_addresses(intf_cfg)?;

            let new_intf = match orig_intf {
                Some(orig) => {
                    num_existing_processed += 1;
                    self.update_interface(orig, intf_cfg, addresses)?
                }
                None => Some(Arc::new(self.create_interface(intf_cfg, addresses)?)),
            };

            match (&new_intf, orig_intf) {
                (Some(intf), _) => self.update_vlan_interfaces(intf)?,
                (None, Some(orig)) => {
                    let orig = Arc::clone(orig);
                    self.update_vlan_interfaces(&orig)?;
                }
                (None, None) => unreachable!("interface update with neither old nor new node"),
            }

            changed |= update_map(&mut new_intfs, orig_intf, new_intf, id)?;
        }

        if num_existing_processed != orig_intfs.len() {
            // some existing interfaces were removed
            changed = true;
        }
        if !changed {
            return Ok(None);
        }
        Ok(Some(InterfaceMap::from_interfaces(new_intfs)))
    }

    fn create_interface(
        &self,
        cfg: &InterfaceConfig,
        addresses: Addresses,
    ) -> Result<Interface, ApplyError> {
        let mut intf = Interface::new(
            InterfaceId(cfg.intf_id),
            RouterId(cfg.router_id),
            VlanId(cfg.vlan_id),
            interface_name(cfg),
            self.interface_mac(cfg)?,
            cfg.mtu.unwrap_or_else(|| self.platform.default_mtu()),
            cfg.is_virtual,
            cfg.is_state_sync_disabled,
        );
        intf.set_addresses(addresses);
        if let Some(ndp) = cfg.ndp {
            intf.set_ndp_config(ndp);
        }
        Ok(intf)
    }

    fn update_interface(
        &self,
        orig: &Arc<Interface>,
        cfg: &InterfaceConfig,
        addresses: Addresses,
    ) -> Result<Option<Arc<Interface>>, ApplyError> {
        let ndp = cfg.ndp.unwrap_or_default();
        let name = interface_name(cfg);
        let mac = self.interface_mac(cfg)?;
        let mtu = cfg.mtu.unwrap_or_else(|| self.platform.default_mtu());

        if orig.router_id() == RouterId(cfg.router_id)
            && orig.vlan_id() == VlanId(cfg.vlan_id)
            && orig.name() == name
            && orig.mac() == mac
            && *orig.addresses() == addresses
            && *orig.ndp_config() == ndp
            && orig.mtu() == mtu
            && orig.is_virtual() == cfg.is_virtual
            && orig.is_state_sync_disabled() == cfg.is_state_sync_disabled
        {
            return Ok(None);
        }

        let mut intf = (**orig).clone();
        intf.set_router_id(RouterId(cfg.router_id));
        intf.set_vlan_id(VlanId(cfg.vlan_id));
        intf.set_name(name);
        intf.set_mac(mac);
        intf.set_addresses(addresses);
        intf.set_ndp_config(ndp);
        intf.set_mtu(mtu);
        intf.set_is_virtual(cfg.is_virtual);
        intf.set_is_state_sync_disabled(cfg.is_state_sync_disabled);
        Ok(Some(Arc::new(intf)))
    }

    fn interface_mac(&self, cfg: &InterfaceConfig) -> Result<Mac, ApplyError> {
        match &cfg.mac {
            Some(mac) => {
                Mac::try_from(mac.as_str()).map_err(|_| ApplyError::InvalidMacAddress(mac.clone()))
            }
            None => Ok(self.platform.local_mac()),
        }
    }

    /// The interface's address set: the derived IPv6 link-local /64 plus the
    /// configured addresses. Every non-link-local address also lands in the
    /// connected-route tables; a network owned by two different interfaces
    /// in one VRF is a rejection, while re-announcement by the same
    /// interface overwrites so later addresses win.
    fn interface_addresses(&mut self, cfg: &InterfaceConfig) -> Result<Addresses, ApplyError> {
        let mut addresses = Addresses::new();

        let mac = self.interface_mac(cfg)?;
        addresses.insert(mac.link_local_ipv6().into(), LINK_LOCAL_MASK_LEN);

        let intf_id = InterfaceId(cfg.intf_id);
        for addr_cfg in &cfg.ip_addresses {
            let (addr, mask) = parse_network(addr_cfg)
                .map_err(|_| ApplyError::InvalidAddress(addr_cfg.clone()))?;
            if addresses.insert(addr, mask).is_some() {
                error!("duplicate network IP address {addr_cfg} in interface {intf_id}");
                return Err(ApplyError::DuplicateInterfaceAddress {
                    intf: intf_id,
                    addr: addr_cfg.clone(),
                });
            }

            // Link-local v6 networks stay out of the route tables. v4
            // link-locals are admitted: they are still used for link-local
            // BGP peering.
            if is_ipv6_link_local(addr) {
                continue;
            }
            let router = RouterId(cfg.router_id);
            let prefix = RoutePrefix {
                network: mask_network(addr, mask),
                mask,
            };
            let routes = self.intf_route_tables.entry(router).or_default();
            if let Some((other, _)) = routes.get(&prefix) {
                if *other != intf_id {
                    error!(
                        "duplicate network address {addr_cfg} of interface {intf_id} as interface {other} in VRF {router}"
                    );
                    return Err(ApplyError::DuplicateNetworkAcrossInterfaces {
                        addr: addr_cfg.clone(),
                        intf: intf_id,
                        other: *other,
                        router,
                    });
                }
            }
            // keep the later address so reapplied route snapshots agree
            routes.insert(prefix, (intf_id, addr));
        }

        Ok(addresses)
    }
}

fn interface_name(cfg: &InterfaceConfig) -> String {
    cfg.name
        .clone()
        .unwrap_or_else(|| format!("Interface {}", cfg.intf_id))
}
