// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The configuration applier. [`apply_switch_config`] clones the previous
//! [`SwitchState`] and reworks the clone until it matches the document,
//! then reports the new state, or `None` when the document describes the
//! state the switch is already in.
//!
//! Entities are uniquely identified by an id within their family. For each
//! family the applier walks the configured entries and classifies each as an
//! update (id exists: compare field by field, share the old node when equal)
//! or a create (id absent). Entries of the previous state the document no
//! longer mentions are implicitly deleted. The per-family logic lives in the
//! sibling modules; this module owns the shared indices and the sequencing.

mod acl;
mod aggregate;
mod index;
mod interface;
mod port;
mod route;
mod sflow;
mod vlan;

use std::collections::BTreeMap;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use config::SwitchConfig;
use state::port::VlanMembership;
use state::types::{InterfaceId, PortId, RouterId, VlanId};
use state::vlan::MemberPorts;
use state::SwitchState;

use crate::errors::ApplyError;
use crate::load_balancer::LoadBalancerConfigApplier;
use crate::platform::Platform;

use index::VlanInterfaceInfo;

/// Interface-derived routes of one virtual router: destination network to
/// `(owning interface, interface address)`.
type IntfRoute = BTreeMap<state::route::RoutePrefix, (InterfaceId, IpAddr)>;
type IntfRouteTable = BTreeMap<RouterId, IntfRoute>;

/// Apply a configuration document to a switch state.
///
/// Returns the new state, or `None` when the document changes nothing. On
/// error the previous state is untouched and remains authoritative.
pub fn apply_switch_config(
    orig: &Arc<SwitchState>,
    cfg: &SwitchConfig,
    platform: &dyn Platform,
    prev_cfg: Option<&SwitchConfig>,
) -> Result<Option<Arc<SwitchState>>, ApplyError> {
    let empty;
    let prev_cfg = match prev_cfg {
        Some(prev) => prev,
        None => {
            empty = SwitchConfig::default();
            &empty
        }
    };
    ConfigApplier::new(orig, cfg, platform, prev_cfg).run()
}

/// Read a JSON configuration document from `path` and apply it, returning
/// the applier's result paired with the raw configuration text.
pub fn apply_switch_config_file(
    orig: &Arc<SwitchState>,
    path: impl AsRef<Path>,
    platform: &dyn Platform,
    prev_cfg: Option<&SwitchConfig>,
) -> Result<(Option<Arc<SwitchState>>, String), ApplyError> {
    let (cfg, raw) = config::loader::load_file(path)?;
    let new_state = apply_switch_config(orig, &cfg, platform, prev_cfg)?;
    Ok((new_state, raw))
}

/// Shared state of one apply pass: the inputs plus the indices the family
/// updaters build and consume.
pub(crate) struct ConfigApplier<'a> {
    orig: &'a Arc<SwitchState>,
    cfg: &'a SwitchConfig,
    platform: &'a dyn Platform,
    prev_cfg: &'a SwitchConfig,
    /// Port to VLAN membership, from `vlan_ports[]`.
    port_vlans: BTreeMap<PortId, VlanMembership>,
    /// VLAN to member ports, from `vlan_ports[]`.
    vlan_ports: BTreeMap<VlanId, MemberPorts>,
    /// VLAN to attached interfaces and their addresses, built while
    /// processing interfaces.
    vlan_interfaces: BTreeMap<VlanId, VlanInterfaceInfo>,
    /// Interface-connected routes, built while processing interfaces.
    intf_route_tables: IntfRouteTable,
}

impl<'a> ConfigApplier<'a> {
    fn new(
        orig: &'a Arc<SwitchState>,
        cfg: &'a SwitchConfig,
        platform: &'a dyn Platform,
        prev_cfg: &'a SwitchConfig,
    ) -> Self {
        Self {
            orig,
            cfg,
            platform,
            prev_cfg,
            port_vlans: BTreeMap::new(),
            vlan_ports: BTreeMap::new(),
            vlan_interfaces: BTreeMap::new(),
            intf_route_tables: IntfRouteTable::new(),
        }
    }

    /// Run the apply. Ordering is load-bearing: interfaces must be processed
    /// before VLANs (the VLAN updater reads the interface index) and before
    /// interface routes (which read the connected-route index).
    fn run(mut self) -> Result<Option<Arc<SwitchState>>, ApplyError> {
        let mut new_state = (**self.orig).clone();
        let mut changed = false;

        if let Some(control_plane) = Self::update_control_plane() {
            new_state.reset_control_plane(Arc::new(control_plane));
            changed = true;
        }

        self.process_vlan_ports()?;

        if let Some(acls) = self.update_acls()? {
            debug!("ACL collection changed");
            new_state.reset_acls(Arc::new(acls));
            changed = true;
        }

        if let Some(ports) = self.update_ports()? {
            debug!("Port collection changed");
            new_state.reset_ports(Arc::new(ports));
            changed = true;
        }

        if let Some(aggregate_ports) = self.update_aggregate_ports()? {
            debug!("Aggregate-port collection changed");
            new_state.reset_aggregate_ports(Arc::new(aggregate_ports));
            changed = true;
        }

        if let Some(interfaces) = self.update_interfaces()? {
            debug!("Interface collection changed");
            new_state.reset_interfaces(Arc::new(interfaces));
            changed = true;
        }

        if let Some(vlans) = self.update_vlans()? {
            debug!("VLAN collection changed");
            new_state.reset_vlans(Arc::new(vlans));
            changed = true;
        }

        {
            let interface_tables = self.update_interface_routes();
            let current_tables = match interface_tables {
                Some(tables) => {
                    let tables = Arc::new(tables);
                    new_state.reset_route_tables(Arc::clone(&tables));
                    changed = true;
                    tables
                }
                None => Arc::clone(self.orig.route_tables()),
            };
            if let Some(tables) = self.update_static_routes(&current_tables)? {
                new_state.reset_route_tables(Arc::new(tables));
                changed = true;
            }
        }

        let default_vlan = VlanId(self.cfg.default_vlan);
        if self.orig.default_vlan() != default_vlan {
            if new_state.vlans().get(default_vlan).is_none() {
                error!("Default VLAN {default_vlan} does not exist");
                return Err(ApplyError::MissingDefaultVlan(default_vlan));
            }
            new_state.set_default_vlan(default_vlan);
            changed = true;
        }

        // Every interface must sit on a VLAN that survived the update, and a
        // VLAN other than the default (CPU) VLAN carries at most one.
        for (vlan, info) in &self.vlan_interfaces {
            if new_state.vlans().get(*vlan).is_none() {
                let intf = info
                    .interfaces
                    .iter()
                    .next()
                    .copied()
                    .unwrap_or(InterfaceId(0));
                error!("Interface {intf} refers to non-existent VLAN {vlan}");
                return Err(ApplyError::UnknownVlanForInterface { intf, vlan: *vlan });
            }
            if info.interfaces.len() > 1 && *vlan != new_state.default_vlan() {
                error!(
                    "VLAN {vlan} refers to {} interfaces",
                    info.interfaces.len()
                );
                return Err(ApplyError::VlanMultiInterface {
                    vlan: *vlan,
                    count: info.interfaces.len(),
                });
            }
        }

        changed |= self.apply_scalars(&mut new_state);

        if let Some(collectors) = self.update_sflow_collectors()? {
            debug!("sFlow collector collection changed");
            new_state.reset_sflow_collectors(Arc::new(collectors));
            changed = true;
        }

        {
            let applier = LoadBalancerConfigApplier::new(
                Arc::clone(self.orig.load_balancers()),
                &self.cfg.load_balancers,
                self.platform,
            );
            if let Some(load_balancers) = applier.update_load_balancers() {
                debug!("Load-balancer collection changed");
                new_state.reset_load_balancers(Arc::new(load_balancers));
                changed = true;
            }
        }

        if !changed {
            return Ok(None);
        }
        Ok(Some(Arc::new(new_state)))
    }

    /// CPU queue provisioning is not configurable yet; extension point.
    fn update_control_plane() -> Option<state::control_plane::ControlPlane> {
        None
    }

    /// Apply the document's scalar fields with an if-differs-set per field.
    fn apply_scalars(&self, new_state: &mut SwitchState) -> bool {
        let mut changed = false;

        let arp_ager_interval = Duration::from_secs(u64::from(self.cfg.arp_ager_interval));
        if self.orig.arp_ager_interval() != arp_ager_interval {
            new_state.set_arp_ager_interval(arp_ager_interval);
            changed = true;
        }

        let arp_timeout = Duration::from_secs(u64::from(self.cfg.arp_timeout_seconds));
        if self.orig.arp_timeout() != arp_timeout {
            new_state.set_arp_timeout(arp_timeout);
            // TODO: split an ndp_timeout option out of the document schema;
            // until then NDP ages with the ARP timeout.
            new_state.set_ndp_timeout(arp_timeout);
            changed = true;
        }

        if self.orig.max_neighbor_probes() != self.cfg.max_neighbor_probes {
            new_state.set_max_neighbor_probes(self.cfg.max_neighbor_probes);
            changed = true;
        }

        let dhcp_v4_relay_src = self
            .cfg
            .dhcp_relay_src_override_v4
            .unwrap_or(Ipv4Addr::UNSPECIFIED);
        if self.orig.dhcp_v4_relay_src() != dhcp_v4_relay_src {
            new_state.set_dhcp_v4_relay_src(dhcp_v4_relay_src);
            changed = true;
        }
        let dhcp_v6_relay_src = self
            .cfg
            .dhcp_relay_src_override_v6
            .unwrap_or(Ipv6Addr::UNSPECIFIED);
        if self.orig.dhcp_v6_relay_src() != dhcp_v6_relay_src {
            new_state.set_dhcp_v6_relay_src(dhcp_v6_relay_src);
            changed = true;
        }
        let dhcp_v4_reply_src = self
            .cfg
            .dhcp_reply_src_override_v4
            .unwrap_or(Ipv4Addr::UNSPECIFIED);
        if self.orig.dhcp_v4_reply_src() != dhcp_v4_reply_src {
            new_state.set_dhcp_v4_reply_src(dhcp_v4_reply_src);
            changed = true;
        }
        let dhcp_v6_reply_src = self
            .cfg
            .dhcp_reply_src_override_v6
            .unwrap_or(Ipv6Addr::UNSPECIFIED);
        if self.orig.dhcp_v6_reply_src() != dhcp_v6_reply_src {
            new_state.set_dhcp_v6_reply_src(dhcp_v6_reply_src);
            changed = true;
        }

        let stale_entry_interval = Duration::from_secs(u64::from(self.cfg.stale_entry_interval));
        if self.orig.stale_entry_interval() != stale_entry_interval {
            new_state.set_stale_entry_interval(stale_entry_interval);
            changed = true;
        }

        changed
    }
}

/// Insert the updated node (or, when unchanged, the original) into the new
/// collection. Returns whether the node changed. Two config entries mapping
/// to the same id are a rejection.
fn update_map<K, V>(
    map: &mut BTreeMap<K, Arc<V>>,
    orig_node: Option<&Arc<V>>,
    new_node: Option<Arc<V>>,
    id: K,
) -> Result<bool, ApplyError>
where
    K: Ord + Copy + Display,
{
    let (node, changed) = match (new_node, orig_node) {
        (Some(node), _) => (node, true),
        (None, Some(orig)) => (Arc::clone(orig), false),
        // callers pass the original whenever they pass no update
        (None, None) => unreachable!("node update with neither old nor new node"),
    };
    if map.insert(id, node).is_some() {
        return Err(ApplyError::DuplicateEntry(id.to_string()));
    }
    Ok(changed)
}
