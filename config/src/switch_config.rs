// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Top-level switch configuration document.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::acl::{AclEntryConfig, TrafficPolicyConfig};
use crate::aggregate::AggregatePortConfig;
use crate::interface::InterfaceConfig;
use crate::load_balancer::LoadBalancerConfig;
use crate::port::PortConfig;
use crate::route::{StaticRouteNoNextHops, StaticRouteWithNextHops};
use crate::sflow::SflowCollectorConfig;
use crate::vlan::{VlanConfig, VlanPortConfig};

/// System-wide LACP actor parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LacpConfig {
    /// Actor system id as a MAC string.
    pub system_id: String,
    pub system_priority: u16,
}

/// The full configuration document as seen by the management layer.
///
/// Scalar defaults equal the boot defaults of the switch state, so applying
/// an empty document to a boot state is a no-op.
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(default)]
#[serde(default, deny_unknown_fields)]
pub struct SwitchConfig {
    pub ports: Vec<PortConfig>,
    pub vlans: Vec<VlanConfig>,
    pub vlan_ports: Vec<VlanPortConfig>,
    pub interfaces: Vec<InterfaceConfig>,
    pub acls: Vec<AclEntryConfig>,
    pub global_egress_traffic_policy: Option<TrafficPolicyConfig>,
    pub aggregate_ports: Vec<AggregatePortConfig>,
    pub s_flow_collectors: Vec<SflowCollectorConfig>,
    pub load_balancers: Vec<LoadBalancerConfig>,
    pub lacp: Option<LacpConfig>,
    pub static_routes_with_nhops: Vec<StaticRouteWithNextHops>,
    pub static_routes_to_null: Vec<StaticRouteNoNextHops>,
    pub static_routes_to_cpu: Vec<StaticRouteNoNextHops>,
    pub default_vlan: u16,
    /// Seconds between ARP aging sweeps.
    pub arp_ager_interval: u32,
    pub arp_timeout_seconds: u32,
    pub max_neighbor_probes: u32,
    pub stale_entry_interval: u32,
    pub dhcp_relay_src_override_v4: Option<Ipv4Addr>,
    pub dhcp_relay_src_override_v6: Option<Ipv6Addr>,
    pub dhcp_reply_src_override_v4: Option<Ipv4Addr>,
    pub dhcp_reply_src_override_v6: Option<Ipv6Addr>,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            ports: Vec::new(),
            vlans: Vec::new(),
            vlan_ports: Vec::new(),
            interfaces: Vec::new(),
            acls: Vec::new(),
            global_egress_traffic_policy: None,
            aggregate_ports: Vec::new(),
            s_flow_collectors: Vec::new(),
            load_balancers: Vec::new(),
            lacp: None,
            static_routes_with_nhops: Vec::new(),
            static_routes_to_null: Vec::new(),
            static_routes_to_cpu: Vec::new(),
            default_vlan: 0,
            arp_ager_interval: 5,
            arp_timeout_seconds: 60,
            max_neighbor_probes: 300,
            stale_entry_interval: 10,
            dhcp_relay_src_override_v4: None,
            dhcp_relay_src_override_v6: None,
            dhcp_reply_src_override_v4: None,
            dhcp_reply_src_override_v6: None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_document_yields_boot_defaults() {
        let cfg: SwitchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, SwitchConfig::default());
        assert_eq!(cfg.arp_timeout_seconds, 60);
        assert_eq!(cfg.arp_ager_interval, 5);
        assert_eq!(cfg.max_neighbor_probes, 300);
        assert_eq!(cfg.stale_entry_interval, 10);
        assert_eq!(cfg.default_vlan, 0);
    }

    #[test]
    fn unknown_options_are_rejected() {
        assert!(serde_json::from_str::<SwitchConfig>(r#"{"not_an_option": 1}"#).is_err());
    }

    #[test]
    fn builder_produces_defaulted_document() {
        let cfg = SwitchConfigBuilder::default()
            .default_vlan(1u16)
            .build()
            .unwrap();
        assert_eq!(cfg.default_vlan, 1);
        assert!(cfg.ports.is_empty());
    }

    #[test]
    fn full_document_parses() {
        let cfg: SwitchConfig = serde_json::from_str(
            r#"{
                "ports": [{"logical_id": 1, "state": "enabled", "ingress_vlan": 10}],
                "vlans": [{"id": 10, "name": "front"}],
                "vlan_ports": [{"logical_port": 1, "vlan_id": 10, "emit_tags": false}],
                "interfaces": [{"intf_id": 100, "router_id": 0, "vlan_id": 10,
                                "ip_addresses": ["10.0.0.1/24"]}],
                "acls": [{"name": "d1", "action_type": "deny"}],
                "s_flow_collectors": [{"ip": "10.9.9.9", "port": 6343}],
                "lacp": {"system_id": "02:00:00:00:00:01", "system_priority": 100},
                "static_routes_with_nhops": [
                    {"router_id": 0, "prefix": "0.0.0.0/0", "nexthops": ["10.0.0.254"]}
                ],
                "default_vlan": 10
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.ports.len(), 1);
        assert_eq!(cfg.vlans.len(), 1);
        assert_eq!(cfg.interfaces.len(), 1);
        assert_eq!(cfg.lacp.as_ref().unwrap().system_priority, 100);
    }
}
