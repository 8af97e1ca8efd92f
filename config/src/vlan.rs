// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VLAN and VLAN-port membership configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Configuration of a layer-2 VLAN.
///
/// The DHCP override maps are keyed by client MAC; values are relay
/// addresses. Both sides are kept as raw strings so that malformed entries
/// are rejected by the applier with context rather than at parse time.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VlanConfig {
    pub id: u16,
    pub name: String,
    /// The routed interface on this VLAN. When unset the applier infers it
    /// from the interfaces that reference the VLAN.
    pub intf_id: Option<u32>,
    pub dhcp_relay_address_v4: Option<Ipv4Addr>,
    pub dhcp_relay_address_v6: Option<Ipv6Addr>,
    pub dhcp_relay_overrides_v4: BTreeMap<String, String>,
    pub dhcp_relay_overrides_v6: BTreeMap<String, String>,
}

/// One port-to-VLAN membership edge. The document carries these as a flat
/// list; the applier folds them into both the port and the VLAN nodes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VlanPortConfig {
    pub logical_port: u32,
    pub vlan_id: u16,
    /// Whether frames for this VLAN leave the port tagged.
    pub emit_tags: bool,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vlan_config_parses_overrides() {
        let cfg: VlanConfig = serde_json::from_str(
            r#"{
                "id": 10,
                "name": "uplink",
                "dhcp_relay_address_v4": "10.0.0.2",
                "dhcp_relay_overrides_v4": {"02:00:00:00:00:01": "10.1.1.1"}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.id, 10);
        assert_eq!(cfg.dhcp_relay_address_v4, Some("10.0.0.2".parse().unwrap()));
        assert_eq!(cfg.dhcp_relay_overrides_v4.len(), 1);
        assert_eq!(cfg.intf_id, None);
    }
}
