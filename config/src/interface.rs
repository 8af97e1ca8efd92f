// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Routed interface configuration.

use serde::{Deserialize, Serialize};

/// Neighbor-discovery (router advertisement) settings of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NdpConfig {
    /// Interval between unsolicited router advertisements; 0 disables them.
    pub router_advertisement_seconds: u32,
    pub cur_hop_limit: u8,
    pub router_lifetime: u32,
    pub prefix_valid_lifetime_seconds: u32,
    pub prefix_preferred_lifetime_seconds: u32,
}

impl Default for NdpConfig {
    fn default() -> Self {
        Self {
            router_advertisement_seconds: 0,
            cur_hop_limit: 255,
            router_lifetime: 1800,
            prefix_valid_lifetime_seconds: 2_592_000,
            prefix_preferred_lifetime_seconds: 604_800,
        }
    }
}

/// Configuration of a layer-3 interface attaching a VLAN to a virtual router.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterfaceConfig {
    pub intf_id: u32,
    pub router_id: u32,
    pub vlan_id: u16,
    /// Display name; defaults to `"Interface <id>"`.
    pub name: Option<String>,
    /// Interface MAC; defaults to the platform MAC.
    pub mac: Option<String>,
    pub mtu: Option<u16>,
    pub is_virtual: bool,
    pub is_state_sync_disabled: bool,
    /// Addresses in `"addr/len"` form. The derived IPv6 link-local address
    /// is always present and need not be listed.
    pub ip_addresses: Vec<String>,
    pub ndp: Option<NdpConfig>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interface_config_parses() {
        let cfg: InterfaceConfig = serde_json::from_str(
            r#"{
                "intf_id": 100,
                "router_id": 0,
                "vlan_id": 10,
                "ip_addresses": ["10.0.0.1/24", "2401:db00::1/64"]
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.intf_id, 100);
        assert_eq!(cfg.ip_addresses.len(), 2);
        assert!(cfg.name.is_none());
        assert!(cfg.ndp.is_none());
    }

    #[test]
    fn ndp_defaults_follow_ra_conventions() {
        let ndp = NdpConfig::default();
        assert_eq!(ndp.cur_hop_limit, 255);
        assert_eq!(ndp.router_lifetime, 1800);
        assert_eq!(ndp.router_advertisement_seconds, 0);
    }
}
