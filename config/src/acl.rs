// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! ACL entry and traffic-policy configuration.

use serde::{Deserialize, Serialize};

/// What a matching ACL entry does with the packet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AclActionType {
    #[default]
    Permit,
    Deny,
}

/// IP fragmentation matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpFragMatch {
    MatchNotFragmented,
    MatchFirstFragment,
    MatchNotFirstFragment,
    MatchAnyFragment,
}

/// Coarse IP protocol family matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpType {
    Any,
    Ip,
    Ip4,
    Ip6,
}

/// Inclusive L4 port range. Values are carried wide so that out-of-range
/// documents can be rejected with a proper message.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct L4PortRangeConfig {
    pub min: u32,
    pub max: u32,
}

/// Inclusive packet length range.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PktLenRangeConfig {
    pub min: u16,
    pub max: u16,
}

/// TTL match with a bit mask applied before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TtlConfig {
    pub value: i32,
    pub mask: i32,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            value: 0,
            mask: 255,
        }
    }
}

/// One configured ACL entry. Only the name and action are mandatory; every
/// match field is optional and unspecified fields match anything.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AclEntryConfig {
    pub name: String,
    pub action_type: AclActionType,
    /// Source/destination networks in CIDR form.
    pub src_ip: Option<String>,
    pub dst_ip: Option<String>,
    pub proto: Option<u8>,
    pub tcp_flags_bit_map: Option<u16>,
    pub src_port: Option<u32>,
    pub dst_port: Option<u32>,
    pub src_l4_port_range: Option<L4PortRangeConfig>,
    pub dst_l4_port_range: Option<L4PortRangeConfig>,
    pub pkt_len_range: Option<PktLenRangeConfig>,
    pub ip_frag: Option<IpFragMatch>,
    pub icmp_type: Option<i32>,
    pub icmp_code: Option<i32>,
    pub dscp: Option<u8>,
    pub dst_mac: Option<String>,
    pub ip_type: Option<IpType>,
    pub ttl: Option<TtlConfig>,
}

/// Action attached to a traffic-policy matcher.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchActionConfig {
    /// Egress queue the matching traffic is steered to.
    pub send_to_queue: Option<u8>,
    /// Name of the counter incremented per matching packet.
    pub packet_counter: Option<String>,
}

/// Binds an ACL (by name) to an action.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchToActionConfig {
    pub matcher: String,
    pub action: MatchActionConfig,
}

/// An ordered list of matcher/action bindings. Order is priority order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrafficPolicyConfig {
    pub match_to_action: Vec<MatchToActionConfig>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn acl_entry_parses_with_sparse_fields() {
        let cfg: AclEntryConfig = serde_json::from_str(
            r#"{
                "name": "drop-telnet",
                "action_type": "deny",
                "proto": 6,
                "dst_l4_port_range": {"min": 23, "max": 23}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.action_type, AclActionType::Deny);
        assert_eq!(cfg.dst_l4_port_range, Some(L4PortRangeConfig { min: 23, max: 23 }));
        assert!(cfg.src_ip.is_none());
    }

    #[test]
    fn ttl_mask_defaults_to_full() {
        let cfg: TtlConfig = serde_json::from_str(r#"{"value": 128}"#).unwrap();
        assert_eq!(cfg.mask, 255);
    }

    #[test]
    fn traffic_policy_preserves_order() {
        let cfg: TrafficPolicyConfig = serde_json::from_str(
            r#"{"match_to_action": [
                {"matcher": "a", "action": {"send_to_queue": 1}},
                {"matcher": "b", "action": {"packet_counter": "b-hits"}}
            ]}"#,
        )
        .unwrap();
        let names: Vec<_> = cfg.match_to_action.iter().map(|m| m.matcher.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
