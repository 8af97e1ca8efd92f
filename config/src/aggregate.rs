// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Aggregate (LAG) port configuration.

use serde::{Deserialize, Serialize};

/// LACP transmission rate of a member port.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LacpRate {
    #[default]
    Slow,
    Fast,
}

/// LACP activity mode of a member port.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LacpActivity {
    #[default]
    Passive,
    Active,
}

/// Default LACP port priority for members that do not specify one.
pub const DEFAULT_PORT_PRIORITY: i32 = 0x8000;

/// One member (subport) of an aggregate port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MemberPortConfig {
    pub member_port_id: u32,
    /// LACP port priority; must lie in `[0, 2^16)`.
    pub priority: i32,
    pub rate: LacpRate,
    pub activity: LacpActivity,
}

impl Default for MemberPortConfig {
    fn default() -> Self {
        Self {
            member_port_id: 0,
            priority: DEFAULT_PORT_PRIORITY,
            rate: LacpRate::default(),
            activity: LacpActivity::default(),
        }
    }
}

/// Minimum capacity required for the aggregate to be considered up: either
/// an absolute member count or a fraction of the configured members.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimumCapacity {
    LinkCount(u8),
    LinkPercentage(f64),
}

/// Configuration of one aggregate port.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregatePortConfig {
    pub key: u16,
    pub name: String,
    pub description: String,
    pub member_ports: Vec<MemberPortConfig>,
    pub minimum_capacity: Option<MinimumCapacity>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn member_priority_defaults_to_lacp_midpoint() {
        let cfg: MemberPortConfig = serde_json::from_str(r#"{"member_port_id": 4}"#).unwrap();
        assert_eq!(cfg.priority, DEFAULT_PORT_PRIORITY);
        assert_eq!(cfg.rate, LacpRate::Slow);
    }

    #[test]
    fn minimum_capacity_parses_both_shapes() {
        let cfg: AggregatePortConfig = serde_json::from_str(
            r#"{"key": 1, "name": "po1", "minimum_capacity": {"link_count": 2}}"#,
        )
        .unwrap();
        assert_eq!(cfg.minimum_capacity, Some(MinimumCapacity::LinkCount(2)));

        let cfg: AggregatePortConfig = serde_json::from_str(
            r#"{"key": 1, "name": "po1", "minimum_capacity": {"link_percentage": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(cfg.minimum_capacity, Some(MinimumCapacity::LinkPercentage(0.5)));
    }
}
