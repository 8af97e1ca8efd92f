// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Port and port-queue configuration.

use serde::{Deserialize, Serialize};

use crate::acl::TrafficPolicyConfig;

/// Administrative state of a port.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminState {
    /// Port is administratively disabled.
    #[default]
    Disabled,
    /// Port is enabled and may carry traffic.
    Enabled,
}

/// Configured port speed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortSpeed {
    /// Let the platform pick the maximum speed the lane supports.
    #[default]
    Default,
    Gige,
    TenG,
    TwentyFiveG,
    FortyG,
    FiftyG,
    HundredG,
}

/// Forward error correction setting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortFec {
    #[default]
    Off,
    On,
}

/// Ethernet flow-control pause settings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortPause {
    pub rx: bool,
    pub tx: bool,
}

/// The traffic stream a queue carries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamType {
    #[default]
    Unicast,
    Multicast,
    All,
}

/// Queue scheduling discipline.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueScheduling {
    #[default]
    WeightedRoundRobin,
    StrictPriority,
}

/// MMU scaling factor for a queue's shared-buffer usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingFactor {
    One,
    Two,
    Four,
    Eight,
}

/// Congestion detection method for active queue management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AqmDetection {
    /// Linear drop probability between the two queue-length thresholds.
    Linear {
        minimum_threshold: u32,
        maximum_threshold: u32,
    },
}

/// Active queue management settings. A detection method is mandatory for the
/// config to be applicable; it is optional here so that its absence can be
/// rejected with a proper error rather than at parse time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortQueueAqm {
    pub detection: Option<AqmDetection>,
    pub early_drop: bool,
    pub ecn: bool,
}

/// Configuration of a single port queue. Unspecified optional fields retain
/// the hardware defaults of the queue they apply to.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortQueueConfig {
    pub id: u8,
    pub stream_type: StreamType,
    pub scheduling: QueueScheduling,
    pub weight: Option<u32>,
    pub reserved_bytes: Option<u32>,
    pub scaling_factor: Option<ScalingFactor>,
    pub aqm: Option<PortQueueAqm>,
}

/// Configuration of a single physical port. Ports not listed in the document
/// are reset to their platform default (admin-down) configuration.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortConfig {
    pub logical_id: u32,
    pub name: String,
    pub description: String,
    pub state: AdminState,
    pub ingress_vlan: u16,
    pub speed: PortSpeed,
    pub pause: PortPause,
    pub fec: PortFec,
    pub s_flow_ingress_rate: u64,
    pub s_flow_egress_rate: u64,
    pub queues: Vec<PortQueueConfig>,
    /// Egress traffic policy applied on this port only; synthesized ACLs get
    /// this port as their destination port.
    pub egress_traffic_policy: Option<TrafficPolicyConfig>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn port_config_defaults_to_disabled() {
        let cfg: PortConfig = serde_json::from_str(r#"{"logical_id": 7}"#).unwrap();
        assert_eq!(cfg.state, AdminState::Disabled);
        assert_eq!(cfg.speed, PortSpeed::Default);
        assert!(cfg.queues.is_empty());
    }

    #[test]
    fn queue_aqm_detection_parses() {
        let cfg: PortQueueConfig = serde_json::from_str(
            r#"{
                "id": 3,
                "scheduling": "strict_priority",
                "aqm": {"detection": {"linear": {"minimum_threshold": 100, "maximum_threshold": 200}}, "ecn": true}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.scheduling, QueueScheduling::StrictPriority);
        let aqm = cfg.aqm.unwrap();
        assert!(aqm.ecn);
        assert_eq!(
            aqm.detection,
            Some(AqmDetection::Linear {
                minimum_threshold: 100,
                maximum_threshold: 200
            })
        );
    }

    #[test]
    fn unknown_port_fields_are_rejected() {
        assert!(serde_json::from_str::<PortConfig>(r#"{"logical_id": 1, "bogus": 2}"#).is_err());
    }
}
