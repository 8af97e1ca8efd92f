// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Load-balancer (hashing) configuration. The applier carries these nodes
//! opaquely; only the load-balancer applier interprets them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which packet-distribution engine a load balancer programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadBalancerId {
    Ecmp,
    AggregatePort,
}

/// Hashing algorithm used to distribute flows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    #[default]
    Crc,
}

/// Packet fields folded into the hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashField {
    SourceIp,
    DestinationIp,
    SourceL4Port,
    DestinationL4Port,
    IpProtocol,
}

/// Configuration of one load balancer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadBalancerConfig {
    pub id: LoadBalancerId,
    #[serde(default)]
    pub algorithm: HashAlgorithm,
    /// Hash seed; defaults to a platform-derived value when unset.
    #[serde(default)]
    pub seed: Option<u32>,
    #[serde(default)]
    pub fields: BTreeSet<HashField>,
}
