// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Static route configuration.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// A static route forwarding to one or more next hops.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticRouteWithNextHops {
    pub router_id: u32,
    /// Destination network in CIDR form.
    pub prefix: String,
    pub nexthops: Vec<IpAddr>,
}

/// A static route with no next hops: dropped or punted depending on which
/// list of the document it appears in.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticRouteNoNextHops {
    pub router_id: u32,
    /// Destination network in CIDR form.
    pub prefix: String,
}
