// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! sFlow collector configuration.

use serde::{Deserialize, Serialize};

/// A remote sFlow collector endpoint. The collector's identity is the
/// stringified `"<ip>:<port>"` pair.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SflowCollectorConfig {
    pub ip: String,
    pub port: u16,
}
