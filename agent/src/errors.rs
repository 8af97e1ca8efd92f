// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The reasons why the applier may reject a configuration. Any of these
//! aborts the apply; no partial state is ever returned.

use std::net::IpAddr;

use config::loader::LoadError;
use state::types::{AggregatePortId, InterfaceId, PortId, RouterId, VlanId};
use thiserror::Error;

/// Configuration rejection reasons.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("duplicate VlanPort for port {0}, vlan {1}")]
    DuplicateVlanPort(PortId, VlanId),
    #[error("VLAN {0} configured in multiple different virtual routers: {1} and {2}")]
    VlanMultiRouter(VlanId, RouterId, RouterId),
    /// An interface was fed into the VLAN index twice; indicates an applier
    /// bug rather than a bad document.
    #[error("interface {0} processed twice for VLAN {1}")]
    InterfaceProcessedTwice(InterfaceId, VlanId),
    #[error(
        "VLAN {vlan} has IP {ip} configured multiple times with different {field} ({first} and {second})"
    )]
    VlanIpInconsistent {
        vlan: VlanId,
        ip: IpAddr,
        field: &'static str,
        first: String,
        second: String,
    },
    #[error("config listed for non-existent port {0}")]
    UnknownPort(PortId),
    #[error(
        "port queue config listed for invalid queues: maximum number of queues on this platform is {0}"
    )]
    InvalidQueueId(usize),
    #[error("active queue management must specify a congestion detection method")]
    AqmMissingDetection,
    #[error("aggregate port {0}: member port {1} has priority outside of [0, 2^16)")]
    SubportPriorityRange(AggregatePortId, PortId),
    #[error("aggregate port {name}: {problem}")]
    InvalidAggregatePort { name: String, problem: String },
    #[error("no ACL named {0} found")]
    UnknownAclMatcher(String),
    #[error(
        "invalid port traffic policy ACL {name}: dstPort is set to {acl_port} but the policy is attached to port {port}"
    )]
    PortPolicyMismatch {
        name: String,
        acl_port: PortId,
        port: PortId,
    },
    /// The ACL field-validation family; `problem` carries the specific
    /// violated constraint.
    #[error("invalid ACL entry {name}: {problem}")]
    InvalidAclEntry { name: String, problem: String },
    #[error("invalid {kind} in DHCP{family} relay override map: {value}")]
    BadDhcpOverride {
        family: &'static str,
        kind: &'static str,
        value: String,
    },
    #[error("duplicate network IP address {addr} in interface {intf}")]
    DuplicateInterfaceAddress { intf: InterfaceId, addr: String },
    #[error(
        "duplicate network address {addr} of interface {intf} as interface {other} in VRF {router}"
    )]
    DuplicateNetworkAcrossInterfaces {
        addr: String,
        intf: InterfaceId,
        other: InterfaceId,
        router: RouterId,
    },
    #[error("interface {intf} refers to non-existent VLAN {vlan}")]
    UnknownVlanForInterface { intf: InterfaceId, vlan: VlanId },
    #[error("VLAN {vlan} refers to {count} interfaces")]
    VlanMultiInterface { vlan: VlanId, count: usize },
    #[error("default VLAN {0} does not exist")]
    MissingDefaultVlan(VlanId),
    #[error("invalid MAC address: {0}")]
    InvalidMacAddress(String),
    #[error("invalid IP address: {0}")]
    InvalidAddress(String),
    #[error("invalid route prefix: {0}")]
    InvalidRoutePrefix(String),
    /// Two configured entries mapped to the same identity.
    #[error("duplicate entry {0}")]
    DuplicateEntry(String),
    #[error(transparent)]
    Load(#[from] LoadError),
}
