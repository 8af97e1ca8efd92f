// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Declarative switch configuration model. A [`SwitchConfig`] is the full
//! document a management layer hands to the agent; the applier turns it into
//! a new immutable switch state. The document deserializes from JSON and
//! recognizes only the options named here.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::struct_excessive_bools)]

pub mod acl;
pub mod aggregate;
pub mod interface;
pub mod load_balancer;
pub mod loader;
pub mod port;
pub mod route;
pub mod sflow;
pub mod switch_config;
pub mod vlan;

pub use acl::{AclActionType, AclEntryConfig, TrafficPolicyConfig};
pub use aggregate::AggregatePortConfig;
pub use interface::InterfaceConfig;
pub use load_balancer::LoadBalancerConfig;
pub use loader::LoadError;
pub use port::PortConfig;
pub use route::{StaticRouteNoNextHops, StaticRouteWithNextHops};
pub use sflow::SflowCollectorConfig;
pub use switch_config::{LacpConfig, SwitchConfig, SwitchConfigBuilder};
pub use vlan::{VlanConfig, VlanPortConfig};
