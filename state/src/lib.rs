// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Immutable switch-state model. Every entity here is a value node with a
//! stable identity and structural equality; collections hold nodes behind
//! [`std::sync::Arc`] so that unchanged subtrees are shared between
//! successive states. Mutation is expressed by cloning a node, updating the
//! clone and re-wrapping it; nodes reachable from a published state are
//! never modified in place.

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
#![allow(clippy::module_name_repetitions)]

pub mod acl;
pub mod aggregate_port;
pub mod control_plane;
pub mod interface;
pub mod load_balancer;
pub mod port;
pub mod route;
pub mod sflow_collector;
pub mod switch_state;
pub mod types;
pub mod vlan;

pub use switch_state::SwitchState;
pub use types::{AggregatePortId, InterfaceId, PortId, RouterId, VlanId};
