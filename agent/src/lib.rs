// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The switch configuration applier: a pure function from the current
//! immutable switch state and a declarative configuration document to a new
//! immutable switch state. Either the returned state satisfies every
//! cross-entity invariant of the data-plane model, or the apply fails and
//! the previous state remains authoritative; an apply that changes nothing
//! reports that explicitly so downstream hardware-diff logic sees a no-op.

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

pub mod applier;
pub mod errors;
pub mod load_balancer;
pub mod platform;
pub mod route_updater;

pub use applier::{apply_switch_config, apply_switch_config_file};
pub use errors::ApplyError;
pub use load_balancer::LoadBalancerConfigApplier;
pub use platform::Platform;
pub use route_updater::RouteUpdater;
