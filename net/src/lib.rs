// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Ground networking types shared by the switch state model and the
//! configuration applier: MAC addresses and IP network helpers.

#![deny(
    unsafe_code,
    clippy::all,
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
#![allow(clippy::missing_errors_doc)]

pub mod eth;
pub mod ip;

pub use eth::mac::Mac;
