// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Control-plane (CPU port) state. Queue provisioning and rx-reason mapping
//! are not configurable yet; the node exists so that a future config section
//! can populate it without reshaping the state tree.

use std::sync::Arc;

use crate::port::PortQueue;

/// CPU port state.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ControlPlane {
    queues: Vec<Arc<PortQueue>>,
}

impl ControlPlane {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn queues(&self) -> &[Arc<PortQueue>] {
        &self.queues
    }
}
