// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Aggregate (LAG) port state nodes.

use std::collections::BTreeMap;
use std::sync::Arc;

use config::aggregate::{LacpActivity, LacpRate};
use net::Mac;

use crate::types::{AggregatePortId, PortId};

/// Default LACP actor system priority when the document carries no LACP
/// block. The system id in that case is the platform MAC, which is not a
/// compile-time constant, so only the priority lives here.
pub const DEFAULT_SYSTEM_PRIORITY: u16 = 65535;

/// One member of an aggregate port. Subports order by `(port, priority,
/// rate, activity)`; the field order carries that total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Subport {
    pub port_id: PortId,
    pub priority: u16,
    pub rate: LacpRate,
    pub activity: LacpActivity,
}

/// State of one aggregate port.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePort {
    id: AggregatePortId,
    name: String,
    description: String,
    system_priority: u16,
    system_id: Mac,
    minimum_link_count: u8,
    /// Kept sorted in the subport total order.
    subports: Vec<Subport>,
}

impl AggregatePort {
    /// Build an aggregate port from already-sorted subports.
    #[must_use]
    pub fn from_subports(
        id: AggregatePortId,
        name: impl Into<String>,
        description: impl Into<String>,
        system_priority: u16,
        system_id: Mac,
        minimum_link_count: u8,
        subports: Vec<Subport>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            system_priority,
            system_id,
            minimum_link_count,
            subports,
        }
    }

    #[must_use]
    pub fn id(&self) -> AggregatePortId {
        self.id
    }
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
    #[must_use]
    pub fn system_priority(&self) -> u16 {
        self.system_priority
    }
    #[must_use]
    pub fn system_id(&self) -> Mac {
        self.system_id
    }
    #[must_use]
    pub fn minimum_link_count(&self) -> u8 {
        self.minimum_link_count
    }
    #[must_use]
    pub fn sorted_subports(&self) -> &[Subport] {
        &self.subports
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }
    pub fn set_system_priority(&mut self, priority: u16) {
        self.system_priority = priority;
    }
    pub fn set_system_id(&mut self, mac: Mac) {
        self.system_id = mac;
    }
    pub fn set_minimum_link_count(&mut self, count: u8) {
        self.minimum_link_count = count;
    }
    pub fn set_subports(&mut self, subports: Vec<Subport>) {
        self.subports = subports;
    }
}

/// The aggregate-port collection, iterated in id order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AggregatePortMap {
    ports: BTreeMap<AggregatePortId, Arc<AggregatePort>>,
}

impl AggregatePortMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn from_ports(ports: BTreeMap<AggregatePortId, Arc<AggregatePort>>) -> Self {
        Self { ports }
    }
    #[must_use]
    pub fn get(&self, id: AggregatePortId) -> Option<&Arc<AggregatePort>> {
        self.ports.get(&id)
    }
    pub fn values(&self) -> impl Iterator<Item = &Arc<AggregatePort>> {
        self.ports.values()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.ports.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn subports_order_by_port_then_priority() {
        let mut subports = vec![
            Subport {
                port_id: PortId(3),
                priority: 1,
                rate: LacpRate::Slow,
                activity: LacpActivity::Passive,
            },
            Subport {
                port_id: PortId(1),
                priority: 9,
                rate: LacpRate::Fast,
                activity: LacpActivity::Active,
            },
            Subport {
                port_id: PortId(1),
                priority: 2,
                rate: LacpRate::Slow,
                activity: LacpActivity::Passive,
            },
        ];
        subports.sort();
        let order: Vec<_> = subports.iter().map(|s| (s.port_id.raw(), s.priority)).collect();
        assert_eq!(order, [(1, 2), (1, 9), (3, 1)]);
    }
}
