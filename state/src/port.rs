// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Physical port state nodes and the port collection.

use std::collections::BTreeMap;
use std::sync::Arc;

use config::port::{
    AdminState, PortFec, PortPause, PortQueueAqm, PortSpeed, QueueScheduling, ScalingFactor,
    StreamType,
};

use crate::types::{PortId, VlanId};

/// Per-VLAN membership attributes of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanInfo {
    /// Whether frames for this VLAN leave the port tagged.
    pub emit_tags: bool,
}

/// The set of VLANs a port belongs to.
pub type VlanMembership = BTreeMap<VlanId, VlanInfo>;

/// State of one egress queue of a port. The number of queues per port is
/// fixed by the platform; queues are only ever reconfigured, never added or
/// removed.
#[derive(Debug, Clone, PartialEq)]
pub struct PortQueue {
    id: u8,
    stream_type: StreamType,
    scheduling: QueueScheduling,
    weight: Option<u32>,
    reserved_bytes: Option<u32>,
    scaling_factor: Option<ScalingFactor>,
    aqm: Option<PortQueueAqm>,
}

impl PortQueue {
    /// A queue in its hardware-default configuration.
    #[must_use]
    pub fn new(id: u8) -> Self {
        Self {
            id,
            stream_type: StreamType::default(),
            scheduling: QueueScheduling::default(),
            weight: None,
            reserved_bytes: None,
            scaling_factor: None,
            aqm: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> u8 {
        self.id
    }
    #[must_use]
    pub fn stream_type(&self) -> StreamType {
        self.stream_type
    }
    #[must_use]
    pub fn scheduling(&self) -> QueueScheduling {
        self.scheduling
    }
    #[must_use]
    pub fn weight(&self) -> Option<u32> {
        self.weight
    }
    #[must_use]
    pub fn reserved_bytes(&self) -> Option<u32> {
        self.reserved_bytes
    }
    #[must_use]
    pub fn scaling_factor(&self) -> Option<ScalingFactor> {
        self.scaling_factor
    }
    #[must_use]
    pub fn aqm(&self) -> Option<&PortQueueAqm> {
        self.aqm.as_ref()
    }

    pub fn set_stream_type(&mut self, stream_type: StreamType) {
        self.stream_type = stream_type;
    }
    pub fn set_scheduling(&mut self, scheduling: QueueScheduling) {
        self.scheduling = scheduling;
    }
    pub fn set_weight(&mut self, weight: u32) {
        self.weight = Some(weight);
    }
    pub fn set_reserved_bytes(&mut self, bytes: u32) {
        self.reserved_bytes = Some(bytes);
    }
    pub fn set_scaling_factor(&mut self, factor: ScalingFactor) {
        self.scaling_factor = Some(factor);
    }
    pub fn set_aqm(&mut self, aqm: PortQueueAqm) {
        self.aqm = Some(aqm);
    }
}

/// State of one physical port. The set of ports is fixed at boot; applying
/// a configuration can update ports but never create or destroy them.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    id: PortId,
    name: String,
    description: String,
    admin_state: AdminState,
    ingress_vlan: VlanId,
    speed: PortSpeed,
    pause: PortPause,
    fec: PortFec,
    sflow_ingress_rate: u64,
    sflow_egress_rate: u64,
    vlans: VlanMembership,
    queues: Vec<Arc<PortQueue>>,
}

impl Port {
    #[must_use]
    pub fn new(id: PortId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            admin_state: AdminState::Disabled,
            ingress_vlan: VlanId(0),
            speed: PortSpeed::Default,
            pause: PortPause::default(),
            fec: PortFec::Off,
            sflow_ingress_rate: 0,
            sflow_egress_rate: 0,
            vlans: VlanMembership::new(),
            queues: Vec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> PortId {
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
    pub fn admin_state(&self) -> AdminState {
        self.admin_state
    }
    #[must_use]
    pub fn ingress_vlan(&self) -> VlanId {
        self.ingress_vlan
    }
    #[must_use]
    pub fn speed(&self) -> PortSpeed {
        self.speed
    }
    #[must_use]
    pub fn pause(&self) -> PortPause {
        self.pause
    }
    #[must_use]
    pub fn fec(&self) -> PortFec {
        self.fec
    }
    #[must_use]
    pub fn sflow_ingress_rate(&self) -> u64 {
        self.sflow_ingress_rate
    }
    #[must_use]
    pub fn sflow_egress_rate(&self) -> u64 {
        self.sflow_egress_rate
    }
    #[must_use]
    pub fn vlans(&self) -> &VlanMembership {
        &self.vlans
    }
    #[must_use]
    pub fn queues(&self) -> &[Arc<PortQueue>] {
        &self.queues
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }
    pub fn set_admin_state(&mut self, state: AdminState) {
        self.admin_state = state;
    }
    pub fn set_ingress_vlan(&mut self, vlan: VlanId) {
        self.ingress_vlan = vlan;
    }
    pub fn set_speed(&mut self, speed: PortSpeed) {
        self.speed = speed;
    }
    pub fn set_pause(&mut self, pause: PortPause) {
        self.pause = pause;
    }
    pub fn set_fec(&mut self, fec: PortFec) {
        self.fec = fec;
    }
    pub fn set_sflow_ingress_rate(&mut self, rate: u64) {
        self.sflow_ingress_rate = rate;
    }
    pub fn set_sflow_egress_rate(&mut self, rate: u64) {
        self.sflow_egress_rate = rate;
    }
    pub fn set_vlans(&mut self, vlans: VlanMembership) {
        self.vlans = vlans;
    }
    pub fn reset_queues(&mut self, queues: Vec<Arc<PortQueue>>) {
        self.queues = queues;
    }
}

/// The port collection, iterated in id order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PortMap {
    ports: BTreeMap<PortId, Arc<Port>>,
}

impl PortMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from a full node container, replacing prior contents.
    #[must_use]
    pub fn from_ports(ports: BTreeMap<PortId, Arc<Port>>) -> Self {
        Self { ports }
    }

    #[must_use]
    pub fn get(&self, id: PortId) -> Option<&Arc<Port>> {
        self.ports.get(&id)
    }
    pub fn values(&self) -> impl Iterator<Item = &Arc<Port>> {
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

    /// Register a port at boot time.
    pub fn add_port(&mut self, port: Port) {
        self.ports.insert(port.id(), Arc::new(port));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn queue_defaults_are_wrr_unicast() {
        let q = PortQueue::new(3);
        assert_eq!(q.id(), 3);
        assert_eq!(q.stream_type(), StreamType::Unicast);
        assert_eq!(q.scheduling(), QueueScheduling::WeightedRoundRobin);
        assert!(q.weight().is_none());
    }

    #[test]
    fn port_clone_is_field_equal_but_distinct() {
        let mut port = Port::new(PortId(1), "eth1/1/1");
        port.set_admin_state(AdminState::Enabled);
        let clone = port.clone();
        assert_eq!(port, clone);

        let mut changed = clone;
        changed.set_description("uplink");
        assert_ne!(port, changed);
    }

    #[test]
    fn port_map_iterates_in_id_order() {
        let mut map = PortMap::new();
        map.add_port(Port::new(PortId(5), "eth5"));
        map.add_port(Port::new(PortId(1), "eth1"));
        map.add_port(Port::new(PortId(3), "eth3"));
        let ids: Vec<_> = map.values().map(|p| p.id().raw()).collect();
        assert_eq!(ids, [1, 3, 5]);
    }
}
