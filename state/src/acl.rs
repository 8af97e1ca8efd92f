// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! ACL entry state nodes and the priority-ordered ACL collection.

use ordermap::OrderMap;
use std::net::IpAddr;
use std::sync::Arc;

use config::acl::{AclActionType, IpFragMatch, IpType};
use net::Mac;

use crate::types::PortId;

/// A network in `(address, mask length)` form, host bits retained.
pub type CidrNetwork = (IpAddr, u8);

/// Steers matching traffic to an egress queue, optionally punting to CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendToQueue {
    pub queue_id: u8,
    pub to_cpu: bool,
}

/// Auxiliary action attached to a permitting ACL entry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MatchAction {
    send_to_queue: Option<SendToQueue>,
    packet_counter: Option<String>,
}

impl MatchAction {
    #[must_use]
    pub fn send_to_queue(&self) -> Option<SendToQueue> {
        self.send_to_queue
    }
    #[must_use]
    pub fn packet_counter(&self) -> Option<&str> {
        self.packet_counter.as_deref()
    }
    pub fn set_send_to_queue(&mut self, send: SendToQueue) {
        self.send_to_queue = Some(send);
    }
    pub fn set_packet_counter(&mut self, counter: impl Into<String>) {
        self.packet_counter = Some(counter.into());
    }
}

/// Inclusive L4 port range, validated to fit in 16 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AclL4PortRange {
    pub min: u16,
    pub max: u16,
}

/// Inclusive packet length range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AclPktLenRange {
    pub min: u16,
    pub max: u16,
}

/// TTL match with mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AclTtl {
    pub value: u8,
    pub mask: u8,
}

/// One ACL entry. Identity is the name; priority places the entry in the
/// collection's match order (lower priority values match first among the
/// collection's insertion order).
#[derive(Debug, Clone, PartialEq)]
pub struct AclEntry {
    priority: u32,
    name: String,
    action_type: AclActionType,
    match_action: Option<MatchAction>,
    src_ip: Option<CidrNetwork>,
    dst_ip: Option<CidrNetwork>,
    proto: Option<u8>,
    tcp_flags_bit_map: Option<u16>,
    src_port: Option<PortId>,
    dst_port: Option<PortId>,
    src_l4_port_range: Option<AclL4PortRange>,
    dst_l4_port_range: Option<AclL4PortRange>,
    pkt_len_range: Option<AclPktLenRange>,
    ip_frag: Option<IpFragMatch>,
    icmp_type: Option<u8>,
    icmp_code: Option<u8>,
    dscp: Option<u8>,
    dst_mac: Option<Mac>,
    ip_type: Option<IpType>,
    ttl: Option<AclTtl>,
}

impl AclEntry {
    #[must_use]
    pub fn new(priority: u32, name: impl Into<String>) -> Self {
        Self {
            priority,
            name: name.into(),
            action_type: AclActionType::Permit,
            match_action: None,
            src_ip: None,
            dst_ip: None,
            proto: None,
            tcp_flags_bit_map: None,
            src_port: None,
            dst_port: None,
            src_l4_port_range: None,
            dst_l4_port_range: None,
            pkt_len_range: None,
            ip_frag: None,
            icmp_type: None,
            icmp_code: None,
            dscp: None,
            dst_mac: None,
            ip_type: None,
            ttl: None,
        }
    }

    #[must_use]
    pub fn priority(&self) -> u32 {
        self.priority
    }
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[must_use]
    pub fn action_type(&self) -> AclActionType {
        self.action_type
    }
    #[must_use]
    pub fn match_action(&self) -> Option<&MatchAction> {
        self.match_action.as_ref()
    }
    #[must_use]
    pub fn src_ip(&self) -> Option<CidrNetwork> {
        self.src_ip
    }
    #[must_use]
    pub fn dst_ip(&self) -> Option<CidrNetwork> {
        self.dst_ip
    }
    #[must_use]
    pub fn proto(&self) -> Option<u8> {
        self.proto
    }
    #[must_use]
    pub fn tcp_flags_bit_map(&self) -> Option<u16> {
        self.tcp_flags_bit_map
    }
    #[must_use]
    pub fn src_port(&self) -> Option<PortId> {
        self.src_port
    }
    #[must_use]
    pub fn dst_port(&self) -> Option<PortId> {
        self.dst_port
    }
    #[must_use]
    pub fn src_l4_port_range(&self) -> Option<AclL4PortRange> {
        self.src_l4_port_range
    }
    #[must_use]
    pub fn dst_l4_port_range(&self) -> Option<AclL4PortRange> {
        self.dst_l4_port_range
    }
    #[must_use]
    pub fn pkt_len_range(&self) -> Option<AclPktLenRange> {
        self.pkt_len_range
    }
    #[must_use]
    pub fn ip_frag(&self) -> Option<IpFragMatch> {
        self.ip_frag
    }
    #[must_use]
    pub fn icmp_type(&self) -> Option<u8> {
        self.icmp_type
    }
    #[must_use]
    pub fn icmp_code(&self) -> Option<u8> {
        self.icmp_code
    }
    #[must_use]
    pub fn dscp(&self) -> Option<u8> {
        self.dscp
    }
    #[must_use]
    pub fn dst_mac(&self) -> Option<Mac> {
        self.dst_mac
    }
    #[must_use]
    pub fn ip_type(&self) -> Option<IpType> {
        self.ip_type
    }
    #[must_use]
    pub fn ttl(&self) -> Option<AclTtl> {
        self.ttl
    }

    pub fn set_action_type(&mut self, action: AclActionType) {
        self.action_type = action;
    }
    pub fn set_match_action(&mut self, action: MatchAction) {
        self.match_action = Some(action);
    }
    pub fn set_src_ip(&mut self, net: CidrNetwork) {
        self.src_ip = Some(net);
    }
    pub fn set_dst_ip(&mut self, net: CidrNetwork) {
        self.dst_ip = Some(net);
    }
    pub fn set_proto(&mut self, proto: u8) {
        self.proto = Some(proto);
    }
    pub fn set_tcp_flags_bit_map(&mut self, flags: u16) {
        self.tcp_flags_bit_map = Some(flags);
    }
    pub fn set_src_port(&mut self, port: PortId) {
        self.src_port = Some(port);
    }
    pub fn set_dst_port(&mut self, port: PortId) {
        self.dst_port = Some(port);
    }
    pub fn set_src_l4_port_range(&mut self, range: AclL4PortRange) {
        self.src_l4_port_range = Some(range);
    }
    pub fn set_dst_l4_port_range(&mut self, range: AclL4PortRange) {
        self.dst_l4_port_range = Some(range);
    }
    pub fn set_pkt_len_range(&mut self, range: AclPktLenRange) {
        self.pkt_len_range = Some(range);
    }
    pub fn set_ip_frag(&mut self, frag: IpFragMatch) {
        self.ip_frag = Some(frag);
    }
    pub fn set_icmp_type(&mut self, icmp_type: u8) {
        self.icmp_type = Some(icmp_type);
    }
    pub fn set_icmp_code(&mut self, icmp_code: u8) {
        self.icmp_code = Some(icmp_code);
    }
    pub fn set_dscp(&mut self, dscp: u8) {
        self.dscp = Some(dscp);
    }
    pub fn set_dst_mac(&mut self, mac: Mac) {
        self.dst_mac = Some(mac);
    }
    pub fn set_ip_type(&mut self, ip_type: IpType) {
        self.ip_type = Some(ip_type);
    }
    pub fn set_ttl(&mut self, ttl: AclTtl) {
        self.ttl = Some(ttl);
    }
}

/// The ACL collection. Iteration order is insertion order, which the applier
/// guarantees to be priority order; consumers must not rely on any other
/// ordering cue.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AclMap {
    entries: OrderMap<String, Arc<AclEntry>>,
}

impl AclMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn from_entries(entries: OrderMap<String, Arc<AclEntry>>) -> Self {
        Self { entries }
    }
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<AclEntry>> {
        self.entries.get(name)
    }
    pub fn values(&self) -> impl Iterator<Item = &Arc<AclEntry>> {
        self.entries.values()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
