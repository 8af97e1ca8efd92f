// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! ACL family updater. The collection is rebuilt in two passes: every DENY
//! entry first, then one synthesized PERMIT entry per traffic-policy
//! matcher, appended in document order. Priorities are assigned by
//! insertion order starting at a floor that leaves room below for entries
//! installed outside the config; the collection preserves that order.
//! PERMIT entries no policy refers to are dropped.

use ahash::RandomState;
use ordermap::OrderMap;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::error;

use config::acl::{
    AclActionType, AclEntryConfig, L4PortRangeConfig, TrafficPolicyConfig,
};
use net::ip::parse_network;
use net::Mac;
use state::acl::{
    AclEntry, AclL4PortRange, AclMap, AclPktLenRange, AclTtl, MatchAction, SendToQueue,
};
use state::types::PortId;

use super::ConfigApplier;
use crate::errors::ApplyError;

const ACL_START_PRIORITY: u32 = 100_000;

const PROTO_ICMP: u8 = 1;
const PROTO_ICMPV6: u8 = 58;
const MAX_L4_PORT: u32 = 65535;

type AclsByName<'a> = HashMap<&'a str, &'a AclEntryConfig, RandomState>;

impl ConfigApplier<'_> {
    pub(crate) fn update_acls(&mut self) -> Result<Option<AclMap>, ApplyError> {
        let mut new_acls: OrderMap<String, Arc<AclEntry>> = OrderMap::new();
        let mut changed = false;
        let mut num_existing_processed = 0;
        let mut priority = ACL_START_PRIORITY;

        // DENY entries first: they outrank everything the policies add
        for entry in self
            .cfg
            .acls
            .iter()
            .filter(|entry| entry.action_type == AclActionType::Deny)
        {
            let acl = self.update_acl(
                entry.clone(),
                priority,
                &mut num_existing_processed,
                &mut changed,
                None,
            )?;
            priority += 1;
            insert_acl(&mut new_acls, acl)?;
        }

        // name lookup table so each policy matcher is O(1)
        let acls_by_name: AclsByName = self
            .cfg
            .acls
            .iter()
            .map(|entry| (entry.name.as_str(), entry))
            .collect::<HashMap<_, _, _>>();

        if let Some(policy) = &self.cfg.global_egress_traffic_policy {
            self.append_policy_acls(
                policy,
                "",
                None,
                &acls_by_name,
                &mut new_acls,
                &mut priority,
                &mut num_existing_processed,
                &mut changed,
            )?;
        }

        for port_cfg in &self.cfg.ports {
            if let Some(policy) = &port_cfg.egress_traffic_policy {
                let prefix = format!("port{}:", port_cfg.logical_id);
                self.append_policy_acls(
                    policy,
                    &prefix,
                    Some(PortId(port_cfg.logical_id)),
                    &acls_by_name,
                    &mut new_acls,
                    &mut priority,
                    &mut num_existing_processed,
                    &mut changed,
                )?;
            }
        }

        if num_existing_processed != self.orig.acls().len() {
            // some existing ACLs were removed
            changed = true;
        }
        if !changed {
            return Ok(None);
        }
        Ok(Some(AclMap::from_entries(new_acls)))
    }

    /// Synthesize one ACL per matcher of a traffic policy. Entries are
    /// renamed `"system:<prefix><matcher>"`; on a per-port policy the
    /// attachment port becomes the destination port and a conflicting
    /// configured destination port is a rejection.
    #[allow(clippy::too_many_arguments)]
    fn append_policy_acls(
        &self,
        policy: &TrafficPolicyConfig,
        name_prefix: &str,
        dst_port: Option<PortId>,
        acls_by_name: &AclsByName,
        out: &mut OrderMap<String, Arc<AclEntry>>,
        priority: &mut u32,
        num_existing_processed: &mut usize,
        changed: &mut bool,
    ) -> Result<(), ApplyError> {
        for match_to_action in &policy.match_to_action {
            let Some(acl_cfg) = acls_by_name.get(match_to_action.matcher.as_str()) else {
                error!("no ACL named {} found", match_to_action.matcher);
                return Err(ApplyError::UnknownAclMatcher(
                    match_to_action.matcher.clone(),
                ));
            };
            let mut acl_cfg = (*acl_cfg).clone();

            if let Some(port) = dst_port {
                if let Some(acl_port) = acl_cfg.dst_port {
                    if PortId(acl_port) != port {
                        return Err(ApplyError::PortPolicyMismatch {
                            name: acl_cfg.name,
                            acl_port: PortId(acl_port),
                            port,
                        });
                    }
                }
            }

            // DENY entries were already emitted by the first pass
            if acl_cfg.action_type == AclActionType::Deny {
                continue;
            }

            acl_cfg.name = format!("system:{name_prefix}{}", match_to_action.matcher);
            if let Some(port) = dst_port {
                acl_cfg.dst_port = Some(port.raw());
            }

            let mut action = MatchAction::default();
            if let Some(queue_id) = match_to_action.action.send_to_queue {
                action.set_send_to_queue(SendToQueue {
                    queue_id,
                    to_cpu: false,
                });
            }
            if let Some(counter) = &match_to_action.action.packet_counter {
                action.set_packet_counter(counter.clone());
            }

            let acl = self.update_acl(
                acl_cfg,
                *priority,
                num_existing_processed,
                changed,
                Some(action),
            )?;
            *priority += 1;
            insert_acl(out, acl)?;
        }
        Ok(())
    }

    /// Update-or-create for one entry; shares the previous node when the
    /// rebuilt entry is field-equal.
    fn update_acl(
        &self,
        cfg: AclEntryConfig,
        priority: u32,
        num_existing_processed: &mut usize,
        changed: &mut bool,
        action: Option<MatchAction>,
    ) -> Result<Arc<AclEntry>, ApplyError> {
        let orig_acl = self.orig.acls().get(&cfg.name);
        let new_acl = create_acl(&cfg, priority, action)?;
        if let Some(orig_acl) = orig_acl {
            *num_existing_processed += 1;
            if **orig_acl == new_acl {
                return Ok(Arc::clone(orig_acl));
            }
        }
        *changed = true;
        Ok(Arc::new(new_acl))
    }
}

fn insert_acl(
    out: &mut OrderMap<String, Arc<AclEntry>>,
    acl: Arc<AclEntry>,
) -> Result<(), ApplyError> {
    let name = acl.name().to_string();
    if out.insert(name.clone(), acl).is_some() {
        return Err(ApplyError::DuplicateEntry(name));
    }
    Ok(())
}

fn acl_error(cfg: &AclEntryConfig, problem: impl Into<String>) -> ApplyError {
    ApplyError::InvalidAclEntry {
        name: cfg.name.clone(),
        problem: problem.into(),
    }
}

fn check_port_range(
    cfg: &AclEntryConfig,
    range: L4PortRangeConfig,
    direction: &str,
) -> Result<(), ApplyError> {
    if range.min > MAX_L4_PORT {
        return Err(acl_error(
            cfg,
            format!("{direction}'s L4 port range has a min value larger than 65535"),
        ));
    }
    if range.max > MAX_L4_PORT {
        return Err(acl_error(
            cfg,
            format!("{direction}'s L4 port range has a max value larger than 65535"),
        ));
    }
    if range.min > range.max {
        return Err(acl_error(
            cfg,
            format!("{direction}'s L4 port range has a min value larger than its max value"),
        ));
    }
    Ok(())
}

/// Reject documents whose match fields cannot describe a hardware rule.
fn check_acl(cfg: &AclEntryConfig) -> Result<(), ApplyError> {
    if let Some(range) = cfg.src_l4_port_range {
        check_port_range(cfg, range, "src")?;
    }
    if let Some(range) = cfg.dst_l4_port_range {
        check_port_range(cfg, range, "dst")?;
    }
    if let Some(range) = cfg.pkt_len_range {
        if range.min > range.max {
            return Err(acl_error(
                cfg,
                "the min. packet length cannot exceed the max. packet length",
            ));
        }
    }
    if cfg.icmp_code.is_some() && cfg.icmp_type.is_none() {
        return Err(acl_error(cfg, "icmp type must be set when icmp code is set"));
    }
    if let Some(icmp_type) = cfg.icmp_type {
        if !(0..=255).contains(&icmp_type) {
            return Err(acl_error(cfg, "icmp type value must be between 0 and 255"));
        }
        match cfg.proto {
            Some(PROTO_ICMP | PROTO_ICMPV6) => {}
            _ => {
                return Err(acl_error(
                    cfg,
                    "proto must be either icmp or icmpv6 if icmp type is set",
                ));
            }
        }
    }
    if let Some(icmp_code) = cfg.icmp_code {
        if !(0..=255).contains(&icmp_code) {
            return Err(acl_error(cfg, "icmp code value must be between 0 and 255"));
        }
    }
    if let Some(ttl) = cfg.ttl {
        if !(0..=255).contains(&ttl.value) {
            return Err(acl_error(cfg, "ttl value must be between 0 and 255"));
        }
        if !(0..=255).contains(&ttl.mask) {
            return Err(acl_error(cfg, "ttl mask must be between 0 and 255"));
        }
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn create_acl(
    cfg: &AclEntryConfig,
    priority: u32,
    action: Option<MatchAction>,
) -> Result<AclEntry, ApplyError> {
    check_acl(cfg)?;
    let mut acl = AclEntry::new(priority, cfg.name.clone());
    acl.set_action_type(cfg.action_type);
    if let Some(action) = action {
        acl.set_match_action(action);
    }
    if let Some(src_ip) = &cfg.src_ip {
        let network = parse_network(src_ip)
            .map_err(|_| acl_error(cfg, format!("invalid src IP {src_ip}")))?;
        acl.set_src_ip(network);
    }
    if let Some(dst_ip) = &cfg.dst_ip {
        let network = parse_network(dst_ip)
            .map_err(|_| acl_error(cfg, format!("invalid dst IP {dst_ip}")))?;
        acl.set_dst_ip(network);
    }
    if let Some(proto) = cfg.proto {
        acl.set_proto(proto);
    }
    if let Some(flags) = cfg.tcp_flags_bit_map {
        acl.set_tcp_flags_bit_map(flags);
    }
    if let Some(port) = cfg.src_port {
        acl.set_src_port(PortId(port));
    }
    if let Some(port) = cfg.dst_port {
        acl.set_dst_port(PortId(port));
    }
    if let Some(range) = cfg.src_l4_port_range {
        acl.set_src_l4_port_range(AclL4PortRange {
            min: range.min as u16,
            max: range.max as u16,
        });
    }
    if let Some(range) = cfg.dst_l4_port_range {
        acl.set_dst_l4_port_range(AclL4PortRange {
            min: range.min as u16,
            max: range.max as u16,
        });
    }
    if let Some(range) = cfg.pkt_len_range {
        acl.set_pkt_len_range(AclPktLenRange {
            min: range.min,
            max: range.max,
        });
    }
    if let Some(frag) = cfg.ip_frag {
        acl.set_ip_frag(frag);
    }
    if let Some(icmp_type) = cfg.icmp_type {
        acl.set_icmp_type(icmp_type as u8);
    }
    if let Some(icmp_code) = cfg.icmp_code {
        acl.set_icmp_code(icmp_code as u8);
    }
    if let Some(dscp) = cfg.dscp {
        acl.set_dscp(dscp);
    }
    if let Some(dst_mac) = &cfg.dst_mac {
        let mac = Mac::try_from(dst_mac.as_str())
            .map_err(|_| acl_error(cfg, format!("invalid dst MAC {dst_mac}")))?;
        acl.set_dst_mac(mac);
    }
    if let Some(ip_type) = cfg.ip_type {
        acl.set_ip_type(ip_type);
    }
    if let Some(ttl) = cfg.ttl {
        acl.set_ttl(AclTtl {
            value: ttl.value as u8,
            mask: ttl.mask as u8,
        });
    }
    Ok(acl)
}
