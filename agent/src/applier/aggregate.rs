// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Aggregate-port family updater. Normalizes configuration only; link
//! negotiation itself belongs to the LACP machinery.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::error;

use config::aggregate::{AggregatePortConfig, MinimumCapacity};
use net::Mac;
use state::aggregate_port::{
    AggregatePort, AggregatePortMap, Subport, DEFAULT_SYSTEM_PRIORITY,
};
use state::types::{AggregatePortId, PortId};

use super::{update_map, ConfigApplier};
use crate::errors::ApplyError;

impl ConfigApplier<'_> {
    pub(crate) fn update_aggregate_ports(
        &mut self,
    ) -> Result<Option<AggregatePortMap>, ApplyError> {
        let orig_agg_ports = self.orig.aggregate_ports();
        let mut new_agg_ports = BTreeMap::new();
        let mut changed = false;
        let mut num_existing_processed = 0;

        for agg_cfg in &self.cfg.aggregate_ports {
            let id = AggregatePortId(agg_cfg.key);
            let orig_agg_port = orig_agg_ports.get(id);

            let new_agg_port = match orig_agg_port {
                Some(orig) => {
                    num_existing_processed += 1;
                    self.update_agg_port(orig, agg_cfg)?
                }
                None => Some(Arc::new(self.create_agg_port(agg_cfg)?)),
            };
            changed |= update_map(&mut new_agg_ports, orig_agg_port, new_agg_port, id)?;
        }

        if num_existing_processed != orig_agg_ports.len() {
            // some existing aggregate ports were removed
            changed = true;
        }
        if !changed {
            return Ok(None);
        }
        Ok(Some(AggregatePortMap::from_ports(new_agg_ports)))
    }

    fn update_agg_port(
        &self,
        orig: &Arc<AggregatePort>,
        cfg: &AggregatePortConfig,
    ) -> Result<Option<Arc<AggregatePort>>, ApplyError> {
        let subports = self.subports_sorted(cfg)?;
        let (system_id, system_priority) = self.system_lacp_config()?;
        let min_link_count = minimum_link_count(cfg)?;

        if orig.name() == cfg.name
            && orig.description() == cfg.description
            && orig.system_priority() == system_priority
            && orig.system_id() == system_id
            && orig.minimum_link_count() == min_link_count
            && orig.sorted_subports() == subports.as_slice()
        {
            return Ok(None);
        }

        let mut agg_port = (**orig).clone();
        agg_port.set_name(cfg.name.clone());
        agg_port.set_description(cfg.description.clone());
        agg_port.set_system_priority(system_priority);
        agg_port.set_system_id(system_id);
        agg_port.set_minimum_link_count(min_link_count);
        agg_port.set_subports(subports);
        Ok(Some(Arc::new(agg_port)))
    }

    fn create_agg_port(&self, cfg: &AggregatePortConfig) -> Result<AggregatePort, ApplyError> {
        let subports = self.subports_sorted(cfg)?;
        let (system_id, system_priority) = self.system_lacp_config()?;
        let min_link_count = minimum_link_count(cfg)?;
        Ok(AggregatePort::from_subports(
            AggregatePortId(cfg.key),
            cfg.name.clone(),
            cfg.description.clone(),
            system_priority,
            system_id,
            min_link_count,
            subports,
        ))
    }

    /// Validate and sort the member ports of an aggregate. Members must name
    /// existing physical ports and carry 16-bit LACP priorities.
    fn subports_sorted(&self, cfg: &AggregatePortConfig) -> Result<Vec<Subport>, ApplyError> {
        let mut subports = Vec::with_capacity(cfg.member_ports.len());
        for member in &cfg.member_ports {
            let port = PortId(member.member_port_id);
            if self.orig.ports().get(port).is_none() {
                return Err(ApplyError::InvalidAggregatePort {
                    name: cfg.name.clone(),
                    problem: format!("member port {port} does not exist"),
                });
            }
            if !(0..1 << 16).contains(&member.priority) {
                let id = AggregatePortId(cfg.key);
                error!(
                    "aggregate port {id}: member port {port} has priority outside of [0, 2^16)"
                );
                return Err(ApplyError::SubportPriorityRange(id, port));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            subports.push(Subport {
                port_id: port,
                priority: member.priority as u16,
                rate: member.rate,
                activity: member.activity,
            });
        }
        subports.sort();
        Ok(subports)
    }

    /// The LACP actor identity: taken from the document's `lacp` block when
    /// present, otherwise the platform MAC with the conventional default
    /// priority.
    fn system_lacp_config(&self) -> Result<(Mac, u16), ApplyError> {
        match &self.cfg.lacp {
            Some(lacp) => {
                let system_id = Mac::try_from(lacp.system_id.as_str())
                    .map_err(|_| ApplyError::InvalidMacAddress(lacp.system_id.clone()))?;
                Ok((system_id, lacp.system_priority))
            }
            None => Ok((self.platform.local_mac(), DEFAULT_SYSTEM_PRIORITY)),
        }
    }
}

/// Members required for the aggregate to count as up: an absolute count, a
/// ceiling of a fraction of the members (at least one when any members are
/// configured), or one by default.
fn minimum_link_count(cfg: &AggregatePortConfig) -> Result<u8, ApplyError> {
    let invalid = |problem: String| ApplyError::InvalidAggregatePort {
        name: cfg.name.clone(),
        problem,
    };
    match cfg.minimum_capacity {
        None => Ok(1),
        Some(MinimumCapacity::LinkCount(count)) => {
            if count < 1 {
                return Err(invalid("minimum link count must be at least 1".to_string()));
            }
            Ok(count)
        }
        Some(MinimumCapacity::LinkPercentage(percentage)) => {
            if !(percentage > 0.0 && percentage <= 1.0) {
                return Err(invalid(format!(
                    "minimum link percentage {percentage} outside of (0, 1]"
                )));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
            let count = (percentage * cfg.member_ports.len() as f64).ceil() as u8;
            if cfg.member_ports.is_empty() {
                Ok(count)
            } else {
                Ok(count.max(1))
            }
        }
    }
}
