// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Port family updater. Ports are fixed at boot: every configured port must
//! exist, and ports the document does not mention are reset to the
//! platform's default (admin-down) configuration rather than deleted.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::error;

use config::port::{PortConfig, PortQueueConfig};
use state::port::{Port, PortMap, PortQueue};
use state::types::{PortId, VlanId};

use super::{update_map, ConfigApplier};
use crate::errors::ApplyError;

impl ConfigApplier<'_> {
    pub(crate) fn update_ports(&mut self) -> Result<Option<PortMap>, ApplyError> {
        let orig_ports = self.orig.ports();
        let mut new_ports = BTreeMap::new();
        let mut changed = false;

        // all supplied port configs
        for port_cfg in &self.cfg.ports {
            let id = PortId(port_cfg.logical_id);
            let orig_port = orig_ports.get(id).ok_or_else(|| {
                error!("config listed for non-existent port {id}");
                ApplyError::UnknownPort(id)
            })?;
            let new_port = self.update_port(orig_port, port_cfg)?;
            changed |= update_map(&mut new_ports, Some(orig_port), new_port, id)?;
        }

        // ports with no config listed fall back to their default state
        for orig_port in orig_ports.values() {
            if new_ports.contains_key(&orig_port.id()) {
                continue;
            }
            let default_cfg = self.platform.default_port_config(orig_port);
            let new_port = self.update_port(orig_port, &default_cfg)?;
            changed |= update_map(&mut new_ports, Some(orig_port), new_port, orig_port.id())?;
        }

        if !changed {
            return Ok(None);
        }
        Ok(Some(PortMap::from_ports(new_ports)))
    }

    fn update_port(
        &self,
        orig: &Arc<Port>,
        cfg: &PortConfig,
    ) -> Result<Option<Arc<Port>>, ApplyError> {
        let vlans = self
            .port_vlans
            .get(&orig.id())
            .cloned()
            .unwrap_or_default();

        let queues = self.update_port_queues(orig, cfg)?;
        let queues_unchanged = queues.len() == orig.queues().len()
            && queues
                .iter()
                .zip(orig.queues())
                .all(|(new, old)| new == old);

        if cfg.state == orig.admin_state()
            && VlanId(cfg.ingress_vlan) == orig.ingress_vlan()
            && cfg.speed == orig.speed()
            && cfg.pause == orig.pause()
            && cfg.s_flow_ingress_rate == orig.sflow_ingress_rate()
            && cfg.s_flow_egress_rate == orig.sflow_egress_rate()
            && cfg.name == orig.name()
            && cfg.description == orig.description()
            && vlans == *orig.vlans()
            && cfg.fec == orig.fec()
            && queues_unchanged
        {
            return Ok(None);
        }

        let mut port = (**orig).clone();
        port.set_admin_state(cfg.state);
        port.set_ingress_vlan(VlanId(cfg.ingress_vlan));
        port.set_vlans(vlans);
        port.set_speed(cfg.speed);
        port.set_pause(cfg.pause);
        port.set_sflow_ingress_rate(cfg.s_flow_ingress_rate);
        port.set_sflow_egress_rate(cfg.s_flow_egress_rate);
        port.set_name(cfg.name.clone());
        port.set_description(cfg.description.clone());
        port.set_fec(cfg.fec);
        port.reset_queues(queues);
        Ok(Some(Arc::new(port)))
    }

    /// Rebuild the whole queue list of a port: each queue id below the
    /// platform's queue count takes its configured entry or reverts to the
    /// default queue of that id.
    fn update_port_queues(
        &self,
        orig: &Arc<Port>,
        cfg: &PortConfig,
    ) -> Result<Vec<Arc<PortQueue>>, ApplyError> {
        let queue_count = self.platform.queue_count(orig);
        let mut configured: BTreeMap<u8, &PortQueueConfig> =
            cfg.queues.iter().map(|queue| (queue.id, queue)).collect();

        let mut queues = Vec::with_capacity(queue_count);
        for id in 0..queue_count {
            let id = u8::try_from(id).map_err(|_| ApplyError::InvalidQueueId(queue_count))?;
            let queue = match configured.remove(&id) {
                Some(queue_cfg) => match orig.queues().get(usize::from(id)) {
                    Some(orig_queue) => update_port_queue(orig_queue, queue_cfg)?,
                    None => Arc::new(create_port_queue(queue_cfg)?),
                },
                None => Arc::new(PortQueue::new(id)),
            };
            queues.push(queue);
        }

        if !configured.is_empty() {
            error!(
                "port {}: queue config listed for invalid queues (max {queue_count})",
                orig.id()
            );
            return Err(ApplyError::InvalidQueueId(queue_count));
        }
        Ok(queues)
    }
}

fn update_port_queue(
    orig: &Arc<PortQueue>,
    cfg: &PortQueueConfig,
) -> Result<Arc<PortQueue>, ApplyError> {
    if orig.stream_type() == cfg.stream_type
        && orig.scheduling() == cfg.scheduling
        && orig.weight() == cfg.weight
        && orig.reserved_bytes() == cfg.reserved_bytes
        && orig.scaling_factor() == cfg.scaling_factor
        && orig.aqm() == cfg.aqm.as_ref()
    {
        return Ok(Arc::clone(orig));
    }

    let mut queue = (**orig).clone();
    apply_queue_config(&mut queue, cfg)?;
    Ok(Arc::new(queue))
}

fn create_port_queue(cfg: &PortQueueConfig) -> Result<PortQueue, ApplyError> {
    let mut queue = PortQueue::new(cfg.id);
    apply_queue_config(&mut queue, cfg)?;
    Ok(queue)
}

/// Unspecified optional fields retain the hardware defaults of the queue.
fn apply_queue_config(queue: &mut PortQueue, cfg: &PortQueueConfig) -> Result<(), ApplyError> {
    queue.set_stream_type(cfg.stream_type);
    queue.set_scheduling(cfg.scheduling);
    if let Some(weight) = cfg.weight {
        queue.set_weight(weight);
    }
    if let Some(bytes) = cfg.reserved_bytes {
        queue.set_reserved_bytes(bytes);
    }
    if let Some(factor) = cfg.scaling_factor {
        queue.set_scaling_factor(factor);
    }
    if let Some(aqm) = cfg.aqm {
        if aqm.detection.is_none() {
            error!("active queue management config carries no detection method");
            return Err(ApplyError::AqmMissingDetection);
        }
        queue.set_aqm(aqm);
    }
    Ok(())
}
