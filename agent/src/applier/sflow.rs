// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! sFlow collector family updater. A collector's identity is its
//! `"<ip>:<port>"` string, so an address change replaces the node while a
//! same-address entry is preserved.

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Arc;

use config::sflow::SflowCollectorConfig;
use state::sflow_collector::{SflowCollector, SflowCollectorMap};

use super::ConfigApplier;
use crate::errors::ApplyError;

impl ConfigApplier<'_> {
    pub(crate) fn update_sflow_collectors(
        &mut self,
    ) -> Result<Option<SflowCollectorMap>, ApplyError> {
        let orig_collectors = self.orig.sflow_collectors();
        let mut new_collectors = BTreeMap::new();
        let mut changed = false;
        let mut num_existing_processed = 0;

        for collector_cfg in &self.cfg.s_flow_collectors {
            let new_collector = create_sflow_collector(collector_cfg)?;
            let id = new_collector.id().to_string();

            let node = match orig_collectors.get(&id) {
                Some(orig) => {
                    num_existing_processed += 1;
                    if orig.address() == new_collector.address() {
                        Arc::clone(orig)
                    } else {
                        changed = true;
                        Arc::new(new_collector)
                    }
                }
                None => {
                    changed = true;
                    Arc::new(new_collector)
                }
            };
            if new_collectors.insert(id.clone(), node).is_some() {
                return Err(ApplyError::DuplicateEntry(id));
            }
        }

        if num_existing_processed != orig_collectors.len() {
            // some existing collectors were removed
            changed = true;
        }
        if !changed {
            return Ok(None);
        }
        Ok(Some(SflowCollectorMap::from_collectors(new_collectors)))
    }
}

fn create_sflow_collector(cfg: &SflowCollectorConfig) -> Result<SflowCollector, ApplyError> {
    let ip: IpAddr = cfg
        .ip
        .parse()
        .map_err(|_| ApplyError::InvalidAddress(cfg.ip.clone()))?;
    Ok(SflowCollector::new(ip, cfg.port))
}
