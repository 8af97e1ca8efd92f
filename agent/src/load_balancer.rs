// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Load-balancer applier. Follows the same create / update / implicit-delete
//! discipline as the per-family updaters, but lives apart from them because
//! load balancers are opaque to the rest of the state model.

use std::collections::BTreeMap;
use std::sync::Arc;

use config::load_balancer::LoadBalancerConfig;
use state::load_balancer::{LoadBalancer, LoadBalancerMap};

use crate::platform::Platform;

/// Applies the `load_balancers[]` section of a document.
pub struct LoadBalancerConfigApplier<'a> {
    orig: Arc<LoadBalancerMap>,
    configs: &'a [LoadBalancerConfig],
    platform: &'a dyn Platform,
}

impl<'a> LoadBalancerConfigApplier<'a> {
    #[must_use]
    pub fn new(
        orig: Arc<LoadBalancerMap>,
        configs: &'a [LoadBalancerConfig],
        platform: &'a dyn Platform,
    ) -> Self {
        Self {
            orig,
            configs,
            platform,
        }
    }

    /// Hash seed used when the document does not fix one. Derived from the
    /// platform MAC so that distinct switches hash flows differently.
    fn default_seed(&self) -> u32 {
        self.platform
            .local_mac()
            .0
            .iter()
            .fold(0u32, |seed, byte| {
                seed.wrapping_mul(31).wrapping_add(u32::from(*byte))
            })
    }

    /// Produce the new collection, or `None` when nothing changed.
    #[must_use]
    pub fn update_load_balancers(self) -> Option<LoadBalancerMap> {
        let mut new_balancers = BTreeMap::new();
        let mut changed = false;
        let mut num_existing_processed = 0;

        for cfg in self.configs {
            let seed = cfg.seed.unwrap_or_else(|| self.default_seed());
            let balancer =
                LoadBalancer::new(cfg.id, cfg.algorithm, seed, cfg.fields.clone());
            let node = match self.orig.get(cfg.id) {
                Some(orig) => {
                    num_existing_processed += 1;
                    if **orig == balancer {
                        Arc::clone(orig)
                    } else {
                        changed = true;
                        Arc::new(balancer)
                    }
                }
                None => {
                    changed = true;
                    Arc::new(balancer)
                }
            };
            new_balancers.insert(cfg.id, node);
        }

        if num_existing_processed != self.orig.len() {
            changed = true;
        }
        if !changed {
            return None;
        }
        Some(LoadBalancerMap::from_balancers(new_balancers))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use config::load_balancer::{HashAlgorithm, HashField, LoadBalancerId};
    use net::Mac;
    use state::port::Port;

    struct FixedPlatform;
    impl Platform for FixedPlatform {
        fn local_mac(&self) -> Mac {
            Mac([0x02, 0, 0, 0, 0, 0x01])
        }
        fn queue_count(&self, _port: &Port) -> usize {
            8
        }
    }

    fn ecmp_config() -> LoadBalancerConfig {
        LoadBalancerConfig {
            id: LoadBalancerId::Ecmp,
            algorithm: HashAlgorithm::Crc,
            seed: Some(42),
            fields: [HashField::SourceIp, HashField::DestinationIp]
                .into_iter()
                .collect(),
        }
    }

    #[test]
    fn create_then_noop_then_delete() {
        let platform = FixedPlatform;
        let cfgs = vec![ecmp_config()];

        let applier =
            LoadBalancerConfigApplier::new(Arc::new(LoadBalancerMap::new()), &cfgs, &platform);
        let map = Arc::new(applier.update_load_balancers().unwrap());
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(LoadBalancerId::Ecmp).unwrap().seed(), 42);

        let applier = LoadBalancerConfigApplier::new(map.clone(), &cfgs, &platform);
        assert!(applier.update_load_balancers().is_none());

        let applier = LoadBalancerConfigApplier::new(map, &[], &platform);
        let emptied = applier.update_load_balancers().unwrap();
        assert!(emptied.is_empty());
    }

    #[test]
    fn unset_seed_derives_from_platform_mac() {
        let platform = FixedPlatform;
        let mut cfg = ecmp_config();
        cfg.seed = None;
        let cfgs = vec![cfg];
        let applier =
            LoadBalancerConfigApplier::new(Arc::new(LoadBalancerMap::new()), &cfgs, &platform);
        let map = applier.update_load_balancers().unwrap();
        let derived = map.get(LoadBalancerId::Ecmp).unwrap().seed();
        assert_ne!(derived, 0);
    }
}
