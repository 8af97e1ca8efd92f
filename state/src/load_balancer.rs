// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Load-balancer state nodes. Carried opaquely by the state tree; only the
//! load-balancer applier interprets the fields.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use config::load_balancer::{HashAlgorithm, HashField, LoadBalancerId};

/// State of one load balancer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancer {
    id: LoadBalancerId,
    algorithm: HashAlgorithm,
    seed: u32,
    fields: BTreeSet<HashField>,
}

impl LoadBalancer {
    #[must_use]
    pub fn new(
        id: LoadBalancerId,
        algorithm: HashAlgorithm,
        seed: u32,
        fields: BTreeSet<HashField>,
    ) -> Self {
        Self {
            id,
            algorithm,
            seed,
            fields,
        }
    }

    #[must_use]
    pub fn id(&self) -> LoadBalancerId {
        self.id
    }
    #[must_use]
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
    #[must_use]
    pub fn seed(&self) -> u32 {
        self.seed
    }
    #[must_use]
    pub fn fields(&self) -> &BTreeSet<HashField> {
        &self.fields
    }
}

/// The load-balancer collection.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadBalancerMap {
    balancers: BTreeMap<LoadBalancerId, Arc<LoadBalancer>>,
}

impl LoadBalancerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn from_balancers(balancers: BTreeMap<LoadBalancerId, Arc<LoadBalancer>>) -> Self {
        Self { balancers }
    }
    #[must_use]
    pub fn get(&self, id: LoadBalancerId) -> Option<&Arc<LoadBalancer>> {
        self.balancers.get(&id)
    }
    pub fn values(&self) -> impl Iterator<Item = &Arc<LoadBalancer>> {
        self.balancers.values()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.balancers.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balancers.is_empty()
    }
}
