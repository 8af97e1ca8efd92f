// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Batch route updater. The applier records its route intents here and
//! finalizes with [`RouteUpdater::done`], which produces a new route-table
//! map sharing every unchanged per-VRF table with the previous one. Dropping
//! an updater without calling `done` discards all recorded intents, which is
//! what makes a failed apply side-effect free.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use config::SwitchConfig;
use net::ip::{mask_network, parse_network};
use state::route::{
    AdminDistance, NextHop, Route, RouteAction, RouteClient, RouteNextHopEntry, RoutePrefix,
    RouteTable, RouteTableMap, UCMP_DEFAULT_WEIGHT,
};
use state::types::RouterId;

use crate::errors::ApplyError;

/// Accumulates route changes against a starting route-table map.
pub struct RouteUpdater {
    orig: Arc<RouteTableMap>,
    tables: BTreeMap<RouterId, BTreeMap<RoutePrefix, Route>>,
}

impl RouteUpdater {
    /// Start an update over the given tables.
    #[must_use]
    pub fn new(orig: Arc<RouteTableMap>) -> Self {
        let mut tables = BTreeMap::new();
        for table in orig.values() {
            let routes = table
                .routes()
                .iter()
                .map(|(prefix, route)| (*prefix, (**route).clone()))
                .collect();
            tables.insert(table.id(), routes);
        }
        Self { orig, tables }
    }

    /// Add (or replace) `client`'s entry on the route for `network/mask`.
    /// The network is masked before insertion.
    pub fn add_route(
        &mut self,
        router: RouterId,
        network: std::net::IpAddr,
        mask: u8,
        client: RouteClient,
        entry: RouteNextHopEntry,
    ) {
        let prefix = RoutePrefix {
            network: mask_network(network, mask),
            mask,
        };
        self.tables
            .entry(router)
            .or_default()
            .entry(prefix)
            .or_insert_with(|| Route::new(prefix))
            .set_entry(client, entry);
    }

    /// Remove `client`'s entry from the route for `prefix`. Routes with no
    /// remaining entries disappear, as do tables with no remaining routes.
    /// Missing routers, prefixes and entries are tolerated.
    pub fn del_route(&mut self, router: RouterId, prefix: RoutePrefix, client: RouteClient) {
        if let Some(routes) = self.tables.get_mut(&router) {
            if let Some(route) = routes.get_mut(&prefix) {
                route.del_entry(client);
                if route.has_no_entry() {
                    routes.remove(&prefix);
                }
            }
            if routes.is_empty() {
                self.tables.remove(&router);
            }
        }
    }

    /// Install the `fe80::/64` to-CPU route for a virtual router.
    pub fn add_link_local_routes(&mut self, router: RouterId) {
        let prefix = RoutePrefix::V6_LINK_LOCAL;
        self.add_route(
            router,
            prefix.network,
            prefix.mask,
            RouteClient::LinkLocalRoute,
            RouteNextHopEntry::new(RouteAction::ToCpu, AdminDistance::DirectlyConnected),
        );
    }

    /// Remove the `fe80::/64` route from a virtual router.
    pub fn del_link_local_routes(&mut self, router: RouterId) {
        self.del_route(
            router,
            RoutePrefix::V6_LINK_LOCAL,
            RouteClient::LinkLocalRoute,
        );
    }

    /// Replace the static routes of `prev_cfg` with those of `new_cfg`.
    pub fn update_static_routes(
        &mut self,
        new_cfg: &SwitchConfig,
        prev_cfg: &SwitchConfig,
    ) -> Result<(), ApplyError> {
        for (router, prefix) in prev_static_routes(prev_cfg)? {
            self.del_route(router, prefix, RouteClient::StaticRoute);
        }

        for route in &new_cfg.static_routes_to_null {
            let (network, mask) = parse_prefix(&route.prefix)?;
            self.add_route(
                RouterId(route.router_id),
                network,
                mask,
                RouteClient::StaticRoute,
                RouteNextHopEntry::new(RouteAction::Drop, AdminDistance::StaticRoute),
            );
        }
        for route in &new_cfg.static_routes_to_cpu {
            let (network, mask) = parse_prefix(&route.prefix)?;
            self.add_route(
                RouterId(route.router_id),
                network,
                mask,
                RouteClient::StaticRoute,
                RouteNextHopEntry::new(RouteAction::ToCpu, AdminDistance::StaticRoute),
            );
        }
        for route in &new_cfg.static_routes_with_nhops {
            let (network, mask) = parse_prefix(&route.prefix)?;
            let nexthops: BTreeSet<NextHop> = route
                .nexthops
                .iter()
                .map(|addr| NextHop::Unresolved {
                    addr: *addr,
                    weight: UCMP_DEFAULT_WEIGHT,
                })
                .collect();
            self.add_route(
                RouterId(route.router_id),
                network,
                mask,
                RouteClient::StaticRoute,
                RouteNextHopEntry::new(RouteAction::Nexthops(nexthops), AdminDistance::StaticRoute),
            );
        }
        Ok(())
    }

    /// Finalize: build the resulting map, sharing unchanged per-VRF tables.
    /// Returns `None` when the result equals the starting map.
    #[must_use]
    pub fn done(self) -> Option<RouteTableMap> {
        let Self { orig, tables } = self;
        let mut out = BTreeMap::new();
        let mut changed = false;

        for (router, routes) in tables {
            match orig.get(router) {
                Some(orig_table) if table_unchanged(orig_table, &routes) => {
                    out.insert(router, Arc::clone(orig_table));
                }
                _ => {
                    changed = true;
                    let routes = routes
                        .into_iter()
                        .map(|(prefix, route)| (prefix, Arc::new(route)))
                        .collect();
                    out.insert(router, Arc::new(RouteTable::from_routes(router, routes)));
                }
            }
        }
        if out.len() != orig.len() {
            // one or more routers lost their last route
            changed = true;
        }
        if !changed {
            return None;
        }
        debug!("Route update touched {} table(s)", out.len());
        Some(RouteTableMap::from_tables(out))
    }
}

fn table_unchanged(orig: &RouteTable, routes: &BTreeMap<RoutePrefix, Route>) -> bool {
    orig.len() == routes.len()
        && routes
            .iter()
            .all(|(prefix, route)| orig.get(prefix).is_some_and(|o| **o == *route))
}

fn parse_prefix(prefix: &str) -> Result<(std::net::IpAddr, u8), ApplyError> {
    parse_network(prefix).map_err(|_| ApplyError::InvalidRoutePrefix(prefix.to_string()))
}

fn prev_static_routes(
    cfg: &SwitchConfig,
) -> Result<Vec<(RouterId, RoutePrefix)>, ApplyError> {
    let mut routes = Vec::new();
    let all = cfg
        .static_routes_to_null
        .iter()
        .chain(&cfg.static_routes_to_cpu)
        .map(|r| (r.router_id, r.prefix.as_str()))
        .chain(
            cfg.static_routes_with_nhops
                .iter()
                .map(|r| (r.router_id, r.prefix.as_str())),
        );
    for (router, prefix) in all {
        let (network, mask) = parse_prefix(prefix)?;
        routes.push((
            RouterId(router),
            RoutePrefix {
                network: mask_network(network, mask),
                mask,
            },
        ));
    }
    Ok(routes)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::net::IpAddr;

    fn prefix(s: &str) -> RoutePrefix {
        let (network, mask) = parse_network(s).unwrap();
        RoutePrefix {
            network: mask_network(network, mask),
            mask,
        }
    }

    #[test]
    fn add_route_masks_host_bits() {
        let mut updater = RouteUpdater::new(Arc::new(RouteTableMap::new()));
        let addr: IpAddr = "10.0.0.1".parse().unwrap();
        updater.add_route(
            RouterId(0),
            addr,
            24,
            RouteClient::InterfaceRoute,
            RouteNextHopEntry::new(RouteAction::ToCpu, AdminDistance::DirectlyConnected),
        );
        let tables = updater.done().unwrap();
        let table = tables.get(RouterId(0)).unwrap();
        assert!(table.get(&prefix("10.0.0.0/24")).is_some());
    }

    #[test]
    fn done_shares_unchanged_tables() {
        let mut updater = RouteUpdater::new(Arc::new(RouteTableMap::new()));
        updater.add_link_local_routes(RouterId(0));
        let first = Arc::new(updater.done().unwrap());

        // no-op pass over the result shares the table and reports no change
        let updater = RouteUpdater::new(first.clone());
        assert!(updater.done().is_none());

        // removing the only route drops the table entirely
        let mut updater = RouteUpdater::new(first.clone());
        updater.del_link_local_routes(RouterId(0));
        let second = updater.done().unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn del_route_tolerates_unknown_targets() {
        let mut updater = RouteUpdater::new(Arc::new(RouteTableMap::new()));
        updater.del_route(RouterId(7), prefix("10.0.0.0/24"), RouteClient::StaticRoute);
        assert!(updater.done().is_none());
    }

    #[test]
    fn static_routes_replace_previous_generation() {
        let mut prev_cfg = SwitchConfig::default();
        prev_cfg.static_routes_to_null.push(config::StaticRouteNoNextHops {
            router_id: 0,
            prefix: "10.9.0.0/16".to_string(),
        });

        // install the previous generation
        let mut updater = RouteUpdater::new(Arc::new(RouteTableMap::new()));
        updater
            .update_static_routes(&prev_cfg, &SwitchConfig::default())
            .unwrap();
        let tables = Arc::new(updater.done().unwrap());

        // next generation swaps the null route for a next-hop route
        let mut new_cfg = SwitchConfig::default();
        new_cfg
            .static_routes_with_nhops
            .push(config::StaticRouteWithNextHops {
                router_id: 0,
                prefix: "10.8.0.0/16".to_string(),
                nexthops: vec!["10.0.0.254".parse().unwrap()],
            });
        let mut updater = RouteUpdater::new(tables);
        updater.update_static_routes(&new_cfg, &prev_cfg).unwrap();
        let tables = updater.done().unwrap();
        let table = tables.get(RouterId(0)).unwrap();
        assert!(table.get(&prefix("10.9.0.0/16")).is_none());
        let route = table.get(&prefix("10.8.0.0/16")).unwrap();
        assert!(route.entry(RouteClient::StaticRoute).is_some());
    }

    #[test]
    fn bad_prefix_is_rejected() {
        let mut cfg = SwitchConfig::default();
        cfg.static_routes_to_null.push(config::StaticRouteNoNextHops {
            router_id: 0,
            prefix: "not-a-prefix".to_string(),
        });
        let mut updater = RouteUpdater::new(Arc::new(RouteTableMap::new()));
        let err = updater
            .update_static_routes(&cfg, &SwitchConfig::default())
            .unwrap_err();
        assert!(matches!(err, ApplyError::InvalidRoutePrefix(_)));
    }
}
