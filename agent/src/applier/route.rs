// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Route synthesis: drive the route updater from the connected-route index
//! built by the interface updater, then layer the document's static routes
//! on top of the result.

use std::collections::BTreeSet;
use std::sync::Arc;

use net::ip::mask_network;
use state::route::{
    AdminDistance, NextHop, RouteClient, RouteNextHopEntry, RoutePrefix, RouteTableMap,
    UCMP_DEFAULT_WEIGHT,
};
use state::types::RouterId;

use super::ConfigApplier;
use crate::errors::ApplyError;
use crate::route_updater::RouteUpdater;

impl ConfigApplier<'_> {
    /// Install a connected route per interface network and the per-VRF IPv6
    /// link-local route; withdraw routes of networks (and VRFs) that no
    /// interface covers any more.
    pub(crate) fn update_interface_routes(&self) -> Option<RouteTableMap> {
        let mut updater = RouteUpdater::new(Arc::clone(self.orig.route_tables()));
        let mut routers_to_add: BTreeSet<RouterId> = BTreeSet::new();
        let mut routers_to_delete: BTreeSet<RouterId> = BTreeSet::new();

        for (router, routes) in &self.intf_route_tables {
            for (prefix, (interface, addr)) in routes {
                let nexthop = NextHop::Resolved {
                    addr: *addr,
                    interface: *interface,
                    weight: UCMP_DEFAULT_WEIGHT,
                };
                updater.add_route(
                    *router,
                    prefix.network,
                    prefix.mask,
                    RouteClient::InterfaceRoute,
                    RouteNextHopEntry::from_nexthop(nexthop, AdminDistance::DirectlyConnected),
                );
            }
            routers_to_add.insert(*router);
        }

        // walk the previous interfaces and withdraw connected routes that
        // have no counterpart in the new index
        for intf in self.orig.interfaces().values() {
            let router = intf.router_id();
            let new_routes = self.intf_route_tables.get(&router);
            if new_routes.is_none() {
                routers_to_delete.insert(router);
            }
            for (addr, mask) in intf.addresses() {
                let prefix = RoutePrefix {
                    network: mask_network(*addr, *mask),
                    mask: *mask,
                };
                let still_covered =
                    new_routes.is_some_and(|routes| routes.contains_key(&prefix));
                if !still_covered {
                    updater.del_route(router, prefix, RouteClient::InterfaceRoute);
                }
            }
        }

        for router in routers_to_delete {
            updater.del_link_local_routes(router);
        }
        for router in routers_to_add {
            updater.add_link_local_routes(router);
        }

        updater.done()
    }

    /// Apply the document's static routes over the given tables.
    pub(crate) fn update_static_routes(
        &self,
        current_tables: &Arc<RouteTableMap>,
    ) -> Result<Option<RouteTableMap>, ApplyError> {
        let mut updater = RouteUpdater::new(Arc::clone(current_tables));
        updater.update_static_routes(self.cfg, self.prev_cfg)?;
        Ok(updater.done())
    }
}
