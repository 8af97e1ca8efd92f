// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Route state: prefixes, next-hop entries and per-VRF route tables. The
//! applier never edits these nodes directly; all manipulation goes through
//! the route updater.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::net::{IpAddr, Ipv6Addr};
use std::sync::Arc;

use crate::types::{InterfaceId, RouterId};

/// Default next-hop weight: 0 selects plain equal-cost distribution.
pub const UCMP_DEFAULT_WEIGHT: u32 = 0;

/// Who installed a route. At most one entry per client exists on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RouteClient {
    Bgp,
    StaticRoute,
    InterfaceRoute,
    LinkLocalRoute,
}

/// Relative trust of route sources; lower wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AdminDistance {
    DirectlyConnected,
    StaticRoute,
    Ebgp,
    Ibgp,
    MaxAdminDistance,
}

/// A next hop of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NextHop {
    /// Forward out of a known interface.
    Resolved {
        addr: IpAddr,
        interface: InterfaceId,
        weight: u32,
    },
    /// Forward towards an address the forwarding layer still has to resolve.
    Unresolved { addr: IpAddr, weight: u32 },
}

/// What a route does with matching traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAction {
    Drop,
    ToCpu,
    Nexthops(BTreeSet<NextHop>),
}

/// One client's contribution to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteNextHopEntry {
    action: RouteAction,
    admin_distance: AdminDistance,
}

impl RouteNextHopEntry {
    #[must_use]
    pub fn new(action: RouteAction, admin_distance: AdminDistance) -> Self {
        Self {
            action,
            admin_distance,
        }
    }

    /// Entry with a single next hop.
    #[must_use]
    pub fn from_nexthop(nexthop: NextHop, admin_distance: AdminDistance) -> Self {
        let mut nexthops = BTreeSet::new();
        nexthops.insert(nexthop);
        Self::new(RouteAction::Nexthops(nexthops), admin_distance)
    }

    #[must_use]
    pub fn action(&self) -> &RouteAction {
        &self.action
    }
    #[must_use]
    pub fn admin_distance(&self) -> AdminDistance {
        self.admin_distance
    }
}

/// A destination network. The address always has its host bits zeroed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RoutePrefix {
    pub network: IpAddr,
    pub mask: u8,
}

impl RoutePrefix {
    /// The IPv6 link-local network installed per VRF.
    pub const V6_LINK_LOCAL: RoutePrefix = RoutePrefix {
        network: IpAddr::V6(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 0)),
        mask: 64,
    };
}

impl Display for RoutePrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.network, self.mask)
    }
}

/// A route: a prefix plus the per-client next-hop entries competing for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    prefix: RoutePrefix,
    entries: BTreeMap<RouteClient, RouteNextHopEntry>,
}

impl Route {
    #[must_use]
    pub fn new(prefix: RoutePrefix) -> Self {
        Self {
            prefix,
            entries: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> RoutePrefix {
        self.prefix
    }
    #[must_use]
    pub fn entry(&self, client: RouteClient) -> Option<&RouteNextHopEntry> {
        self.entries.get(&client)
    }
    #[must_use]
    pub fn has_no_entry(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn set_entry(&mut self, client: RouteClient, entry: RouteNextHopEntry) {
        self.entries.insert(client, entry);
    }
    /// Remove a client's entry; missing entries are tolerated.
    pub fn del_entry(&mut self, client: RouteClient) {
        self.entries.remove(&client);
    }

    /// The winning entry by admin distance.
    #[must_use]
    pub fn best_entry(&self) -> Option<(&RouteClient, &RouteNextHopEntry)> {
        self.entries
            .iter()
            .min_by_key(|(_, entry)| entry.admin_distance())
    }
}

/// The routes of one virtual router.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTable {
    id: RouterId,
    routes: BTreeMap<RoutePrefix, Arc<Route>>,
}

impl RouteTable {
    #[must_use]
    pub fn new(id: RouterId) -> Self {
        Self {
            id,
            routes: BTreeMap::new(),
        }
    }
    #[must_use]
    pub fn from_routes(id: RouterId, routes: BTreeMap<RoutePrefix, Arc<Route>>) -> Self {
        Self { id, routes }
    }

    #[must_use]
    pub fn id(&self) -> RouterId {
        self.id
    }
    #[must_use]
    pub fn routes(&self) -> &BTreeMap<RoutePrefix, Arc<Route>> {
        &self.routes
    }
    #[must_use]
    pub fn get(&self, prefix: &RoutePrefix) -> Option<&Arc<Route>> {
        self.routes.get(prefix)
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// All route tables, keyed by virtual router. Only non-empty tables are kept.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RouteTableMap {
    tables: BTreeMap<RouterId, Arc<RouteTable>>,
}

impl RouteTableMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    #[must_use]
    pub fn from_tables(tables: BTreeMap<RouterId, Arc<RouteTable>>) -> Self {
        Self { tables }
    }
    #[must_use]
    pub fn get(&self, id: RouterId) -> Option<&Arc<RouteTable>> {
        self.tables.get(&id)
    }
    pub fn values(&self) -> impl Iterator<Item = &Arc<RouteTable>> {
        self.tables.values()
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn best_entry_prefers_lower_admin_distance() {
        let prefix = RoutePrefix {
            network: "10.0.0.0".parse().unwrap(),
            mask: 24,
        };
        let mut route = Route::new(prefix);
        route.set_entry(
            RouteClient::Bgp,
            RouteNextHopEntry::new(RouteAction::Drop, AdminDistance::Ebgp),
        );
        route.set_entry(
            RouteClient::InterfaceRoute,
            RouteNextHopEntry::from_nexthop(
                NextHop::Resolved {
                    addr: "10.0.0.1".parse().unwrap(),
                    interface: InterfaceId(100),
                    weight: UCMP_DEFAULT_WEIGHT,
                },
                AdminDistance::DirectlyConnected,
            ),
        );
        let (client, _) = route.best_entry().unwrap();
        assert_eq!(*client, RouteClient::InterfaceRoute);
    }

    #[test]
    fn del_entry_tolerates_missing_clients() {
        let mut route = Route::new(RoutePrefix::V6_LINK_LOCAL);
        route.del_entry(RouteClient::StaticRoute);
        assert!(route.has_no_entry());
    }
}
