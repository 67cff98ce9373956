//! Routing trait and default fewest-hop implementation.
//!
//! # Pluggability
//!
//! The control layer calls routing via the [`Router`] trait, so a
//! cost-ordered search (fewest turns, shortest distance) can replace the
//! default [`BfsRouter`] without touching the drive loop.
//!
//! # Result shape
//!
//! A [`Route`] lists the stops the vehicle is sent to, source excluded and
//! target included.  Stops in the middle of a straight run are removed; see
//! [`collapse`].  An empty route means the target is unreachable; that is a
//! normal outcome, not an error.

use std::collections::VecDeque;

use tracing::debug;

use agv_core::{NodeIdx, Port};

use crate::network::Network;

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    /// Stops to visit in order.  Empty if the target is unreachable.
    pub waypoints: Vec<NodeIdx>,
    /// Hops of the underlying path before collapsing.
    pub hops: usize,
}

impl Route {
    /// The "no path" result.
    pub fn unreachable() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_unreachable(&self) -> bool {
        self.waypoints.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn destination(&self) -> Option<NodeIdx> {
        self.waypoints.last().copied()
    }

    /// Map ids of the waypoints, resolved against `network`.
    pub fn ids<'a>(&'a self, network: &'a Network) -> impl Iterator<Item = &'a str> + 'a {
        self.waypoints.iter().map(move |&w| network.node(w).id.as_str())
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// Implementations must be `Send + Sync` so a router can be shared with the
/// thread that drives the vehicle.
pub trait Router: Send + Sync {
    /// Compute the stop list from `from` to `to`.
    ///
    /// `from == to` yields `[from]`; an unreachable target (or an index the
    /// network never issued) yields an empty route.
    fn route(&self, network: &Network, from: NodeIdx, to: NodeIdx) -> Route;
}

// ── BfsRouter ─────────────────────────────────────────────────────────────────

/// Breadth-first search over each node's flat neighbor list, followed by
/// [`collapse`].
///
/// Every node is scheduled at most once, so only the first-discovered path
/// to it is ever extended: the result has the fewest hops, ties broken by
/// edge declaration order.  It is not the geometrically shortest path, nor
/// the one with the fewest turns.
pub struct BfsRouter;

impl Router for BfsRouter {
    fn route(&self, network: &Network, from: NodeIdx, to: NodeIdx) -> Route {
        let (Some(src), Some(dst)) = (network.get(from), network.get(to)) else {
            return Route::unreachable();
        };
        if src.id == dst.id {
            return Route { waypoints: vec![from], hops: 0 };
        }

        match fewest_hops(network, from, to) {
            Some(path) => {
                let waypoints = collapse(network, from, &path);
                debug!(
                    from = %src.id,
                    to = %dst.id,
                    hops = path.len(),
                    stops = waypoints.len(),
                    "route found"
                );
                Route { waypoints, hops: path.len() }
            }
            None => {
                debug!(from = %src.id, to = %dst.id, "no path found");
                Route::unreachable()
            }
        }
    }
}

/// Route with the default [`BfsRouter`].
pub fn navigate(network: &Network, from: NodeIdx, to: NodeIdx) -> Route {
    BfsRouter.route(network, from, to)
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Fewest-hop path from `from` to `to`, source excluded, target included.
///
/// The goal test runs when a node is expanded: the first expanded node that
/// lists `to` among its neighbors closes the path.  Returns `None` when the
/// frontier runs dry or either index is not a node of `network`.
pub fn fewest_hops(network: &Network, from: NodeIdx, to: NodeIdx) -> Option<Vec<NodeIdx>> {
    if network.get(from).is_none() || network.get(to).is_none() {
        return None;
    }
    let n = network.node_count();
    // parent[v] = node that first scheduled v; INVALID for unscheduled nodes.
    let mut parent   = vec![NodeIdx::INVALID; n];
    let mut visited  = vec![false; n];
    let mut frontier = VecDeque::from([from]);
    visited[from.index()] = true;

    while let Some(cur) = frontier.pop_front() {
        let node = network.node(cur);
        if node.has_neighbor(to) {
            return Some(reconstruct(&parent, from, cur, to));
        }
        for &next in node.neighbors() {
            if !visited[next.index()] {
                visited[next.index()] = true;
                parent[next.index()] = cur;
                frontier.push_back(next);
            }
        }
    }
    None
}

fn reconstruct(parent: &[NodeIdx], from: NodeIdx, last: NodeIdx, to: NodeIdx) -> Vec<NodeIdx> {
    let mut path = vec![to];
    let mut cur = last;
    while cur != from {
        path.push(cur);
        cur = parent[cur.index()];
    }
    path.reverse();
    path
}

/// Drop the stops of `path` at which the vehicle keeps going straight.
///
/// The entry port of a waypoint is the port its predecessor (the source for
/// the first one) binds it on.  An intermediate waypoint is kept only when
/// the hop leaving it uses a different port than the hop entering it, i.e.
/// the vehicle turns there.  The last waypoint is always kept.  A path that
/// mentions an index outside `network` collapses to nothing.
pub fn collapse(network: &Network, from: NodeIdx, path: &[NodeIdx]) -> Vec<NodeIdx> {
    let Some((&last, inner)) = path.split_last() else {
        return Vec::new();
    };
    if std::iter::once(&from).chain(path).any(|&i| network.get(i).is_none()) {
        return Vec::new();
    }

    let entry_ports: Vec<Option<Port>> = path
        .iter()
        .scan(from, |prev, &next| {
            let port = network.node(*prev).port_of(next);
            *prev = next;
            Some(port)
        })
        .collect();

    let mut stops: Vec<NodeIdx> = inner
        .iter()
        .enumerate()
        .filter(|&(i, _)| entry_ports[i] != entry_ports[i + 1])
        .map(|(_, &w)| w)
        .collect();
    stops.push(last);
    stops
}
