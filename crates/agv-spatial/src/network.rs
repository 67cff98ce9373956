//! Track network representation and builder.
//!
//! # Data layout
//!
//! Nodes live in a single `Vec<Node>` indexed by [`NodeIdx`], in the order
//! they were added.  A side `HashMap` resolves map ids to indices.  Neighbor
//! bindings are indices into the same vector, so the whole graph is owned
//! by the [`Network`] and needs no reference counting.
//!
//! The network is built once through [`NetworkBuilder`] (or
//! [`Network::from_map`]) and is read-only afterwards.
//!
//! # Obstacle exclusion
//!
//! A node whose position lies strictly inside any obstacle region is dropped
//! during construction together with every edge that touches it.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use agv_core::{NodeIdx, Point, Port};

use crate::map::MapDescription;
use crate::node::Node;
use crate::obstacle::{ObstacleRegion, ObstacleSet};
use crate::{SpatialError, SpatialResult};

// ── Network ───────────────────────────────────────────────────────────────────

/// Directed track graph with id and nearest-point lookup.
///
/// Edges are **not** implicitly bidirectional: a reverse edge exists only if
/// the map declares it.
#[derive(Debug, Clone, Default)]
pub struct Network {
    nodes: Vec<Node>,
    by_id: HashMap<String, NodeIdx>,
}

impl Network {
    /// Construct an empty network.  Every lookup fails and every route is
    /// empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a network from a map description, dropping nodes inside any of
    /// `obstacles`.
    ///
    /// Fails with [`SpatialError::Config`] on a missing position, a
    /// duplicate node id or an unknown port character.
    pub fn from_map(map: &MapDescription, obstacles: &[ObstacleRegion]) -> SpatialResult<Self> {
        let mut b = NetworkBuilder::with_capacity(map.nodes.len())
            .obstacles(obstacles.to_vec());

        for entry in &map.nodes {
            b.add_node(&entry.id, entry.position()?)?;
        }
        for edge in &map.edges {
            b.add_edge(&edge.source.node, &edge.source.port, &edge.target.node)?;
        }
        Ok(b.build())
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of bindings across all nodes (duplicates counted).
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbors().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    /// All nodes in insertion order.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node at `idx`.
    ///
    /// # Panics
    /// Panics if `idx` was not issued by this network.  Use [`get`](Self::get)
    /// for indices of unknown origin.
    #[inline]
    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.index()]
    }

    #[inline]
    pub fn get(&self, idx: NodeIdx) -> Option<&Node> {
        self.nodes.get(idx.index())
    }

    /// Node with map id `id`, or [`SpatialError::NodeNotFound`].
    pub fn get_node(&self, id: &str) -> SpatialResult<&Node> {
        self.index_of(id).map(|idx| self.node(idx))
    }

    pub fn index_of(&self, id: &str) -> SpatialResult<NodeIdx> {
        self.by_id
            .get(id)
            .copied()
            .ok_or_else(|| SpatialError::NodeNotFound(id.to_string()))
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node nearest to `(x, y)` by Euclidean distance.
    ///
    /// Linear scan, O(n); fine up to a few thousand nodes.  Ties go to the
    /// node added first.  Returns `None` for an empty network or a query
    /// coordinate that is NaN or infinite.
    pub fn closest_node(&self, x: f64, y: f64) -> Option<&Node> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let target = Point::new(x, y);
        let mut best: Option<(&Node, f64)> = None;
        for node in &self.nodes {
            let d = node.pos.distance_2(target);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((node, d)),
            }
        }
        best.map(|(node, _)| node)
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// Obstacles must be supplied before nodes are added; each node is checked
/// against them as it arrives.  Edges may only reference nodes added
/// earlier.
///
/// # Example
///
/// ```
/// use agv_core::Point;
/// use agv_spatial::{NetworkBuilder, ObstacleRegion};
///
/// let mut b = NetworkBuilder::new()
///     .obstacles(vec![ObstacleRegion::new(4.0, -1.0, 6.0, 1.0)]);
/// b.add_node("A", Point::new(0.0, 0.0)).unwrap();
/// b.add_node("B", Point::new(10.0, 0.0)).unwrap();
/// b.add_node("blocked", Point::new(5.0, 0.0)).unwrap(); // inside the obstacle
/// b.add_edge("A", "e", "B").unwrap();
/// b.add_edge("A", "n", "blocked").unwrap(); // skipped
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 1);
/// ```
pub struct NetworkBuilder {
    nodes:     Vec<Node>,
    by_id:     HashMap<String, NodeIdx>,
    obstacles: ObstacleSet,
    dropped:   HashSet<String>,
    skipped_edges: usize,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-allocate for the expected number of nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            by_id:     HashMap::with_capacity(nodes),
            obstacles: ObstacleSet::empty(),
            dropped:   HashSet::new(),
            skipped_edges: 0,
        }
    }

    /// Set the obstacle regions used to exclude nodes.
    pub fn obstacles(mut self, regions: Vec<ObstacleRegion>) -> Self {
        self.obstacles = ObstacleSet::new(regions);
        self
    }

    /// Add a node.
    ///
    /// Returns `Ok(None)` when the position is inside an obstacle and the
    /// node was dropped.  A second node with an id already seen (kept or
    /// dropped) is a configuration error.
    pub fn add_node(&mut self, id: &str, pos: Point) -> SpatialResult<Option<NodeIdx>> {
        if self.by_id.contains_key(id) || self.dropped.contains(id) {
            return Err(SpatialError::Config(format!("duplicate node id {id:?}")));
        }
        if self.obstacles.contains_point(pos) {
            debug!(node = id, %pos, "node inside obstacle, dropped");
            self.dropped.insert(id.to_string());
            return Ok(None);
        }

        let idx = NodeIdx::try_from(self.nodes.len())
            .map_err(|_| SpatialError::Config("too many nodes".into()))?;
        self.nodes.push(Node::new(idx, id, pos));
        self.by_id.insert(id.to_string(), idx);
        Ok(Some(idx))
    }

    /// Bind `target` to `source`'s `port`.
    ///
    /// The port character is validated first, so a bad port fails even on
    /// an edge that would otherwise be skipped.  Returns `Ok(false)` when
    /// either endpoint is absent (dropped by an obstacle or never declared).
    pub fn add_edge(&mut self, source: &str, port: &str, target: &str) -> SpatialResult<bool> {
        let port = Port::parse(port)?;
        let (Some(&src), Some(&dst)) = (self.by_id.get(source), self.by_id.get(target)) else {
            debug!(source, %port, target, "edge touches a missing node, skipped");
            self.skipped_edges += 1;
            return Ok(false);
        };
        self.nodes[src.index()].bind_port(dst, port);
        Ok(true)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes rejected by obstacles so far.
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }

    /// Consume the builder and produce the immutable [`Network`].
    pub fn build(self) -> Network {
        let net = Network { nodes: self.nodes, by_id: self.by_id };
        info!(
            nodes = net.node_count(),
            edges = net.edge_count(),
            dropped_nodes = self.dropped.len(),
            skipped_edges = self.skipped_edges,
            obstacles = self.obstacles.len(),
            "network built"
        );
        net
    }
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
