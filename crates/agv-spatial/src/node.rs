//! Track node with four compass ports.

use agv_core::{NodeIdx, Point, Port};

use crate::SpatialResult;

/// A vertex of the track network.
///
/// Each of the four [`Port`]s holds at most one neighbor.  Every binding is
/// also appended to a flat `neighbors` list, which is what the router walks;
/// a neighbor bound on two ports therefore appears twice there.  Bindings
/// are [`NodeIdx`] values into the owning `Network`, never owning pointers.
///
/// The graph is append-only: there is no unbind.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Index of this node in its network.
    pub idx: NodeIdx,
    /// Map id, unique within the network.
    pub id: String,
    /// Position in the map frame.
    pub pos: Point,
    ports: [Option<NodeIdx>; 4],
    neighbors: Vec<NodeIdx>,
}

impl Node {
    pub fn new(idx: NodeIdx, id: impl Into<String>, pos: Point) -> Self {
        Self {
            idx,
            id: id.into(),
            pos,
            ports: [None; 4],
            neighbors: Vec::new(),
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.pos.y
    }

    /// Euclidean distance to another node.
    #[inline]
    pub fn distance_to(&self, other: &Node) -> f64 {
        self.pos.distance_to(other.pos)
    }

    /// The neighbor currently bound to `port`, if any.
    #[inline]
    pub fn neighbor(&self, port: Port) -> Option<NodeIdx> {
        self.ports[port.slot()]
    }

    /// All bindings in the order they were made (duplicates included).
    #[inline]
    pub fn neighbors(&self) -> &[NodeIdx] {
        &self.neighbors
    }

    #[inline]
    pub fn has_neighbor(&self, other: NodeIdx) -> bool {
        self.neighbors.contains(&other)
    }

    /// Which port currently targets `neighbor`.
    ///
    /// When the same neighbor sits on several ports the first match in
    /// [`Port::ALL`] order (north, west, south, east) wins.  Returns `None`
    /// if no port targets it, including a neighbor whose port was later
    /// rebound to another node.
    pub fn port_of(&self, neighbor: NodeIdx) -> Option<Port> {
        Port::ALL
            .into_iter()
            .find(|p| self.ports[p.slot()] == Some(neighbor))
    }

    /// Bind `neighbor` to the port named by a map-file character.
    ///
    /// The port is parsed before anything is written, so an unknown
    /// character fails with a configuration error and leaves the node as it
    /// was.
    pub fn bind(&mut self, neighbor: NodeIdx, port: &str) -> SpatialResult<Port> {
        let port = Port::parse(port)?;
        self.bind_port(neighbor, port);
        Ok(port)
    }

    /// Bind `neighbor` to `port`, replacing whatever that port held.  Other
    /// ports are untouched.
    pub fn bind_port(&mut self, neighbor: NodeIdx, port: Port) {
        self.ports[port.slot()] = Some(neighbor);
        self.neighbors.push(neighbor);
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.id)
    }
}
