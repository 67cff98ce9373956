//! JSON map and obstacle loader.
//!
//! # Map format
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "A", "position": { "x": 0.0, "y": 0.0 } },
//!     { "id": "B", "nodeProperties": { "intelliAgentCore": { "position": { "x": 1.0, "y": 0.0 } } } }
//!   ],
//!   "edges": [
//!     { "source": { "node": "A", "port": "e" }, "target": { "node": "B" } }
//!   ]
//! }
//! ```
//!
//! A node carries its position either directly or in the nested layout the
//! vehicle's network-map endpoint serves.  Unknown fields are ignored.
//! Ports are kept as raw strings here and validated when the network is
//! built.
//!
//! # Obstacle format
//!
//! A list of rectangles, each as two opposite corners:
//!
//! ```json
//! [ [[0.0, 0.0], [2.0, 3.0]], [[10.0, 4.0], [8.0, 1.0]] ]
//! ```

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use agv_core::Point;

use crate::obstacle::ObstacleRegion;
use crate::{SpatialError, SpatialResult};

// ── Map records ───────────────────────────────────────────────────────────────

/// Raw node/edge description of a track network.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapDescription {
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub edges: Vec<EdgeEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,

    #[serde(rename = "nodeProperties", default, skip_serializing_if = "Option::is_none")]
    pub node_properties: Option<NodeProperties>,
}

/// Vendor layout: `nodeProperties.intelliAgentCore.position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeProperties {
    #[serde(rename = "intelliAgentCore")]
    pub core: VendorCore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorCore {
    pub position: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeEntry {
    pub source: EdgeSource,
    pub target: EdgeTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSource {
    pub node: String,
    pub port: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeTarget {
    pub node: String,
}

impl NodeEntry {
    pub fn new(id: impl Into<String>, position: Point) -> Self {
        Self { id: id.into(), position: Some(position), node_properties: None }
    }

    /// The node's position, preferring the flat `position` field.
    pub fn position(&self) -> SpatialResult<Point> {
        self.position
            .or_else(|| self.node_properties.as_ref().map(|p| p.core.position))
            .ok_or_else(|| SpatialError::Config(format!("node {:?} has no position", self.id)))
    }
}

impl EdgeEntry {
    pub fn new(source: impl Into<String>, port: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: EdgeSource { node: source.into(), port: port.into() },
            target: EdgeTarget { node: target.into() },
        }
    }
}

impl MapDescription {
    /// Convenience for building maps in code.
    pub fn node(mut self, id: &str, x: f64, y: f64) -> Self {
        self.nodes.push(NodeEntry::new(id, Point::new(x, y)));
        self
    }

    /// Convenience for building maps in code.
    pub fn edge(mut self, source: &str, port: &str, target: &str) -> Self {
        self.edges.push(EdgeEntry::new(source, port, target));
        self
    }
}

// ── Obstacle records ──────────────────────────────────────────────────────────

/// One obstacle as two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleEntry(pub [f64; 2], pub [f64; 2]);

impl From<ObstacleEntry> for ObstacleRegion {
    fn from(ObstacleEntry(a, b): ObstacleEntry) -> Self {
        ObstacleRegion::new(a[0], a[1], b[0], b[1])
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a map description from a JSON file.
pub fn load_map_json(path: &Path) -> SpatialResult<MapDescription> {
    let file = std::fs::File::open(path)?;
    load_map_reader(file)
}

/// Like [`load_map_json`] but accepts any `Read` source.
pub fn load_map_reader<R: Read>(reader: R) -> SpatialResult<MapDescription> {
    serde_json::from_reader(reader)
        .map_err(|e| SpatialError::Config(format!("malformed map description: {e}")))
}

/// Load an obstacle list from a JSON file.
pub fn load_obstacles_json(path: &Path) -> SpatialResult<Vec<ObstacleRegion>> {
    let file = std::fs::File::open(path)?;
    load_obstacles_reader(file)
}

/// Like [`load_obstacles_json`] but accepts any `Read` source.
pub fn load_obstacles_reader<R: Read>(reader: R) -> SpatialResult<Vec<ObstacleRegion>> {
    let entries: Vec<ObstacleEntry> = serde_json::from_reader(reader)
        .map_err(|e| SpatialError::Config(format!("malformed obstacle list: {e}")))?;
    Ok(entries.into_iter().map(ObstacleRegion::from).collect())
}
