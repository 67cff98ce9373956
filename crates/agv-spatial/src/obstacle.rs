//! Rectangular keep-out regions.
//!
//! # Containment
//!
//! [`ObstacleRegion::contains`] uses **open** bounds: a point exactly on an
//! edge or corner is outside.  Track nodes are often placed on the border of
//! a blocked area and must stay drivable.
//!
//! # Spatial index
//!
//! [`ObstacleSet`] bulk-loads the regions into an R-tree (via `rstar`) so a
//! node position is only tested against rectangles whose envelope covers it.
//! The envelope test is inclusive; the leaf test is the strict `contains`.

use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};

use agv_core::Point;

// ── ObstacleRegion ────────────────────────────────────────────────────────────

/// An axis-aligned rectangle the vehicle must not enter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObstacleRegion {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl ObstacleRegion {
    /// Build from two opposite corners given in any order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            min_x: x1.min(x2),
            min_y: y1.min(y2),
            max_x: x1.max(x2),
            max_y: y1.max(y2),
        }
    }

    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// `true` iff `(x, y)` lies strictly inside the rectangle.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.min_x < x && x < self.max_x && self.min_y < y && y < self.max_y
    }
}

impl RTreeObject for ObstacleRegion {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.min_x, self.min_y], [self.max_x, self.max_y])
    }
}

impl PointDistance for ObstacleRegion {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        Envelope::distance_2(&self.envelope(), point)
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        self.contains(point[0], point[1])
    }
}

// ── ObstacleSet ───────────────────────────────────────────────────────────────

/// The obstacle list of one network build, indexed for point queries.
pub struct ObstacleSet {
    tree: RTree<ObstacleRegion>,
}

impl ObstacleSet {
    pub fn new(regions: Vec<ObstacleRegion>) -> Self {
        Self { tree: RTree::bulk_load(regions) }
    }

    pub fn empty() -> Self {
        Self { tree: RTree::new() }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// `true` if any region strictly contains `(x, y)`.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.tree.locate_at_point(&[x, y]).is_some()
    }

    #[inline]
    pub fn contains_point(&self, p: Point) -> bool {
        self.contains(p.x, p.y)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObstacleRegion> + '_ {
        self.tree.iter()
    }
}

impl Default for ObstacleSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<ObstacleRegion>> for ObstacleSet {
    fn from(regions: Vec<ObstacleRegion>) -> Self {
        Self::new(regions)
    }
}
