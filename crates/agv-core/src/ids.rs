//! Strongly typed, zero-cost node index.
//!
//! Node ids on the wire are strings (`"A1"`, `"dock-3"`, ...).  Inside a
//! `Network` every node also gets a dense `NodeIdx` so neighbor bindings and
//! search bookkeeping are plain `Vec` indexing instead of string hashing.
//! The inner integer is `pub`, but callers should prefer [`NodeIdx::index`].

use std::fmt;

/// Position of a node in its `Network`'s node storage.
///
/// Indices are only meaningful for the network that issued them.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeIdx(pub u32);

impl NodeIdx {
    /// Sentinel meaning "no valid node": equivalent to `u32::MAX`.
    pub const INVALID: NodeIdx = NodeIdx(u32::MAX);

    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for NodeIdx {
    /// Returns the `INVALID` sentinel so uninitialized indices are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for NodeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeIdx({})", self.0)
    }
}

impl From<NodeIdx> for usize {
    #[inline(always)]
    fn from(idx: NodeIdx) -> usize {
        idx.0 as usize
    }
}

impl TryFrom<usize> for NodeIdx {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<NodeIdx, Self::Error> {
        u32::try_from(n).map(NodeIdx)
    }
}
