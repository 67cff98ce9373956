//! Spatial-subsystem error type.

use thiserror::Error;

use agv_core::CoreError;

/// Errors produced by `agv-spatial`.
///
/// An unreachable target is **not** an error: routing returns an empty
/// [`Route`](crate::Route) for it.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// Malformed port, map entry, obstacle entry or duplicate node id.
    /// Fatal for network construction.
    #[error("configuration error: {0}")]
    Config(String),

    /// Lookup of a node id that is not part of the network.
    #[error("node {0:?} not found in network")]
    NodeNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for SpatialError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Config(msg) => SpatialError::Config(msg),
        }
    }
}

pub type SpatialResult<T> = Result<T, SpatialError>;
