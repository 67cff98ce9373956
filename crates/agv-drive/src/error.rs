use std::time::Duration;

use agv_core::CoreError;
use thiserror::Error;

/// Failure talking to the vehicle.  Every variant is a connectivity error:
/// the request never reached the vehicle, or the vehicle refused it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VehicleError {
    #[error("could not reach vehicle: {0}")]
    Unreachable(String),

    #[error("vehicle rejected request with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

pub type VehicleResult<T> = Result<T, VehicleError>;

#[derive(Debug, Error)]
pub enum DriveError {
    #[error("vehicle command failed: {0}")]
    Vehicle(#[from] VehicleError),

    /// The vehicle did not confirm arrival in time.  The node is back at
    /// the head of the queue; calling `start` again resumes from it.
    #[error("vehicle did not reach node {node:?} within {waited:?}")]
    Stalled { node: String, waited: Duration },

    #[error("sequencer is already driving")]
    AlreadyDriving,

    #[error(transparent)]
    Config(#[from] CoreError),
}

impl DriveError {
    /// `true` for conditions a caller may simply retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, DriveError::Stalled { .. })
    }
}

pub type DriveResult<T> = Result<T, DriveError>;
