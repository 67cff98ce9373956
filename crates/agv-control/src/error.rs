use agv_core::CoreError;
use agv_drive::{DriveError, VehicleError};
use agv_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("control configuration error: {0}")]
    Config(String),

    #[error("network has no nodes")]
    EmptyNetwork,

    #[error("vehicle location ({x}, {y}) is not a finite point")]
    NonFiniteLocation { x: f64, y: f64 },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Vehicle(#[from] VehicleError),

    #[error(transparent)]
    Drive(#[from] DriveError),
}

impl ControlError {
    /// `true` when retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ControlError::Drive(e) if e.is_transient())
    }
}

pub type ControlResult<T> = Result<T, ControlError>;
