//! The seam between the drive layer and the vehicle's remote interface.

use std::sync::Arc;

use crate::action::{Action, Telemetry};
use crate::error::VehicleResult;

/// Raw access to one vehicle.
///
/// An HTTP client for the vehicle's action and variables endpoints is one
/// implementation; [`SimulatedTransport`](crate::SimulatedTransport) is
/// another.  Implementations must be `Send + Sync` because the sequencer
/// polls from one thread while `abort` is called from another.
pub trait Transport: Send + Sync {
    /// Read the current vehicle variables.
    fn fetch_telemetry(&self) -> VehicleResult<Telemetry>;

    /// Send one named action.  `Ok` means the vehicle accepted it.
    fn send_action(&self, action: &Action) -> VehicleResult<()>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn fetch_telemetry(&self) -> VehicleResult<Telemetry> {
        (**self).fetch_telemetry()
    }

    fn send_action(&self, action: &Action) -> VehicleResult<()> {
        (**self).send_action(action)
    }
}
