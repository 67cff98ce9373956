//! `agv-drive`: vehicle abstraction and the blocking drive sequencer.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`action`]    | `Action` (named vehicle commands), `Telemetry`                 |
//! | [`transport`] | `Transport` trait: raw telemetry reads and action sends        |
//! | [`telemetry`] | `TelemetryCache`: TTL-bounded snapshot                         |
//! | [`vehicle`]   | `Vehicle` trait, `CachedVehicle<T>` over a transport           |
//! | [`sequencer`] | `DriveSequencer<V>`: queue, per-node dispatch, abort           |
//! | [`state`]     | `DriveState`, `DriveOutcome`                                   |
//! | [`simulated`] | `SimulatedTransport`: in-process vehicle for tests and demos   |
//! | [`error`]     | `VehicleError`, `DriveError`                                   |
//!
//! # Layering
//!
//! ```text
//! DriveSequencer ──▶ Vehicle ◀── CachedVehicle ──▶ TelemetryCache
//!                                      │
//!                                      ▼
//!                                  Transport (HTTP client, SimulatedTransport)
//! ```
//!
//! The sequencer only needs the four `Vehicle` operations, so tests can
//! drive it with a scripted vehicle and deployments with a cached one.

pub mod action;
pub mod error;
pub mod sequencer;
mod signal;
pub mod simulated;
pub mod state;
pub mod telemetry;
pub mod transport;
pub mod vehicle;


pub use action::{Action, Telemetry};
pub use error::{DriveError, DriveResult, VehicleError, VehicleResult};
pub use sequencer::DriveSequencer;
pub use simulated::SimulatedTransport;
pub use state::{DriveOutcome, DriveState};
pub use telemetry::TelemetryCache;
pub use transport::Transport;
pub use vehicle::{CachedVehicle, TurnDirection, Vehicle};
