//! `agv-control`: the facade that ties a track network, a vehicle, and a
//! drive sequencer together.
//!
//! # Operations
//!
//! | Method                    | Behavior                                              |
//! |---------------------------|-------------------------------------------------------|
//! | `find_closest_node()`     | vehicle location → nearest network node               |
//! | `go_to_coordinate(x, y)`  | single `goto` to the node nearest `(x, y)`            |
//! | `navigate_to_node(id)`    | route from the last reached node, queue, drive        |
//! | `turn_to(theta)`          | quarter turns toward a heading                        |
//! | `abort()`                 | stop driving from any thread                          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use agv_control::AgvBuilder;
//! use agv_drive::SimulatedTransport;
//!
//! let agv = AgvBuilder::new(transport)
//!     .map(map)
//!     .build()?;
//! let outcome = agv.navigate_to_node("dock")?;
//! ```

pub mod agv;
pub mod builder;
pub mod error;
pub mod heading;

#[cfg(test)]
mod tests;

pub use agv::Agv;
pub use builder::AgvBuilder;
pub use error::{ControlError, ControlResult};
pub use heading::TurnPlan;
