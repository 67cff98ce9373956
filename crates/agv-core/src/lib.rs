//! `agv-core`: foundational types for the AGV navigation stack.
//!
//! This crate is a dependency of every other `agv-*` crate.  It has no
//! `agv-*` dependencies and minimal external ones (only `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`ids`]      | `NodeIdx`                                              |
//! | [`geo`]      | `Point`, `Pose`, Euclidean distance                    |
//! | [`port`]     | `Port`: the four compass attachment points of a node  |
//! | [`config`]   | `DriveConfig`: polling, timeout, retry, cache TTL     |
//! | [`error`]    | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod port;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::DriveConfig;
pub use error::{CoreError, CoreResult};
pub use geo::{Point, Pose};
pub use ids::NodeIdx;
pub use port::Port;
