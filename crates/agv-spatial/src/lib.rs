//! `agv-spatial`: track network, obstacle exclusion, and routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`node`]     | `Node`: four compass ports + flat neighbor list           |
//! | [`obstacle`] | `ObstacleRegion`, `ObstacleSet` (R-tree)                   |
//! | [`network`]  | `Network`, `NetworkBuilder`                                |
//! | [`map`]      | JSON map / obstacle loader, `MapDescription`               |
//! | [`router`]   | `Router` trait, `Route`, `BfsRouter`, `collapse`           |
//! | [`error`]    | `SpatialError`, `SpatialResult<T>`                         |

pub mod error;
pub mod map;
pub mod network;
pub mod node;
pub mod obstacle;
pub mod router;


pub use error::{SpatialError, SpatialResult};
pub use map::{
    load_map_json, load_map_reader, load_obstacles_json, load_obstacles_reader, MapDescription,
};
pub use network::{Network, NetworkBuilder};
pub use node::Node;
pub use obstacle::{ObstacleRegion, ObstacleSet};
pub use router::{collapse, fewest_hops, navigate, BfsRouter, Route, Router};
