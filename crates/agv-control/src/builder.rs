//! Fluent builder for constructing an [`Agv`].

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use agv_core::DriveConfig;
use agv_drive::{CachedVehicle, DriveSequencer, Transport};
use agv_spatial::{
    BfsRouter, MapDescription, Network, ObstacleRegion, Router, load_map_json,
    load_obstacles_json,
};

use crate::{Agv, ControlError, ControlResult};

enum MapSource {
    Network(Network),
    Description(MapDescription),
    File(PathBuf),
}

/// Fluent builder for [`Agv<T, R>`].
///
/// # Required inputs
///
/// - `T: Transport`: the link to the vehicle
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                          |
/// |------------------------|----------------------------------|
/// | `.config(c)`           | `DriveConfig::default()`         |
/// | `.router(r)`           | `BfsRouter`                      |
/// | `.network(n)`          | `Network::empty()`               |
/// | `.map(m)` / `.map_json(p)` | as `.network`, built at `build` |
/// | `.obstacles(v)` / `.obstacles_json(p)` | none             |
///
/// Obstacles only apply to maps built by the builder; a ready-made
/// [`Network`] has already been filtered.
///
/// # Example
///
/// ```rust,ignore
/// let agv = AgvBuilder::new(transport)
///     .config(config)
///     .map_json("warehouse.json")
///     .obstacles_json("obstacles.json")
///     .build()?;
/// agv.navigate_to_node("dock")?;
/// ```
pub struct AgvBuilder<T: Transport, R: Router = BfsRouter> {
    transport:      T,
    router:         R,
    config:         DriveConfig,
    map:            Option<MapSource>,
    obstacles:      Vec<ObstacleRegion>,
    obstacles_file: Option<PathBuf>,
}

impl<T: Transport> AgvBuilder<T, BfsRouter> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            router:         BfsRouter,
            config:         DriveConfig::default(),
            map:            None,
            obstacles:      Vec::new(),
            obstacles_file: None,
        }
    }
}

impl<T: Transport, R: Router> AgvBuilder<T, R> {
    pub fn config(mut self, config: DriveConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the routing algorithm.
    pub fn router<R2: Router>(self, router: R2) -> AgvBuilder<T, R2> {
        AgvBuilder {
            transport:      self.transport,
            router,
            config:         self.config,
            map:            self.map,
            obstacles:      self.obstacles,
            obstacles_file: self.obstacles_file,
        }
    }

    /// Use an already built network.
    pub fn network(mut self, network: Network) -> Self {
        self.map = Some(MapSource::Network(network));
        self
    }

    /// Build the network from `map` at [`build`](Self::build) time.
    pub fn map(mut self, map: MapDescription) -> Self {
        self.map = Some(MapSource::Description(map));
        self
    }

    /// Load the map from a JSON file at [`build`](Self::build) time.
    pub fn map_json(mut self, path: impl Into<PathBuf>) -> Self {
        self.map = Some(MapSource::File(path.into()));
        self
    }

    pub fn obstacles(mut self, regions: Vec<ObstacleRegion>) -> Self {
        self.obstacles = regions;
        self
    }

    /// Load additional obstacles from a JSON file at build time.
    pub fn obstacles_json(mut self, path: impl Into<PathBuf>) -> Self {
        self.obstacles_file = Some(path.into());
        self
    }

    /// Validate the config, build the network, and wire the vehicle to a
    /// fresh [`DriveSequencer`].
    pub fn build(self) -> ControlResult<Agv<T, R>> {
        self.config.validate()?;

        let mut obstacles = self.obstacles;
        if let Some(path) = &self.obstacles_file {
            obstacles.extend(load_obstacles_json(path)?);
        }

        let network = match self.map {
            Some(MapSource::Network(network)) => {
                if !obstacles.is_empty() {
                    return Err(ControlError::Config(
                        "obstacles cannot be applied to a prebuilt network".into(),
                    ));
                }
                network
            }
            Some(MapSource::Description(map)) => Network::from_map(&map, &obstacles)?,
            Some(MapSource::File(path)) => Network::from_map(&load_map_json(&path)?, &obstacles)?,
            None => {
                warn!("no map supplied, every navigation target will be unknown");
                Network::empty()
            }
        };

        let vehicle = Arc::new(CachedVehicle::new(self.transport, &self.config));
        let sequencer = Arc::new(DriveSequencer::new(Arc::clone(&vehicle), self.config.clone())?);
        info!(nodes = network.node_count(), "agv ready");

        Ok(Agv::from_parts(network, self.router, vehicle, sequencer))
    }
}
