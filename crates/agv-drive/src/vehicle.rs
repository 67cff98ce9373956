//! The `Vehicle` capability used by the sequencer and its cached
//! implementation over a [`Transport`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use agv_core::{DriveConfig, Point, Pose};

use crate::action::{Action, Telemetry};
use crate::error::VehicleResult;
use crate::telemetry::TelemetryCache;
use crate::transport::Transport;

// ── Vehicle trait ─────────────────────────────────────────────────────────────

/// What the [`DriveSequencer`](crate::DriveSequencer) needs from a vehicle.
pub trait Vehicle: Send + Sync {
    /// Command travel to the node with map id `node_id`.
    fn goto(&self, node_id: &str) -> VehicleResult<()>;

    /// Map id of the node the vehicle most recently reached.
    fn last_reached_node(&self) -> VehicleResult<String>;

    /// `true` sends Resume, `false` sends Stop.
    fn set_driving(&self, driving: bool) -> VehicleResult<()>;

    /// Whether the vehicle is stopped, from the last command or telemetry
    /// refresh.  Never blocks on the vehicle.
    fn is_stopped(&self) -> bool;
}

impl<V: Vehicle + ?Sized> Vehicle for Arc<V> {
    fn goto(&self, node_id: &str) -> VehicleResult<()> {
        (**self).goto(node_id)
    }

    fn last_reached_node(&self) -> VehicleResult<String> {
        (**self).last_reached_node()
    }

    fn set_driving(&self, driving: bool) -> VehicleResult<()> {
        (**self).set_driving(driving)
    }

    fn is_stopped(&self) -> bool {
        (**self).is_stopped()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TurnDirection {
    Left,
    Right,
}

// ── CachedVehicle ─────────────────────────────────────────────────────────────

/// A [`Vehicle`] over a [`Transport`], reading telemetry through a
/// [`TelemetryCache`].
///
/// Every accepted command invalidates the cache.  The stopped flag follows
/// the `paused` variable on each refresh and is set directly by
/// [`set_driving`](Vehicle::set_driving).
pub struct CachedVehicle<T> {
    transport: T,
    cache:     TelemetryCache,
    stopped:   AtomicBool,
}

impl<T: Transport> CachedVehicle<T> {
    pub fn new(transport: T, config: &DriveConfig) -> Self {
        Self {
            transport,
            cache:   TelemetryCache::new(config.telemetry_ttl()),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &TelemetryCache {
        &self.cache
    }

    /// Telemetry, served from the cache unless stale or `force` is set.
    pub fn telemetry(&self, force: bool) -> VehicleResult<Telemetry> {
        self.cache.get_or_refresh(force, || {
            let t = self.transport.fetch_telemetry()?;
            self.stopped.store(t.paused, Ordering::Release);
            Ok(t)
        })
    }

    pub fn location(&self) -> VehicleResult<Point> {
        Ok(self.telemetry(false)?.location())
    }

    /// Heading in radians.
    pub fn theta(&self) -> VehicleResult<f64> {
        Ok(self.telemetry(false)?.position.theta)
    }

    pub fn is_driving(&self) -> VehicleResult<bool> {
        Ok(self.telemetry(false)?.driving)
    }

    pub fn is_pin_up(&self) -> VehicleResult<bool> {
        Ok(self.telemetry(false)?.is_pin_up)
    }

    pub fn init_position(&self, pose: Pose, map_id: &str, last_node_id: &str) -> VehicleResult<()> {
        self.send(Action::InitPosition {
            pose,
            map_id:       map_id.to_string(),
            last_node_id: last_node_id.to_string(),
        })
    }

    pub fn set_pin_up(&self, up: bool) -> VehicleResult<()> {
        self.send(if up { Action::PinUp } else { Action::PinDown })
    }

    pub fn drive_forwards(&self) -> VehicleResult<()> {
        self.send(Action::DriveForwards)
    }

    /// One quarter turn in place.
    pub fn turn(&self, direction: TurnDirection) -> VehicleResult<()> {
        self.send(match direction {
            TurnDirection::Left  => Action::TurnLeft,
            TurnDirection::Right => Action::TurnRight,
        })
    }

    fn send(&self, action: Action) -> VehicleResult<()> {
        debug!(action = %action, "sending action");
        self.transport.send_action(&action)?;
        self.cache.invalidate();
        Ok(())
    }
}

impl<T: Transport> Vehicle for CachedVehicle<T> {
    fn goto(&self, node_id: &str) -> VehicleResult<()> {
        self.send(Action::goto(node_id))
    }

    fn last_reached_node(&self) -> VehicleResult<String> {
        Ok(self.telemetry(false)?.last_node_id)
    }

    fn set_driving(&self, driving: bool) -> VehicleResult<()> {
        // Flag first: a failed Stop still halts the local drive loop.
        self.stopped.store(!driving, Ordering::Release);
        self.send(if driving { Action::Resume } else { Action::Stop })
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}
