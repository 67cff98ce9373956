//! The vehicle-facing facade.

use std::sync::Arc;

use tracing::{info, warn};

use agv_core::{Point, Pose};
use agv_drive::{CachedVehicle, DriveOutcome, DriveSequencer, Transport, Vehicle};
use agv_spatial::{BfsRouter, Network, Node, Route, Router};

use crate::heading::TurnPlan;
use crate::{ControlError, ControlResult};

/// One vehicle on one track network.
///
/// Construct with [`AgvBuilder`](crate::AgvBuilder).  All methods take
/// `&self`; `navigate_to_node` blocks until the drive ends, so to abort it
/// call [`abort`](Self::abort) from another thread on a shared `Agv` or on
/// a clone of [`sequencer`](Self::sequencer).
pub struct Agv<T: Transport, R: Router = BfsRouter> {
    network:   Network,
    router:    R,
    vehicle:   Arc<CachedVehicle<T>>,
    sequencer: Arc<DriveSequencer<CachedVehicle<T>>>,
}

impl<T: Transport, R: Router> Agv<T, R> {
    pub(crate) fn from_parts(
        network:   Network,
        router:    R,
        vehicle:   Arc<CachedVehicle<T>>,
        sequencer: Arc<DriveSequencer<CachedVehicle<T>>>,
    ) -> Self {
        Self { network, router, vehicle, sequencer }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn vehicle(&self) -> &Arc<CachedVehicle<T>> {
        &self.vehicle
    }

    pub fn sequencer(&self) -> &Arc<DriveSequencer<CachedVehicle<T>>> {
        &self.sequencer
    }

    // ── Position ──────────────────────────────────────────────────────────

    pub fn location(&self) -> ControlResult<Point> {
        Ok(self.vehicle.location()?)
    }

    /// The node nearest the vehicle's current location.
    pub fn find_closest_node(&self) -> ControlResult<&Node> {
        let here = self.vehicle.location()?;
        self.closest_to(here.x, here.y)
    }

    /// Tell the vehicle where it stands.
    pub fn init_position(&self, pose: Pose, map_id: &str, last_node_id: &str) -> ControlResult<()> {
        self.network.get_node(last_node_id)?;
        self.vehicle.init_position(pose, map_id, last_node_id)?;
        Ok(())
    }

    // ── Motion ────────────────────────────────────────────────────────────

    /// Send the vehicle to the node nearest `(x, y)` with a single `goto`.
    ///
    /// Returns as soon as the command is accepted; no route is planned and
    /// arrival is not awaited.
    pub fn go_to_coordinate(&self, x: f64, y: f64) -> ControlResult<&Node> {
        let target = self.closest_to(x, y)?;
        self.vehicle.goto(&target.id)?;
        info!(x, y, node = %target.id, "heading to closest node");
        Ok(target)
    }

    /// Route from the vehicle's last reached node to `node_id`.
    pub fn route_to(&self, node_id: &str) -> ControlResult<Route> {
        let source = self.vehicle.last_reached_node()?;
        let from = self.network.index_of(&source)?;
        let to = self.network.index_of(node_id)?;
        Ok(self.router.route(&self.network, from, to))
    }

    /// Plan a route to `node_id`, queue its stops, and drive it.
    ///
    /// The route replaces whatever a stalled or paused drive left queued;
    /// resume such a drive with `sequencer().start()` instead.  Blocks until
    /// the drive ends.  Unknown node ids are lookup errors; an
    /// unreachable target is logged and reported as a completed drive of
    /// zero hops.
    pub fn navigate_to_node(&self, node_id: &str) -> ControlResult<DriveOutcome> {
        let route = self.route_to(node_id)?;
        if route.is_unreachable() {
            self.sequencer.clear_pending();
            warn!(node = node_id, "no path to target, not moving");
            return Ok(DriveOutcome::Completed { hops: 0 });
        }
        let stops = self.sequencer.replace_route(&self.network, &route);
        info!(node = node_id, hops = route.hops, stops, "navigating");
        Ok(self.sequencer.start()?)
    }

    /// Rotate in place to face `theta` radians, to the nearest quarter turn.
    pub fn turn_to(&self, theta: f64) -> ControlResult<TurnPlan> {
        let current = self.vehicle.theta()?;
        let plan = TurnPlan::for_delta(theta - current);
        for _ in 0..plan.count {
            self.vehicle.turn(plan.direction)?;
        }
        info!(from = current, to = theta, turns = plan.count, direction = ?plan.direction, "turned");
        Ok(plan)
    }

    pub fn set_pin_up(&self, up: bool) -> ControlResult<()> {
        Ok(self.vehicle.set_pin_up(up)?)
    }

    /// Stop the current drive and empty the queue.  Safe from any thread.
    pub fn abort(&self) -> ControlResult<()> {
        Ok(self.sequencer.abort()?)
    }

    fn closest_to(&self, x: f64, y: f64) -> ControlResult<&Node> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ControlError::NonFiniteLocation { x, y });
        }
        self.network.closest_node(x, y).ok_or(ControlError::EmptyNetwork)
    }
}
