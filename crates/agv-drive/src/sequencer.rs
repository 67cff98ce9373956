//! Blocking per-node drive loop.
//!
//! # Protocol
//!
//! [`DriveSequencer::start`] resumes the vehicle, then for each queued node
//! sends one `goto`, polls the last-reached node until it matches, and only
//! then sends the next.  At most one destination is ever outstanding.
//!
//! Between polls the loop sleeps on a condvar for the poll interval, so
//! [`abort`](DriveSequencer::abort) and
//! [`notify_state_change`](DriveSequencer::notify_state_change) wake it
//! immediately instead of waiting out the interval.
//!
//! # Failure handling
//!
//! | Condition                           | Result                                   |
//! |-------------------------------------|------------------------------------------|
//! | command rejected                    | retried with backoff, then `Err(Vehicle)` |
//! | telemetry poll fails repeatedly     | `Err(Vehicle)`                           |
//! | node not confirmed within timeout   | `Err(Stalled)`, node requeued at head    |
//! | vehicle reports itself paused       | `Ok(Paused)`, node requeued at head      |
//! | `abort` from another thread         | `Ok(Aborted)`, queue emptied             |

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::{debug, info, warn};

use agv_core::DriveConfig;
use agv_spatial::{Network, Route};

use crate::error::{DriveError, DriveResult, VehicleResult};
use crate::signal::StopSignal;
use crate::state::{DriveOutcome, DriveState};
use crate::vehicle::Vehicle;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Feeds queued node ids to a [`Vehicle`] one at a time.
///
/// All methods take `&self`; share the sequencer through an `Arc` to call
/// [`abort`](Self::abort) while another thread is blocked in
/// [`start`](Self::start).
pub struct DriveSequencer<V: Vehicle> {
    vehicle: Arc<V>,
    config:  DriveConfig,
    queue:   Mutex<VecDeque<String>>,
    state:   Mutex<DriveState>,
    /// Held around every command so a `goto` can never land after the Stop
    /// sent by `abort`.
    command: Mutex<()>,
    signal:  StopSignal,
}

impl<V: Vehicle> DriveSequencer<V> {
    pub fn new(vehicle: Arc<V>, config: DriveConfig) -> DriveResult<Self> {
        config.validate()?;
        Ok(Self {
            vehicle,
            config,
            queue:   Mutex::new(VecDeque::new()),
            state:   Mutex::new(DriveState::Idle),
            command: Mutex::new(()),
            signal:  StopSignal::default(),
        })
    }

    pub fn vehicle(&self) -> &Arc<V> {
        &self.vehicle
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    pub fn state(&self) -> DriveState {
        *lock(&self.state)
    }

    /// Node ids still waiting to be dispatched, in order.
    pub fn pending(&self) -> Vec<String> {
        lock(&self.queue).iter().cloned().collect()
    }

    pub fn pending_len(&self) -> usize {
        lock(&self.queue).len()
    }

    // ── Queueing ──────────────────────────────────────────────────────────

    /// Append the stops of `route` and return how many were added.
    pub fn queue_route(&self, network: &Network, route: &Route) -> usize {
        self.queue_nodes(route.ids(network))
    }

    /// Append node ids to the queue and return how many were added.
    ///
    /// Leaves the `Aborted` state, so a fresh `start` can follow.
    pub fn queue_nodes<I, S>(&self, nodes: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.load(false, nodes)
    }

    /// Replace the whole queue with the stops of `route`.
    ///
    /// Use this for a new navigation: nodes left over from a stalled or
    /// paused drive are discarded.  Returns how many stops were queued.
    pub fn replace_route(&self, network: &Network, route: &Route) -> usize {
        self.replace_nodes(route.ids(network))
    }

    /// Replace the whole queue with `nodes`.  Returns how many were queued.
    pub fn replace_nodes<I, S>(&self, nodes: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.load(true, nodes)
    }

    /// Drop every pending node and return how many there were.
    pub fn clear_pending(&self) -> usize {
        let mut queue = lock(&self.queue);
        let dropped = queue.len();
        queue.clear();
        if dropped > 0 {
            debug!(dropped, "pending nodes cleared");
        }
        dropped
    }

    fn load<I, S>(&self, replace: bool, nodes: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (dropped, added) = {
            let mut queue = lock(&self.queue);
            let dropped = if replace { std::mem::take(&mut *queue).len() } else { 0 };
            let before = queue.len();
            queue.extend(nodes.into_iter().map(Into::into));
            (dropped, queue.len() - before)
        };
        let mut state = lock(&self.state);
        if *state == DriveState::Aborted {
            *state = DriveState::Idle;
        }
        debug!(added, dropped, "nodes queued");
        added
    }

    // ── Driving ───────────────────────────────────────────────────────────

    /// Drive through the queue, blocking until it is drained, the vehicle
    /// pauses, or [`abort`](Self::abort) is called.
    ///
    /// Fails with [`DriveError::AlreadyDriving`] if another `start` is still
    /// running.
    pub fn start(&self) -> DriveResult<DriveOutcome> {
        {
            let mut state = lock(&self.state);
            if *state == DriveState::Driving {
                return Err(DriveError::AlreadyDriving);
            }
            self.signal.clear();
            *state = DriveState::Driving;
        }
        info!(pending = self.pending_len(), "drive started");

        let result = self.run();

        let mut state = lock(&self.state);
        *state = if self.signal.is_raised() { DriveState::Aborted } else { DriveState::Idle };
        result
    }

    /// Stop driving: empty the queue, wake the drive loop, and send Stop.
    ///
    /// Safe to call from any thread, with or without a `start` in progress.
    /// Blocks only while a command already in flight completes.
    pub fn abort(&self) -> DriveResult<()> {
        {
            let mut state = lock(&self.state);
            self.signal.raise();
            *state = DriveState::Aborted;
        }
        let dropped = {
            let mut queue = lock(&self.queue);
            let n = queue.len();
            queue.clear();
            n
        };
        warn!(dropped, "drive aborted");

        let _guard = lock(&self.command);
        self.vehicle.set_driving(false)?;
        Ok(())
    }

    /// Wake the drive loop for an early poll, e.g. when a push channel
    /// reports new telemetry.
    pub fn notify_state_change(&self) {
        self.signal.notify();
    }

    fn run(&self) -> DriveResult<DriveOutcome> {
        let mut hops = 0;
        if !self.send_with_retry("resume", || self.vehicle.set_driving(true))? {
            return Ok(DriveOutcome::Aborted { hops });
        }

        loop {
            if self.signal.is_raised() {
                info!(hops, "drive stopped by abort");
                return Ok(DriveOutcome::Aborted { hops });
            }
            if self.vehicle.is_stopped() {
                let remaining = self.pending_len();
                info!(hops, remaining, "vehicle paused, drive suspended");
                return Ok(DriveOutcome::Paused { hops, remaining });
            }
            let Some(node) = lock(&self.queue).pop_front() else {
                break;
            };

            match self.drive_to(&node) {
                Ok(true) => {
                    hops += 1;
                    debug!(node = %node, hops, "node reached");
                }
                Ok(false) => self.requeue(node),
                Err(e) => {
                    warn!(node = %node, error = %e, "drive interrupted");
                    self.requeue(node);
                    return Err(e);
                }
            }
        }

        info!(hops, "drive completed");
        Ok(DriveOutcome::Completed { hops })
    }

    /// `Ok(false)` when a stop was observed before arrival.
    fn drive_to(&self, node: &str) -> DriveResult<bool> {
        if !self.send_with_retry(&format!("goto({node})"), || self.vehicle.goto(node))? {
            return Ok(false);
        }
        self.await_arrival(node)
    }

    /// Send with bounded retries.  `Ok(false)` when a stop was requested.
    fn send_with_retry<F>(&self, label: &str, send: F) -> DriveResult<bool>
    where
        F: Fn() -> VehicleResult<()>,
    {
        let attempts = self.config.command_attempts();
        let mut attempt = 1;
        loop {
            match self.command(&send) {
                Ok(sent) => {
                    if sent {
                        debug!(command = label, attempt, "command sent");
                    }
                    return Ok(sent);
                }
                Err(e) if attempt < attempts => {
                    warn!(command = label, attempt, error = %e, "command failed, retrying");
                    self.signal.wait(self.config.retry_backoff());
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn await_arrival(&self, node: &str) -> DriveResult<bool> {
        let started = Instant::now();
        let timeout = self.config.arrival_timeout();
        let mut failures = 0;
        loop {
            if self.signal.is_raised() || self.vehicle.is_stopped() {
                return Ok(false);
            }
            match self.vehicle.last_reached_node() {
                Ok(last) if last == node => return Ok(true),
                Ok(_) => failures = 0,
                Err(e) => {
                    failures += 1;
                    if failures >= self.config.command_attempts() {
                        return Err(e.into());
                    }
                    warn!(node, failures, error = %e, "telemetry poll failed");
                }
            }

            let waited = started.elapsed();
            if waited >= timeout {
                return Err(DriveError::Stalled { node: node.to_string(), waited });
            }
            self.signal.wait(self.config.poll_interval().min(timeout - waited));
        }
    }

    /// Run `send` under the command lock unless a stop was requested.
    fn command<F>(&self, send: F) -> VehicleResult<bool>
    where
        F: FnOnce() -> VehicleResult<()>,
    {
        let _guard = lock(&self.command);
        if self.signal.is_raised() {
            return Ok(false);
        }
        send()?;
        Ok(true)
    }

    fn requeue(&self, node: String) {
        let mut queue = lock(&self.queue);
        // After an abort the queue stays empty.
        if !self.signal.is_raised() {
            queue.push_front(node);
        }
    }
}
