//! In-process vehicle for tests and demos.
//!
//! Travel is measured in telemetry polls rather than wall time: a `goto`
//! completes after `polls_per_hop` unpaused reads of the vehicle variables.
//! Failures can be injected on actions and polls, and individual nodes can
//! be marked unreachable to provoke a stall.
//!
//! Heading grows clockwise as on the real vehicle: a right turn adds a
//! quarter turn to `theta`.

use std::collections::{HashMap, HashSet};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use agv_core::{Point, Pose};
use agv_spatial::{Network, SpatialResult};

use crate::action::{Action, Telemetry};
use crate::error::{VehicleError, VehicleResult};
use crate::transport::Transport;

struct Travel {
    node:       String,
    polls_left: u32,
}

#[derive(Default)]
struct SimState {
    pose:         Pose,
    last_node:    String,
    target:       Option<Travel>,
    paused:       bool,
    pin_up:       bool,
    positions:    HashMap<String, Point>,
    unreachable:  HashSet<String>,
    fail_actions: u32,
    fail_polls:   u32,
    actions:      Vec<Action>,
    polls:        usize,
    overlapping:  usize,
}

/// A [`Transport`] backed by an in-memory vehicle model.
pub struct SimulatedTransport {
    polls_per_hop: u32,
    state:         Mutex<SimState>,
}

impl SimulatedTransport {
    /// A vehicle standing at `node` with pose `pose`.  Arrivals at nodes
    /// without a known position leave the pose unchanged.
    pub fn new(node: impl Into<String>, pose: Pose) -> Self {
        Self {
            polls_per_hop: 1,
            state: Mutex::new(SimState {
                pose,
                last_node: node.into(),
                ..SimState::default()
            }),
        }
    }

    /// A vehicle standing at `node_id`, facing east, that knows the
    /// position of every node in `network`.
    pub fn at_node(network: &Network, node_id: &str) -> SpatialResult<Self> {
        let start = network.get_node(node_id)?;
        let sim = Self::new(node_id, Pose::new(start.x(), start.y(), 0.0));
        lock(&sim.state).positions = network
            .nodes()
            .iter()
            .map(|n| (n.id.clone(), n.pos))
            .collect();
        Ok(sim)
    }

    /// Polls needed to complete one `goto`.  Clamped to at least one.
    pub fn polls_per_hop(mut self, polls: u32) -> Self {
        self.polls_per_hop = polls.max(1);
        self
    }

    /// The vehicle accepts a `goto` to `node` but never arrives.
    pub fn never_reaches(self, node: impl Into<String>) -> Self {
        lock(&self.state).unreachable.insert(node.into());
        self
    }

    /// Reject the next `n` actions with a connectivity error.
    pub fn fail_next_actions(&self, n: u32) {
        lock(&self.state).fail_actions = n;
    }

    /// Fail the next `n` telemetry reads with a connectivity error.
    pub fn fail_next_polls(&self, n: u32) {
        lock(&self.state).fail_polls = n;
    }

    /// Pause or resume the vehicle as an operator at the vehicle would.
    pub fn set_paused(&self, paused: bool) {
        lock(&self.state).paused = paused;
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Every accepted action, oldest first.
    pub fn actions(&self) -> Vec<Action> {
        lock(&self.state).actions.clone()
    }

    /// Targets of every accepted `goto`, oldest first.
    pub fn gotos(&self) -> Vec<String> {
        lock(&self.state)
            .actions
            .iter()
            .filter_map(|a| match a {
                Action::Goto { node } => Some(node.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of accepted actions named `name`.
    pub fn count(&self, name: &str) -> usize {
        lock(&self.state).actions.iter().filter(|a| a.name() == name).count()
    }

    pub fn poll_count(&self) -> usize {
        lock(&self.state).polls
    }

    /// `goto`s accepted while a previous destination was still outstanding.
    pub fn overlapping_gotos(&self) -> usize {
        lock(&self.state).overlapping
    }

    pub fn pose(&self) -> Pose {
        lock(&self.state).pose
    }

    pub fn last_node(&self) -> String {
        lock(&self.state).last_node.clone()
    }
}

fn lock(m: &Mutex<SimState>) -> MutexGuard<'_, SimState> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn normalize(theta: f64) -> f64 {
    (theta + PI).rem_euclid(TAU) - PI
}

impl Transport for SimulatedTransport {
    fn fetch_telemetry(&self) -> VehicleResult<Telemetry> {
        let mut guard = lock(&self.state);
        let s = &mut *guard;
        s.polls += 1;
        if s.fail_polls > 0 {
            s.fail_polls -= 1;
            return Err(VehicleError::Unreachable("simulated telemetry outage".into()));
        }

        if !s.paused {
            let arrived = match s.target.as_mut() {
                Some(t) if !s.unreachable.contains(&t.node) => {
                    t.polls_left = t.polls_left.saturating_sub(1);
                    t.polls_left == 0
                }
                _ => false,
            };
            if arrived {
                if let Some(t) = s.target.take() {
                    if let Some(p) = s.positions.get(&t.node).copied() {
                        s.pose.x = p.x;
                        s.pose.y = p.y;
                    }
                    trace!(node = %t.node, "simulated arrival");
                    s.last_node = t.node;
                }
            }
        }

        Ok(Telemetry {
            position:     s.pose,
            last_node_id: s.last_node.clone(),
            paused:       s.paused,
            driving:      s.target.is_some() && !s.paused,
            is_pin_up:    s.pin_up,
        })
    }

    fn send_action(&self, action: &Action) -> VehicleResult<()> {
        let mut guard = lock(&self.state);
        let s = &mut *guard;
        if s.fail_actions > 0 {
            s.fail_actions -= 1;
            return Err(VehicleError::Rejected { status: 503, message: "simulated rejection".into() });
        }

        match action {
            Action::Goto { node } => {
                if s.target.is_some() {
                    s.overlapping += 1;
                }
                s.target = Some(Travel { node: node.clone(), polls_left: self.polls_per_hop });
            }
            Action::Resume => s.paused = false,
            Action::Stop => s.paused = true,
            Action::InitPosition { pose, last_node_id, .. } => {
                s.pose = *pose;
                s.last_node = last_node_id.clone();
                s.target = None;
            }
            Action::PinUp => s.pin_up = true,
            Action::PinDown => s.pin_up = false,
            Action::TurnLeft => s.pose.theta = normalize(s.pose.theta - FRAC_PI_2),
            Action::TurnRight => s.pose.theta = normalize(s.pose.theta + FRAC_PI_2),
            Action::DriveForwards => {}
        }
        s.actions.push(action.clone());
        Ok(())
    }
}
