//! Sequencer lifecycle state and run outcome.

/// Where a [`DriveSequencer`](crate::DriveSequencer) is in its lifecycle.
///
/// ```text
/// Idle ──start──▶ Driving ──queue drained / paused / stalled──▶ Idle
///                    │
///                  abort
///                    ▼
///                 Aborted ──queue_* or start──▶ Idle / Driving
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum DriveState {
    /// Not driving.  The queue may hold nodes left over from a pause or stall.
    #[default]
    Idle,
    /// `start` is dispatching nodes.
    Driving,
    /// `abort` ran; the queue was emptied.
    Aborted,
}

impl DriveState {
    pub fn as_str(self) -> &'static str {
        match self {
            DriveState::Idle    => "idle",
            DriveState::Driving => "driving",
            DriveState::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for DriveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a call to `start` ended without error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriveOutcome {
    /// Every queued node was reached.
    Completed { hops: usize },
    /// `abort` was called; remaining nodes were discarded.
    Aborted { hops: usize },
    /// The vehicle reported itself paused.  Unvisited nodes stay queued.
    Paused { hops: usize, remaining: usize },
}

impl DriveOutcome {
    /// Nodes confirmed during the run.
    pub fn hops(&self) -> usize {
        match *self {
            DriveOutcome::Completed { hops }
            | DriveOutcome::Aborted { hops }
            | DriveOutcome::Paused { hops, .. } => hops,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, DriveOutcome::Completed { .. })
    }
}
