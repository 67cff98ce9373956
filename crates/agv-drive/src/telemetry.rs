//! Time-bounded telemetry cache.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::action::Telemetry;
use crate::error::VehicleResult;

struct Snapshot {
    taken:     Instant,
    telemetry: Telemetry,
}

/// Holds the last telemetry snapshot for at most `ttl`.
///
/// Refreshes are serialized: the lock is held while fetching, so two
/// callers that both find the snapshot stale trigger a single fetch.  A
/// failed fetch clears the snapshot.  A zero `ttl` disables caching.
pub struct TelemetryCache {
    ttl:  Duration,
    slot: Mutex<Option<Snapshot>>,
}

impl TelemetryCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, slot: Mutex::new(None) }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached snapshot if fresh and `force` is unset, otherwise
    /// call `fetch` and store its result.
    pub fn get_or_refresh<F>(&self, force: bool, fetch: F) -> VehicleResult<Telemetry>
    where
        F: FnOnce() -> VehicleResult<Telemetry>,
    {
        let mut slot = self.lock();
        if !force {
            if let Some(snap) = slot.as_ref().filter(|s| s.taken.elapsed() < self.ttl) {
                return Ok(snap.telemetry.clone());
            }
        }
        match fetch() {
            Ok(telemetry) => {
                *slot = Some(Snapshot { taken: Instant::now(), telemetry: telemetry.clone() });
                Ok(telemetry)
            }
            Err(e) => {
                *slot = None;
                Err(e)
            }
        }
    }

    /// Drop the snapshot so the next read goes to the vehicle.
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    pub fn is_fresh(&self) -> bool {
        self.lock().as_ref().is_some_and(|s| s.taken.elapsed() < self.ttl)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Snapshot>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
