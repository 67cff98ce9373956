//! Stop flag with a wakeable wait, shared by the drive loop and `abort`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

/// An `AtomicBool` stop flag plus a condvar the drive loop sleeps on
/// between polls.
///
/// `raise` and `notify` both bump a generation counter under the lock, so
/// a waiter that checked the flag before sleeping cannot miss the wakeup.
#[derive(Default)]
pub(crate) struct StopSignal {
    stopped:    AtomicBool,
    generation: Mutex<u64>,
    wake:       Condvar,
}

impl StopSignal {
    pub(crate) fn raise(&self) {
        self.stopped.store(true, Ordering::Release);
        self.notify();
    }

    pub(crate) fn clear(&self) {
        self.stopped.store(false, Ordering::Release);
    }

    #[inline]
    pub(crate) fn is_raised(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Wake any current waiter without raising the flag.
    pub(crate) fn notify(&self) {
        let mut generation = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        *generation = generation.wrapping_add(1);
        self.wake.notify_all();
    }

    /// Sleep for at most `timeout`, returning early on `raise` or `notify`.
    pub(crate) fn wait(&self, timeout: Duration) {
        let guard = self.generation.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_raised() {
            return;
        }
        let seen = *guard;
        let _ = self
            .wake
            .wait_timeout_while(guard, timeout, |g| *g == seen && !self.is_raised())
            .unwrap_or_else(PoisonError::into_inner);
    }
}
