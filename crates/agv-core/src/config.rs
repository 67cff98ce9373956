//! Drive-loop configuration.
//!
//! # Design
//!
//! Every wait the drive loop performs is bounded by a value in here: the
//! sleep between arrival polls, the per-hop arrival timeout, the number of
//! times a rejected command is re-sent, and how long a telemetry snapshot
//! stays fresh.  All durations are stored as integer milliseconds so the
//! struct round-trips through JSON/TOML without unit ambiguity; the
//! `Duration` accessors are what runtime code uses.

use std::time::Duration;

use crate::{CoreError, CoreResult};

/// Tunables for polling, arrival timeouts, command retries and the
/// telemetry cache.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the vehicle and the sequencer.  Missing fields fall back to
/// [`DriveConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriveConfig {
    /// Upper bound on the sleep between two arrival polls.  Default: 20 ms.
    pub poll_interval_ms: u64,

    /// How long a single hop may take before the sequencer reports a stall.
    /// Default: 60 s.
    pub arrival_timeout_ms: u64,

    /// Extra attempts for a command the vehicle rejected or never received.
    /// `0` disables retrying.  Default: 2.
    pub command_retries: u32,

    /// Pause between command attempts.  Default: 100 ms.
    pub retry_backoff_ms: u64,

    /// Age after which cached telemetry is re-polled.  Default: 100 ms.
    pub telemetry_ttl_ms: u64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms:   20,
            arrival_timeout_ms: 60_000,
            command_retries:    2,
            retry_backoff_ms:   100,
            telemetry_ttl_ms:   100,
        }
    }
}

impl DriveConfig {
    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[inline]
    pub fn arrival_timeout(&self) -> Duration {
        Duration::from_millis(self.arrival_timeout_ms)
    }

    #[inline]
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    #[inline]
    pub fn telemetry_ttl(&self) -> Duration {
        Duration::from_millis(self.telemetry_ttl_ms)
    }

    /// Total attempts made for one command (first try plus retries).
    #[inline]
    pub fn command_attempts(&self) -> u32 {
        self.command_retries.saturating_add(1)
    }

    /// Reject configurations that would turn the drive loop into a busy
    /// spin or make every hop time out before the first poll.
    pub fn validate(&self) -> CoreResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(CoreError::Config("poll_interval_ms must be > 0".into()));
        }
        if self.arrival_timeout_ms == 0 {
            return Err(CoreError::Config("arrival_timeout_ms must be > 0".into()));
        }
        if self.poll_interval_ms > self.arrival_timeout_ms {
            return Err(CoreError::Config(format!(
                "poll_interval_ms ({}) exceeds arrival_timeout_ms ({})",
                self.poll_interval_ms, self.arrival_timeout_ms
            )));
        }
        Ok(())
    }
}
