//! The per-build monotonic timeline.
//!
//! The host reports the build start as a wall-clock time, but that moment
//! passed before tracing attached. [`BuildClock`] maps it onto the monotonic
//! clock once, at session start, and every event timestamp is measured from
//! that origin. Wall-clock adjustments during the build therefore cannot
//! reorder events.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy)]
pub struct BuildClock {
    origin: Instant,
}

impl BuildClock {
    /// Anchor the timeline at `build_start`.
    ///
    /// A start time in the future is treated as "now". A start time further
    /// back than the monotonic clock can represent falls back to "now" too.
    pub fn starting_at(build_start: DateTime<Utc>) -> Self {
        let now = Instant::now();
        let elapsed = Utc::now()
            .signed_duration_since(build_start)
            .to_std()
            .unwrap_or_else(|_| {
                log::debug!("Build start {build_start} is in the future; anchoring trace at now");
                Duration::ZERO
            });

        let origin = now.checked_sub(elapsed).unwrap_or_else(|| {
            log::debug!(
                "Build start {build_start} predates the monotonic clock; anchoring trace at now"
            );
            now
        });

        log::debug!(
            "Trace clock anchored {}ms before session start",
            now.duration_since(origin).as_millis()
        );

        Self { origin }
    }

    /// Anchor the timeline at the current instant.
    pub fn starting_now() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// The build start on the monotonic timeline.
    pub fn origin(&self) -> Instant {
        self.origin
    }

    /// Microseconds from the origin to `at`, truncated.
    ///
    /// Instants before the origin read as 0.
    pub fn micros_at(&self, at: Instant) -> u64 {
        let nanos = at.saturating_duration_since(self.origin).as_nanos();
        u64::try_from(nanos / 1000).unwrap_or(u64::MAX)
    }

    pub fn now_micros(&self) -> u64 {
        self.micros_at(Instant::now())
    }
}
