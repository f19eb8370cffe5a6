//! Trace events: one begin or end marker for a traced unit of work.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

use super::clock::BuildClock;

static NEXT_TID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static TID: u64 = NEXT_TID.fetch_add(1, Ordering::Relaxed);
}

/// Small integer id for the calling thread.
///
/// Assigned on first use and stable for the thread's lifetime.
pub fn current_thread_id() -> u64 {
    TID.with(|t| *t)
}

/// What kind of unit produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Task,
    Resolve,
    Evaluate,
    Phase,
    BuildOperation,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Task => "TASK",
            Category::Resolve => "RESOLVE",
            Category::Evaluate => "EVALUATE",
            Category::Phase => "PHASE",
            Category::BuildOperation => "BUILD_OPERATION",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Begin or end marker. Serialized as the viewer's `"B"` / `"E"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    #[serde(rename = "B")]
    Begin,
    #[serde(rename = "E")]
    End,
}

/// An immutable begin/end record.
///
/// Field order matches the legacy output: `name, cat, ph, pid, tid, ts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    name: String,
    #[serde(rename = "cat")]
    category: Category,
    #[serde(rename = "ph")]
    phase: Phase,
    pid: u32,
    tid: u64,
    #[serde(rename = "ts")]
    timestamp_micros: u64,
}

impl TraceEvent {
    /// Begin marker stamped with the current time on the calling thread.
    pub fn began(name: impl Into<String>, category: Category, clock: &BuildClock) -> Self {
        Self::began_at(name, category, clock, Instant::now())
    }

    /// End marker stamped with the current time on the calling thread.
    pub fn ended(name: impl Into<String>, category: Category, clock: &BuildClock) -> Self {
        Self::stamped(name, category, Phase::End, clock, Instant::now())
    }

    /// Begin marker for a moment that happened before it was observed,
    /// e.g. the build start.
    pub fn began_at(
        name: impl Into<String>,
        category: Category,
        clock: &BuildClock,
        at: Instant,
    ) -> Self {
        Self::stamped(name, category, Phase::Begin, clock, at)
    }

    fn stamped(
        name: impl Into<String>,
        category: Category,
        phase: Phase,
        clock: &BuildClock,
        at: Instant,
    ) -> Self {
        Self::from_parts(
            name,
            category,
            phase,
            current_thread_id(),
            clock.micros_at(at),
        )
    }

    /// Build an event from already-known values.
    ///
    /// Used when replaying recorded events; live events go through
    /// [`TraceEvent::began`] and [`TraceEvent::ended`].
    pub fn from_parts(
        name: impl Into<String>,
        category: Category,
        phase: Phase,
        tid: u64,
        timestamp_micros: u64,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            phase,
            pid: 0,
            tid,
            timestamp_micros,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn thread_id(&self) -> u64 {
        self.tid
    }

    pub fn timestamp_micros(&self) -> u64 {
        self.timestamp_micros
    }
}
