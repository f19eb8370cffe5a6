//! Trace event collection and serialization.
//!
//! - [`event`]: the immutable begin/end record and thread identity
//! - [`clock`]: the per-build monotonic timeline
//! - [`event_log`]: the append-only, thread-safe store
//! - [`serialize`]: rendering to the trace-viewer format

pub mod clock;
pub mod event;
pub mod event_log;
pub mod serialize;

pub use clock::BuildClock;
pub use event::{Category, Phase, TraceEvent, current_thread_id};
pub use event_log::EventLog;
pub use serialize::{BUILD_DURATION, TraceDocument, TraceSerializer, ViewerChrome};
