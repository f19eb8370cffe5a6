pub mod bridge;
pub mod config;
pub mod error;
pub mod session;
pub mod trace;

pub use bridge::{BUILD_TASK_GRAPH, BuildListener, LifecycleBridge};
pub use config::{OutputFormat, TraceConfig};
pub use error::TraceError;
pub use session::TracingSession;
