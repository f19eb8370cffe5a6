//! One build's tracing session.
//!
//! A [`TracingSession`] is created when instrumentation attaches to a build
//! and owns everything that build's trace needs: the event log, the build
//! clock, and the output settings. The host registers [`TracingSession::listener`]
//! for lifecycle notifications and calls [`TracingSession::build_finished`] once
//! at the end.
//!
//! ```ignore
//! let session = TracingSession::start(build_start, "build", TraceConfig::default());
//! host.add_listener(Arc::new(session.listener()));
//! // ... build runs ...
//! session.build_finished();
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};

use crate::bridge::LifecycleBridge;
use crate::config::TraceConfig;
use crate::error::TraceError;
use crate::trace::{BuildClock, EventLog};

#[derive(Debug)]
pub struct TracingSession {
    log: Arc<EventLog>,
    clock: BuildClock,
    output_dir: PathBuf,
    config: TraceConfig,
    finished: AtomicBool,
}

impl TracingSession {
    /// Begin tracing a build that started at `build_start` (wall clock).
    ///
    /// The trace is written under `output_dir` when the build finishes.
    pub fn start(
        build_start: DateTime<Utc>,
        output_dir: impl Into<PathBuf>,
        config: TraceConfig,
    ) -> Self {
        Self::with_clock(BuildClock::starting_at(build_start), output_dir, config)
    }

    pub fn with_clock(
        clock: BuildClock,
        output_dir: impl Into<PathBuf>,
        config: TraceConfig,
    ) -> Self {
        let output_dir = output_dir.into();
        log::debug!(
            "Tracing build into {}",
            config.trace_file(&output_dir).display()
        );
        Self {
            log: Arc::new(EventLog::new()),
            clock,
            output_dir,
            config,
            finished: AtomicBool::new(false),
        }
    }

    /// A listener feeding this session's log. Cheap to clone; hand one to
    /// each host hook.
    pub fn listener(&self) -> LifecycleBridge {
        LifecycleBridge::new(Arc::clone(&self.log), self.clock)
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn clock(&self) -> &BuildClock {
        &self.clock
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn trace_file(&self) -> PathBuf {
        self.config.trace_file(&self.output_dir)
    }

    /// Handle the "build finished" notification.
    ///
    /// Writes the trace and returns its path. Any failure is logged and
    /// reported as `None`; it never reaches the host build.
    pub fn build_finished(&self) -> Option<PathBuf> {
        match self.write_trace() {
            Ok(path) => Some(path),
            Err(TraceError::AlreadyFinished) => {
                log::debug!("Build finished reported twice; trace already written");
                None
            }
            Err(e) => {
                log::warn!("{}", format_error_chain(&e));
                None
            }
        }
    }

    /// Bracket the build with the duration events and write the artifact.
    ///
    /// Succeeds at most once per session.
    pub fn write_trace(&self) -> Result<PathBuf, TraceError> {
        if self.finished.swap(true, Ordering::AcqRel) {
            return Err(TraceError::AlreadyFinished);
        }

        let serializer = self.config.serializer()?;
        serializer.write(&self.log, &self.clock, &self.trace_file())
    }
}

/// `outer: inner: root` rendering of an error and its sources.
fn format_error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = format!("Trace not written: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
