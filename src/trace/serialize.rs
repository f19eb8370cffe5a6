//! Rendering the event log in the trace-viewer format.
//!
//! The JSON document has four top-level keys:
//!
//! ```text
//! {
//!   "traceEvents": [ {"name", "cat", "ph", "pid", "tid", "ts"}, ... ],
//!   "displayTimeUnit": "ns",
//!   "systemTraceEvents": "SystemTraceData",
//!   "otherData": { "version": "My Application v1.0" }
//! }
//! ```
//!
//! `displayTimeUnit` stays `"ns"` even though `ts` is in microseconds; existing
//! consumers of the legacy output depend on it.
//!
//! The HTML variant wraps the same JSON text between an opaque viewer header
//! and footer.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::clock::BuildClock;
use super::event::{Category, TraceEvent};
use super::event_log::EventLog;
use crate::error::TraceError;

/// Name of the synthetic event pair spanning the whole build.
pub const BUILD_DURATION: &str = "build duration";

pub const DISPLAY_TIME_UNIT: &str = "ns";
pub const SYSTEM_TRACE_EVENTS: &str = "SystemTraceData";
pub const FORMAT_VERSION: &str = "My Application v1.0";

/// The complete JSON payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceDocument<'a> {
    trace_events: &'a [TraceEvent],
    display_time_unit: &'static str,
    system_trace_events: &'static str,
    other_data: OtherData,
}

#[derive(Debug, Serialize)]
struct OtherData {
    version: &'static str,
}

impl<'a> TraceDocument<'a> {
    pub fn new(events: &'a [TraceEvent]) -> Self {
        Self {
            trace_events: events,
            display_time_unit: DISPLAY_TIME_UNIT,
            system_trace_events: SYSTEM_TRACE_EVENTS,
            other_data: OtherData {
                version: FORMAT_VERSION,
            },
        }
    }

    /// Pretty-printed JSON, without a trailing newline.
    pub fn to_json(&self) -> Result<String, TraceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Viewer chrome placed around the JSON in the HTML variant.
///
/// The bytes are passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerChrome {
    pub header: Vec<u8>,
    pub footer: Vec<u8>,
}

impl ViewerChrome {
    pub fn new(header: impl Into<Vec<u8>>, footer: impl Into<Vec<u8>>) -> Self {
        Self {
            header: header.into(),
            footer: footer.into(),
        }
    }

    /// Read header and footer from disk. A `None` path yields an empty blob.
    pub fn load(header: Option<&Path>, footer: Option<&Path>) -> Result<Self, TraceError> {
        Ok(Self {
            header: read_resource(header)?,
            footer: read_resource(footer)?,
        })
    }
}

fn read_resource(path: Option<&Path>) -> Result<Vec<u8>, TraceError> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    fs::read(path).map_err(|source| TraceError::ReadViewerResource {
        path: path.to_path_buf(),
        source,
    })
}

/// Produces the trace artifact from an [`EventLog`].
#[derive(Debug, Clone, Default)]
pub struct TraceSerializer {
    chrome: Option<ViewerChrome>,
}

impl TraceSerializer {
    /// Plain JSON output.
    pub fn json() -> Self {
        Self { chrome: None }
    }

    /// JSON wrapped in viewer chrome.
    pub fn html(chrome: ViewerChrome) -> Self {
        Self {
            chrome: Some(chrome),
        }
    }

    pub fn is_html(&self) -> bool {
        self.chrome.is_some()
    }

    /// Append the build-duration bracket to `event_log`.
    ///
    /// The begin marker sits at the clock origin (the true build start), the
    /// end marker at now.
    pub fn bracket_build(event_log: &EventLog, clock: &BuildClock) {
        event_log.append(TraceEvent::began_at(
            BUILD_DURATION,
            Category::Phase,
            clock,
            clock.origin(),
        ));
        event_log.append(TraceEvent::ended(BUILD_DURATION, Category::Phase, clock));
    }

    /// Render `events` to the complete artifact bytes.
    pub fn render(&self, events: &[TraceEvent]) -> Result<Vec<u8>, TraceError> {
        let json = TraceDocument::new(events).to_json()?;

        let mut out = Vec::with_capacity(json.len() + 1);
        if let Some(chrome) = &self.chrome {
            out.extend_from_slice(&chrome.header);
        }
        out.extend_from_slice(json.as_bytes());
        out.push(b'\n');
        if let Some(chrome) = &self.chrome {
            out.extend_from_slice(&chrome.footer);
        }
        Ok(out)
    }

    /// Bracket the build, render the log, and write it to `path` in one go.
    ///
    /// Parent directories are created as needed.
    pub fn write(
        &self,
        event_log: &EventLog,
        clock: &BuildClock,
        path: &Path,
    ) -> Result<PathBuf, TraceError> {
        Self::bracket_build(event_log, clock);
        let events = event_log.snapshot();
        let bytes = self.render(&events)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| TraceError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let write_err = |source| TraceError::Write {
            path: path.to_path_buf(),
            source,
        };
        let mut file = fs::File::create(path).map_err(write_err)?;
        file.write_all(&bytes).map_err(write_err)?;

        log::debug!("Wrote {} trace events to {}", events.len(), path.display());
        Ok(path.to_path_buf())
    }
}
