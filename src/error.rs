//! Trace subsystem errors.
//!
//! None of these ever reach the host build: [`crate::TracingSession`]
//! catches them at the "build finished" boundary and logs them. They stay
//! typed so callers of the fallible APIs can pattern-match.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    /// The trace output directory could not be created
    #[error("failed to create trace directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The trace file could not be created or written
    #[error("failed to write trace file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A viewer header/footer resource could not be read
    #[error("failed to read viewer resource {}", path.display())]
    ReadViewerResource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode trace events")]
    Serialize(#[from] serde_json::Error),

    /// "Build finished" was reported more than once
    #[error("trace already written for this build")]
    AlreadyFinished,
}
