//! Trace output configuration.
//!
//! Optional `.config/build-trace.toml` in the project root:
//!
//! ```toml
//! format = "html"
//! viewer-header = "tools/trace-header.html"
//! viewer-footer = "tools/trace-footer.html"
//! ```
//!
//! Relative viewer paths resolve against the project root.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::TraceError;
use crate::trace::{TraceSerializer, ViewerChrome};

/// Directory under the build output directory that holds the trace.
pub const TRACE_DIR: &str = "trace";

/// File stem of the trace artifact.
pub const TRACE_FILE_STEM: &str = "task-trace";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Html,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TraceConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Bytes written before the JSON in the HTML variant
    #[serde(default)]
    pub viewer_header: Option<PathBuf>,

    /// Bytes written after the JSON in the HTML variant
    #[serde(default)]
    pub viewer_footer: Option<PathBuf>,
}

impl TraceConfig {
    /// Load `.config/build-trace.toml` from the project root, if present.
    pub fn load(project_root: &Path) -> anyhow::Result<Option<Self>> {
        let config_path = project_root.join(".config").join("build-trace.toml");

        if !config_path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let mut config: TraceConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.viewer_header = config.viewer_header.map(|p| project_root.join(p));
        config.viewer_footer = config.viewer_footer.map(|p| project_root.join(p));

        Ok(Some(config))
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_viewer_chrome(
        mut self,
        header: impl Into<PathBuf>,
        footer: impl Into<PathBuf>,
    ) -> Self {
        self.viewer_header = Some(header.into());
        self.viewer_footer = Some(footer.into());
        self
    }

    /// `<output_dir>/trace/task-trace.{json|html}`
    pub fn trace_file(&self, output_dir: &Path) -> PathBuf {
        output_dir
            .join(TRACE_DIR)
            .join(format!("{TRACE_FILE_STEM}.{}", self.format.extension()))
    }

    /// Serializer for the configured format, reading viewer chrome from disk
    /// for the HTML variant.
    pub fn serializer(&self) -> Result<TraceSerializer, TraceError> {
        Ok(match self.format {
            OutputFormat::Json => TraceSerializer::json(),
            OutputFormat::Html => TraceSerializer::html(ViewerChrome::load(
                self.viewer_header.as_deref(),
                self.viewer_footer.as_deref(),
            )?),
        })
    }
}
