//! Error types for pipeline orchestration.
//!
//! Every failure mode of a run is represented here: run-file parsing and
//! validation, identifier-list problems, staging collisions, and external
//! tool launches or exits. Per-ligand and per-replica failures are recorded
//! in batch reports rather than aborting the whole run; see
//! [`FailurePolicy`](crate::FailurePolicy) for what happens to the rest of
//! a ligand's steps.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that can occur while loading a run file or executing a pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying filesystem operation failed.
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Run file is not valid TOML for the expected schema.
    #[error("failed to parse run file: {0}")]
    RunFileParse(#[from] toml::de::Error),

    /// Run file deserialized but a field holds an unusable value.
    #[error("invalid run configuration for '{field}': {detail}")]
    InvalidConfig {
        /// Dotted path of the offending field, e.g. `grid.npts`.
        field: &'static str,
        /// Description of the problem.
        detail: String,
    },

    /// The ligand identifier list could not be read.
    #[error("failed to read ligand list {}: {source}", path.display())]
    LigandList {
        /// Path of the list file.
        path: PathBuf,
        /// Underlying read error.
        source: std::io::Error,
    },

    /// An identifier appears more than once.
    ///
    /// Duplicates are rejected up front: the second occurrence would
    /// collide on the first one's work directory or output file.
    #[error("duplicate identifier '{id}' (entry {entry}): its work artifacts would collide")]
    DuplicateIdentifier {
        /// The repeated identifier.
        id: String,
        /// One-based position of the second occurrence.
        entry: usize,
    },

    /// A ligand's work directory already exists.
    ///
    /// Nothing is overwritten; the existing directory's artifacts are
    /// left untouched and the ligand is reported as failed.
    #[error("work directory already exists: {}", path.display())]
    WorkDirExists {
        /// The colliding directory.
        path: PathBuf,
    },

    /// A required input file is absent.
    #[error("missing input file {}: {detail}", path.display())]
    MissingInput {
        /// Path that was expected to exist.
        path: PathBuf,
        /// What the file was needed for.
        detail: String,
    },

    /// An external tool could not be launched at all.
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        /// Short name of the tool.
        tool: &'static str,
        /// Underlying spawn error (typically: executable not found).
        source: std::io::Error,
    },

    /// An external tool ran but exited unsuccessfully.
    #[error("{tool} failed: {detail}")]
    ToolFailed {
        /// Short name of the tool.
        tool: &'static str,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Exit description plus the tail of the tool's stderr.
        detail: String,
    },
}

impl Error {
    /// Creates an [`InvalidConfig`](Error::InvalidConfig) error.
    pub fn invalid_config(field: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            detail: detail.into(),
        }
    }

    /// Creates a [`MissingInput`](Error::MissingInput) error.
    pub fn missing_input(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::MissingInput {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Creates a [`ToolFailed`](Error::ToolFailed) error from an exit status
    /// and captured stderr, keeping only the last few stderr lines.
    pub fn tool_failed(tool: &'static str, status: ExitStatus, stderr: &[u8]) -> Self {
        let code = status.code();
        let mut detail = match code {
            Some(c) => format!("exit code {c}"),
            None => String::from("terminated by signal"),
        };

        let tail = stderr_tail(stderr, 6);
        if !tail.is_empty() {
            detail.push_str(": ");
            detail.push_str(&tail);
        }

        Self::ToolFailed { tool, code, detail }
    }
}

/// Last `max_lines` non-blank stderr lines, joined for one-line display.
fn stderr_tail(bytes: &[u8], max_lines: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect();

    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join(" | ")
}
