//! Unified error type for subburn.
//!
//! Every stage funnels its failures into [`Error`]. The orchestrator wraps a
//! stage failure in [`Error::Step`] so the rendered message names the step that
//! failed while the original cause stays reachable through
//! [`std::error::Error::source`].

use std::path::PathBuf;

/// Unified error type covering all failure modes of a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An external command could not be started, exited non-zero, or was
    /// stopped by the run deadline.
    #[error("command '{program} {args}' failed: {reason}\nOutput: {output}")]
    ExternalTool {
        /// Program that was executed.
        program: String,
        /// Space-joined argument list.
        args: String,
        /// Exit status, spawn error, or deadline description.
        reason: String,
        /// Combined stdout/stderr captured before the failure.
        output: String,
    },

    /// A required external tool is not installed or not in `PATH`.
    #[error("executable '{tool}' not found in PATH; please ensure it is installed and accessible")]
    ToolNotFound {
        /// Name of the missing tool.
        tool: String,
    },

    /// No video identifier could be derived from the input reference.
    #[error("could not extract video ID from '{reference}': {reason}")]
    UnrecognizedReference {
        /// The reference as given by the user.
        reference: String,
        /// Why extraction failed.
        reason: String,
    },

    /// A directory could not be created.
    #[error("failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying filesystem error.
        source: std::io::Error,
    },

    /// A tool reported success but its expected output is missing.
    #[error("expected output not found: {pattern}")]
    ArtifactNotFound {
        /// Path or glob pattern that was searched.
        pattern: String,
    },

    /// A tool reported success but produced no bytes.
    #[error("{what} returned empty output")]
    EmptyArtifact {
        /// Description of the producer.
        what: String,
    },

    /// The translation backend could not be reached or rejected the request.
    #[error("translation backend request failed: {0}")]
    TranslationBackend(String),

    /// The translation backend answered without usable content.
    #[error("translation backend returned an empty or invalid response")]
    EmptyTranslationResult,

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A pipeline step failed.
    #[error("step {step}: {stage} failed: {source}")]
    Step {
        /// 1-based step number.
        step: u8,
        /// Human-readable stage name.
        stage: String,
        /// The stage's own failure.
        source: Box<Error>,
    },
}

impl Error {
    /// Convenience constructor for [`Error::UnrecognizedReference`].
    pub fn unrecognized(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnrecognizedReference {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    /// Convenience constructor for [`Error::ToolNotFound`].
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Convenience constructor for [`Error::ArtifactNotFound`].
    pub fn artifact_not_found(pattern: impl Into<String>) -> Self {
        Self::ArtifactNotFound {
            pattern: pattern.into(),
        }
    }

    /// Wrap `self` as the failure of pipeline step `step`.
    pub fn at_step(self, step: u8, stage: impl Into<String>) -> Self {
        Self::Step {
            step,
            stage: stage.into(),
            source: Box::new(self),
        }
    }

    /// The innermost non-step error.
    pub fn root(&self) -> &Error {
        match self {
            Error::Step { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
