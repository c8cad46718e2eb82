// Domain errors - Error types for the domain layer

use thiserror::Error;

/// Domain-specific error types
///
/// Every stage of the compose pipeline fails with exactly one of these. None
/// of them are retried internally; the caller decides whether to resubmit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Request rejected at the boundary before any stage ran
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A clip (or the audio track) references a source that was not staged
    #[error("Cannot resolve source '{reference}': {message}")]
    Resolution { reference: String, message: String },

    /// Dimension discovery failed for a staged source
    #[error("Cannot probe '{path}': {message}")]
    Probe { path: String, message: String },

    /// Nothing left to compose
    #[error("Composition failed: {0}")]
    Composition(String),

    /// The media engine did not produce a usable output
    #[error("Execution failed: {0}")]
    Execution(ExecutionFailure),

    /// File system operation failed
    #[error("File system error: {0}")]
    FsFail(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn resolution(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Resolution {
            reference: reference.into(),
            message: message.into(),
        }
    }

    pub fn probe(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Probe {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Stable identifier surfaced in error responses
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::BadRequest(_) => "bad_request",
            DomainError::Resolution { .. } => "resolution_error",
            DomainError::Probe { .. } => "probe_error",
            DomainError::Composition(_) => "composition_error",
            DomainError::Execution(_) => "execution_error",
            DomainError::FsFail(_) => "fs_error",
            DomainError::Config(_) => "config_error",
            DomainError::Internal(_) => "internal_error",
        }
    }
}

/// Reasons the execution stage can fail
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionFailure {
    /// Engine exited nonzero; `stderr` is the raw diagnostic text
    #[error("engine exited with status {}", exit_code.map(|c| c.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    EngineFailed { exit_code: Option<i32>, stderr: String },

    /// Engine reported success but the expected file is absent
    #[error("engine reported success but no output exists at {path}")]
    MissingOutput { path: String },

    /// Timed out or cancelled by the caller
    #[error("cancelled: {reason}")]
    Cancelled { reason: String },

    /// Engine process could not be started
    #[error("could not start engine: {message}")]
    Spawn { message: String },
}

impl ExecutionFailure {
    /// Stable identifier for the failure reason
    pub fn kind(&self) -> &'static str {
        match self {
            ExecutionFailure::EngineFailed { .. } => "engine_failed",
            ExecutionFailure::MissingOutput { .. } => "missing_output",
            ExecutionFailure::Cancelled { .. } => "cancelled",
            ExecutionFailure::Spawn { .. } => "spawn_failed",
        }
    }

    /// Text surfaced to the caller; engine stderr is passed through verbatim
    pub fn diagnostic_text(&self) -> String {
        match self {
            ExecutionFailure::EngineFailed { stderr, .. } => stderr.clone(),
            other => other.to_string(),
        }
    }
}

impl From<ExecutionFailure> for DomainError {
    fn from(failure: ExecutionFailure) -> Self {
        DomainError::Execution(failure)
    }
}
