// Ports - Interface definitions (contracts)

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::engine::EngineInvocation;

/// Port for bringing logical source references onto local disk
#[async_trait]
pub trait StagingPort: Send + Sync {
    /// Stage each reference into `dest_dir`
    ///
    /// Returns the local path of every reference that could be staged.
    /// References that cannot be found are simply absent from the map; the
    /// resolver decides what that means.
    async fn stage(
        &self,
        references: &[String],
        dest_dir: &Path,
    ) -> Result<HashMap<String, PathBuf>, DomainError>;
}

/// Port for media dimension probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Width and height of the first video stream
    async fn probe_dimensions(&self, file_path: &Path) -> Result<Dimensions, DomainError>;
}

/// Outcome of one engine run
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutcome {
    pub success: bool,
    pub exit_code: Option<i32>,
    /// Raw diagnostic output, never interpreted
    pub stderr: String,
}

/// Port for the external media engine
#[async_trait]
pub trait EnginePort: Send + Sync {
    /// Run one fully serialized invocation to completion
    async fn run(&self, invocation: &EngineInvocation) -> Result<EngineOutcome, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Create a request-private working directory, removed when dropped
    async fn create_work_dir(&self, prefix: &str) -> Result<tempfile::TempDir, DomainError>;

    /// Size of a regular file, `None` if it does not exist
    async fn file_size(&self, file_path: &Path) -> Result<Option<u64>, DomainError>;

    /// Delete file if present
    async fn remove_file(&self, file_path: &Path) -> Result<(), DomainError>;

    /// Copy file, creating the destination directory if needed
    async fn copy_file(&self, from: &Path, to: &Path) -> Result<(), DomainError>;
}

/// Pipeline stage an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Stage,
    Resolve,
    Probe,
    Normalize,
    Compile,
    Execute,
    Report,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validate => "validate",
            Stage::Stage => "stage",
            Stage::Resolve => "resolve",
            Stage::Probe => "probe",
            Stage::Normalize => "normalize",
            Stage::Compile => "compile",
            Stage::Execute => "execute",
            Stage::Report => "report",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::Config(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }
}

/// Structured event emitted by one request's pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineEvent {
    pub request_id: String,
    pub stage: Stage,
    pub level: LogLevel,
    pub message: String,
    pub fields: Vec<(&'static str, String)>,
}

impl PipelineEvent {
    pub fn new(request_id: &str, stage: Stage, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            request_id: request_id.to_string(),
            stage,
            level,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn info(request_id: &str, stage: Stage, message: impl Into<String>) -> Self {
        Self::new(request_id, stage, LogLevel::Info, message)
    }

    pub fn field(mut self, key: &'static str, value: impl ToString) -> Self {
        self.fields.push((key, value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Port for logging and observability
#[async_trait]
pub trait LogPort: Send + Sync {
    /// Log structured event
    async fn log_event(&self, event: &PipelineEvent);
}
