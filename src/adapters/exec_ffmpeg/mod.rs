//! FFmpeg execution adapter
//!
//! Spawns the engine with the serialized argument vector and captures its
//! diagnostic stream. The child is killed if the run future is dropped.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::engine::EngineInvocation;
use crate::ports::*;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    program: PathBuf,
}

impl FFmpegAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }
}

impl Default for FFmpegAdapter {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl EnginePort for FFmpegAdapter {
    async fn run(&self, invocation: &EngineInvocation) -> Result<EngineOutcome, DomainError> {
        debug!(
            "Running: {}",
            invocation.command_line(&self.program.to_string_lossy())
        );

        let output = Command::new(&self.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ExecutionFailure::Spawn {
                message: format!("{}: {}", self.program.display(), e),
            })?;

        Ok(EngineOutcome {
            success: output.status.success(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
