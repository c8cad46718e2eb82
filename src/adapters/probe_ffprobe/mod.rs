//! FFprobe adapter for dimension discovery
//!
//! Runs `ffprobe` against the first video stream and reads width/height
//! from its JSON report.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    program: PathBuf,
}

impl FFprobeAdapter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Pull dimensions out of an ffprobe JSON report
    pub fn parse_report(path: &Path, stdout: &[u8]) -> Result<Dimensions, DomainError> {
        let report: ProbeReport = serde_json::from_slice(stdout).map_err(|e| {
            DomainError::probe(path.display().to_string(), format!("unreadable ffprobe output: {}", e))
        })?;

        let stream = report.streams.first().ok_or_else(|| {
            DomainError::probe(path.display().to_string(), "no video stream found")
        })?;

        match (stream.width, stream.height) {
            (Some(width), Some(height)) => Dimensions::new(width, height).map_err(|_| {
                DomainError::probe(
                    path.display().to_string(),
                    format!("invalid dimensions {}x{}", width, height),
                )
            }),
            _ => Err(DomainError::probe(
                path.display().to_string(),
                "missing width or height",
            )),
        }
    }
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_dimensions(&self, file_path: &Path) -> Result<Dimensions, DomainError> {
        let output = Command::new(&self.program)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(file_path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                DomainError::probe(
                    file_path.display().to_string(),
                    format!("failed to run {}: {}", self.program.display(), e),
                )
            })?;

        if !output.status.success() {
            return Err(DomainError::probe(
                file_path.display().to_string(),
                format!(
                    "ffprobe exited with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let dimensions = Self::parse_report(file_path, &output.stdout)?;
        debug!("Probed {}: {}", file_path.display(), dimensions);
        Ok(dimensions)
    }
}
