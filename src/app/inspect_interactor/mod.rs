// Inspect interactor - Probes a single local media file

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// What a single probe reports
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            probe_port,
            fs_port,
            log_port,
        }
    }

    /// Probe the first video stream of a local file
    pub async fn inspect(&self, input: &Path) -> Result<InspectReport, DomainError> {
        let Some(size_bytes) = self.fs_port.file_size(input).await? else {
            return Err(DomainError::FsFail(format!(
                "Input file does not exist: {}",
                input.display()
            )));
        };

        let dimensions = self.probe_port.probe_dimensions(input).await?;
        self.log_port
            .log_event(
                &PipelineEvent::info("inspect", Stage::Probe, "Media file probed")
                    .field("path", input.display())
                    .field("dimensions", dimensions),
            )
            .await;

        Ok(InspectReport {
            path: input.to_path_buf(),
            width: dimensions.width,
            height: dimensions.height,
            size_bytes,
        })
    }
}
