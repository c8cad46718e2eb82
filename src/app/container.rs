use std::sync::Arc;

use crate::adapters::{
    ComposerConfig, FFmpegAdapter, FFprobeAdapter, LocalFsAdapter, LocalStagingAdapter,
    TracingLogAdapter,
};
use crate::app::compose_interactor::{ComposeInteractor, ComposeSettings};
use crate::app::inspect_interactor::InspectInteractor;
use crate::domain::errors::DomainError;
use crate::ports::{EnginePort, FsPort, LogPort, ProbePort, StagingPort};

pub trait AppContainer: Send + Sync {
    fn compose_interactor(&self) -> Arc<ComposeInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
}

/// Production wiring: ffprobe, ffmpeg, local disk, tracing
pub struct DefaultAppContainer {
    compose_interactor: Arc<ComposeInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
}

impl DefaultAppContainer {
    pub fn new(config: &ComposerConfig) -> Result<Self, DomainError> {
        let staging_port = Arc::new(LocalStagingAdapter::new(&config.composer.source_root));
        let probe_port = Arc::new(FFprobeAdapter::new(&config.composer.ffprobe_path));
        let engine_port = Arc::new(FFmpegAdapter::new(&config.composer.ffmpeg_path));
        let fs_port = Arc::new(LocalFsAdapter::new(&config.composer.work_root)?);
        let log_port = Arc::new(TracingLogAdapter::new());

        let settings = ComposeSettings {
            encode: config.encode.clone(),
            probe_workers: config.composer.probe_workers,
            engine_timeout: Some(config.engine_timeout()),
            publish_dir: Some(config.composer.publish_dir.clone()),
        };

        let compose_interactor = Arc::new(ComposeInteractor::new(
            staging_port as Arc<dyn StagingPort>,
            Arc::clone(&probe_port) as Arc<dyn ProbePort>,
            engine_port as Arc<dyn EnginePort>,
            Arc::clone(&fs_port) as Arc<dyn FsPort>,
            Arc::clone(&log_port) as Arc<dyn LogPort>,
            settings,
        ));

        let inspect_interactor = Arc::new(InspectInteractor::new(
            probe_port as Arc<dyn ProbePort>,
            fs_port as Arc<dyn FsPort>,
            log_port as Arc<dyn LogPort>,
        ));

        Ok(Self {
            compose_interactor,
            inspect_interactor,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn compose_interactor(&self) -> Arc<ComposeInteractor> {
        Arc::clone(&self.compose_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_container_wires_from_config() {
        let work = TempDir::new().unwrap();
        let mut config = ComposerConfig::default();
        config.composer.work_root = work.path().join("work");
        config.composer.probe_workers = 3;

        let container = DefaultAppContainer::new(&config).unwrap();
        let interactor = container.compose_interactor();

        assert_eq!(interactor.settings().probe_workers, 3);
        assert_eq!(
            interactor.settings().publish_dir.as_deref(),
            Some(config.composer.publish_dir.as_path())
        );
        assert!(config.composer.work_root.is_dir());
    }
}
