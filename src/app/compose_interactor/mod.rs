// Compose interactor - Orchestrates the timeline-to-video use case

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::engine::{EncodeSettings, EngineInvocation, ExecutionCoordinator};
use crate::planner::{GraphCompiler, RenderPlan, SourceResolver};
use crate::ports::*;
use crate::utils::path::{output_file_name, WORK_DIR_PREFIX};

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Per-interactor knobs taken from configuration
#[derive(Debug, Clone)]
pub struct ComposeSettings {
    pub encode: EncodeSettings,
    pub probe_workers: usize,
    pub engine_timeout: Option<Duration>,
    /// Successful outputs are copied here; `None` keeps them in the work dir
    pub publish_dir: Option<PathBuf>,
}

impl Default for ComposeSettings {
    fn default() -> Self {
        Self {
            encode: EncodeSettings::default(),
            probe_workers: num_cpus::get().max(1),
            engine_timeout: Some(Duration::from_secs(3600)),
            publish_dir: None,
        }
    }
}

/// Everything known once a request has run through execution
#[derive(Debug, Clone)]
pub struct ComposeOutcome {
    pub request_id: String,
    pub result: RenderResult,
    /// Location the output was published to
    pub published_path: Option<PathBuf>,
    pub timeline_info: TimelineInfo,
}

/// A compiled plan that was never executed
#[derive(Debug, Clone)]
pub struct PlannedRender {
    pub request_id: String,
    pub plan: RenderPlan,
    pub invocation: EngineInvocation,
    pub timeline_info: TimelineInfo,
}

/// Interactor for the compose use case
pub struct ComposeInteractor {
    staging_port: Arc<dyn StagingPort>,
    probe_port: Arc<dyn ProbePort>,
    engine_port: Arc<dyn EnginePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    settings: ComposeSettings,
}

impl ComposeInteractor {
    /// Create new compose interactor with injected ports
    pub fn new(
        staging_port: Arc<dyn StagingPort>,
        probe_port: Arc<dyn ProbePort>,
        engine_port: Arc<dyn EnginePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
        settings: ComposeSettings,
    ) -> Self {
        Self {
            staging_port,
            probe_port,
            engine_port,
            fs_port,
            log_port,
            settings,
        }
    }

    pub fn settings(&self) -> &ComposeSettings {
        &self.settings
    }

    /// Run a request to completion with no external cancellation
    pub async fn compose(&self, request: ComposeRequest) -> Result<ComposeOutcome, DomainError> {
        self.compose_with_cancel(request, std::future::pending()).await
    }

    /// Validate → Stage → Resolve → Probe → Normalize → Compile → Execute → Report
    ///
    /// Stage errors before execution come back as `Err` and the engine is
    /// never started. Execution failures are folded into the returned
    /// [`RenderResult`].
    pub async fn compose_with_cancel<C>(
        &self,
        request: ComposeRequest,
        cancel: C,
    ) -> Result<ComposeOutcome, DomainError>
    where
        C: Future<Output = ()> + Send,
    {
        let request_id = next_request_id();
        let timeline = self.validate(&request_id, request).await?;
        let timeline_info = timeline.info();

        let work_dir = self.fs_port.create_work_dir(WORK_DIR_PREFIX).await?;
        let plan = self.prepare(&request_id, &timeline, work_dir.path()).await?;

        let output_path = work_dir.path().join(output_file_name(&Local::now()));
        self.log_port
            .log_event(
                &PipelineEvent::info(&request_id, Stage::Execute, "Starting engine")
                    .field("inputs", plan.inputs.len())
                    .field("output", output_path.display()),
            )
            .await;

        let coordinator = ExecutionCoordinator::new(
            Arc::clone(&self.engine_port),
            Arc::clone(&self.fs_port),
            self.settings.encode.clone(),
        )
        .with_timeout(self.settings.engine_timeout);
        let result = coordinator.execute(plan, &output_path, cancel).await;

        let published_path = if result.succeeded {
            self.publish(&request_id, &output_path).await?
        } else {
            self.log_port
                .log_event(
                    &PipelineEvent::new(&request_id, Stage::Execute, LogLevel::Error, "Render failed")
                        .field("kind", result.failure_kind.as_deref().unwrap_or("unknown")),
                )
                .await;
            None
        };

        self.log_port
            .log_event(
                &PipelineEvent::info(&request_id, Stage::Report, "Request finished")
                    .field("succeeded", result.succeeded)
                    .field("size_bytes", result.output_size_bytes)
                    .field("execution_seconds", format!("{:.2}", result.execution_time_seconds)),
            )
            .await;

        if let Err(e) = work_dir.close() {
            self.log_port
                .log_event(
                    &PipelineEvent::new(&request_id, Stage::Report, LogLevel::Warn, "Work directory cleanup failed")
                        .field("error", e),
                )
                .await;
        }

        Ok(ComposeOutcome {
            request_id,
            result,
            published_path,
            timeline_info,
        })
    }

    /// Compile without executing; the work directory is discarded afterwards
    pub async fn plan(&self, request: ComposeRequest) -> Result<PlannedRender, DomainError> {
        let request_id = next_request_id();
        let timeline = self.validate(&request_id, request).await?;
        let timeline_info = timeline.info();

        let work_dir = self.fs_port.create_work_dir(WORK_DIR_PREFIX).await?;
        let plan = self.prepare(&request_id, &timeline, work_dir.path()).await?;
        let output_path = work_dir.path().join(output_file_name(&Local::now()));

        let coordinator = ExecutionCoordinator::new(
            Arc::clone(&self.engine_port),
            Arc::clone(&self.fs_port),
            self.settings.encode.clone(),
        );
        let invocation = coordinator.invocation(&plan, &output_path);

        Ok(PlannedRender {
            request_id,
            plan,
            invocation,
            timeline_info,
        })
    }

    async fn validate(&self, request_id: &str, request: ComposeRequest) -> Result<Timeline, DomainError> {
        match request.into_timeline() {
            Ok(timeline) => {
                let info = timeline.info();
                self.log_port
                    .log_event(
                        &PipelineEvent::info(request_id, Stage::Validate, "Timeline accepted")
                            .field("clips", info.total_clips)
                            .field("unique_sources", info.unique_sources)
                            .field("has_audio", info.has_audio_track),
                    )
                    .await;
                Ok(timeline)
            }
            Err(e) => Err(self.fail(request_id, Stage::Validate, e).await),
        }
    }

    /// Stage, resolve, probe, normalize and compile inside `work_dir`
    async fn prepare(
        &self,
        request_id: &str,
        timeline: &Timeline,
        work_dir: &Path,
    ) -> Result<RenderPlan, DomainError> {
        let mut references: Vec<String> = timeline
            .unique_source_refs()
            .into_iter()
            .map(str::to_string)
            .collect();
        if let Some(audio) = timeline.audio_ref() {
            if !references.iter().any(|r| r == audio) {
                references.push(audio.to_string());
            }
        }

        let staged = match self.staging_port.stage(&references, work_dir).await {
            Ok(staged) => staged,
            Err(e) => return Err(self.fail(request_id, Stage::Stage, e).await),
        };
        self.log_port
            .log_event(
                &PipelineEvent::info(request_id, Stage::Stage, "Sources staged")
                    .field("requested", references.len())
                    .field("staged", staged.len()),
            )
            .await;

        let resolved = match SourceResolver::resolve(timeline, &staged) {
            Ok(resolved) => resolved,
            Err(e) => return Err(self.fail(request_id, Stage::Resolve, e).await),
        };
        self.log_port
            .log_event(
                &PipelineEvent::info(request_id, Stage::Resolve, "Timeline resolved")
                    .field("sources", resolved.sources.len()),
            )
            .await;

        let probed = match self.probe_sources(&resolved.sources).await {
            Ok(probed) => probed,
            Err(e) => return Err(self.fail(request_id, Stage::Probe, e).await),
        };
        for source in &probed {
            self.log_port
                .log_event(
                    &PipelineEvent::new(request_id, Stage::Probe, LogLevel::Debug, "Source probed")
                        .field("source", &source.source.key)
                        .field("dimensions", source.dimensions),
                )
                .await;
        }

        let (canvas, videos) = match CanvasNormalizer::normalize(&probed) {
            Ok(normalized) => normalized,
            Err(e) => return Err(self.fail(request_id, Stage::Normalize, e).await),
        };
        self.log_port
            .log_event(
                &PipelineEvent::info(request_id, Stage::Normalize, "Canvas computed")
                    .field("canvas", canvas)
                    .field("scaled", videos.iter().filter(|v| v.needs_scaling).count()),
            )
            .await;

        let plan = match GraphCompiler::compile(timeline, &resolved, canvas, &videos) {
            Ok(plan) => plan,
            Err(e) => return Err(self.fail(request_id, Stage::Compile, e).await),
        };
        self.log_port
            .log_event(
                &PipelineEvent::info(request_id, Stage::Compile, "Plan compiled")
                    .field("chains", plan.chains.len())
                    .field("overlays", plan.overlays.len())
                    .field("total_duration", plan.total_duration),
            )
            .await;

        Ok(plan)
    }

    /// Probe every unique source, at most `probe_workers` at a time
    ///
    /// Results come back in the order of `sources`, whatever order the
    /// probes finish in. The first failure aborts the rest.
    async fn probe_sources(&self, sources: &[StagedSource]) -> Result<Vec<ProbedSource>, DomainError> {
        let semaphore = Arc::new(Semaphore::new(self.settings.probe_workers.max(1)));
        let mut tasks = JoinSet::new();

        for (position, source) in sources.iter().cloned().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let probe_port = Arc::clone(&self.probe_port);
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| DomainError::Internal(format!("probe pool closed: {}", e)))?;
                let dimensions = probe_port.probe_dimensions(&source.path).await?;
                Ok::<_, DomainError>((position, ProbedSource { source, dimensions }))
            });
        }

        let mut slots: Vec<Option<ProbedSource>> = (0..sources.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (position, probed) =
                joined.map_err(|e| DomainError::Internal(format!("probe task failed: {}", e)))??;
            slots[position] = Some(probed);
        }

        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| DomainError::Internal("probe result missing".to_string()))
    }

    async fn publish(&self, request_id: &str, output_path: &Path) -> Result<Option<PathBuf>, DomainError> {
        let Some(publish_dir) = &self.settings.publish_dir else {
            return Ok(None);
        };
        let Some(file_name) = output_path.file_name() else {
            return Err(DomainError::Internal(format!(
                "output path has no file name: {}",
                output_path.display()
            )));
        };

        let destination = publish_dir.join(file_name);
        if let Err(e) = self.fs_port.copy_file(output_path, &destination).await {
            return Err(self.fail(request_id, Stage::Report, e).await);
        }
        self.log_port
            .log_event(
                &PipelineEvent::info(request_id, Stage::Report, "Output published")
                    .field("path", destination.display()),
            )
            .await;
        Ok(Some(destination))
    }

    /// Record a terminal stage failure and hand the error back
    async fn fail(&self, request_id: &str, stage: Stage, error: DomainError) -> DomainError {
        self.log_port
            .log_event(
                &PipelineEvent::new(request_id, stage, LogLevel::Error, error.to_string())
                    .field("kind", error.kind()),
            )
            .await;
        error
    }
}

fn next_request_id() -> String {
    format!(
        "{}-{}",
        Local::now().format("%Y%m%d%H%M%S"),
        REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_ids_are_unique() {
        let a = next_request_id();
        let b = next_request_id();
        assert_ne!(a, b);
    }
}
