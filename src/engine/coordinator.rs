//! Execution coordinator: run the compiled plan and interpret the outcome

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::domain::errors::*;
use crate::domain::model::RenderResult;
use crate::engine::{EncodeSettings, EngineCommand, EngineInvocation};
use crate::planner::RenderPlan;
use crate::ports::{EngineOutcome, EnginePort, FsPort};

/// Runs one render plan through the engine
pub struct ExecutionCoordinator {
    engine: Arc<dyn EnginePort>,
    fs: Arc<dyn FsPort>,
    settings: EncodeSettings,
    timeout: Option<Duration>,
}

impl ExecutionCoordinator {
    pub fn new(engine: Arc<dyn EnginePort>, fs: Arc<dyn FsPort>, settings: EncodeSettings) -> Self {
        Self {
            engine,
            fs,
            settings,
            timeout: None,
        }
    }

    /// Upper bound on one engine run; `None` waits forever
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Serialize without running
    pub fn invocation(&self, plan: &RenderPlan, output_path: &Path) -> EngineInvocation {
        EngineCommand::new(&self.settings).build(plan, output_path)
    }

    /// Consume the plan: run the engine, time it, read back the output
    ///
    /// Engine failures never escape as `Err`; they come back as a failed
    /// [`RenderResult`] carrying the raw diagnostic text. `cancel` resolving
    /// first aborts the run.
    pub async fn execute<C>(&self, plan: RenderPlan, output_path: &Path, cancel: C) -> RenderResult
    where
        C: Future<Output = ()> + Send,
    {
        let invocation = self.invocation(&plan, output_path);
        debug!(args = ?invocation.args, "Engine invocation");

        let started = Instant::now();
        let outcome = self.run_bounded(&invocation, cancel).await;
        let execution_time = started.elapsed().as_secs_f64();
        info!("Engine finished in {:.2} seconds", execution_time);

        let verdict = match outcome {
            Ok(outcome) if outcome.success => match self.fs.file_size(output_path).await {
                Ok(Some(size)) => Ok(size),
                Ok(None) => Err(ExecutionFailure::MissingOutput {
                    path: output_path.display().to_string(),
                }),
                Err(e) => Err(ExecutionFailure::MissingOutput {
                    path: format!("{} ({})", output_path.display(), e),
                }),
            },
            Ok(outcome) => Err(ExecutionFailure::EngineFailed {
                exit_code: outcome.exit_code,
                stderr: outcome.stderr,
            }),
            Err(failure) => Err(failure),
        };

        let shortest_stream_applied = plan.has_audio();
        match verdict {
            Ok(size) => {
                info!("Created combined video: {} ({} bytes)", output_path.display(), size);
                RenderResult {
                    succeeded: true,
                    output_file: Some(output_path.to_path_buf()),
                    output_size_bytes: size,
                    total_duration: plan.total_duration,
                    execution_time_seconds: execution_time,
                    diagnostic_text: None,
                    failure_kind: None,
                    shortest_stream_applied,
                }
            }
            Err(failure) => {
                error!("Engine failed ({}): {}", failure.kind(), failure.diagnostic_text());
                if let Err(e) = self.fs.remove_file(output_path).await {
                    warn!("Could not remove partial output {}: {}", output_path.display(), e);
                }
                RenderResult {
                    succeeded: false,
                    output_file: None,
                    output_size_bytes: 0,
                    total_duration: plan.total_duration,
                    execution_time_seconds: execution_time,
                    diagnostic_text: Some(failure.diagnostic_text()),
                    failure_kind: Some(failure.kind().to_string()),
                    shortest_stream_applied,
                }
            }
        }
    }

    /// Race the engine against the timeout and the caller's cancellation
    ///
    /// Losing the race drops the engine future, which kills the process.
    async fn run_bounded<C>(
        &self,
        invocation: &EngineInvocation,
        cancel: C,
    ) -> Result<EngineOutcome, ExecutionFailure>
    where
        C: Future<Output = ()> + Send,
    {
        let deadline = async {
            match self.timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = self.engine.run(invocation) => result.map_err(|e| match e {
                DomainError::Execution(failure) => failure,
                other => ExecutionFailure::Spawn { message: other.to_string() },
            }),
            _ = cancel => Err(ExecutionFailure::Cancelled {
                reason: "cancelled by caller".to_string(),
            }),
            _ = deadline => Err(ExecutionFailure::Cancelled {
                reason: format!(
                    "timed out after {} seconds",
                    self.timeout.map(|t| t.as_secs()).unwrap_or_default()
                ),
            }),
        }
    }
}
