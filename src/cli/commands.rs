//! Command implementations

use std::future::Future;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

use crate::app::AppContainer;
use crate::cli::args::{ComposeArgs, PlanArgs, ProbeArgs};
use crate::domain::errors::DomainError;
use crate::domain::model::ComposeRequest;
use crate::output::{ErrorResponse, ResultReporter};
use crate::utils::Utils;

/// Exit status for a render the engine could not complete
pub const EXIT_RENDER_FAILED: u8 = 2;
/// Exit status for a request rejected before execution
pub const EXIT_STAGE_ERROR: u8 = 1;

/// Execute the compose command
pub async fn compose(container: &dyn AppContainer, args: ComposeArgs) -> Result<ExitCode> {
    info!("Starting compose operation");
    info!("Request: {}", args.request.display());
    let interrupted = interrupt();

    let request = match read_request(&args.request).await {
        Ok(request) => request,
        Err(e) => return report_error(&e),
    };

    let interactor = container.compose_interactor();
    let outcome = match interactor.compose_with_cancel(request, interrupted).await {
        Ok(outcome) => outcome,
        Err(e) => return report_error(&e),
    };

    let response = ResultReporter::report(
        &outcome.result,
        outcome.published_path.as_deref(),
        outcome.timeline_info.clone(),
    );
    print_json(&response)?;

    if response.succeeded {
        info!(
            "Compose completed: {} ({}) in {}",
            response.output_file.as_deref().unwrap_or_default(),
            Utils::format_file_size(response.output_size_bytes),
            Utils::format_duration(std::time::Duration::from_secs_f64(
                response.execution_time_seconds
            ))
        );
        Ok(ExitCode::SUCCESS)
    } else {
        error!(
            "Compose failed: {}",
            response.failure_kind.as_deref().unwrap_or("unknown")
        );
        Ok(ExitCode::from(EXIT_RENDER_FAILED))
    }
}

/// Execute the plan command
pub async fn plan(container: &dyn AppContainer, args: PlanArgs) -> Result<ExitCode> {
    info!("Starting plan operation");

    let request = match read_request(&args.request).await {
        Ok(request) => request,
        Err(e) => return report_error(&e),
    };

    let planned = match container.compose_interactor().plan(request).await {
        Ok(planned) => planned,
        Err(e) => return report_error(&e),
    };

    print_json(&serde_json::json!({
        "requestId": planned.request_id,
        "plan": planned.plan,
        "filterGraph": planned.invocation.filter_graph,
        "args": planned.invocation.args,
        "timelineInfo": planned.timeline_info,
    }))?;

    Ok(ExitCode::SUCCESS)
}

/// Execute the probe command
pub async fn probe(container: &dyn AppContainer, args: ProbeArgs) -> Result<ExitCode> {
    info!("Probing {}", args.input.display());

    let report = match container.inspect_interactor().inspect(&args.input).await {
        Ok(report) => report,
        Err(e) => return report_error(&e),
    };

    if args.json {
        print_json(&report)?;
    } else {
        println!("File: {}", report.path.display());
        println!("Dimensions: {}x{}", report.width, report.height);
        println!("File Size: {}", Utils::format_file_size(report.size_bytes));
    }

    Ok(ExitCode::SUCCESS)
}

/// Print an error response and map it to the stage-error exit status
pub fn report_error(error: &DomainError) -> Result<ExitCode> {
    error!("{}", error);
    print_json(&ErrorResponse::from(error))?;
    Ok(ExitCode::from(EXIT_STAGE_ERROR))
}

async fn read_request(path: &Path) -> Result<ComposeRequest, DomainError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::BadRequest(format!("cannot read request {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content)
        .map_err(|e| DomainError::BadRequest(format!("invalid request JSON: {}", e)))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize response to JSON")?;
    println!("{}", json);
    Ok(())
}

/// Register the Ctrl-C handler now; the returned future resolves on interrupt
///
/// The handler is live before the first poll, covering staging and probing.
/// Never resolves if the handler cannot be installed.
pub fn interrupt() -> impl Future<Output = ()> + Send + 'static {
    let (tx, rx) = oneshot::channel::<()>();

    match listen_for_interrupt() {
        Ok(mut listener) => {
            tokio::spawn(async move {
                if listener.recv().await.is_some() {
                    warn!("Interrupt received, cancelling render");
                    let _ = tx.send(());
                }
            });
        }
        Err(e) => warn!("Cannot listen for Ctrl-C: {}", e),
    }

    async move {
        if rx.await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(unix)]
fn listen_for_interrupt() -> std::io::Result<tokio::signal::unix::Signal> {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
}

#[cfg(windows)]
fn listen_for_interrupt() -> std::io::Result<tokio::signal::windows::CtrlC> {
    tokio::signal::windows::ctrl_c()
}
