//! Result reporting: response shapes handed back to the caller

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::model::{RenderResult, TimelineInfo};

/// Response for a request that reached the execution stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeResponse {
    /// "success" or "failed"
    pub status: String,
    pub succeeded: bool,
    /// Filename of the composed video
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    /// Where the composed video was published
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    pub output_size_bytes: u64,
    pub total_duration: f64,
    pub execution_time_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_kind: Option<String>,
    pub shortest_stream_applied: bool,
    pub timeline_info: TimelineInfo,
}

/// Response for a request rejected before or outside execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub kind: String,
    pub message: String,
}

impl From<&DomainError> for ErrorResponse {
    fn from(error: &DomainError) -> Self {
        Self {
            status: "error".to_string(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Turns a render result into the caller-facing response
pub struct ResultReporter;

impl ResultReporter {
    pub fn report(
        result: &RenderResult,
        published: Option<&Path>,
        timeline_info: TimelineInfo,
    ) -> ComposeResponse {
        let output_file = if result.succeeded {
            result
                .output_file
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned())
        } else {
            None
        };

        ComposeResponse {
            status: if result.succeeded { "success" } else { "failed" }.to_string(),
            succeeded: result.succeeded,
            output_file,
            output_path: published.filter(|_| result.succeeded).map(Path::to_path_buf),
            output_size_bytes: if result.succeeded {
                result.output_size_bytes
            } else {
                0
            },
            total_duration: result.total_duration,
            execution_time_seconds: result.execution_time_seconds,
            diagnostic_text: result.diagnostic_text.clone(),
            failure_kind: result.failure_kind.clone(),
            shortest_stream_applied: result.shortest_stream_applied,
            timeline_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ExecutionFailure;

    fn info() -> TimelineInfo {
        TimelineInfo {
            total_clips: 2,
            summed_clip_duration: 8.0,
            unique_sources: 2,
            has_audio_track: false,
        }
    }

    #[test]
    fn test_success_reports_filename_and_published_path() {
        let result = RenderResult {
            succeeded: true,
            output_file: Some(PathBuf::from("/tmp/media_processing_x/combined_video_20240101_000000.mp4")),
            output_size_bytes: 2048,
            total_duration: 8.0,
            execution_time_seconds: 1.5,
            diagnostic_text: None,
            failure_kind: None,
            shortest_stream_applied: false,
        };
        let published = PathBuf::from("/srv/out/combined_video_20240101_000000.mp4");

        let response = ResultReporter::report(&result, Some(&published), info());

        assert_eq!(response.status, "success");
        assert_eq!(
            response.output_file.as_deref(),
            Some("combined_video_20240101_000000.mp4")
        );
        assert_eq!(response.output_path, Some(published));
        assert_eq!(response.output_size_bytes, 2048);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["outputSizeBytes"], 2048);
        assert_eq!(json["timelineInfo"]["totalClips"], 2);
        assert!(json.get("diagnosticText").is_none());
    }

    #[test]
    fn test_failure_carries_diagnostic_and_no_output() {
        let result = RenderResult {
            succeeded: false,
            output_file: None,
            output_size_bytes: 0,
            total_duration: 5.0,
            execution_time_seconds: 0.2,
            diagnostic_text: Some("Error while filtering\n".to_string()),
            failure_kind: Some("engine_failed".to_string()),
            shortest_stream_applied: true,
        };

        let response = ResultReporter::report(&result, None, info());

        assert_eq!(response.status, "failed");
        assert!(!response.succeeded);
        assert_eq!(response.output_file, None);
        assert_eq!(response.output_size_bytes, 0);
        assert_eq!(response.diagnostic_text.as_deref(), Some("Error while filtering\n"));
        assert!(response.shortest_stream_applied);
    }

    #[test]
    fn test_error_response_shape() {
        let error: DomainError = ExecutionFailure::Cancelled {
            reason: "cancelled by caller".to_string(),
        }
        .into();
        let json = serde_json::to_value(ErrorResponse::from(&error)).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["kind"], "execution_error");
        assert!(json["message"].as_str().unwrap().contains("cancelled"));
    }
}
