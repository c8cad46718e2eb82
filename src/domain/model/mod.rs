// Domain models - Core types and data structures

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// One timeline entry as it arrives at the boundary
///
/// Field names follow the camelCase request shape; the snake_case names used
/// by the older media service are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipEntry {
    #[serde(default, alias = "source_ref", alias = "gcs_path")]
    pub source_ref: Option<String>,
    #[serde(alias = "start_time")]
    pub start_time: f64,
    pub duration: f64,
}

/// Compose request as submitted by a caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposeRequest {
    #[serde(alias = "vclip_timeline")]
    pub timeline: Vec<ClipEntry>,
    #[serde(default, alias = "audio_ref", alias = "demo_track_gcs_path")]
    pub audio_ref: Option<String>,
}

impl ComposeRequest {
    /// Validate the request and turn it into an immutable timeline
    pub fn into_timeline(self) -> Result<Timeline, DomainError> {
        let mut clips = Vec::with_capacity(self.timeline.len());
        for (index, entry) in self.timeline.into_iter().enumerate() {
            let source_ref = match entry.source_ref {
                Some(r) if !r.trim().is_empty() => r,
                _ => {
                    return Err(DomainError::BadRequest(format!(
                        "timeline entry {} must have a non-empty sourceRef",
                        index
                    )))
                }
            };
            let clip = Clip::new(source_ref, entry.start_time, entry.duration)
                .map_err(|e| match e {
                    DomainError::BadRequest(msg) => {
                        DomainError::BadRequest(format!("timeline entry {}: {}", index, msg))
                    }
                    other => other,
                })?;
            clips.push(clip);
        }

        // An empty audio reference means "no audio"
        let audio_ref = self.audio_ref.filter(|r| !r.trim().is_empty());
        Timeline::new(clips, audio_ref)
    }
}

/// A validated clip: which source, where it lands, how long it plays
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub source_ref: String,
    pub start_time: f64,
    pub duration: f64,
}

impl Clip {
    /// Create new clip with validation
    pub fn new(source_ref: impl Into<String>, start_time: f64, duration: f64) -> Result<Self, DomainError> {
        let source_ref = source_ref.into();
        if source_ref.trim().is_empty() {
            return Err(DomainError::BadRequest("sourceRef cannot be empty".to_string()));
        }
        if source_ref.split(['/', '\\']).any(|part| part == "..") {
            return Err(DomainError::BadRequest(format!(
                "sourceRef may not contain '..': {}",
                source_ref
            )));
        }
        if !start_time.is_finite() || start_time < 0.0 {
            return Err(DomainError::BadRequest(format!(
                "startTime must be a finite number >= 0, got {}",
                start_time
            )));
        }
        if !duration.is_finite() || duration <= 0.0 {
            return Err(DomainError::BadRequest(format!(
                "duration must be a finite number > 0, got {}",
                duration
            )));
        }

        Ok(Self {
            source_ref,
            start_time,
            duration,
        })
    }

    /// Point on the shared timeline where this clip stops
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// Ordered, non-empty clip sequence with an optional audio track
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    clips: Vec<Clip>,
    audio_ref: Option<String>,
}

impl Timeline {
    /// Create new timeline; an empty clip list is rejected here, before any stage runs
    pub fn new(clips: Vec<Clip>, audio_ref: Option<String>) -> Result<Self, DomainError> {
        if clips.is_empty() {
            return Err(DomainError::BadRequest("timeline cannot be empty".to_string()));
        }
        if let Some(audio) = &audio_ref {
            if audio.split(['/', '\\']).any(|part| part == "..") {
                return Err(DomainError::BadRequest(format!(
                    "audioRef may not contain '..': {}",
                    audio
                )));
            }
        }
        Ok(Self { clips, audio_ref })
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn audio_ref(&self) -> Option<&str> {
        self.audio_ref.as_deref()
    }

    /// Unique source references in first-seen order
    pub fn unique_source_refs(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for clip in &self.clips {
            if !seen.contains(&clip.source_ref.as_str()) {
                seen.push(&clip.source_ref);
            }
        }
        seen
    }

    /// Timeline length: latest clip end, regardless of any audio track
    pub fn total_duration(&self) -> f64 {
        self.clips
            .iter()
            .map(Clip::end_time)
            .fold(0.0_f64, f64::max)
    }

    /// Request summary reported back alongside the render result
    pub fn info(&self) -> TimelineInfo {
        TimelineInfo {
            total_clips: self.clips.len(),
            summed_clip_duration: self.clips.iter().map(|c| c.duration).sum(),
            unique_sources: self.unique_source_refs().len(),
            has_audio_track: self.audio_ref.is_some(),
        }
    }
}

/// Summary of the submitted timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineInfo {
    pub total_clips: usize,
    pub summed_clip_duration: f64,
    pub unique_sources: usize,
    pub has_audio_track: bool,
}

/// Native frame size of a video stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions; zero on either axis is not a usable frame
    pub fn new(width: u32, height: u32) -> Result<Self, DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::BadRequest(format!(
                "Video dimensions cannot be zero ({}x{})",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    /// Element-wise maximum
    pub fn max(self, other: Dimensions) -> Dimensions {
        Dimensions {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// True if either axis is strictly smaller than `other`
    pub fn smaller_than_on_any_axis(&self, other: &Dimensions) -> bool {
        self.width < other.width || self.height < other.height
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Output frame size shared by every clip
pub type Canvas = Dimensions;

/// A source reference mapped to its staged local file
#[derive(Debug, Clone, PartialEq)]
pub struct StagedSource {
    /// Canonical filename derived from the reference
    pub key: String,
    /// First reference that produced this key
    pub source_ref: String,
    pub path: PathBuf,
}

/// A staged source with its probed dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct ProbedSource {
    pub source: StagedSource,
    pub dimensions: Dimensions,
}

/// One unique source as it enters the render plan
#[derive(Debug, Clone, PartialEq)]
pub struct SourceVideo {
    pub key: String,
    pub path: PathBuf,
    pub dimensions: Dimensions,
    pub needs_scaling: bool,
}

/// Outcome of the execution stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    pub succeeded: bool,
    /// Produced file, only when `succeeded`
    pub output_file: Option<PathBuf>,
    pub output_size_bytes: u64,
    /// Timeline-derived; may exceed the encoded length when audio is the shorter stream
    pub total_duration: f64,
    pub execution_time_seconds: f64,
    pub diagnostic_text: Option<String>,
    pub failure_kind: Option<String>,
    pub shortest_stream_applied: bool,
}
