//! Timeline to render-plan compilation
//!
//! The planner turns a validated [`Timeline`](crate::domain::model::Timeline)
//! into a [`RenderPlan`]: a typed filter graph that knows nothing about the
//! engine's textual syntax. Serialization happens in [`crate::engine`].

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::model::{Canvas, SourceVideo};

pub mod graph;
pub mod resolver;

pub use graph::GraphCompiler;
pub use resolver::{ResolvedTimeline, SourceResolver};

/// Name of an intermediate or final stream in the filter graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StreamLabel(String);

impl StreamLabel {
    /// Output of the filter chain compiled for clip `index`
    pub fn clip(index: usize) -> Self {
        Self(format!("v{}", index))
    }

    /// Output of the overlay node that adds clip `index`
    pub fn overlay(index: usize) -> Self {
        Self(format!("tmp{}", index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One filter applied to a clip's source stream
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "filter", rename_all = "snake_case")]
pub enum FilterNode {
    /// Keep the first `duration` seconds of the source
    Trim { duration: f64 },
    /// Shrink to fit inside the box, keeping aspect ratio
    Scale { width: u32, height: u32 },
    /// Grow to exactly the box, image centered
    Pad { width: u32, height: u32 },
    /// Shift timestamps so the clip starts at `offset` seconds
    SetPts { offset: f64 },
}

/// Per-clip filter chain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipChain {
    /// Position of the clip in the timeline
    pub clip_index: usize,
    /// Shared engine input the chain reads from
    pub input_index: usize,
    pub nodes: Vec<FilterNode>,
    pub output: StreamLabel,
}

/// Draws `top` over `base`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayNode {
    pub base: StreamLabel,
    pub top: StreamLabel,
    pub output: StreamLabel,
}

/// Unique source file bound to an engine input slot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    pub index: usize,
    pub key: String,
    pub path: PathBuf,
    pub needs_scaling: bool,
}

/// Audio track mapped to the output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioBinding {
    /// Input slot, always after every video input
    pub input_index: usize,
    pub path: PathBuf,
}

/// Everything the engine needs, built once and consumed once
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    pub canvas: Canvas,
    pub inputs: Vec<PlanInput>,
    pub chains: Vec<ClipChain>,
    pub overlays: Vec<OverlayNode>,
    /// Stream mapped to the output as video
    pub video_output: StreamLabel,
    pub audio: Option<AudioBinding>,
    /// Latest clip end; not reconciled with the audio length
    pub total_duration: f64,
}

impl RenderPlan {
    /// Input slot assigned to a source key
    pub fn input_index_of(&self, key: &str) -> Option<usize> {
        self.inputs.iter().find(|i| i.key == key).map(|i| i.index)
    }

    pub fn has_audio(&self) -> bool {
        self.audio.is_some()
    }
}

impl From<(usize, &SourceVideo)> for PlanInput {
    fn from((index, video): (usize, &SourceVideo)) -> Self {
        Self {
            index,
            key: video.key.clone(),
            path: video.path.clone(),
            needs_scaling: video.needs_scaling,
        }
    }
}
