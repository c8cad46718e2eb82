//! ReelMix timeline composer library
//!
//! Compiles a declarative clip timeline into one ffmpeg filter-graph
//! invocation: sources are staged and probed, scaled onto a common canvas,
//! trimmed and time-shifted, then overlaid in timeline order.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod domain;
pub mod engine;
pub mod output;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{ComposeInteractor, ComposeOutcome, ComposeSettings};
pub use domain::errors::{DomainError, ExecutionFailure};
pub use domain::model::{Clip, ComposeRequest, Dimensions, RenderResult, Timeline};
pub use planner::RenderPlan;
