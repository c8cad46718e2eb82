//! CLI module for ReelMix
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::adapters::ConfigOverrides;

pub mod args;
pub mod commands;

/// ReelMix timeline composer
///
/// Compiles a clip timeline into a single ffmpeg filter-graph invocation and
/// renders it to one video.
#[derive(Parser, Debug)]
#[command(name = "reelmix")]
#[command(about = "ReelMix - compose one video from a clip timeline")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// TOML configuration file
    #[arg(long, global = true, env = "REELMIX_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a timeline request to a video
    Compose(args::ComposeArgs),
    /// Compile a timeline request and print the plan without rendering
    Plan(args::PlanArgs),
    /// Print the dimensions of a local video file
    Probe(args::ProbeArgs),
}

impl Cli {
    /// Command-line values that override file and environment config
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            log_level: self.log_level.clone(),
            json_logs: self.json_logs,
            ..Default::default()
        };

        match &self.command {
            Commands::Compose(args) => {
                overrides.source_root = args.sources.clone();
                overrides.publish_dir = args.publish_dir.clone();
                overrides.engine_timeout_secs = args.timeout;
            }
            Commands::Plan(args) => {
                overrides.source_root = args.sources.clone();
            }
            Commands::Probe(_) => {}
        }

        overrides
    }
}
