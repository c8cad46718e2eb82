//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the compose command
#[derive(Args, Debug)]
pub struct ComposeArgs {
    /// Request JSON file ({"timeline": [...], "audioRef": ...})
    #[arg(short, long)]
    pub request: PathBuf,

    /// Directory logical source references resolve against
    #[arg(short, long)]
    pub sources: Option<PathBuf>,

    /// Directory the finished video is copied to
    #[arg(long)]
    pub publish_dir: Option<PathBuf>,

    /// Engine timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Request JSON file
    #[arg(short, long)]
    pub request: PathBuf,

    /// Directory logical source references resolve against
    #[arg(short, long)]
    pub sources: Option<PathBuf>,
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Local media file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
