//! Media engine invocation and execution

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod command;
pub mod coordinator;

pub use command::EngineCommand;
pub use coordinator::ExecutionCoordinator;

/// Output encoding options
///
/// Defaults favour speed over size: fastest x264 preset, every core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeSettings {
    /// Hardware acceleration hint
    pub hwaccel: String,
    /// Video codec
    pub video_codec: String,
    /// Encoding preset
    pub preset: String,
    /// Constant Rate Factor (0-51)
    pub crf: u8,
    /// Encoder threads, 0 = all available
    pub threads: u32,
    /// Audio codec
    pub audio_codec: String,
    /// Audio bitrate
    pub audio_bitrate: String,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            hwaccel: "auto".to_string(),
            video_codec: "libx264".to_string(),
            preset: "ultrafast".to_string(),
            crf: 23,
            threads: 0,
            audio_codec: "aac".to_string(),
            audio_bitrate: "128k".to_string(),
        }
    }
}

/// A fully serialized engine run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineInvocation {
    /// Arguments after the program name
    pub args: Vec<String>,
    /// Filter graph program, also present in `args`
    pub filter_graph: String,
    /// Where the engine writes the composed video
    pub output_path: PathBuf,
}

impl EngineInvocation {
    /// Printable command line for logs
    pub fn command_line(&self, program: &str) -> String {
        let mut line = program.to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}
