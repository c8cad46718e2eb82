// Adapters - External system implementations

pub mod exec_ffmpeg;
pub mod fs_local;
pub mod probe_ffprobe;
pub mod staging_local;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use exec_ffmpeg::FFmpegAdapter;
pub use fs_local::LocalFsAdapter;
pub use probe_ffprobe::FFprobeAdapter;
pub use staging_local::LocalStagingAdapter;
pub use toml_config::{ComposerConfig, ConfigOverrides, LoggingConfig, TomlConfigAdapter};
pub use tracing_log::TracingLogAdapter;
