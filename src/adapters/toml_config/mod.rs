// TOML config adapter - Typed configuration from file, environment and CLI

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::engine::EncodeSettings;
use crate::ports::LogLevel;

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "REELMIX_";

/// Whole-application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ComposerConfig {
    pub composer: ComposerSection,
    pub encode: EncodeSettings,
    pub logging: LoggingConfig,
}

/// Paths, engine binaries and resource limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerSection {
    pub ffmpeg_path: PathBuf,
    pub ffprobe_path: PathBuf,
    /// Logical source references resolve relative to this directory
    pub source_root: PathBuf,
    /// Per-request work directories are created here
    pub work_root: PathBuf,
    /// Successful outputs are copied here
    pub publish_dir: PathBuf,
    pub probe_workers: usize,
    pub engine_timeout_secs: u64,
}

impl Default for ComposerSection {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            source_root: PathBuf::from("."),
            work_root: std::env::temp_dir(),
            publish_dir: std::env::temp_dir(),
            probe_workers: num_cpus::get().max(1),
            engine_timeout_secs: 3600,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level filter ("info", "debug", ...); `RUST_LOG` wins when set
    pub level: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Values given on the command line; highest precedence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub source_root: Option<PathBuf>,
    pub publish_dir: Option<PathBuf>,
    pub engine_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

impl ComposerConfig {
    pub fn engine_timeout(&self) -> Duration {
        Duration::from_secs(self.composer.engine_timeout_secs)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        LogLevel::parse(&self.logging.level)?;

        if self.encode.crf > 51 {
            return Err(DomainError::Config(
                "CRF value cannot exceed 51".to_string(),
            ));
        }
        if self.composer.probe_workers == 0 {
            return Err(DomainError::Config(
                "probe_workers must be at least 1".to_string(),
            ));
        }
        if self.composer.engine_timeout_secs == 0 {
            return Err(DomainError::Config(
                "engine_timeout_secs must be at least 1".to_string(),
            ));
        }
        for (name, value) in [
            ("video_codec", &self.encode.video_codec),
            ("audio_codec", &self.encode.audio_codec),
            ("preset", &self.encode.preset),
            ("audio_bitrate", &self.encode.audio_bitrate),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::Config(format!("{} cannot be empty", name)));
            }
        }

        Ok(())
    }
}

/// Loads [`ComposerConfig`] with the precedence CLI > env > file > defaults
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn parse(toml_content: &str) -> Result<ComposerConfig, DomainError> {
        toml::from_str(toml_content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    pub fn load_file(path: &Path) -> Result<ComposerConfig, DomainError> {
        if !path.exists() {
            return Err(DomainError::Config(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::FsFail(format!("Failed to read config file: {}", e)))?;
        info!("Loading configuration from: {}", path.display());
        Self::parse(&content)
    }

    /// Build the effective configuration from every layer, then validate it
    pub fn load(
        path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<ComposerConfig, DomainError> {
        let mut config = match path {
            Some(path) => Self::load_file(path)?,
            None => ComposerConfig::default(),
        };

        Self::apply_env(&mut config, std::env::vars())?;
        Self::apply_overrides(&mut config, overrides);
        config.validate()?;

        debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    /// Apply `REELMIX_*` variables; unrelated variables are ignored
    pub fn apply_env<I>(config: &mut ComposerConfig, vars: I) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };

            match name {
                "FFMPEG_PATH" => config.composer.ffmpeg_path = PathBuf::from(value),
                "FFPROBE_PATH" => config.composer.ffprobe_path = PathBuf::from(value),
                "SOURCE_ROOT" => config.composer.source_root = PathBuf::from(value),
                "WORK_ROOT" => config.composer.work_root = PathBuf::from(value),
                "PUBLISH_DIR" => config.composer.publish_dir = PathBuf::from(value),
                "PROBE_WORKERS" => config.composer.probe_workers = parse_env(&key, &value)?,
                "ENGINE_TIMEOUT_SECS" => {
                    config.composer.engine_timeout_secs = parse_env(&key, &value)?
                }
                "HWACCEL" => config.encode.hwaccel = value,
                "VIDEO_CODEC" => config.encode.video_codec = value,
                "PRESET" => config.encode.preset = value,
                "CRF" => config.encode.crf = parse_env(&key, &value)?,
                "THREADS" => config.encode.threads = parse_env(&key, &value)?,
                "AUDIO_CODEC" => config.encode.audio_codec = value,
                "AUDIO_BITRATE" => config.encode.audio_bitrate = value,
                "LOG_LEVEL" => config.logging.level = value,
                "LOG_JSON" => config.logging.json = parse_env(&key, &value)?,
                _ => continue,
            }
            debug!("Config override from environment: {}", key);
        }

        Ok(())
    }

    pub fn apply_overrides(config: &mut ComposerConfig, overrides: &ConfigOverrides) {
        if let Some(root) = &overrides.source_root {
            config.composer.source_root = root.clone();
        }
        if let Some(dir) = &overrides.publish_dir {
            config.composer.publish_dir = dir.clone();
        }
        if let Some(secs) = overrides.engine_timeout_secs {
            config.composer.engine_timeout_secs = secs;
        }
        if let Some(level) = &overrides.log_level {
            config.logging.level = level.clone();
        }
        if overrides.json_logs {
            config.logging.json = true;
        }
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| DomainError::Config(format!("Invalid value for {}: {}", key, e)))
}
