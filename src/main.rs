//! ReelMix CLI
//!
//! Renders a clip timeline into one video through a single ffmpeg run.
//!
//! # Usage
//!
//! ```bash
//! reelmix compose --request timeline.json --sources ./media --publish-dir ./out
//! reelmix plan --request timeline.json --sources ./media
//! reelmix probe --input ./media/IMG_0153.mov
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use reelmix_cli::adapters::{LoggingConfig, TomlConfigAdapter};
use reelmix_cli::app::DefaultAppContainer;
use reelmix_cli::cli::{commands, Cli, Commands};
use reelmix_cli::utils::logging::{init_logging, log_system_info};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = match TomlConfigAdapter::load(cli.config.as_deref(), &cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&LoggingConfig::default());
            return commands::report_error(&e);
        }
    };

    init_logging(&config.logging);
    log_system_info(&config.logging);

    let container = match DefaultAppContainer::new(&config) {
        Ok(container) => container,
        Err(e) => return commands::report_error(&e),
    };

    let code = match cli.command {
        Commands::Compose(args) => {
            info!("Executing compose command");
            commands::compose(&container, args).await?
        }
        Commands::Plan(args) => {
            info!("Executing plan command");
            commands::plan(&container, args).await?
        }
        Commands::Probe(args) => {
            info!("Executing probe command");
            commands::probe(&container, args).await?
        }
    };

    Ok(code)
}
