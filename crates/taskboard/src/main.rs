use std::process::ExitCode;

use clap::Parser;
use color_eyre::Result;
use taskboard::{cli::Cli, commands, config, errors, logging};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    errors::init()?;
    let args = Cli::parse();
    let config = config::Config::new()?;
    config::ensure_data_and_config_dirs_exist(&config)?;
    let _log_guard = logging::init(&config)?;

    commands::run(args, &config).await
}
