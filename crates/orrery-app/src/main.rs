use std::process::ExitCode;

use clap::Parser;
use orrery_app::platform::PlatformDirs;
use orrery_config::{CliArgs, Config};
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve() {
        Ok(dirs) => dirs.with_config_dir(args.config.clone()),
        Err(e) => {
            eprintln!("Failed to resolve platform directories: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = dirs.create_dirs() {
        eprintln!("Failed to create platform directories: {e}");
        return ExitCode::FAILURE;
    }

    let loaded = Config::load_or_create(&dirs.config_dir);
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    config.apply_cli_overrides(&args);
    orrery_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = loaded {
        error!(config_dir = %dirs.config_dir.display(), "{e}");
        return ExitCode::FAILURE;
    }
    info!(
        config_dir = %dirs.config_dir.display(),
        log_dir = %dirs.log_dir.display(),
        "Orrery starting"
    );

    match orrery_app::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
