use std::process::ExitCode;

use anyhow::{Context, Result};

use arcade::{config, exit_codes, launcher, logging};

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::from(exit_codes::OK),
        Err(err) => {
            eprintln!("main_screen: error: {err:#}");
            ExitCode::from(exit_codes::FATAL)
        }
    }
}

fn run() -> Result<()> {
    let config = config::load_config(&config::config_path()).context("load config")?;
    let dir = std::env::current_dir().context("resolve working directory")?;
    launcher::run(&config, &dir)?;
    Ok(())
}
