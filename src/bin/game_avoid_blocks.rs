use std::process::ExitCode;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use arcade::games::avoid_blocks::AvoidBlocks;
use arcade::{config, engine, exit_codes, logging};

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::from(exit_codes::OK),
        Err(err) => {
            eprintln!("avoid_blocks: error: {err:#}");
            ExitCode::from(exit_codes::FATAL)
        }
    }
}

fn run() -> Result<()> {
    let config = config::load_config(&config::config_path()).context("load config")?;
    let mut game = AvoidBlocks::new(&config.avoid_blocks, StdRng::from_entropy());
    engine::play(&mut game, &config)?;
    Ok(())
}
