use std::process::ExitCode;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use arcade::games::snake::Snake;
use arcade::{config, engine, exit_codes, logging};

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::from(exit_codes::OK),
        Err(err) => {
            eprintln!("snake: error: {err:#}");
            ExitCode::from(exit_codes::FATAL)
        }
    }
}

fn run() -> Result<()> {
    let config = config::load_config(&config::config_path()).context("load config")?;
    let mut game = Snake::new(&config.snake, StdRng::from_entropy());
    engine::play(&mut game, &config)?;
    Ok(())
}
