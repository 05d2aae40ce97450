//! Development-time tracing.
//!
//! The terminal belongs to the TUI while a game or the menu is on screen, so
//! diagnostics are best sent to a file: set `TERMARCADE_LOG=/tmp/arcade.log`.
//! Without it, output goes to stderr and is only readable once the screen is
//! restored.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_ENV: &str = "TERMARCADE_LOG";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset.
///
/// # Example
/// ```bash
/// TERMARCADE_LOG=arcade.log RUST_LOG=arcade=debug ./main_screen
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file = std::env::var_os(LOG_FILE_ENV).and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });
    let ansi = file.is_none();
    let writer = match file {
        Some(file) => BoxMakeWriter::new(Mutex::new(file)),
        None => BoxMakeWriter::new(std::io::stderr),
    };

    // A second init (tests, nested calls) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(ansi).compact())
        .try_init();
}
