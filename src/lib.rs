//! Terminal grid games and the launcher that runs them.
//!
//! Each game is its own binary (`game_*`) driven by [`engine`]. The
//! `main_screen` binary discovers those binaries and supervises whichever one
//! the player picks.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod exit_codes;
pub mod games;
pub mod launcher;
pub mod logging;
pub mod signals;
pub mod terminal;

pub use error::{ArcadeError, Result};
