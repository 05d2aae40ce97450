//! Fixed-rate game loop shared by every game binary.
//!
//! One tick: redraw, take at most one pending key without blocking, advance
//! the simulation, then sleep whatever is left of the tick.

use std::sync::atomic::AtomicBool;
use std::thread::sleep;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::backend::Backend;
use ratatui::Terminal;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{ArcadeError, Result};
use crate::event::{is_ctrl_c, KeySource, TerminalKeys};
use crate::games::Game;
use crate::signals;
use crate::terminal::TerminalSession;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    GameOver,
    Interrupted,
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) || is_ctrl_c(key)
}

/// Run one tick without drawing or sleeping.
pub fn tick<G, K>(game: &mut G, keys: &mut K, interrupt: &AtomicBool) -> Result<Option<Exit>>
where
    G: Game + ?Sized,
    K: KeySource,
{
    if signals::is_set(interrupt) {
        return Ok(Some(Exit::Interrupted));
    }

    if let Some(key) = keys
        .next_key(Duration::ZERO)
        .map_err(ArcadeError::Terminal)?
    {
        if is_quit(&key) {
            return Ok(Some(Exit::Quit));
        }
        game.handle_key(key);
    }

    game.step();
    if game.is_over() {
        return Ok(Some(Exit::GameOver));
    }
    Ok(None)
}

/// Drive `game` until it quits, ends, or an interruption is flagged.
pub fn run<G, B, K>(
    game: &mut G,
    terminal: &mut Terminal<B>,
    keys: &mut K,
    interrupt: &AtomicBool,
    tick_len: Duration,
) -> Result<Exit>
where
    G: Game + ?Sized,
    B: Backend,
    K: KeySource,
{
    let mut ticks: u64 = 0;
    loop {
        let started = Instant::now();
        terminal
            .draw(|frame| {
                let area = frame.area();
                game.render(frame, area);
            })
            .map_err(ArcadeError::Terminal)?;

        if let Some(exit) = tick(game, keys, interrupt)? {
            debug!(ticks, ?exit, "game loop finished");
            return Ok(exit);
        }
        ticks += 1;

        sleep(tick_len.saturating_sub(started.elapsed()));
    }
}

/// Entry point for a game binary: set up signals and the terminal, play,
/// restore the terminal, then print the final status line.
pub fn play<G: Game>(game: &mut G, config: &Config) -> Result<Exit> {
    signals::install().map_err(ArcadeError::Signal)?;
    info!(game = game.title(), "starting");

    let exit = {
        let mut session = TerminalSession::enter()?;
        run(
            game,
            session.terminal(),
            &mut TerminalKeys,
            signals::flag(),
            config.tick(),
        )?
    };

    info!(game = game.title(), ?exit, score = game.score(), "finished");
    println!("{}", game.farewell());
    Ok(exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AvoidBlocksConfig, SnakeConfig};
    use crate::event::ScriptedKeys;
    use crate::games::avoid_blocks::AvoidBlocks;
    use crate::games::grid::Cell;
    use crate::games::snake::Snake;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ratatui::backend::TestBackend;

    fn quiet_blocks() -> AvoidBlocks<StdRng> {
        let config = AvoidBlocksConfig {
            spawn_chance: 0.0,
            ..AvoidBlocksConfig::default()
        };
        AvoidBlocks::new(&config, StdRng::seed_from_u64(9))
    }

    #[test]
    fn one_key_per_tick() {
        let mut game = quiet_blocks();
        let mut keys = ScriptedKeys::chars("aa");
        let flag = AtomicBool::new(false);

        assert_eq!(tick(&mut game, &mut keys, &flag).expect("tick"), None);
        assert_eq!(game.player(), 2);
        assert_eq!(tick(&mut game, &mut keys, &flag).expect("tick"), None);
        assert_eq!(game.player(), 1);
        assert!(keys.is_empty());
    }

    #[test]
    fn quit_key_stops_before_stepping() {
        let mut game = Snake::new(&SnakeConfig::default(), StdRng::seed_from_u64(1));
        let head = game.head();
        let mut keys = ScriptedKeys::chars("q");
        let flag = AtomicBool::new(false);

        let exit = tick(&mut game, &mut keys, &flag).expect("tick");
        assert_eq!(exit, Some(Exit::Quit));
        assert_eq!(game.head(), head);
    }

    #[test]
    fn interrupt_wins_over_pending_input() {
        let mut game = quiet_blocks();
        let mut keys = ScriptedKeys::chars("a");
        let flag = AtomicBool::new(true);

        let exit = tick(&mut game, &mut keys, &flag).expect("tick");
        assert_eq!(exit, Some(Exit::Interrupted));
        assert_eq!(game.player(), 3);
    }

    #[test]
    fn snake_buffers_direction_until_next_step() {
        let mut game = Snake::new(&SnakeConfig::default(), StdRng::seed_from_u64(2));
        let start = game.head();
        let mut keys = ScriptedKeys::new([None, Some(crate::event::press(KeyCode::Char('d')))]);
        let flag = AtomicBool::new(false);

        tick(&mut game, &mut keys, &flag).expect("tick");
        assert_eq!(game.head().row, start.row - 1);
        tick(&mut game, &mut keys, &flag).expect("tick");
        assert_eq!(game.head().col, start.col + 1);
    }

    #[test]
    fn run_ends_on_collision_and_draws_the_board() {
        let mut game = quiet_blocks();
        game.drop_block_at(game.player(), 13);
        let mut keys = ScriptedKeys::new([]);
        let flag = AtomicBool::new(false);
        let mut terminal = Terminal::new(TestBackend::new(40, 24)).expect("terminal");

        let exit = run(&mut game, &mut terminal, &mut keys, &flag, Duration::ZERO).expect("run");
        assert_eq!(exit, Exit::GameOver);
        assert_eq!(game.grid().count(Cell::Actor), 1);

        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains("Avoid Blocks"));
    }

    #[test]
    fn run_returns_interrupted_when_flag_is_set() {
        let mut game = Snake::new(&SnakeConfig::default(), StdRng::seed_from_u64(4));
        let mut keys = ScriptedKeys::new([]);
        let flag = AtomicBool::new(true);
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).expect("terminal");

        let exit = run(&mut game, &mut terminal, &mut keys, &flag, Duration::ZERO).expect("run");
        assert_eq!(exit, Exit::Interrupted);
    }
}
