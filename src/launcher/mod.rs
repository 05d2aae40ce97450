//! The main screen: pick a game, run it as a child process, come back.
//!
//! Each menu phase lives inside its own [`TerminalSession`]. The session is
//! dropped, and the terminal restored, before a game is started; a fresh one
//! is entered once the game is gone.

pub mod menu;
pub mod supervisor;
pub mod ui;

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::Terminal;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{ArcadeError, Result};
use crate::event::{KeySource, TerminalKeys};
use crate::signals;
use crate::terminal::{TerminalSession, TermiosSnapshot};
use menu::{Entry, Menu, MenuAction};
use supervisor::{is_exec_failure, ChildExit, Supervisor};

/// Result of one browsing phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Browse {
    Launch(Entry),
    Quit,
}

/// Show the menu until the user picks a game or leaves.
///
/// An interruption while browsing ends the launcher.
pub fn browse<B, K>(
    menu: &mut Menu,
    terminal: &mut Terminal<B>,
    keys: &mut K,
    interrupt: &AtomicBool,
    tick: Duration,
) -> Result<Browse>
where
    B: Backend,
    K: KeySource,
{
    loop {
        if signals::take(interrupt) {
            info!("interrupted while browsing");
            return Ok(Browse::Quit);
        }

        terminal
            .draw(|frame| {
                let area = frame.area();
                ui::render(frame, area, menu);
            })
            .map_err(ArcadeError::Terminal)?;

        let Some(key) = keys.next_key(tick).map_err(ArcadeError::Terminal)? else {
            continue;
        };
        match menu.handle_key(key) {
            MenuAction::None => {}
            MenuAction::Launch(entry) => return Ok(Browse::Launch(entry)),
            MenuAction::Quit => return Ok(Browse::Quit),
        }
    }
}

/// Wait for the running game, then put the terminal back the way the
/// launcher found it, whatever mode the game left behind.
pub fn wait_for_game(
    supervisor: &mut Supervisor,
    termios: &TermiosSnapshot,
    interrupt: &AtomicBool,
) -> Result<Option<ChildExit>> {
    let outcome = supervisor.wait(interrupt);
    termios.restore().map_err(ArcadeError::Terminal)?;
    outcome
}

/// Run the launcher against the games found in `dir`.
pub fn run(config: &Config, dir: &Path) -> Result<()> {
    let games = menu::discover(dir, &config.launcher.prefix, config.launcher.max_games)?;
    signals::install().map_err(ArcadeError::Signal)?;

    let mut menu = Menu::new(games);
    let mut supervisor = Supervisor::new(Duration::from_millis(config.launcher.wait_poll_ms));
    let interrupt = signals::flag();
    // Captured before any session, so it is the mode the user started with.
    let termios = TermiosSnapshot::stdin().map_err(ArcadeError::Terminal)?;

    loop {
        let choice = {
            let mut session = TerminalSession::enter()?;
            browse(
                &mut menu,
                session.terminal(),
                &mut TerminalKeys,
                interrupt,
                config.tick(),
            )?
        };

        let entry = match choice {
            Browse::Quit => {
                info!("leaving main screen");
                println!("Exiting main menu gracefully...");
                return Ok(());
            }
            Browse::Launch(entry) => entry,
        };

        if let Err(err) = supervisor.launch(&entry) {
            if !is_exec_failure(&err) {
                return Err(err);
            }
            warn!(game = %entry.display_name, err = %err, "game could not be started");
            menu.status = Some(format!("Failed to launch game: {err}"));
            continue;
        }

        if let Some(outcome) = wait_for_game(&mut supervisor, &termios, interrupt)? {
            info!(game = %entry.display_name, ?outcome, "back to main screen");
            menu.status = Some(outcome.describe(&entry.display_name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{press, ScriptedKeys};
    use crossterm::event::KeyCode;
    use crate::terminal::pty;
    use ratatui::backend::TestBackend;
    use std::os::fd::AsRawFd;
    use std::path::PathBuf;
    use std::process::{Command, Stdio};
    use std::time::Instant;

    fn menu() -> Menu {
        Menu::new(
            ["avoid_blocks", "snake"]
                .iter()
                .map(|name| Entry {
                    file_name: format!("game_{name}"),
                    display_name: name.to_string(),
                    path: PathBuf::from(format!("./game_{name}")),
                })
                .collect(),
        )
    }

    fn terminal() -> Terminal<TestBackend> {
        Terminal::new(TestBackend::new(60, 16)).expect("terminal")
    }

    #[test]
    fn enter_picks_the_highlighted_game() {
        let mut menu = menu();
        let mut keys = ScriptedKeys::new([
            None,
            Some(press(KeyCode::Char('s'))),
            Some(press(KeyCode::Enter)),
        ]);
        let flag = AtomicBool::new(false);

        let choice = browse(&mut menu, &mut terminal(), &mut keys, &flag, Duration::ZERO)
            .expect("browse");
        match choice {
            Browse::Launch(entry) => assert_eq!(entry.display_name, "snake"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn exit_button_quits() {
        let mut menu = menu();
        let mut keys = ScriptedKeys::new([
            Some(press(KeyCode::Char('a'))),
            Some(press(KeyCode::Enter)),
        ]);
        let flag = AtomicBool::new(false);

        let choice = browse(&mut menu, &mut terminal(), &mut keys, &flag, Duration::ZERO)
            .expect("browse");
        assert_eq!(choice, Browse::Quit);
    }

    #[test]
    fn interruption_while_browsing_quits() {
        let mut menu = menu();
        let mut keys = ScriptedKeys::chars("s");
        let flag = AtomicBool::new(true);

        let choice = browse(&mut menu, &mut terminal(), &mut keys, &flag, Duration::ZERO)
            .expect("browse");
        assert_eq!(choice, Browse::Quit);
        assert_eq!(menu.selected(), 0);
        assert!(!signals::is_set(&flag));
    }

    #[test]
    fn menu_screen_shows_games_and_status() {
        let mut menu = menu();
        menu.status = Some("snake finished.".to_string());
        let mut keys = ScriptedKeys::chars("q");
        let flag = AtomicBool::new(false);
        let mut terminal = terminal();

        browse(&mut menu, &mut terminal, &mut keys, &flag, Duration::ZERO).expect("browse");

        let screen = format!("{:?}", terminal.backend().buffer());
        assert!(screen.contains("avoid_blocks"));
        assert!(screen.contains("snake finished."));
        assert!(screen.contains("Exit"));
    }

    fn game_on(pty: &pty::Pty, script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(script)
            .stdin(Stdio::from(pty.slave.try_clone().expect("dup slave")))
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }

    #[test]
    fn cancelled_game_does_not_leave_raw_mode_behind() {
        let pty = pty::open();
        let original = pty.lflag();
        let termios = TermiosSnapshot::capture(pty.slave.as_raw_fd()).expect("capture");
        let mut supervisor = Supervisor::new(Duration::from_millis(10));
        let flag = AtomicBool::new(false);

        supervisor
            .launch_command("raw", game_on(&pty, "trap '' TERM; stty raw -echo; exec sleep 30"))
            .expect("launch");
        let deadline = Instant::now() + Duration::from_secs(5);
        while !pty.is_raw() {
            assert!(Instant::now() < deadline, "game never entered raw mode");
            std::thread::sleep(Duration::from_millis(10));
        }

        flag.store(true, std::sync::atomic::Ordering::SeqCst);
        let outcome = wait_for_game(&mut supervisor, &termios, &flag).expect("wait");

        assert_eq!(outcome, Some(ChildExit::Interrupted));
        assert_eq!(pty.lflag(), original);
        assert!(!pty.is_raw());
    }

    #[test]
    fn finished_game_does_not_leave_raw_mode_behind() {
        let pty = pty::open();
        let original = pty.lflag();
        let termios = TermiosSnapshot::capture(pty.slave.as_raw_fd()).expect("capture");
        let mut supervisor = Supervisor::new(Duration::from_millis(10));
        let flag = AtomicBool::new(false);

        supervisor
            .launch_command("raw", game_on(&pty, "stty raw -echo"))
            .expect("launch");
        let outcome = wait_for_game(&mut supervisor, &termios, &flag)
            .expect("wait")
            .expect("child");

        match outcome {
            ChildExit::Exited(status) => assert!(status.success()),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(pty.lflag(), original);
    }
}
