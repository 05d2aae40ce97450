//! Scoped terminal setup.
//!
//! Raw mode and the alternate screen are held by guard values; dropping them
//! restores the terminal on every exit path, unwinding included.

use std::io::{self, Stdout};
use std::mem::MaybeUninit;
use std::os::fd::RawFd;

use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::warn;

use crate::error::{ArcadeError, Result};

pub type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Non-canonical, no-echo input for as long as the value lives.
pub struct RawMode {
    _private: (),
}

impl RawMode {
    pub fn enable() -> Result<Self> {
        enable_raw_mode().map_err(ArcadeError::Terminal)?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!(err = %e, "failed to leave raw mode");
        }
    }
}

/// Terminal attributes captured once, reapplied after every child and on
/// drop.
///
/// crossterm saves the current mode each time raw mode is enabled. A game
/// that dies without leaving raw mode would otherwise become the launcher's
/// idea of the original terminal.
pub struct TermiosSnapshot {
    fd: RawFd,
    saved: libc::termios,
}

impl TermiosSnapshot {
    pub fn capture(fd: RawFd) -> io::Result<Self> {
        let mut saved = MaybeUninit::<libc::termios>::uninit();
        if unsafe { libc::tcgetattr(fd, saved.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(Self {
            fd,
            // Initialised by the successful `tcgetattr` above.
            saved: unsafe { saved.assume_init() },
        })
    }

    pub fn stdin() -> io::Result<Self> {
        Self::capture(libc::STDIN_FILENO)
    }

    pub fn restore(&self) -> io::Result<()> {
        if unsafe { libc::tcsetattr(self.fd, libc::TCSANOW, &self.saved) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Drop for TermiosSnapshot {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!(err = %e, "failed to restore terminal attributes");
        }
    }
}

/// Raw mode plus alternate screen and a ratatui terminal drawing into it.
pub struct TerminalSession {
    terminal: TuiTerminal,
    // Dropped after `Drop::drop` below has left the alternate screen.
    _raw: RawMode,
}

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        let raw = RawMode::enable()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide).map_err(ArcadeError::Terminal)?;
        let guard = AlternateScreen;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(ArcadeError::Terminal)?;
        terminal.clear().map_err(ArcadeError::Terminal)?;
        // The session's own Drop takes over from here.
        std::mem::forget(guard);
        Ok(Self {
            terminal,
            _raw: raw,
        })
    }

    pub fn terminal(&mut self) -> &mut TuiTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        ) {
            warn!(err = %e, "failed to restore screen");
        }
    }
}

/// Leaves the alternate screen if session setup fails half way.
struct AlternateScreen;

impl Drop for AlternateScreen {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::os::fd::AsRawFd;

    #[test]
    fn restore_undoes_raw_mode_left_behind() {
        let pty = pty::open();
        let original = pty.lflag();
        assert!(!pty.is_raw());

        let snapshot = TermiosSnapshot::capture(pty.slave.as_raw_fd()).expect("capture");
        pty.make_raw();
        assert!(pty.is_raw());

        snapshot.restore().expect("restore");
        assert_eq!(pty.lflag(), original);
    }

    #[test]
    fn dropping_the_snapshot_restores() {
        let pty = pty::open();
        let original = pty.lflag();
        {
            let _snapshot = TermiosSnapshot::capture(pty.slave.as_raw_fd()).expect("capture");
            pty.make_raw();
        }
        assert_eq!(pty.lflag(), original);
    }

    #[test]
    fn capture_fails_off_a_terminal() {
        let file = tempfile::tempfile().expect("tempfile");
        assert!(TermiosSnapshot::capture(file.as_raw_fd()).is_err());
    }
}
