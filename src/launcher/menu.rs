use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, info};

use crate::error::{ArcadeError, Result};
use crate::event::is_ctrl_c;

/// A discovered game executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// File name, e.g. `game_snake`.
    pub file_name: String,
    /// Name shown in the menu, e.g. `snake`.
    pub display_name: String,
    pub path: PathBuf,
}

/// List executables in `dir` whose name starts with `prefix`.
///
/// Results are sorted by file name and capped at `capacity`. An empty result
/// is an error: there is nothing to launch.
pub fn discover(dir: &Path, prefix: &str, capacity: usize) -> Result<Vec<Entry>> {
    let scan_err = |source| ArcadeError::ScanDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for item in fs::read_dir(dir).map_err(scan_err)? {
        let item = item.map_err(scan_err)?;
        let Ok(file_name) = item.file_name().into_string() else {
            continue;
        };
        let Some(display_name) = file_name.strip_prefix(prefix) else {
            continue;
        };
        if display_name.is_empty() {
            continue;
        }
        // Follows symlinks, so a linked game binary counts.
        let Ok(meta) = fs::metadata(item.path()) else {
            continue;
        };
        if !meta.is_file() || meta.permissions().mode() & 0o111 == 0 {
            debug!(file = %file_name, "skipping non-executable candidate");
            continue;
        }
        entries.push(Entry {
            display_name: display_name.to_string(),
            path: item.path(),
            file_name,
        });
    }

    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    entries.truncate(capacity);

    if entries.is_empty() {
        return Err(ArcadeError::NoGames {
            dir: dir.to_path_buf(),
        });
    }
    info!(count = entries.len(), dir = %dir.display(), "games discovered");
    Ok(entries)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    None,
    Launch(Entry),
    Quit,
}

/// Game selection plus the separate "Exit" button.
#[derive(Debug, Clone)]
pub struct Menu {
    games: Vec<Entry>,
    selected: usize,
    exit_selected: bool,
    /// Shown under the menu, e.g. the last game's exit status.
    pub status: Option<String>,
}

impl Menu {
    /// `games` must not be empty; use [`discover`] to build it.
    pub fn new(games: Vec<Entry>) -> Self {
        debug_assert!(!games.is_empty());
        Self {
            games,
            selected: 0,
            exit_selected: false,
            status: None,
        }
    }

    pub fn games(&self) -> &[Entry] {
        &self.games
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_game(&self) -> &Entry {
        &self.games[self.selected]
    }

    pub fn exit_selected(&self) -> bool {
        self.exit_selected
    }

    /// Cycle forward; no-op while Exit is selected.
    pub fn select_next(&mut self) {
        if !self.exit_selected {
            self.selected = (self.selected + 1) % self.games.len();
        }
    }

    /// Cycle backward; no-op while Exit is selected.
    pub fn select_prev(&mut self) {
        if !self.exit_selected {
            let len = self.games.len();
            self.selected = (self.selected + len - 1) % len;
        }
    }

    pub fn toggle_exit(&mut self) {
        self.exit_selected = !self.exit_selected;
    }

    pub fn confirm(&self) -> MenuAction {
        if self.exit_selected {
            MenuAction::Quit
        } else {
            MenuAction::Launch(self.selected_game().clone())
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> MenuAction {
        if is_ctrl_c(&key) {
            return MenuAction::Quit;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.exit_selected = true;
                return self.confirm();
            }
            KeyCode::Char('w') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('s') | KeyCode::Down => self.select_next(),
            KeyCode::Char('a') | KeyCode::Char('d') | KeyCode::Left | KeyCode::Right => {
                self.toggle_exit()
            }
            KeyCode::Enter => return self.confirm(),
            _ => {}
        }
        MenuAction::None
    }
}
