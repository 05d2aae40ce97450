#[cfg(test)]
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Source of key presses for the game loop and the menu.
pub trait KeySource {
    /// Returns the next pending key press, waiting at most `timeout`.
    ///
    /// A zero timeout never blocks.
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>>;
}

/// Reads key presses from the controlling terminal.
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self, timeout: Duration) -> io::Result<Option<KeyEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
            _ => Ok(None),
        }
    }
}

/// Replays a fixed list of keys, one per call.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedKeys {
    keys: VecDeque<Option<KeyEvent>>,
}

#[cfg(test)]
impl ScriptedKeys {
    /// Each entry is delivered on its own call; `None` is an idle poll.
    pub fn new(keys: impl IntoIterator<Item = Option<KeyEvent>>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    pub fn chars(chars: &str) -> Self {
        Self::new(chars.chars().map(|c| Some(press(KeyCode::Char(c)))))
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
impl KeySource for ScriptedKeys {
    fn next_key(&mut self, _timeout: Duration) -> io::Result<Option<KeyEvent>> {
        Ok(self.keys.pop_front().flatten())
    }
}

#[cfg(test)]
pub fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Raw mode turns Ctrl+C into an ordinary key press.
pub fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}
