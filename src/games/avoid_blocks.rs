use crossterm::event::{KeyCode, KeyEvent};
use rand::Rng;

use crate::config::AvoidBlocksConfig;
use crate::games::grid::{Cell, Grid, Pos};
use crate::games::Game;

/// Dodge blocks falling down the columns; the player lives on the bottom row.
pub struct AvoidBlocks<R: Rng> {
    rows: usize,
    cols: usize,
    player: usize,
    /// Row of the falling block in each column, if any.
    blocks: Vec<Option<usize>>,
    score: u32,
    fall_delay: u32,
    ticks_since_fall: u32,
    spawn_chance: f64,
    game_over: bool,
    rng: R,
}

impl<R: Rng> AvoidBlocks<R> {
    pub fn new(config: &AvoidBlocksConfig, rng: R) -> Self {
        Self {
            rows: config.rows,
            cols: config.cols,
            player: config.cols / 2,
            blocks: vec![None; config.cols],
            score: 0,
            fall_delay: config.fall_delay,
            ticks_since_fall: 0,
            spawn_chance: config.spawn_chance,
            game_over: false,
            rng,
        }
    }

    pub fn player(&self) -> usize {
        self.player
    }

    pub fn block(&self, col: usize) -> Option<usize> {
        self.blocks.get(col).copied().flatten()
    }

    #[cfg(test)]
    pub(crate) fn drop_block_at(&mut self, col: usize, row: usize) {
        self.blocks[col] = Some(row);
    }

    fn player_row(&self) -> usize {
        self.rows - 1
    }

    fn move_left(&mut self) {
        self.player = self.player.saturating_sub(1);
    }

    fn move_right(&mut self) {
        if self.player + 1 < self.cols {
            self.player += 1;
        }
    }

    /// Move every block one row down. A block entering the player row ends
    /// the game in the player's column and vanishes anywhere else.
    fn advance_blocks(&mut self) {
        let player_row = self.player_row();
        for col in 0..self.cols {
            let Some(row) = self.blocks[col] else {
                continue;
            };
            let next = row + 1;
            if next < player_row {
                self.blocks[col] = Some(next);
            } else if col == self.player {
                self.blocks[col] = Some(player_row);
                self.game_over = true;
            } else {
                self.blocks[col] = None;
            }
        }
    }

    fn spawn_blocks(&mut self) {
        for col in 0..self.cols {
            if self.rng.gen_bool(self.spawn_chance) && self.blocks[col].is_none() {
                self.blocks[col] = Some(0);
            }
        }
    }
}

impl<R: Rng> Game for AvoidBlocks<R> {
    fn title(&self) -> &'static str {
        "Avoid Blocks"
    }

    fn help(&self) -> &'static str {
        " a/d Move │ q Quit"
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.game_over {
            return;
        }
        match key.code {
            KeyCode::Char('a') | KeyCode::Left => self.move_left(),
            KeyCode::Char('d') | KeyCode::Right => self.move_right(),
            _ => {}
        }
    }

    fn step(&mut self) {
        if self.game_over {
            return;
        }
        self.ticks_since_fall += 1;
        if self.ticks_since_fall < self.fall_delay {
            return;
        }
        self.ticks_since_fall = 0;

        self.advance_blocks();
        if self.game_over {
            return;
        }
        self.spawn_blocks();
        self.score += 1;
    }

    fn grid(&self) -> Grid {
        let mut grid = Grid::new(self.rows, self.cols);
        for (col, row) in self.blocks.iter().enumerate() {
            if let Some(row) = row {
                grid.set(Pos::new(*row, col), Cell::Obstacle);
            }
        }
        grid.set(Pos::new(self.player_row(), self.player), Cell::Actor);
        grid
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn is_over(&self) -> bool {
        self.game_over
    }

    fn farewell(&self) -> String {
        format!("Game over! Your final score: {}", self.score)
    }
}
