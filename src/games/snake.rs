use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent};
use rand::Rng;
use tracing::debug;

use crate::config::SnakeConfig;
use crate::games::grid::{Cell, Grid, Pos};
use crate::games::Game;

use Direction::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Moved,
    Ate,
    /// Wall or body in the way; nothing changed.
    Blocked,
}

pub struct Snake<R: Rng> {
    rows: usize,
    cols: usize,
    head: Pos,
    /// Trailing segments, most recent first.
    body: VecDeque<Pos>,
    direction: Direction,
    bait: Option<Pos>,
    eaten: u32,
    rng: R,
}

impl<R: Rng> Snake<R> {
    pub fn new(config: &SnakeConfig, rng: R) -> Self {
        let mut snake = Self {
            rows: config.rows,
            cols: config.cols,
            head: Pos::new(config.rows / 2, config.cols / 2),
            body: VecDeque::with_capacity(config.rows * config.cols),
            direction: Up,
            bait: None,
            eaten: 0,
            rng,
        };
        snake.bait = snake.place_bait();
        snake
    }

    pub fn head(&self) -> Pos {
        self.head
    }

    pub fn body(&self) -> impl Iterator<Item = Pos> + '_ {
        self.body.iter().copied()
    }

    /// Head plus body segments.
    pub fn len(&self) -> usize {
        self.body.len() + 1
    }

    pub fn bait(&self) -> Option<Pos> {
        self.bait
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Buffer a direction for the next step. Reversing is allowed; the body
    /// check in `move_step` rejects it once there is a body to hit.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    fn occupied(&self, pos: Pos) -> bool {
        pos == self.head || self.body.contains(&pos)
    }

    fn candidate(&self) -> Option<Pos> {
        let Pos { row, col } = self.head;
        let next = match self.direction {
            Up => Pos::new(row.checked_sub(1)?, col),
            Down => Pos::new(row + 1, col),
            Left => Pos::new(row, col.checked_sub(1)?),
            Right => Pos::new(row, col + 1),
        };
        (next.row < self.rows && next.col < self.cols).then_some(next)
    }

    pub fn move_step(&mut self) -> MoveResult {
        let Some(next) = self.candidate() else {
            return MoveResult::Blocked;
        };
        if self.body.contains(&next) {
            return MoveResult::Blocked;
        }

        let ate = self.bait == Some(next);
        if self.body.is_empty() && !ate {
            self.head = next;
            return MoveResult::Moved;
        }

        self.body.push_front(self.head);
        self.head = next;
        if !ate {
            self.body.pop_back();
            return MoveResult::Moved;
        }

        self.eaten += 1;
        self.bait = self.place_bait();
        debug!(len = self.len(), bait = ?self.bait, "bait eaten");
        MoveResult::Ate
    }

    /// Uniformly random free cell, or `None` once the snake fills the board.
    fn place_bait(&mut self) -> Option<Pos> {
        if self.len() >= self.rows * self.cols {
            return None;
        }
        loop {
            let pos = Pos::new(
                self.rng.gen_range(0..self.rows),
                self.rng.gen_range(0..self.cols),
            );
            if !self.occupied(pos) {
                return Some(pos);
            }
        }
    }
}

impl<R: Rng> Game for Snake<R> {
    fn title(&self) -> &'static str {
        "Snake"
    }

    fn help(&self) -> &'static str {
        " w/a/s/d Steer │ q Quit"
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let direction = match key.code {
            KeyCode::Char('w') | KeyCode::Up => Up,
            KeyCode::Char('a') | KeyCode::Left => Left,
            KeyCode::Char('s') | KeyCode::Down => Down,
            KeyCode::Char('d') | KeyCode::Right => Right,
            _ => return,
        };
        self.set_direction(direction);
    }

    fn step(&mut self) {
        self.move_step();
    }

    fn grid(&self) -> Grid {
        let mut grid = Grid::new(self.rows, self.cols);
        if let Some(bait) = self.bait {
            grid.set(bait, Cell::Bait);
        }
        for pos in &self.body {
            grid.set(*pos, Cell::Body);
        }
        grid.set(self.head, Cell::Actor);
        grid
    }

    fn score(&self) -> u32 {
        self.eaten
    }

    fn is_over(&self) -> bool {
        false
    }

    fn farewell(&self) -> String {
        format!("Game exited gracefully. Length: {}", self.len())
    }
}
