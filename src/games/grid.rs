use ratatui::prelude::*;

/// Grid coordinate, row first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Actor,
    Body,
    Obstacle,
    Bait,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Actor => 'O',
            Cell::Body => '#',
            Cell::Obstacle => '#',
            Cell::Bait => 'X',
        }
    }

    fn style(self) -> Style {
        match self {
            Cell::Empty => Style::default().fg(Color::Rgb(70, 70, 90)),
            Cell::Actor => Style::default()
                .fg(Color::Rgb(255, 220, 80))
                .add_modifier(Modifier::BOLD),
            Cell::Body => Style::default().fg(Color::Rgb(80, 220, 80)),
            Cell::Obstacle => Style::default().fg(Color::Rgb(220, 80, 80)),
            Cell::Bait => Style::default()
                .fg(Color::Rgb(80, 200, 255))
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// Fixed-size snapshot of a game board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Empty; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[cfg(test)]
    pub fn get(&self, pos: Pos) -> Option<Cell> {
        self.contains(pos)
            .then(|| self.cells[pos.row * self.cols + pos.col])
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Pos, cell: Cell) {
        if self.contains(pos) {
            self.cells[pos.row * self.cols + pos.col] = cell;
        }
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|c| **c == cell).count()
    }

    /// One styled line per row, cells separated by a space.
    pub fn lines(&self) -> Vec<Line<'static>> {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| {
                let spans: Vec<Span<'static>> = row
                    .iter()
                    .map(|cell| Span::styled(format!("{} ", cell.symbol()), cell.style()))
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    /// Plain-text rows, handy for assertions.
    #[cfg(test)]
    pub fn rows_text(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols.max(1))
            .map(|row| row.iter().map(|c| c.symbol()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_respect_bounds() {
        let mut grid = Grid::new(3, 2);
        grid.set(Pos::new(2, 1), Cell::Actor);
        grid.set(Pos::new(3, 0), Cell::Bait);
        assert_eq!(grid.get(Pos::new(2, 1)), Some(Cell::Actor));
        assert_eq!(grid.get(Pos::new(3, 0)), None);
        assert_eq!(grid.count(Cell::Bait), 0);
    }

    #[test]
    fn text_rows() {
        let mut grid = Grid::new(2, 3);
        grid.set(Pos::new(0, 0), Cell::Obstacle);
        grid.set(Pos::new(1, 2), Cell::Actor);
        assert_eq!(grid.rows_text(), vec!["#..", "..O"]);
        assert_eq!(grid.lines().len(), 2);
    }
}
