pub mod avoid_blocks;
pub mod grid;
pub mod snake;

use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::*;

use grid::Grid;

/// A real-time grid game driven by [`crate::engine`].
///
/// The engine owns quitting; games only see the keys it does not consume.
pub trait Game {
    fn title(&self) -> &'static str;
    /// Key legend shown under the board.
    fn help(&self) -> &'static str;
    fn handle_key(&mut self, key: KeyEvent);
    /// Advance the simulation by one tick.
    fn step(&mut self);
    fn grid(&self) -> Grid;
    fn score(&self) -> u32;
    fn is_over(&self) -> bool;
    /// Status line printed once the terminal is restored.
    fn farewell(&self) -> String;

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(format!(" {} ", self.title()))
            .title_style(
                Style::default()
                    .fg(Color::Rgb(200, 120, 255))
                    .add_modifier(Modifier::BOLD),
            );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Status bar
                Constraint::Min(1),    // Board
                Constraint::Length(1), // Help
            ])
            .split(inner);

        let status = Line::from(vec![Span::styled(
            format!(" Score: {} ", self.score()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]);
        frame.render_widget(Paragraph::new(status), chunks[0]);
        frame.render_widget(Paragraph::new(self.grid().lines()), chunks[1]);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                self.help(),
                Style::default().fg(Color::DarkGray),
            ))),
            chunks[2],
        );
    }
}
