use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::launcher::menu::Menu;

const HIGHLIGHT: Color = Color::Rgb(255, 220, 80);
const DIM: Color = Color::Rgb(100, 100, 130);

pub fn render(frame: &mut Frame, area: Rect, menu: &Menu) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .border_type(BorderType::Rounded)
        .title(" Welcome to main-screen ")
        .title_style(
            Style::default()
                .fg(Color::Rgb(200, 120, 255))
                .add_modifier(Modifier::BOLD),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let games = menu.games().len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),         // Spacer
            Constraint::Length(games + 2), // Game list + Exit
            Constraint::Length(1),         // Status
            Constraint::Min(0),            // Spacer
            Constraint::Length(3),         // Help
        ])
        .split(inner);

    let (list_area, exit_area) = {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(20), Constraint::Length(14)])
            .split(chunks[1]);
        (cols[0], cols[1])
    };

    let mut lines: Vec<Line> = Vec::new();
    for (i, game) in menu.games().iter().enumerate() {
        let current = i == menu.selected();
        let line = if current && !menu.exit_selected() {
            Line::from(vec![
                Span::styled("  Game: > ", Style::default().fg(HIGHLIGHT)),
                Span::styled(
                    game.display_name.clone(),
                    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" <", Style::default().fg(HIGHLIGHT)),
            ])
        } else if current {
            Line::from(vec![
                Span::styled("  Game:   ", Style::default().fg(Color::Gray)),
                Span::styled(game.display_name.clone(), Style::default().fg(Color::Gray)),
            ])
        } else {
            Line::from(Span::styled(
                format!("          {}", game.display_name),
                Style::default().fg(DIM),
            ))
        };
        lines.push(line);
    }
    frame.render_widget(Paragraph::new(lines), list_area);

    let exit = if menu.exit_selected() {
        Span::styled(
            "> Exit <",
            Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("  Exit", Style::default().fg(Color::Gray))
    };
    frame.render_widget(Paragraph::new(Line::from(exit)), exit_area);

    if let Some(status) = &menu.status {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!("  {status}"),
                Style::default().fg(Color::Rgb(255, 160, 60)),
            ))),
            chunks[2],
        );
    }

    let help = Paragraph::new(vec![
        Line::from(Span::styled(
            "Use 'w' and 's' to change game.",
            Style::default().fg(DIM),
        )),
        Line::from(Span::styled(
            "Use 'a' and 'd' to select Exit.",
            Style::default().fg(DIM),
        )),
        Line::from(Span::styled(
            "Press 'Enter' to confirm.",
            Style::default().fg(DIM),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[4]);
}
