use crate::ui::Panel;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders},
    Frame,
};

pub mod art;
pub mod controls;
pub mod info;
pub mod progress;

pub fn render(f: &mut Frame, area: Rect, panel: &Panel) {
    let theme = panel.theme;

    // --- MUSIC CARD ---
    let music_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Line::from(vec![Span::styled(
            " Now Playing ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )]))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(Color::Reset));

    let inner = music_block.inner(area);
    f.render_widget(music_block, area);

    // Cover is square in pixels: two columns per text row
    let art_width = if inner.height >= 6 { inner.height * 2 } else { 0 };
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(art_width), Constraint::Min(0)])
        .split(inner);

    if art_width > 0 {
        art::render(f, columns[0], panel);
    }

    // Elastic stack: Info > Gauge > Time > Controls, padding takes the rest
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // 0: Padding
            Constraint::Length(2), // 1: Info
            Constraint::Length(1), // 2: Gauge
            Constraint::Length(1), // 3: Time
            Constraint::Length(1), // 4: Controls
        ])
        .split(columns[1]);

    info::render(f, rows[1], panel);
    progress::render_progress(f, rows[2], panel);
    progress::render_time(f, rows[3], panel);
    controls::render(f, rows[4], panel);
}
