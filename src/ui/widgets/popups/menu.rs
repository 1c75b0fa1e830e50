use crate::ui::utils::{centered, truncate};
use crate::ui::Panel;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

/// Per-row overflow menu
pub fn render(f: &mut Frame, panel: &Panel, row: usize, cursor: usize) {
    let theme = panel.theme;
    let Some(song) = panel.session.rows().get(row).map(|r| &r.song) else {
        return;
    };
    let actions = panel.session.menu();

    let area = centered(f.area(), 36, actions.len() as u16 + 2);
    f.render_widget(Clear, area);

    let lines: Vec<Line> = actions
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let style = if i == cursor {
                Style::default().fg(theme.base).bg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(Span::styled(format!(" {} ", action.label()), style))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent))
        .title(format!(" {} ", truncate(&song.name, 28)))
        .style(Style::default().bg(Color::Reset));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
