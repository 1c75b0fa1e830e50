use crate::ui::utils::centered;
use crate::ui::Panel;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, panel: &Panel, title: &str, value: &str) {
    let theme = panel.theme;
    let area = centered(f.area(), 60.min(f.area().width.saturating_sub(4)), 5);
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" > ", Style::default().fg(theme.playing).add_modifier(Modifier::BOLD)),
            Span::styled(value, Style::default().fg(theme.text)),
            Span::styled("▌", Style::default().fg(theme.playing).add_modifier(Modifier::SLOW_BLINK)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent))
        .title(format!(" {} ", title))
        .title_alignment(Alignment::Left)
        .style(Style::default().bg(Color::Reset));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_confirm(f: &mut Frame, panel: &Panel, name: &str) {
    let theme = panel.theme;
    let area = centered(f.area(), 50.min(f.area().width.saturating_sub(4)), 5);
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Delete ", Style::default().fg(theme.text)),
            Span::styled(format!("\"{}\"", name), Style::default().fg(theme.warning).add_modifier(Modifier::BOLD)),
            Span::styled("?  y / n", Style::default().fg(theme.text)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.warning))
        .title(" Delete playlist ")
        .style(Style::default().bg(Color::Reset));
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), area);
}
