use crate::app::input_handler::Focus;
use crate::ui::Panel;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, panel: &Panel) {
    let theme = panel.theme;
    let active = panel.view.focus == Focus::Search;
    let color = if active { theme.accent } else { theme.overlay };

    let text = if active {
        format!("{}▏", panel.view.search)
    } else if !panel.view.search.is_empty() {
        panel.view.search.clone()
    } else {
        format!("Press {} to search...", panel.keys.display(&panel.keys.focus_search))
    };

    let mut spans = vec![
        Span::styled(" 🔍 ", Style::default().fg(color)),
        Span::styled(text, Style::default().fg(if active { theme.text } else { theme.overlay })),
    ];
    if let Some(glyph) = panel.session.spinner_glyph() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(glyph, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(Color::Reset));
    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Left).block(block), area);
}
