use crate::app::state::ResultMode;
use crate::ui::utils::truncate;
use crate::ui::Panel;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Tab bar with filled dot for the active view
pub fn render(f: &mut Frame, area: Rect, panel: &Panel) {
    let theme = panel.theme;
    let active = &panel.session.results().mode;

    let mut modes = vec![ResultMode::Search];
    modes.extend(panel.session.tabs());

    let mut spans = Vec::new();
    for mode in &modes {
        let is_active = mode == active;
        let color = match mode {
            ResultMode::Search => theme.accent,
            ResultMode::Liked => theme.liked,
            ResultMode::Playlist(_) => theme.playing,
        };
        let style = if is_active {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(if is_active { "● " } else { "○ " }, style));
        spans.push(Span::styled(truncate(mode.label(), 16), style));
        spans.push(Span::raw("   "));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}
