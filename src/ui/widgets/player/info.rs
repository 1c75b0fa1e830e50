use crate::ui::utils::truncate;
use crate::ui::Panel;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, panel: &Panel) {
    let theme = panel.theme;
    let max_width = area.width.saturating_sub(4) as usize;

    let lines = match panel.session.now_playing() {
        Some(track) => vec![
            Line::from(Span::styled(
                format!("🎵 {}", truncate(&track.title, max_width)),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::raw("🎤 "),
                Span::styled(truncate(&track.artist, max_width), Style::default().fg(theme.muted)),
            ]),
        ],
        None => vec![Line::from(Span::styled(
            "Search for a song to start",
            Style::default().fg(theme.overlay),
        ))],
    };

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
