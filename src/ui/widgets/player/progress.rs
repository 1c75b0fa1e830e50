use crate::ui::Panel;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

pub fn render_progress(f: &mut Frame, area: Rect, panel: &Panel) {
    let theme = panel.theme;

    let Some(playback) = panel.session.playback() else {
        return;
    };

    let gauge_area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Percentage(80),
            Constraint::Percentage(10),
        ])
        .split(area)[1];

    let width = gauge_area.width as usize;
    let occupied = (width as f64 * playback.fraction.clamp(0.0, 1.0)) as usize;
    let fill_style = Style::default().fg(theme.accent);
    let empty_style = Style::default().fg(theme.surface);

    let bar_spans: Vec<Span> = (0..width)
        .map(|i| {
            if i < occupied {
                if i == occupied - 1 {
                    // Playhead knob
                    Span::styled("●", fill_style)
                } else {
                    Span::styled("━", fill_style)
                }
            } else {
                Span::styled("─", empty_style)
            }
        })
        .collect();

    let gauge = Paragraph::new(Line::from(bar_spans))
        .alignment(Alignment::Left)
        .block(Block::default().style(Style::default().bg(Color::Reset)));
    f.render_widget(gauge, gauge_area);
}

pub fn render_time(f: &mut Frame, area: Rect, panel: &Panel) {
    let theme = panel.theme;
    if let Some(playback) = panel.session.playback() {
        let label = Paragraph::new(format!("{} / {}", playback.elapsed_label, playback.total_label))
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.overlay));
        f.render_widget(label, area);
    }
}
