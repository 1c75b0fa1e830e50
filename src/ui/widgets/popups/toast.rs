use crate::app::state::Toast;
use crate::ui::Panel;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::time::Instant;

pub fn render(f: &mut Frame, panel: &Panel, toast: &Toast) {
    let theme = panel.theme;
    let now = Instant::now();

    let message = &toast.message;
    let width = (unicode_width::UnicodeWidthStr::width(message.as_str()) as u16 + 6)
        .min(f.area().width.saturating_sub(4));
    let height = 3;
    let mut x = f.area().width.saturating_sub(width + 1); // Top-right fixed

    let entrance_elapsed = now.duration_since(toast.start_time).as_millis();
    let time_remaining = toast.deadline.saturating_duration_since(now).as_millis();

    // Animation: Slide In/Out 🌊
    if entrance_elapsed < 300 {
        let t = entrance_elapsed as f32 / 300.0;
        let ease = 1.0 - (1.0 - t).powi(3); // Cubic Out
        x += (width as f32 * (1.0 - ease)) as u16;
    } else if time_remaining < 300 {
        let t = (300 - time_remaining) as f32 / 300.0;
        let ease = t.powi(3); // Cubic In
        x += (width as f32 * ease) as u16;
    }

    if x >= f.area().width {
        return;
    }
    // Clip to screen bounds to avoid panic
    let area = Rect::new(x, 1, width, height).intersection(f.area());
    if area.is_empty() {
        return;
    }

    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(Color::Reset));
    let text = Paragraph::new(Line::from(vec![Span::styled(
        message.as_str(),
        Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    )]))
    .alignment(Alignment::Center)
    .block(block);
    f.render_widget(text, area);
}
