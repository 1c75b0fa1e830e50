use crate::player::PlayerState;
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

    let play_icon = if panel.session.player_state() == PlayerState::Playing {
        "⏸"
    } else {
        "▶"
    };
    let btn_style = if panel.session.playback().is_some() {
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.overlay)
    };

    let line = Line::from(vec![
        Span::styled("   ⏮   ", btn_style),
        Span::raw("   "),
        Span::styled(format!("   {}   ", play_icon), btn_style),
        Span::raw("   "),
        Span::styled("   ⏭   ", btn_style),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
