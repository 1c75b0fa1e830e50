use crate::app::input_handler::Focus;
use crate::ui::Panel;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Footer with the bindings relevant to the focused area
pub fn render(f: &mut Frame, area: Rect, panel: &Panel) {
    let theme = panel.theme;
    let keys = panel.keys;

    let pairs: Vec<(String, &str)> = match panel.view.focus {
        Focus::Search => vec![
            ("type".to_string(), "search"),
            ("Enter".to_string(), "results"),
            ("C-c".to_string(), "quit"),
        ],
        Focus::List => vec![
            (keys.display(&keys.play_row), "play"),
            (keys.display(&keys.play_pause), "pause"),
            (format!("{}/{}", keys.display(&keys.prev_track), keys.display(&keys.next_track)), "prev/next"),
            (keys.display(&keys.like), "like"),
            (keys.display(&keys.menu), "menu"),
            (keys.display(&keys.tab_next), "tabs"),
            (keys.display(&keys.new_playlist), "new list"),
            (keys.display(&keys.quit), "quit"),
        ],
    };

    let mut spans = Vec::new();
    for (key, label) in pairs {
        spans.push(Span::styled(
            format!(" {} ", key),
            Style::default().fg(theme.overlay).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!("{} ", label), Style::default().fg(theme.overlay)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Right), area);
}
