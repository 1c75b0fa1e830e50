use crate::app::state::PlaylistPicker;
use crate::ui::utils::{centered, truncate};
use crate::ui::Panel;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

/// Checkbox list of every playlist; pre-checked where the song already is.
pub fn render(f: &mut Frame, panel: &Panel, picker: &PlaylistPicker) {
    let theme = panel.theme;
    let height = (picker.options.len() as u16 + 4).min(f.area().height);
    let area = centered(f.area(), 40, height);
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = picker
        .options
        .iter()
        .enumerate()
        .map(|(i, (name, checked))| {
            let mark = if *checked { "[x]" } else { "[ ]" };
            let style = if i == panel.view.picker_cursor {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(vec![
                Span::styled(format!(" {} ", mark), Style::default().fg(theme.playing)),
                Span::styled(truncate(name, 30), style),
            ])
        })
        .collect();
    lines.push(Line::default());
    lines.push(
        Line::from(Span::styled(
            format!(
                "{} toggle · Enter save · {} cancel",
                panel.keys.display(&panel.keys.toggle_option),
                panel.keys.display(&panel.keys.back)
            ),
            Style::default().fg(theme.overlay),
        ))
        .alignment(Alignment::Center),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent))
        .title(format!(" Add \"{}\" to ", truncate(&picker.song.name, 20)))
        .style(Style::default().bg(Color::Reset));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
