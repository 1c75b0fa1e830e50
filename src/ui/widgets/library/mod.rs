use crate::app::input_handler::Focus;
use crate::app::renderer::{Cover, Row};
use crate::app::state::Viewport;
use crate::artwork;
use crate::ui::layout::ROW_HEIGHT;
use crate::ui::utils::truncate;
use crate::ui::Panel;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub mod search;
pub mod tabs;

/// First row shown so that `cursor` stays inside a window of `visible` rows.
pub fn scroll_offset(cursor: usize, visible: usize, total: usize) -> usize {
    if visible == 0 || total <= visible {
        return 0;
    }
    cursor.saturating_sub(visible - 1).min(total - visible)
}

pub fn render(f: &mut Frame, area: Rect, panel: &Panel) {
    if area.height == 0 {
        return;
    }
    let theme = panel.theme;
    let session = panel.session;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(Span::styled(
            format!(" {} ", session.results().mode.label()),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(theme.surface))
        .style(Style::default().bg(Color::Reset));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if session.viewport() == Viewport::Loading {
        let p = Paragraph::new("Searching...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.overlay));
        f.render_widget(p, inner);
        return;
    }

    if let Some(message) = session.renderer().placeholder() {
        let p = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.overlay).add_modifier(Modifier::ITALIC));
        f.render_widget(p, inner);
        return;
    }

    let rows = session.rows();
    let visible = (inner.height / ROW_HEIGHT) as usize;
    let offset = scroll_offset(panel.view.cursor, visible, rows.len());
    let list_focused = panel.view.focus == Focus::List;

    for (slot, (index, row)) in rows.iter().enumerate().skip(offset).take(visible).enumerate() {
        let row_area = Rect::new(inner.x, inner.y + slot as u16 * ROW_HEIGHT, inner.width, ROW_HEIGHT);
        let selected = list_focused && index == panel.view.cursor;
        render_row(f, row_area, panel, index, row, selected);
    }
}

fn render_row(f: &mut Frame, area: Rect, panel: &Panel, index: usize, row: &Row, selected: bool) {
    // Entrance has not started yet
    if !row.visible {
        return;
    }
    let theme = panel.theme;

    // 1. Thumbnail (4x2), sound bars over it while playing
    let thumb = Rect::new(area.x, area.y, 4.min(area.width), area.height);
    let overlay = panel
        .session
        .renderer()
        .overlay()
        .filter(|o| o.row == index)
        .and_then(|_| panel.session.renderer().overlay_glyph());

    let thumb_lines: Vec<Line> = match (overlay, &row.cover) {
        (Some(glyph), _) => vec![
            Line::from(Span::styled(format!(" {}", glyph), Style::default().fg(theme.playing))),
            Line::default(),
        ],
        (None, Cover::Art(image)) => artwork::render_tiny(image),
        (None, Cover::Loading) => vec![Line::from(Span::styled(" ··", Style::default().fg(theme.overlay)))],
        (None, Cover::Placeholder) => vec![Line::from(Span::styled(" ♪", Style::default().fg(theme.overlay)))],
    };
    f.render_widget(Paragraph::new(thumb_lines), thumb);

    // 2. Title / artist / like / duration
    let text_area = Rect::new(
        area.x + 5,
        area.y,
        area.width.saturating_sub(5),
        area.height,
    );
    let tail = format!(" {} {}", if row.liked { "♥" } else { "♡" }, row.duration_label);
    let max_width = (text_area.width as usize).saturating_sub(tail.chars().count() + 1);

    let mut title_style = if row.highlighted {
        Style::default().fg(theme.playing).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    if row.leaving {
        title_style = title_style.add_modifier(Modifier::DIM | Modifier::CROSSED_OUT);
    }
    let bg = if selected { theme.surface } else { Color::Reset };

    let title = truncate(&row.song.name, max_width);
    let pad = max_width.saturating_sub(unicode_width::UnicodeWidthStr::width(title.as_str()));
    let lines = vec![
        Line::from(vec![
            Span::styled(title, title_style),
            Span::raw(" ".repeat(pad)),
            Span::styled(
                tail,
                Style::default().fg(if row.liked { theme.liked } else { theme.overlay }),
            ),
        ]),
        Line::from(Span::styled(
            truncate(row.song.artist(), max_width),
            Style::default().fg(theme.muted),
        )),
    ];
    f.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), text_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_keeps_cursor_visible() {
        assert_eq!(scroll_offset(0, 4, 10), 0);
        assert_eq!(scroll_offset(3, 4, 10), 0);
        assert_eq!(scroll_offset(4, 4, 10), 1);
        assert_eq!(scroll_offset(9, 4, 10), 6);
        assert_eq!(scroll_offset(5, 8, 3), 0);
    }
}
