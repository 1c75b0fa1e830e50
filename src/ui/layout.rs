use crate::app::state::Viewport;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Lines per result row: title line + artist line
pub const ROW_HEIGHT: u16 = 2;

pub struct PanelLayout {
    pub card: Rect,
    pub search: Rect,
    pub tabs: Rect,
    pub results: Rect,
    pub footer: Rect,
}

/// Height of the results block for the current viewport, borders included.
pub fn results_height(viewport: Viewport) -> u16 {
    match viewport {
        Viewport::Collapsed => 0,
        Viewport::Loading => 3,
        Viewport::Expanded(rows) => rows as u16 * ROW_HEIGHT + 2,
    }
}

pub fn get_panel_layout(area: Rect, has_track: bool, viewport: Viewport) -> PanelLayout {
    // Responsive Logic 🧠
    // The card shrinks to a single transport strip when nothing has played yet
    // or the terminal is too short for the cover.
    let card_height = if has_track && area.height >= 28 { 12 } else { 5 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(card_height),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(results_height(viewport)),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    PanelLayout {
        card: chunks[0],
        search: chunks[1],
        tabs: chunks[2],
        results: chunks[3],
        footer: chunks[5],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_height_follows_viewport() {
        assert_eq!(results_height(Viewport::Collapsed), 0);
        assert_eq!(results_height(Viewport::Loading), 3);
        assert_eq!(results_height(Viewport::Expanded(4)), 10);
    }

    #[test]
    fn test_small_terminal_gets_compact_card() {
        let layout = get_panel_layout(Rect::new(0, 0, 60, 20), true, Viewport::Collapsed);
        assert_eq!(layout.card.height, 5);
        assert_eq!(layout.footer.y, 19);
    }
}
