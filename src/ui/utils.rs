use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate to `max_width` terminal columns, appending "…" if cut 🛡️
pub fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}

/// Rect of `width` x `height` centered in `area`, clipped to it.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_by_columns() {
        assert_eq!(truncate("Tum Hi Ho", 20), "Tum Hi Ho");
        assert_eq!(truncate("Tum Hi Ho", 5), "Tum …");
        // Wide glyphs take two columns each
        assert_eq!(truncate("日本語の歌", 5), "日本…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_centered_clips() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(centered(area, 40, 40), area);
    }
}
