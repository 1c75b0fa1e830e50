use crate::app::state::{ArtworkState, SlideDirection};
use crate::artwork;
use crate::ui::Panel;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Paragraph},
    Frame,
};
use std::time::Duration;

const SLIDE: Duration = Duration::from_millis(300);

/// Columns the cover is shifted by `elapsed` into a slide.
pub fn slide_shift(direction: SlideDirection, elapsed: Duration) -> i16 {
    if elapsed >= SLIDE {
        return 0;
    }
    let t = elapsed.as_secs_f32() / SLIDE.as_secs_f32();
    let ease = 1.0 - (1.0 - t).powi(3); // Cubic Out
    (direction.offset() as f32 * (1.0 - ease)).round() as i16
}

pub fn render(f: &mut Frame, area: Rect, panel: &Panel) {
    let theme = panel.theme;

    // Early exit if area too small
    if area.height < 2 {
        return;
    }

    let Some(now_playing) = panel.session.now_playing() else {
        let p = Paragraph::new("\n\n ♪")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.overlay));
        f.render_widget(p, area);
        return;
    };

    // Slide in from the side of the last transport action
    let shift = slide_shift(now_playing.direction, now_playing.changed_at.elapsed());
    let mut target = area;
    let cut = shift.unsigned_abs().min(area.width);
    target.width -= cut;
    if shift > 0 {
        target.x += cut;
    }

    match &now_playing.artwork {
        ArtworkState::Loaded(image) => {
            let lines = artwork::render_cover(image, target.width, target.height);
            let widget = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(Block::default().style(Style::default().bg(Color::Reset)));
            f.render_widget(widget, target);
        }
        ArtworkState::Loading => {
            let p = Paragraph::new("\n\nLoading...")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.warning));
            f.render_widget(p, target);
        }
        ArtworkState::Failed | ArtworkState::Idle => {
            let p = Paragraph::new("\n\n♪\nNo Art")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.overlay));
            f.render_widget(p, target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_settles() {
        assert_eq!(slide_shift(SlideDirection::Next, Duration::ZERO), 4);
        assert_eq!(slide_shift(SlideDirection::Previous, Duration::ZERO), -4);
        assert_eq!(slide_shift(SlideDirection::Next, SLIDE), 0);
        assert!(slide_shift(SlideDirection::Next, Duration::from_millis(150)).abs() < 4);
    }
}
