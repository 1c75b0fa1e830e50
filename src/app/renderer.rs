use crate::app::config::Timing;
use crate::app::events::ArtworkTarget;
use crate::app::state::{ResultMode, ResultSet};
use crate::app::timers::{TimerKey, Timers};
use crate::catalog::Song;
use image::DynamicImage;
use std::sync::Arc;
use tracing::debug;

pub const EMPTY_LIKED_MESSAGE: &str = "No liked songs yet";

pub enum Cover {
    Placeholder,
    Loading,
    Art(Arc<DynamicImage>),
}

/// One rendered song, addressed by its position in the live ResultSet.
pub struct Row {
    pub song: Song,
    pub duration_label: String,
    /// Entrance animation has started
    pub visible: bool,
    pub cover: Cover,
    pub liked: bool,
    /// Title drawn in the "now playing" color
    pub highlighted: bool,
    /// Sliding out before the list is rebuilt
    pub leaving: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    pub row: usize,
    pub frame: usize,
}

/// Sound-bar animation frames, built once per renderer and released on teardown 🎚️
pub struct SoundbarFrames {
    frames: Vec<String>,
}

impl SoundbarFrames {
    pub const COUNT: usize = 30;
    const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    pub fn load() -> Self {
        let frames = (0..Self::COUNT)
            .map(|i| {
                let phase = i as f64 / Self::COUNT as f64 * std::f64::consts::TAU;
                (0..3)
                    .map(|bar| {
                        let level = ((phase + bar as f64 * 2.1).sin() + 1.0) / 2.0;
                        Self::LEVELS[(level * 7.0).round() as usize]
                    })
                    .collect()
            })
            .collect();
        Self { frames }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.frames.get(index).map(String::as_str)
    }

    pub fn is_loaded(&self) -> bool {
        !self.frames.is_empty()
    }

    fn release(&mut self) {
        self.frames = Vec::new();
    }
}

/// Turns a ResultSet into rows and owns every row-level timer.
///
/// Each `render` bumps the generation and cancels all row timers of the previous
/// one, so nothing scheduled for an old row can touch the new list.
pub struct ResultRenderer {
    timing: Timing,
    thumbnail_quality: String,
    generation: u64,
    rows: Vec<Row>,
    placeholder: Option<&'static str>,
    overlay: Option<Overlay>,
    frames: SoundbarFrames,
}

impl ResultRenderer {
    pub fn new(timing: Timing, thumbnail_quality: &str) -> Self {
        Self {
            timing,
            thumbnail_quality: thumbnail_quality.to_string(),
            generation: 0,
            rows: Vec::new(),
            placeholder: None,
            overlay: None,
            frames: SoundbarFrames::load(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        self.placeholder
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn overlay_glyph(&self) -> Option<&str> {
        self.overlay.and_then(|o| self.frames.get(o.frame))
    }

    pub fn frames_loaded(&self) -> bool {
        self.frames.is_loaded()
    }

    pub fn render(
        &mut self,
        set: &ResultSet,
        is_liked: impl Fn(&str) -> bool,
        playing_id: Option<&str>,
        timers: &mut Timers,
    ) {
        self.clear(timers);

        if set.is_empty() && set.mode == ResultMode::Liked {
            self.placeholder = Some(EMPTY_LIKED_MESSAGE);
            return;
        }

        self.rows = set
            .songs
            .iter()
            .map(|song| Row {
                song: song.clone(),
                duration_label: song.duration_label(),
                visible: false,
                cover: Cover::Placeholder,
                liked: is_liked(&song.id),
                highlighted: false,
                leaving: false,
            })
            .collect();

        for i in 0..self.rows.len() {
            timers.once(TimerKey::RowEntrance(i), self.timing.row_stagger(i));
        }

        // Redraw the overlay for the track that is still playing
        if let Some(id) = playing_id {
            if let Some(row) = set.position_of(id) {
                self.mark_now_playing(Some(row), timers);
            }
        }

        debug!(generation = self.generation, rows = self.rows.len(), mode = ?set.mode, "rendered");
    }

    /// Drop all rows and every timer tied to them.
    pub fn clear(&mut self, timers: &mut Timers) {
        timers.cancel_where(|k| k.is_row());
        timers.cancel(TimerKey::OverlayFrame);
        self.generation += 1;
        self.rows.clear();
        self.placeholder = None;
        self.overlay = None;
    }

    pub fn teardown(&mut self, timers: &mut Timers) {
        self.clear(timers);
        self.frames.release();
    }

    pub fn on_entrance(&mut self, row: usize, timers: &mut Timers) {
        let Some(r) = self.rows.get_mut(row) else {
            return;
        };
        r.visible = true;
        if r.song.image_url(&self.thumbnail_quality).is_some() {
            timers.once(TimerKey::RowArtwork(row), self.timing.artwork_delay());
        }
    }

    /// Artwork delay elapsed: returns what to fetch, marking the cover as loading.
    pub fn on_artwork_due(&mut self, row: usize) -> Option<(ArtworkTarget, String)> {
        let generation = self.generation;
        let r = self.rows.get_mut(row)?;
        let url = r.song.image_url(&self.thumbnail_quality)?.to_string();
        r.cover = Cover::Loading;
        Some((ArtworkTarget::Row { generation, row }, url))
    }

    /// `None` image means the fetch failed; the placeholder comes back.
    pub fn apply_artwork(&mut self, generation: u64, row: usize, image: Option<DynamicImage>) -> bool {
        if generation != self.generation {
            return false;
        }
        let Some(r) = self.rows.get_mut(row) else {
            return false;
        };
        r.cover = match image {
            Some(img) => Cover::Art(Arc::new(img)),
            None => Cover::Placeholder,
        };
        true
    }

    /// Move highlight and overlay to `row` (or remove them), restarting the animation.
    pub fn mark_now_playing(&mut self, row: Option<usize>, timers: &mut Timers) {
        for r in &mut self.rows {
            r.highlighted = false;
        }
        timers.cancel(TimerKey::OverlayFrame);
        self.overlay = None;

        if let Some(i) = row {
            if let Some(r) = self.rows.get_mut(i) {
                r.highlighted = true;
                self.overlay = Some(Overlay { row: i, frame: 0 });
                timers.every(TimerKey::OverlayFrame, self.timing.overlay_frame());
            }
        }
    }

    pub fn advance_overlay(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.frame = (overlay.frame + 1) % SoundbarFrames::COUNT;
        }
    }

    pub fn set_liked(&mut self, row: usize, liked: bool) {
        if let Some(r) = self.rows.get_mut(row) {
            r.liked = liked;
        }
    }

    pub fn begin_exit(&mut self, row: usize, timers: &mut Timers) {
        if let Some(r) = self.rows.get_mut(row) {
            r.leaving = true;
            timers.once(TimerKey::RowExit(row), self.timing.row_exit());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn song(id: &str, with_art: bool) -> Song {
        let image = if with_art {
            serde_json::json!([{"quality": "150x150", "link": format!("http://img/{}", id)}])
        } else {
            serde_json::json!([])
        };
        serde_json::from_value(serde_json::json!({"id": id, "name": id, "duration": 125, "image": image}))
            .unwrap()
    }

    #[test]
    fn test_frames_cycle() {
        let frames = SoundbarFrames::load();
        assert!(frames.is_loaded());
        assert_eq!(frames.get(0).unwrap().chars().count(), 3);
        assert!(frames.get(SoundbarFrames::COUNT).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_schedules_stagger_and_replaces_timers() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new(tx);
        let mut renderer = ResultRenderer::new(Timing::default(), "150x150");
        let set = ResultSet::new(ResultMode::Search, vec![song("a", true), song("b", false), song("c", true)]);

        renderer.render(&set, |id| id == "b", None, &mut timers);
        assert_eq!(renderer.rows().len(), 3);
        assert_eq!(renderer.rows()[0].duration_label, "2:05");
        assert!(renderer.rows()[1].liked);
        assert_eq!(timers.pending(), 3);
        let first_gen = renderer.generation();

        renderer.render(&ResultSet::new(ResultMode::Search, vec![song("z", true)]), |_| false, None, &mut timers);
        assert_eq!(timers.pending(), 1);
        assert!(renderer.generation() > first_gen);
        assert!(!renderer.apply_artwork(first_gen, 0, None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entrance_then_artwork_only_with_thumbnail() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new(tx);
        let mut renderer = ResultRenderer::new(Timing::default(), "150x150");
        renderer.render(
            &ResultSet::new(ResultMode::Search, vec![song("a", true), song("b", false)]),
            |_| false,
            None,
            &mut timers,
        );

        renderer.on_entrance(0, &mut timers);
        renderer.on_entrance(1, &mut timers);
        assert!(renderer.rows()[0].visible && renderer.rows()[1].visible);
        assert!(timers.is_pending(TimerKey::RowArtwork(0)));
        assert!(!timers.is_pending(TimerKey::RowArtwork(1)));

        let (target, url) = renderer.on_artwork_due(0).unwrap();
        assert_eq!(url, "http://img/a");
        assert_eq!(target, ArtworkTarget::Row { generation: renderer.generation(), row: 0 });
        assert!(matches!(renderer.rows()[0].cover, Cover::Loading));
        assert!(renderer.on_artwork_due(1).is_none());
    }

    #[tokio::test]
    async fn test_empty_liked_shows_placeholder() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new(tx);
        let mut renderer = ResultRenderer::new(Timing::default(), "150x150");

        renderer.render(&ResultSet::new(ResultMode::Liked, Vec::new()), |_| true, None, &mut timers);
        assert_eq!(renderer.placeholder(), Some(EMPTY_LIKED_MESSAGE));
        assert!(renderer.rows().is_empty());

        renderer.render(&ResultSet::new(ResultMode::Search, Vec::new()), |_| true, None, &mut timers);
        assert_eq!(renderer.placeholder(), None);
    }

    #[tokio::test]
    async fn test_overlay_follows_song_id_across_renders() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut timers = Timers::new(tx);
        let mut renderer = ResultRenderer::new(Timing::default(), "150x150");

        let set = ResultSet::new(ResultMode::Search, vec![song("a", false), song("b", false)]);
        renderer.render(&set, |_| false, None, &mut timers);
        renderer.mark_now_playing(Some(1), &mut timers);
        renderer.advance_overlay();
        assert_eq!(renderer.overlay(), Some(Overlay { row: 1, frame: 1 }));

        let reordered = ResultSet::new(ResultMode::Search, vec![song("b", false), song("x", false)]);
        renderer.render(&reordered, |_| false, Some("b"), &mut timers);
        assert_eq!(renderer.overlay(), Some(Overlay { row: 0, frame: 0 }));
        assert!(renderer.rows()[0].highlighted);
        assert!(!renderer.rows()[1].highlighted);
        assert!(timers.is_pending(TimerKey::OverlayFrame));
        assert!(renderer.overlay_glyph().is_some());

        renderer.teardown(&mut timers);
        assert_eq!(timers.pending(), 0);
        assert!(!renderer.frames_loaded());
        assert!(renderer.overlay_glyph().is_none());
    }
}
