use crate::catalog::Song;
use image::DynamicImage;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Which collection the result list is showing 📚
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultMode {
    #[default]
    Search,
    Liked,
    Playlist(String),
}

impl ResultMode {
    pub fn label(&self) -> &str {
        match self {
            ResultMode::Search => "Search",
            ResultMode::Liked => "Liked",
            ResultMode::Playlist(name) => name,
        }
    }
}

/// The single live collection of rendered songs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub mode: ResultMode,
    pub songs: Vec<Song>,
}

impl ResultSet {
    pub fn new(mode: ResultMode, songs: Vec<Song>) -> Self {
        Self { mode, songs }
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn position_of(&self, song_id: &str) -> Option<usize> {
        self.songs.iter().position(|s| s.id == song_id)
    }
}

/// Height of the results area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewport {
    #[default]
    Collapsed,
    Loading,
    Expanded(usize),
}

/// Direction the artwork slides when the track changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideDirection {
    Next,
    #[default]
    Previous,
}

impl SlideDirection {
    /// Horizontal entry offset in cells; the cover leaves towards the opposite side.
    pub fn offset(&self) -> i16 {
        match self {
            SlideDirection::Next => 4,
            SlideDirection::Previous => -4,
        }
    }
}

pub enum ArtworkState {
    Idle,
    Loading,
    Loaded(Arc<DynamicImage>),
    Failed,
}

/// Progress of the current track, refreshed by the poll timer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub song: Song,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub fraction: f64,
    pub elapsed_label: String,
    pub total_label: String,
}

impl PlaybackSession {
    pub fn new(song: Song) -> Self {
        Self {
            song,
            position: Duration::ZERO,
            duration: None,
            fraction: 0.0,
            elapsed_label: format_clock(Duration::ZERO),
            total_label: format_clock(Duration::ZERO),
        }
    }

    pub fn song_id(&self) -> &str {
        &self.song.id
    }

    pub fn update(&mut self, position: Duration, duration: Duration) {
        self.position = position;
        self.duration = Some(duration);
        self.fraction = if duration.is_zero() {
            0.0
        } else {
            (position.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
        };
        self.elapsed_label = format_clock(position);
        self.total_label = format_clock(duration);
    }
}

/// Artwork card above the transport controls
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub artwork: ArtworkState,
    pub direction: SlideDirection,
    pub changed_at: Instant,
}

/// Multi-select of all playlists for one song
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistPicker {
    pub song: Song,
    pub options: Vec<(String, bool)>,
    pub cursor: usize,
}

impl PlaylistPicker {
    pub fn selected(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|(_, checked)| *checked)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// Short-lived status line message
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub start_time: Instant,
    pub deadline: Instant,
}

impl Toast {
    pub fn new(message: String, ttl: Duration) -> Self {
        let start_time = Instant::now();
        Self {
            message,
            start_time,
            deadline: start_time + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// `mm:ss` from whole seconds; minutes keep growing past 99.
pub fn format_clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Duration::ZERO), "00:00");
        assert_eq!(format_clock(Duration::from_millis(59_999)), "00:59");
        assert_eq!(format_clock(Duration::from_secs(187)), "03:07");
        assert_eq!(format_clock(Duration::from_secs(6000)), "100:00");
    }

    #[test]
    fn test_session_progress() {
        let song: Song = serde_json::from_value(serde_json::json!({"id": "1"})).unwrap();
        let mut session = PlaybackSession::new(song);
        session.update(Duration::from_secs(30), Duration::from_secs(120));

        assert_eq!(session.fraction, 0.25);
        assert_eq!(session.elapsed_label, "00:30");
        assert_eq!(session.total_label, "02:00");
    }
}
