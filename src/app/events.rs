use crate::app::state::ResultMode;
use crate::app::timers::TimerFired;
use crate::catalog::{CatalogError, Song};
use crossterm::event::Event;
use image::DynamicImage;

/// Everything that can wake the event loop.
pub enum AppEvent {
    Input(Event),
    Ui(UiEvent),
    Timer(TimerFired),
    SearchFinished {
        ticket: u64,
        result: Result<Vec<Song>, CatalogError>,
    },
    ArtworkLoaded {
        target: ArtworkTarget,
        image: Result<DynamicImage, CatalogError>,
    },
}

/// What the panel reports back to the session controller.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SearchChanged(String),
    RowClicked(usize),
    Transport(Transport),
    /// Seek-bar release position, 0.0..=1.0
    SeekReleased(f64),
    LikeToggled(usize),
    Menu { row: usize, action: MenuAction },
    PickerToggle(usize),
    PickerConfirm,
    PickerCancel,
    CreatePlaylist(String),
    DeletePlaylist(String),
    SelectTab(ResultMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Previous,
    PlayPause,
    Next,
}

/// Per-row overflow menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Like,
    AddToPlaylist,
    RemoveFromPlaylist,
    Queue,
    Download,
}

impl MenuAction {
    /// Menu shown for rows of the given view; removal only makes sense inside a playlist.
    pub fn for_mode(mode: &ResultMode) -> &'static [MenuAction] {
        match mode {
            ResultMode::Playlist(_) => &[
                MenuAction::Like,
                MenuAction::AddToPlaylist,
                MenuAction::RemoveFromPlaylist,
                MenuAction::Queue,
                MenuAction::Download,
            ],
            _ => &[
                MenuAction::Like,
                MenuAction::AddToPlaylist,
                MenuAction::Queue,
                MenuAction::Download,
            ],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Like => "Like / Unlike",
            MenuAction::AddToPlaylist => "Add to playlist…",
            MenuAction::RemoveFromPlaylist => "Remove from this playlist",
            MenuAction::Queue => "Add to queue",
            MenuAction::Download => "Download",
        }
    }
}

/// Who asked for an image; stale answers are dropped by the receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtworkTarget {
    Row { generation: u64, row: usize },
    NowPlaying { song_id: String },
}
