use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerState {
    #[default]
    Idle,
    Playing,
    Paused,
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("song {0} has no playable stream")]
    Unplayable(String),
    #[error("audio output unavailable: {0}")]
    Device(String),
    #[error("seek failed: {0}")]
    Seek(String),
}

/// One live audio stream. Dropping it must release the output.
pub trait AudioHandle {
    fn pause(&mut self);
    fn resume(&mut self);
    fn stop(&mut self);
    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError>;
    fn position(&self) -> Option<Duration>;
    fn duration(&self) -> Option<Duration>;
    /// The stream ran dry on its own
    fn finished(&self) -> bool {
        false
    }
}

/// Opens a stream for a URL and starts it playing 🎵
pub trait AudioBackend {
    fn open(&self, url: &str) -> Result<Box<dyn AudioHandle>, PlaybackError>;
}
