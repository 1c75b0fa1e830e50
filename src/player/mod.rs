pub mod engine;
pub mod rodio_backend;
pub mod traits;

pub use engine::PlaybackEngine;
pub use rodio_backend::RodioBackend;
pub use traits::{AudioBackend, AudioHandle, PlaybackError, PlayerState};
