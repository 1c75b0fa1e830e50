pub mod playlists;
pub mod store;

pub use playlists::{PlaylistError, PlaylistManager, SelectionDelta};
pub use store::{Library, LibraryFile, StoreError};
