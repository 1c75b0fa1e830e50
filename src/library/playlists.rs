use super::store::{Library, LibraryFile};
use crate::catalog::Song;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaylistError {
    #[error("playlist name cannot be empty")]
    EmptyName,
    #[error("a playlist named \"{0}\" already exists")]
    AlreadyExists(String),
    #[error("no playlist named \"{0}\"")]
    NotFound(String),
}

/// What a confirmed playlist picker actually changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SelectionDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn touches(&self, name: &str) -> bool {
        self.added.iter().chain(&self.removed).any(|n| n == name)
    }
}

/// Liked set + playlists, persisted in full after every mutation.
///
/// Membership is decided by song id only. A failed save is logged and the
/// in-memory state is kept, so the session stays usable.
pub struct PlaylistManager {
    file: LibraryFile,
    library: Library,
}

impl PlaylistManager {
    pub fn open(file: LibraryFile) -> Self {
        let library = match file.load() {
            Ok(lib) => lib,
            Err(e) => {
                warn!(path = %file.path().display(), "library unreadable, starting empty: {}", e);
                match file.back_up() {
                    Ok(backup) => warn!(backup = %backup.display(), "unreadable library kept aside"),
                    Err(e) => warn!("could not move unreadable library aside: {}", e),
                }
                Library::default()
            }
        };
        Self { file, library }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn liked(&self) -> &[Song] {
        &self.library.liked
    }

    pub fn playlist(&self, name: &str) -> Option<&[Song]> {
        self.library.playlists.get(name).map(Vec::as_slice)
    }

    pub fn playlist_names(&self) -> impl Iterator<Item = &str> {
        self.library.playlists.keys().map(String::as_str)
    }

    pub fn is_liked(&self, song_id: &str) -> bool {
        self.library.liked.iter().any(|s| s.id == song_id)
    }

    /// Returns whether the song is liked afterwards.
    pub fn toggle_liked(&mut self, song: &Song) -> bool {
        let before = self.library.liked.len();
        self.library.liked.retain(|s| s.id != song.id);
        let now_liked = self.library.liked.len() == before;
        if now_liked {
            self.library.liked.push(song.clone());
        }
        info!(song = %song.id, liked = now_liked, "like toggled");
        self.persist();
        now_liked
    }

    pub fn create(&mut self, name: &str) -> Result<(), PlaylistError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlaylistError::EmptyName);
        }
        if self.library.playlists.contains_key(name) {
            return Err(PlaylistError::AlreadyExists(name.to_string()));
        }
        self.library.playlists.insert(name.to_string(), Vec::new());
        info!(playlist = name, "playlist created");
        self.persist();
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<(), PlaylistError> {
        // shift_remove keeps the remaining tabs in their saved order
        if self.library.playlists.shift_remove(name).is_none() {
            return Err(PlaylistError::NotFound(name.to_string()));
        }
        info!(playlist = name, "playlist deleted");
        self.persist();
        Ok(())
    }

    /// `Ok(false)` when the song was already there.
    pub fn add_song(&mut self, name: &str, song: &Song) -> Result<bool, PlaylistError> {
        let songs = self
            .library
            .playlists
            .get_mut(name)
            .ok_or_else(|| PlaylistError::NotFound(name.to_string()))?;
        if songs.iter().any(|s| s.id == song.id) {
            return Ok(false);
        }
        songs.push(song.clone());
        self.persist();
        Ok(true)
    }

    /// `Ok(false)` when the song was not in the playlist.
    pub fn remove_song(&mut self, name: &str, song_id: &str) -> Result<bool, PlaylistError> {
        let songs = self
            .library
            .playlists
            .get_mut(name)
            .ok_or_else(|| PlaylistError::NotFound(name.to_string()))?;
        let before = songs.len();
        songs.retain(|s| s.id != song_id);
        if songs.len() == before {
            return Ok(false);
        }
        self.persist();
        Ok(true)
    }

    /// Every playlist with whether it currently holds `song_id`, in saved order.
    pub fn membership(&self, song_id: &str) -> Vec<(String, bool)> {
        self.library
            .playlists
            .iter()
            .map(|(name, songs)| (name.clone(), songs.iter().any(|s| s.id == song_id)))
            .collect()
    }

    /// Apply a picker confirmation: add where newly checked, remove where unchecked,
    /// leave every other playlist alone. Unknown names are ignored.
    pub fn apply_selection<S: AsRef<str>>(&mut self, song: &Song, selected: &[S]) -> SelectionDelta {
        let mut delta = SelectionDelta::default();

        for (name, songs) in self.library.playlists.iter_mut() {
            let was_member = songs.iter().any(|s| s.id == song.id);
            let wants_member = selected.iter().any(|s| s.as_ref() == name);

            match (was_member, wants_member) {
                (false, true) => {
                    songs.push(song.clone());
                    delta.added.push(name.clone());
                }
                (true, false) => {
                    songs.retain(|s| s.id != song.id);
                    delta.removed.push(name.clone());
                }
                _ => {}
            }
        }

        if !delta.is_empty() {
            info!(song = %song.id, added = ?delta.added, removed = ?delta.removed, "playlists updated");
            self.persist();
        }
        delta
    }

    fn persist(&self) {
        if let Err(e) = self.file.save(&self.library) {
            warn!(path = %self.file.path().display(), "library not saved, changes may be lost: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::store::tests::{scratch_path, song};
    use std::fs;
    use tempfile::TempDir;

    fn manager() -> (TempDir, PlaylistManager) {
        let (temp, path) = scratch_path();
        (temp, PlaylistManager::open(LibraryFile::new(path)))
    }

    fn ids(songs: &[Song]) -> Vec<&str> {
        songs.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_like_twice_restores_membership() {
        let (_temp, mut pm) = manager();
        pm.toggle_liked(&song("1"));
        pm.toggle_liked(&song("2"));
        let before: Vec<String> = pm.liked().iter().map(|s| s.id.clone()).collect();

        assert!(pm.toggle_liked(&song("3")));
        assert!(!pm.toggle_liked(&song("3")));

        let mut after: Vec<String> = pm.liked().iter().map(|s| s.id.clone()).collect();
        let mut expected = before.clone();
        after.sort();
        expected.sort();
        assert_eq!(after, expected);
    }

    #[test]
    fn test_like_persists_across_reload() {
        let (_temp, path) = scratch_path();
        let mut pm = PlaylistManager::open(LibraryFile::new(&path));
        assert!(pm.liked().is_empty());
        pm.toggle_liked(&song("42"));

        let reopened = PlaylistManager::open(LibraryFile::new(&path));
        assert_eq!(ids(reopened.liked()), vec!["42"]);
        assert!(reopened.is_liked("42"));
    }

    #[test]
    fn test_create_rejects_empty_and_duplicate() {
        let (_temp, mut pm) = manager();
        assert_eq!(pm.create("   "), Err(PlaylistError::EmptyName));
        assert_eq!(pm.create(" Road "), Ok(()));
        assert_eq!(pm.create("Road"), Err(PlaylistError::AlreadyExists("Road".to_string())));
        assert_eq!(pm.playlist_names().collect::<Vec<_>>(), vec!["Road"]);
    }

    #[test]
    fn test_delete_keeps_order_of_others() {
        let (_temp, mut pm) = manager();
        for name in ["A", "B", "C"] {
            pm.create(name).unwrap();
        }
        pm.delete("B").unwrap();
        assert_eq!(pm.playlist_names().collect::<Vec<_>>(), vec!["A", "C"]);
        assert_eq!(pm.delete("B"), Err(PlaylistError::NotFound("B".to_string())));
    }

    #[test]
    fn test_add_and_remove_dedupe_by_id() {
        let (_temp, mut pm) = manager();
        pm.create("Mix").unwrap();

        assert_eq!(pm.add_song("Mix", &song("1")), Ok(true));
        assert_eq!(pm.add_song("Mix", &song("1")), Ok(false));
        assert_eq!(ids(pm.playlist("Mix").unwrap()), vec!["1"]);

        assert_eq!(pm.remove_song("Mix", "1"), Ok(true));
        assert_eq!(pm.remove_song("Mix", "1"), Ok(false));
        assert_eq!(pm.add_song("Nope", &song("1")), Err(PlaylistError::NotFound("Nope".to_string())));
    }

    #[test]
    fn test_apply_selection_diffs_only() {
        let (_temp, mut pm) = manager();
        for name in ["A", "B", "C", "D"] {
            pm.create(name).unwrap();
        }
        let s = song("x");
        pm.add_song("A", &s).unwrap();
        pm.add_song("B", &s).unwrap();
        pm.add_song("D", &song("other")).unwrap();

        let delta = pm.apply_selection(&s, &["B", "C"]);

        assert_eq!(delta.added, vec!["C".to_string()]);
        assert_eq!(delta.removed, vec!["A".to_string()]);
        assert!(!delta.touches("B"));
        assert!(pm.playlist("A").unwrap().is_empty());
        assert_eq!(ids(pm.playlist("B").unwrap()), vec!["x"]);
        assert_eq!(ids(pm.playlist("C").unwrap()), vec!["x"]);
        assert_eq!(ids(pm.playlist("D").unwrap()), vec!["other"]);
    }

    #[test]
    fn test_membership_seeds_picker() {
        let (_temp, mut pm) = manager();
        pm.create("A").unwrap();
        pm.create("B").unwrap();
        pm.add_song("B", &song("1")).unwrap();

        assert_eq!(
            pm.membership("1"),
            vec![("A".to_string(), false), ("B".to_string(), true)]
        );
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let path = blocker.join("library.json");
        let mut pm = PlaylistManager::open(LibraryFile::new(&path));

        assert!(pm.toggle_liked(&song("7")));
        assert_eq!(pm.create("Gym"), Ok(()));
        assert_eq!(pm.add_song("Gym", &song("7")), Ok(true));

        assert!(pm.is_liked("7"));
        assert_eq!(ids(pm.playlist("Gym").unwrap()), vec!["7"]);
        assert!(!path.exists());
    }

    #[test]
    fn test_malformed_library_is_kept_aside() {
        let (_temp, path) = scratch_path();
        fs::write(&path, "{ not json").unwrap();

        let mut pm = PlaylistManager::open(LibraryFile::new(&path));
        assert!(pm.liked().is_empty());
        pm.toggle_liked(&song("1"));

        let backup = path.with_file_name("library.json.bak");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "{ not json");
        let reopened = PlaylistManager::open(LibraryFile::new(&path));
        assert_eq!(ids(reopened.liked()), vec!["1"]);
    }
}
