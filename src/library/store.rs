use crate::catalog::Song;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("library file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("library file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Liked songs and named playlists, stored as one JSON document 📚
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub liked: Vec<Song>,
    #[serde(default)]
    pub playlists: IndexMap<String, Vec<Song>>,
}

pub struct LibraryFile {
    path: PathBuf,
}

impl LibraryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tunebar")
            .join("library.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file is a fresh library, not an error.
    pub fn load(&self) -> Result<Library, StoreError> {
        if !self.path.exists() {
            return Ok(Library::default());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Library::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Move an unreadable file aside so the next save cannot clobber it.
    pub fn back_up(&self) -> Result<PathBuf, StoreError> {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".bak");
        let backup = self.path.with_file_name(name);
        fs::rename(&self.path, &backup)?;
        Ok(backup)
    }

    /// Full-document replace: write a sibling temp file, then rename over the target.
    pub fn save(&self, library: &Library) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(library)?;

        let mut tmp_name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".part");
        let tmp_path = self.path.with_file_name(tmp_name);

        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
