use crate::app::keys::KeyConfig;
use crate::library::LibraryFile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Delays and intervals of the panel, all in milliseconds ⏱️
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub debounce_ms: u64,
    pub poll_ms: u64,
    pub row_stagger_ms: u64,
    pub artwork_delay_ms: u64,
    pub overlay_frame_ms: u64,
    pub end_gap_ms: u64,
    pub row_exit_ms: u64,
    pub spinner_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            debounce_ms: 350,
            poll_ms: 500,
            row_stagger_ms: 50,
            artwork_delay_ms: 500,
            overlay_frame_ms: 30,
            end_gap_ms: 200,
            row_exit_ms: 250,
            spinner_ms: 80,
        }
    }
}

impl Timing {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
    pub fn poll(&self) -> Duration {
        Duration::from_millis(self.poll_ms.max(1))
    }
    pub fn row_stagger(&self, row: usize) -> Duration {
        Duration::from_millis(self.row_stagger_ms.saturating_mul(row as u64))
    }
    pub fn artwork_delay(&self) -> Duration {
        Duration::from_millis(self.artwork_delay_ms)
    }
    pub fn overlay_frame(&self) -> Duration {
        Duration::from_millis(self.overlay_frame_ms.max(1))
    }
    pub fn end_gap(&self) -> Duration {
        Duration::from_millis(self.end_gap_ms)
    }
    pub fn row_exit(&self) -> Duration {
        Duration::from_millis(self.row_exit_ms)
    }
    pub fn spinner(&self) -> Duration {
        Duration::from_millis(self.spinner_ms.max(1))
    }
}

/// User-editable configuration
/// stored in `config.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_endpoint")]
    pub search_endpoint: String,
    #[serde(default = "default_limit")]
    pub result_limit: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,
    #[serde(default = "default_thumbnail_quality")]
    pub thumbnail_quality: String,
    #[serde(default = "default_cover_quality")]
    pub cover_quality: String,
    /// Defaults to `<data dir>/tunebar/library.json`
    #[serde(default)]
    pub library_path: Option<PathBuf>,
    #[serde(default = "default_max_rows")]
    pub max_visible_rows: usize,
    #[serde(default)]
    pub timing: Timing,
    #[serde(default)]
    pub keys: KeyConfig,
}

fn default_endpoint() -> String {
    "https://jiosaavn-api-privatecvc2.vercel.app/search/songs".to_string()
}

fn default_limit() -> u32 {
    20
}

fn default_user_agent() -> String {
    format!("tunebar/{}", env!("CARGO_PKG_VERSION"))
}

fn default_audio_quality() -> String {
    "320kbps".to_string()
}

fn default_thumbnail_quality() -> String {
    "150x150".to_string()
}

fn default_cover_quality() -> String {
    "500x500".to_string()
}

fn default_max_rows() -> usize {
    8
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search_endpoint: default_endpoint(),
            result_limit: default_limit(),
            user_agent: default_user_agent(),
            audio_quality: default_audio_quality(),
            thumbnail_quality: default_thumbnail_quality(),
            cover_quality: default_cover_quality(),
            library_path: None,
            max_visible_rows: default_max_rows(),
            timing: Timing::default(),
            keys: KeyConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn get_config_dir() -> PathBuf {
        let dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tunebar");

        if !dir.exists() {
            let _ = fs::create_dir_all(&dir);
        }

        dir
    }

    pub fn get_config_path() -> PathBuf {
        Self::get_config_dir().join("config.toml")
    }

    /// Load from the default location, writing a default file on first run.
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                    tracing::warn!(path = %path.display(), "bad config, using defaults: {}", e);
                    Self::default()
                }),
                Err(_) => Self::default(),
            }
        } else {
            let config = Self::default();
            if let Ok(content) = toml::to_string_pretty(&config) {
                if let Some(parent) = path.parent() {
                    let _ = fs::create_dir_all(parent);
                }
                let _ = fs::write(path, content);
            }
            config
        }
    }

    pub fn library_file(&self) -> LibraryFile {
        LibraryFile::new(
            self.library_path
                .clone()
                .unwrap_or_else(LibraryFile::default_path),
        )
    }
}
