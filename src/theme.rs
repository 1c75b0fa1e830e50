use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Panel palette 🎨
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub base: Color,
    pub surface: Color,
    pub overlay: Color,
    pub text: Color,
    /// Title of the row that is playing
    pub playing: Color,
    pub liked: Color,
    pub accent: Color,
    pub muted: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            base: Color::Rgb(30, 30, 46),
            surface: Color::Rgb(49, 50, 68),
            overlay: Color::Rgb(108, 112, 134),
            text: Color::Rgb(205, 214, 244),
            playing: Color::Rgb(166, 227, 161),
            liked: Color::Rgb(243, 139, 168),
            accent: Color::Rgb(137, 180, 250),
            muted: Color::Rgb(147, 153, 178),
            warning: Color::Rgb(249, 226, 175),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ThemeFile {
    theme: Theme,
}

pub fn get_theme_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tunebar")
        .join("theme.toml")
}

/// Read `theme.toml`, writing the default palette on first run.
pub fn load_current_theme() -> Theme {
    load_theme_from(&get_theme_path())
}

pub fn load_theme_from(path: &std::path::Path) -> Theme {
    match fs::read_to_string(path) {
        Ok(content) => {
            // Nested [theme] table first, then a flat file
            if let Ok(wrapper) = toml::from_str::<ThemeFile>(&content) {
                return wrapper.theme;
            }
            match toml::from_str::<Theme>(&content) {
                Ok(theme) => theme,
                Err(e) => {
                    warn!("Malformed theme at {}: {}", path.display(), e);
                    Theme::default()
                }
            }
        }
        Err(_) => {
            let theme = Theme::default();
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let wrapper = ThemeFile { theme: theme.clone() };
            if let Ok(toml_str) = toml::to_string_pretty(&wrapper) {
                let _ = fs::write(path, toml_str);
            }
            theme
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_writes_default() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("tunebar").join("theme.toml");
        let theme = load_theme_from(&path);
        assert_eq!(theme, Theme::default());
        assert!(path.exists());
        assert_eq!(load_theme_from(&path), Theme::default());
    }

    #[test]
    fn test_partial_flat_theme() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("theme.toml");
        fs::write(&path, "accent = \"#ff0000\"\n").unwrap();
        let theme = load_theme_from(&path);
        assert_eq!(theme.accent, Color::Rgb(255, 0, 0));
        assert_eq!(theme.text, Theme::default().text);
    }
}
