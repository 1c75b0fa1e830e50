use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

/// Key bindings of the list view; the search box takes raw text instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    // Global
    pub quit: String,
    pub focus_search: String,
    pub play_pause: String,
    pub next_track: String,
    pub prev_track: String,
    pub seek_forward: String,
    pub seek_backward: String,

    // Navigation
    pub nav_up: String,
    pub nav_up_alt: String,
    pub nav_down: String,
    pub nav_down_alt: String,
    pub tab_next: String,
    pub tab_prev: String,

    // Rows
    pub play_row: String,
    pub like: String,
    pub menu: String,

    // Playlists
    pub new_playlist: String,
    pub delete_playlist: String,
    pub toggle_option: String,
    pub back: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            focus_search: "/".to_string(),
            play_pause: "Space".to_string(),
            next_track: "n".to_string(),
            prev_track: "p".to_string(),
            seek_forward: "l".to_string(),
            seek_backward: "h".to_string(),

            nav_up: "k".to_string(),
            nav_up_alt: "Up".to_string(),
            nav_down: "j".to_string(),
            nav_down_alt: "Down".to_string(),
            tab_next: "Tab".to_string(),
            tab_prev: "BackTab".to_string(),

            play_row: "Enter".to_string(),
            like: "f".to_string(),
            menu: "m".to_string(),

            new_playlist: "N".to_string(),
            delete_playlist: "D".to_string(),
            toggle_option: "Space".to_string(),
            back: "Esc".to_string(),
        }
    }
}

impl KeyConfig {
    pub fn matches(&self, event: KeyEvent, key_str: &str) -> bool {
        match key_str {
            "Space" => event.code == KeyCode::Char(' '),
            "Enter" => event.code == KeyCode::Enter,
            "Backspace" => event.code == KeyCode::Backspace,
            "Esc" => event.code == KeyCode::Esc,
            "Tab" => event.code == KeyCode::Tab,
            "BackTab" => event.code == KeyCode::BackTab,
            "Up" => event.code == KeyCode::Up,
            "Down" => event.code == KeyCode::Down,
            "Left" => event.code == KeyCode::Left,
            "Right" => event.code == KeyCode::Right,
            s if s.chars().count() == 1 => match s.chars().next() {
                // Uppercase bindings also accept shift + lowercase
                Some(ch) if ch.is_uppercase() => {
                    event.code == KeyCode::Char(ch)
                        || (event.code == KeyCode::Char(ch.to_ascii_lowercase())
                            && event.modifiers.contains(KeyModifiers::SHIFT))
                }
                Some(ch) => event.code == KeyCode::Char(ch),
                None => false,
            },
            _ => false,
        }
    }

    // Helper for the hint line
    pub fn display(&self, key_str: &str) -> String {
        match key_str {
            "Up" => "↑".to_string(),
            "Down" => "↓".to_string(),
            "Left" => "←".to_string(),
            "Right" => "→".to_string(),
            "BackTab" => "S-Tab".to_string(),
            "Backspace" => "Bksp".to_string(),
            _ => key_str.to_string(),
        }
    }
}
