use crate::app::events::{Transport, UiEvent};
use crate::app::keys::KeyConfig;
use crate::app::session::Session;
use crate::app::state::ResultMode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

const SEEK_STEP: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Search,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Popup {
    #[default]
    None,
    Menu { row: usize, cursor: usize },
    NewPlaylist(String),
    ConfirmDelete(String),
}

/// Terminal-only state: focus, cursors and the search box text.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub focus: Focus,
    pub search: String,
    pub cursor: usize,
    pub picker_cursor: usize,
    pub popup: Popup,
    pub is_running: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            focus: Focus::Search,
            search: String::new(),
            cursor: 0,
            picker_cursor: 0,
            popup: Popup::None,
            is_running: true,
        }
    }
}

impl ViewState {
    /// Keep the cursor on a real row after the list changed under it.
    pub fn clamp(&mut self, rows: usize) {
        self.cursor = self.cursor.min(rows.saturating_sub(1));
    }
}

/// Translate one key press into at most one controller event.
pub fn handle_key(view: &mut ViewState, session: &Session, keys: &KeyConfig, key: KeyEvent) -> Option<UiEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        view.is_running = false;
        return None;
    }

    // 1. Playlist picker is modal
    if let Some(picker) = session.picker() {
        let count = picker.options.len();
        if keys.matches(key, &keys.back) {
            view.picker_cursor = 0;
            return Some(UiEvent::PickerCancel);
        }
        if key.code == KeyCode::Enter {
            view.picker_cursor = 0;
            return Some(UiEvent::PickerConfirm);
        }
        if keys.matches(key, &keys.toggle_option) {
            return Some(UiEvent::PickerToggle(view.picker_cursor));
        }
        if keys.matches(key, &keys.nav_up) || keys.matches(key, &keys.nav_up_alt) {
            view.picker_cursor = view.picker_cursor.saturating_sub(1);
        } else if keys.matches(key, &keys.nav_down) || keys.matches(key, &keys.nav_down_alt) {
            view.picker_cursor = (view.picker_cursor + 1).min(count.saturating_sub(1));
        }
        return None;
    }

    // 2. Local popups
    match std::mem::take(&mut view.popup) {
        Popup::None => {}
        Popup::Menu { row, mut cursor } => {
            let menu = session.menu();
            if keys.matches(key, &keys.back) {
                return None;
            }
            if key.code == KeyCode::Enter {
                return menu.get(cursor).map(|action| UiEvent::Menu { row, action: *action });
            }
            if keys.matches(key, &keys.nav_up) || keys.matches(key, &keys.nav_up_alt) {
                cursor = cursor.saturating_sub(1);
            } else if keys.matches(key, &keys.nav_down) || keys.matches(key, &keys.nav_down_alt) {
                cursor = (cursor + 1).min(menu.len().saturating_sub(1));
            }
            view.popup = Popup::Menu { row, cursor };
            return None;
        }
        Popup::NewPlaylist(mut name) => {
            match key.code {
                KeyCode::Esc => return None,
                KeyCode::Enter => return Some(UiEvent::CreatePlaylist(name)),
                KeyCode::Backspace => {
                    name.pop();
                }
                KeyCode::Char(c) => name.push(c),
                _ => {}
            }
            view.popup = Popup::NewPlaylist(name);
            return None;
        }
        Popup::ConfirmDelete(name) => {
            return match key.code {
                KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => Some(UiEvent::DeletePlaylist(name)),
                _ => None,
            };
        }
    }

    // 3. Search box takes raw text
    if view.focus == Focus::Search {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
                view.focus = Focus::List;
                None
            }
            KeyCode::Backspace => {
                view.search.pop();
                Some(UiEvent::SearchChanged(view.search.clone()))
            }
            KeyCode::Char(c) => {
                view.search.push(c);
                Some(UiEvent::SearchChanged(view.search.clone()))
            }
            _ => None,
        }
    } else {
        handle_list_key(view, session, keys, key)
    }
}

fn handle_list_key(view: &mut ViewState, session: &Session, keys: &KeyConfig, key: KeyEvent) -> Option<UiEvent> {
    let rows = session.rows().len();

    if keys.matches(key, &keys.quit) {
        view.is_running = false;
        return None;
    }
    if keys.matches(key, &keys.focus_search) {
        view.focus = Focus::Search;
        return None;
    }
    if keys.matches(key, &keys.play_pause) {
        return Some(UiEvent::Transport(Transport::PlayPause));
    }
    if keys.matches(key, &keys.next_track) {
        return Some(UiEvent::Transport(Transport::Next));
    }
    if keys.matches(key, &keys.prev_track) {
        return Some(UiEvent::Transport(Transport::Previous));
    }
    if keys.matches(key, &keys.seek_forward) || keys.matches(key, &keys.seek_backward) {
        let forward = keys.matches(key, &keys.seek_forward);
        return seek_fraction(session, forward).map(UiEvent::SeekReleased);
    }

    if keys.matches(key, &keys.nav_up) || keys.matches(key, &keys.nav_up_alt) {
        if view.cursor == 0 {
            view.focus = Focus::Search;
        } else {
            view.cursor -= 1;
        }
        return None;
    }
    if keys.matches(key, &keys.nav_down) || keys.matches(key, &keys.nav_down_alt) {
        view.cursor = (view.cursor + 1).min(rows.saturating_sub(1));
        return None;
    }
    if keys.matches(key, &keys.tab_next) || keys.matches(key, &keys.tab_prev) {
        let forward = keys.matches(key, &keys.tab_next);
        view.cursor = 0;
        return Some(UiEvent::SelectTab(cycle_tab(session, forward)));
    }
    if keys.matches(key, &keys.new_playlist) {
        view.popup = Popup::NewPlaylist(String::new());
        return None;
    }
    if keys.matches(key, &keys.delete_playlist) {
        if let ResultMode::Playlist(name) = &session.results().mode {
            view.popup = Popup::ConfirmDelete(name.clone());
        }
        return None;
    }

    if rows == 0 {
        return None;
    }
    if keys.matches(key, &keys.play_row) {
        return Some(UiEvent::RowClicked(view.cursor));
    }
    if keys.matches(key, &keys.like) {
        return Some(UiEvent::LikeToggled(view.cursor));
    }
    if keys.matches(key, &keys.menu) {
        view.popup = Popup::Menu { row: view.cursor, cursor: 0 };
    }
    None
}

/// Search, Liked, then playlists in order, wrapping both ways.
fn cycle_tab(session: &Session, forward: bool) -> ResultMode {
    let mut all = vec![ResultMode::Search];
    all.extend(session.tabs());
    let len = all.len();
    let current = all.iter().position(|m| *m == session.results().mode).unwrap_or(0);
    let next = if forward { (current + 1) % len } else { (current + len - 1) % len };
    all.swap_remove(next)
}

fn seek_fraction(session: &Session, forward: bool) -> Option<f64> {
    let playback = session.playback()?;
    let total = playback.duration.filter(|d| !d.is_zero())?;
    let target = if forward {
        playback.position + SEEK_STEP
    } else {
        playback.position.saturating_sub(SEEK_STEP)
    };
    Some((target.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0))
}
