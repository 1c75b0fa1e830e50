use crate::app::input_handler::Popup;
use crate::ui::Panel;
use ratatui::Frame;

pub mod hints;
pub mod input;
pub mod menu;
pub mod picker;
pub mod toast;

pub fn render(f: &mut Frame, panel: &Panel) {
    // ROW MENU / NAME INPUT / DELETE CONFIRMATION
    match &panel.view.popup {
        Popup::None => {}
        Popup::Menu { row, cursor } => menu::render(f, panel, *row, *cursor),
        Popup::NewPlaylist(name) => input::render(f, panel, "New playlist", name),
        Popup::ConfirmDelete(name) => input::render_confirm(f, panel, name),
    }

    // PLAYLIST PICKER
    if let Some(picker) = panel.session.picker() {
        picker::render(f, panel, picker);
    }

    // TOAST NOTIFICATION
    if let Some(toast) = panel.session.toast() {
        if !toast.is_expired() {
            toast::render(f, panel, toast);
        }
    }
}
