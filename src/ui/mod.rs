pub mod layout;
pub mod utils;
pub mod widgets;

use crate::app::input_handler::ViewState;
use crate::app::keys::KeyConfig;
use crate::app::session::Session;
use crate::theme::Theme;
use ratatui::Frame;

/// Everything a widget may read while drawing one frame.
pub struct Panel<'a> {
    pub session: &'a Session,
    pub view: &'a ViewState,
    pub theme: &'a Theme,
    pub keys: &'a KeyConfig,
}

pub fn ui(f: &mut Frame, panel: &Panel) {
    let area = f.area();

    // 1. Layout
    let layout = layout::get_panel_layout(area, panel.session.playback().is_some(), panel.session.viewport());

    // 2. Now playing card + transport
    widgets::player::render(f, layout.card, panel);

    // 3. Search box, tabs, rows
    widgets::library::search::render(f, layout.search, panel);
    widgets::library::tabs::render(f, layout.tabs, panel);
    widgets::library::render(f, layout.results, panel);

    // 4. Key hints
    widgets::popups::hints::render(f, layout.footer, panel);

    // 5. Popups (overlays)
    widgets::popups::render(f, panel);
}
