//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod steps;

pub use forms::scroll_for_focus;
pub use steps::page_viewport_height;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let (sidebar_area, main_area) = layout::create_layout(area);
    layout::draw_sidebar(frame, sidebar_area, app);

    match app.state.current_view {
        View::Wizard => steps::draw_wizard(frame, main_area, app),
        View::Complete => steps::draw_complete(frame, main_area, app),
    }

    layout::draw_status_bar(frame, app);

    // Modal error dialog on top of everything
    if let Some(message) = app.state.current_error() {
        components::render_error_dialog(frame, message);
    }
}
