//! Per-step page rendering

mod complete;
mod review;

use crate::app::App;
use crate::ui::forms::draw_step_page;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};
use review::SUMMARY_HEIGHT;

pub use complete::draw as draw_complete;

/// Draw the wizard's current step
pub fn draw_wizard(frame: &mut Frame, area: Rect, app: &App) {
    if app.state.wizard.on_last_step() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(SUMMARY_HEIGHT), Constraint::Min(0)])
            .split(area);
        review::draw_summary(frame, chunks[0], app);
        draw_step_page(frame, chunks[1], app);
    } else {
        draw_step_page(frame, area, app);
    }
}

/// Rows available for the step page's contents at a given terminal
/// height (minus status bar, page borders, and the review summary)
pub fn page_viewport_height(app: &App, terminal_height: u16) -> u16 {
    let summary = if app.state.wizard.on_last_step() {
        SUMMARY_HEIGHT
    } else {
        0
    };
    terminal_height.saturating_sub(1 + 2 + summary)
}
