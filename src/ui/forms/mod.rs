//! Form rendering module
//!
//! - `field_renderer`: draws a single bound field
//! - `step_page`: the scrolling page of one wizard step

mod field_renderer;
mod step_page;

pub use step_page::{draw_step_page, page_rows, scroll_for_focus, PageRow};
