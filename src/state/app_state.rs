//! Application state definitions

use super::registration::step_schemas;
use super::step::StepForm;
use super::wizard::Wizard;
use chrono::{DateTime, Utc};

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// The wizard with its current step
    #[default]
    Wizard,
    /// Registration submitted; show the receipt
    Complete,
}

/// What the completion screen shows after final submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Where the sink stored the registration
    pub location: String,
    pub submitted_at: DateTime<Utc>,
}

/// Main application state
pub struct AppState {
    pub current_view: View,
    pub wizard: Wizard,
    /// Live form of the wizard's current step
    pub form: StepForm,
    pub status_message: Option<String>,
    pub completion: Option<Completion>,
    /// First visible focus row of the step page
    pub scroll_offset: usize,
    /// Queue of error messages to display (shown one at a time)
    error_queue: Vec<String>,
}

impl AppState {
    pub fn new() -> Self {
        let wizard = Wizard::new(step_schemas());
        let form = wizard.step_form();
        Self {
            current_view: View::Wizard,
            wizard,
            form,
            status_message: None,
            completion: None,
            scroll_offset: 0,
            error_queue: Vec::new(),
        }
    }

    /// Remount the form for the wizard's current step (after an advance
    /// or retreat), seeded from the accumulator when available
    pub fn enter_current_step(&mut self) {
        self.form = self.wizard.step_form();
        self.scroll_offset = 0;
        self.status_message = None;
    }

    pub fn push_error(&mut self, message: String) {
        self.error_queue.push(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.first().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        if !self.error_queue.is_empty() {
            self.error_queue.remove(0);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_starts_on_wizard_step_one() {
        let state = AppState::new();
        assert_eq!(state.current_view, View::Wizard);
        assert_eq!(state.wizard.current(), 1);
        assert_eq!(state.form.schema().number, 1);
    }

    #[test]
    fn test_error_queue_dismisses_in_order() {
        let mut state = AppState::new();
        assert!(!state.has_errors());
        state.push_error("first".into());
        state.push_error("second".into());
        assert_eq!(state.current_error(), Some("first"));
        state.dismiss_error();
        assert_eq!(state.current_error(), Some("second"));
        state.dismiss_error();
        assert!(!state.has_errors());
        state.dismiss_error(); // no-op
    }

    #[test]
    fn test_enter_current_step_resets_scroll_and_status() {
        let mut state = AppState::new();
        state.scroll_offset = 7;
        state.status_message = Some("stale".into());
        state.enter_current_step();
        assert_eq!(state.scroll_offset, 0);
        assert_eq!(state.status_message, None);
    }
}
