//! Application state and core logic

use crate::config::TuiConfig;
use crate::state::{
    Advance, AppState, Completion, FieldEdit, FieldKind, FieldPath, FocusTarget, View,
};
use crate::submit::{FileSink, SubmissionSink};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// User configuration
    pub config: TuiConfig,
    /// Consumer of the final aggregate
    sink: Box<dyn SubmissionSink>,
    /// Whether the app should quit
    quit: bool,
    /// Terminal size for scroll calculations (height, width)
    pub terminal_size: Option<(u16, u16)>,
}

impl App {
    /// Create a new App instance
    pub fn new() -> Result<Self> {
        let config = TuiConfig::load()?;
        let sink = FileSink::from_output_path(config.output_path.as_deref());
        Ok(Self::with_sink(config, Box::new(sink)))
    }

    pub(crate) fn with_sink(config: TuiConfig, sink: Box<dyn SubmissionSink>) -> Self {
        Self {
            state: AppState::new(),
            config,
            sink,
            quit: false,
            terminal_size: None,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn hints_enabled(&self) -> bool {
        self.config.hints_enabled()
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        match self.state.current_view {
            View::Complete => self.handle_complete_key(key),
            View::Wizard => self.handle_wizard_key(key).await,
        }
        Ok(())
    }

    fn handle_complete_key(&mut self, key: KeyEvent) {
        if matches!(
            key.code,
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')
        ) {
            self.quit = true;
        }
    }

    async fn handle_wizard_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => self.submit_step().await,
                KeyCode::Char('n') => {
                    if let Some(list) = self.state.form.focused_list() {
                        let _ = self.state.form.append_row(&list);
                    }
                }
                KeyCode::Char('d') => {
                    if self.state.form.remove_focused_row() {
                        self.state.status_message = Some("Row removed".to_string());
                    }
                }
                _ => {}
            }
            self.adjust_scroll();
            return;
        }

        match key.code {
            KeyCode::Tab => self.state.form.focus_next(),
            KeyCode::BackTab => self.state.form.focus_prev(),
            KeyCode::Esc => self.go_back(),
            KeyCode::Enter => self.activate().await,
            KeyCode::Left => match self.state.form.focused() {
                FocusTarget::Buttons => self.state.form.select_back_button(),
                FocusTarget::Field(path) => match self.field_kind(&path) {
                    Some(FieldKind::Select { .. }) => self.state.form.apply(FieldEdit::CyclePrev),
                    Some(FieldKind::MultiSelect { .. }) => {
                        self.state.form.apply(FieldEdit::CursorPrev);
                    }
                    _ => {}
                },
                FocusTarget::ListAppend(_) => {}
            },
            KeyCode::Right => match self.state.form.focused() {
                FocusTarget::Buttons => self.state.form.select_next_button(),
                FocusTarget::Field(path) => match self.field_kind(&path) {
                    Some(FieldKind::Select { .. }) => self.state.form.apply(FieldEdit::CycleNext),
                    Some(FieldKind::MultiSelect { .. }) => {
                        self.state.form.apply(FieldEdit::CursorNext);
                    }
                    _ => {}
                },
                FocusTarget::ListAppend(_) => {}
            },
            KeyCode::Down => {
                if self.focused_is_multi_select() {
                    self.state.form.apply(FieldEdit::CursorNext);
                } else {
                    self.state.form.focus_next();
                }
            }
            KeyCode::Up => {
                if self.focused_is_multi_select() {
                    self.state.form.apply(FieldEdit::CursorPrev);
                } else {
                    self.state.form.focus_prev();
                }
            }
            KeyCode::Char(' ') => {
                if self.focused_is_multi_select() {
                    self.state.form.apply(FieldEdit::Toggle);
                } else {
                    self.state.form.apply(FieldEdit::Insert(' '));
                }
            }
            KeyCode::Char(c) => self.state.form.apply(FieldEdit::Insert(c)),
            KeyCode::Backspace => self.state.form.apply(FieldEdit::Backspace),
            _ => {}
        }
        self.adjust_scroll();
    }

    /// Enter on the focused element
    async fn activate(&mut self) {
        match self.state.form.focused() {
            FocusTarget::Buttons => {
                if self.state.form.selected_button() == 0 {
                    self.go_back();
                } else {
                    self.submit_step().await;
                }
            }
            FocusTarget::ListAppend(path) => {
                let _ = self.state.form.append_row(&path);
            }
            FocusTarget::Field(path) => match self.field_kind(&path) {
                Some(FieldKind::Text { multiline: true }) => {
                    self.state.form.apply(FieldEdit::Newline);
                }
                Some(FieldKind::Entries) => self.state.form.apply(FieldEdit::Commit),
                _ => self.state.form.focus_next(),
            },
        }
    }

    /// Validate the step; on success hand the snapshot to the wizard,
    /// and on the last step deliver the aggregate to the sink
    async fn submit_step(&mut self) {
        let Some(snapshot) = self.state.form.submit() else {
            let count = self.state.form.error_count();
            self.state.status_message = Some(if count == 1 {
                "1 field needs attention".to_string()
            } else {
                format!("{count} fields need attention")
            });
            return;
        };

        match self.state.wizard.advance(snapshot) {
            Ok(Advance::Next) => self.state.enter_current_step(),
            Ok(Advance::Complete(aggregate)) => match self.sink.submit(&aggregate).await {
                Ok(receipt) => {
                    tracing::info!(location = %receipt.location, "registration submitted");
                    self.state.completion = Some(Completion {
                        location: receipt.location,
                        submitted_at: receipt.submitted_at,
                    });
                    self.state.current_view = View::Complete;
                }
                Err(err) => {
                    tracing::error!(error = %err, "submission failed");
                    self.state
                        .push_error(format!("Could not save the registration: {err:#}"));
                }
            },
            Err(err) => self.state.push_error(err.to_string()),
        }
    }

    /// Step back, or quit from the first step
    fn go_back(&mut self) {
        if self.state.wizard.retreat() {
            self.state.enter_current_step();
        } else {
            self.quit = true;
        }
    }

    fn field_kind(&self, path: &FieldPath) -> Option<FieldKind> {
        self.state.form.binding(path).map(|b| b.spec.kind.clone())
    }

    fn focused_is_multi_select(&self) -> bool {
        match self.state.form.focused() {
            FocusTarget::Field(path) => {
                matches!(self.field_kind(&path), Some(FieldKind::MultiSelect { .. }))
            }
            _ => false,
        }
    }

    /// Keep the focused element inside the visible window
    fn adjust_scroll(&mut self) {
        if self.state.current_view != View::Wizard {
            return;
        }
        let Some((height, _)) = self.terminal_size else {
            return;
        };
        let viewport = crate::ui::page_viewport_height(self, height);
        let offset =
            crate::ui::scroll_for_focus(&self.state.form, viewport, self.state.scroll_offset);
        self.state.scroll_offset = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FormValues, StepForm, Value};
    use crate::submit::{MockSubmissionSink, SubmissionReceipt};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn test_app(sink: MockSubmissionSink) -> App {
        App::with_sink(TuiConfig::default(), Box::new(sink))
    }

    fn valid_personal_values(app: &App) -> FormValues {
        let mut values = app.state.wizard.schema(1).unwrap().defaults();
        values.set(&FieldPath::key("first_name"), Value::Text("Ada".into()));
        values.set(&FieldPath::key("last_name"), Value::Text("Lovelace".into()));
        values.set(&FieldPath::key("gender"), Value::Text("female".into()));
        values
    }

    fn valid_contact_values(app: &App) -> FormValues {
        let mut values = app.state.wizard.schema(2).unwrap().defaults();
        values.set(&FieldPath::key("email"), Value::Text("ada@example.com".into()));
        values.set(&FieldPath::key("phone"), Value::Text("13812345678".into()));
        values.set(
            &FieldPath::key("address").then("street"),
            Value::Text("Analytical Engine Way 1".into()),
        );
        values.set(
            &FieldPath::key("address").then("city"),
            Value::Text("London".into()),
        );
        values.set(
            &FieldPath::key("address").then("province"),
            Value::Text("Greater London".into()),
        );
        values
    }

    fn valid_review_values(app: &App) -> FormValues {
        let mut values = app.state.wizard.schema(3).unwrap().defaults();
        values.set(
            &FieldPath::key("occupation"),
            Value::Text("Mathematician".into()),
        );
        // Fill the seeded rows of both lists
        let skills = values.get(&FieldPath::key("skills")).unwrap().clone();
        if let Value::List(list) = &skills {
            let id = list.ids()[0];
            values.set(
                &FieldPath::key("skills").row(id).then("name"),
                Value::Text("Analysis".into()),
            );
        }
        let experience = values.get(&FieldPath::key("experience")).unwrap().clone();
        if let Value::List(list) = &experience {
            let id = list.ids()[0];
            values.set(
                &FieldPath::key("experience").row(id).then("company"),
                Value::Text("University of London".into()),
            );
            values.set(
                &FieldPath::key("experience").row(id).then("position"),
                Value::Text("Analyst".into()),
            );
        }
        values
    }

    fn mount(app: &mut App, values: FormValues) {
        let schema = app
            .state
            .wizard
            .schema(app.state.wizard.current())
            .unwrap()
            .clone();
        app.state.form = StepForm::with_values(schema, values);
    }

    #[tokio::test]
    async fn test_submit_with_empty_required_field_blocks() {
        let mut sink = MockSubmissionSink::new();
        sink.expect_submit().times(0);
        let mut app = test_app(sink);

        app.handle_key(ctrl('s')).await.unwrap();

        assert_eq!(app.state.wizard.current(), 1);
        assert!(app.state.status_message.is_some());
        assert!(app
            .state
            .form
            .error(&FieldPath::key("first_name"))
            .is_some());
    }

    #[tokio::test]
    async fn test_valid_step_advances_and_accumulates() {
        let mut sink = MockSubmissionSink::new();
        sink.expect_submit().times(0);
        let mut app = test_app(sink);

        let values = valid_personal_values(&app);
        mount(&mut app, values);
        app.handle_key(ctrl('s')).await.unwrap();

        assert_eq!(app.state.wizard.current(), 2);
        let accumulated = app.state.wizard.accumulated(1).unwrap();
        assert_eq!(
            accumulated.get(&FieldPath::key("age")),
            Some(&Value::Number(22))
        );
    }

    #[tokio::test]
    async fn test_esc_retreats_then_quits() {
        let mut sink = MockSubmissionSink::new();
        sink.expect_submit().times(0);
        let mut app = test_app(sink);

        let values = valid_personal_values(&app);
        mount(&mut app, values);
        app.handle_key(ctrl('s')).await.unwrap();
        assert_eq!(app.state.wizard.current(), 2);

        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.state.wizard.current(), 1);
        assert!(!app.should_quit());

        // Re-entry prepopulated the form from the accumulator
        assert_eq!(
            app.state.form.values().get(&FieldPath::key("first_name")),
            Some(&Value::Text("Ada".into()))
        );

        app.handle_key(key(KeyCode::Esc)).await.unwrap();
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_full_wizard_delivers_aggregate_to_sink() {
        let mut sink = MockSubmissionSink::new();
        sink.expect_submit()
            .withf(|aggregate| {
                aggregate.get(&FieldPath::key("age")) == Some(&Value::Number(22))
                    && aggregate
                        .get(&FieldPath::key("occupation"))
                        .and_then(Value::as_text)
                        == Some("Mathematician")
            })
            .times(1)
            .returning(|_| {
                Ok(SubmissionReceipt {
                    location: "/tmp/registration.json".to_string(),
                    submitted_at: Utc::now(),
                })
            });
        let mut app = test_app(sink);

        let values = valid_personal_values(&app);
        mount(&mut app, values);
        app.handle_key(ctrl('s')).await.unwrap();

        let values = valid_contact_values(&app);
        mount(&mut app, values);
        app.handle_key(ctrl('s')).await.unwrap();

        let values = valid_review_values(&app);
        mount(&mut app, values);
        app.handle_key(ctrl('s')).await.unwrap();

        assert_eq!(app.state.current_view, View::Complete);
        let completion = app.state.completion.as_ref().unwrap();
        assert_eq!(completion.location, "/tmp/registration.json");

        // Enter leaves the completion screen
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert!(app.should_quit());
    }

    #[tokio::test]
    async fn test_failing_sink_surfaces_error_and_stays_on_wizard() {
        let mut sink = MockSubmissionSink::new();
        sink.expect_submit()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("disk full")));
        let mut app = test_app(sink);

        let values = valid_personal_values(&app);
        mount(&mut app, values);
        app.handle_key(ctrl('s')).await.unwrap();
        let values = valid_contact_values(&app);
        mount(&mut app, values);
        app.handle_key(ctrl('s')).await.unwrap();
        let values = valid_review_values(&app);
        mount(&mut app, values);
        app.handle_key(ctrl('s')).await.unwrap();

        assert_eq!(app.state.current_view, View::Wizard);
        assert!(app.state.has_errors());

        // While the dialog is up, other keys are swallowed
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        assert!(app.state.has_errors());
        app.handle_key(key(KeyCode::Enter)).await.unwrap();
        assert!(!app.state.has_errors());
    }

    #[tokio::test]
    async fn test_typing_flows_into_the_focused_field() {
        let mut sink = MockSubmissionSink::new();
        sink.expect_submit().times(0);
        let mut app = test_app(sink);

        for c in "Ada".chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
        assert_eq!(
            app.state.form.values().get(&FieldPath::key("first_name")),
            Some(&Value::Text("Ada".into()))
        );

        // Tab blurs and moves on
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
        assert_eq!(app.state.form.error(&FieldPath::key("first_name")), None);
    }

    #[tokio::test]
    async fn test_ctrl_n_appends_row_when_inside_a_list() {
        let mut sink = MockSubmissionSink::new();
        sink.expect_submit().times(0);
        let mut app = test_app(sink);

        let values = valid_personal_values(&app);
        mount(&mut app, values);
        app.handle_key(ctrl('s')).await.unwrap();
        let values = valid_contact_values(&app);
        mount(&mut app, values);
        app.handle_key(ctrl('s')).await.unwrap();
        assert_eq!(app.state.wizard.current(), 3);

        // Outside any list, Ctrl+N is a no-op
        app.handle_key(ctrl('n')).await.unwrap();
        let skill_count = app
            .state
            .form
            .values()
            .get(&FieldPath::key("skills"))
            .and_then(Value::as_list)
            .map(|l| l.len());
        assert_eq!(skill_count, Some(1));

        // Move into the skills list and append
        while app.state.form.focused_list().is_none() {
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
        }
        app.handle_key(ctrl('n')).await.unwrap();
        let skill_count = app
            .state
            .form
            .values()
            .get(&FieldPath::key("skills"))
            .and_then(Value::as_list)
            .map(|l| l.len());
        assert_eq!(skill_count, Some(2));
    }
}
