//! Layout components (step sidebar, status bar)

use super::components::{render_step_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::platform::{ADD_ROW_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::{FieldKind, FocusTarget, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Create the main layout with the step indicator sidebar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // Step indicator
            Constraint::Min(0),     // Main content
        ])
        .split(area);

    // Reserve bottom line for status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(chunks[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Sidebar content
            Constraint::Length(1), // Status bar continuation
        ])
        .split(chunks[0]);

    (sidebar_chunks[0], main_chunks[0])
}

/// Draw the step indicator: one boxed entry per wizard step, with a
/// check mark once the step has been submitted
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let wizard = &app.state.wizard;
    let total = wizard.total();

    let mut constraints = vec![Constraint::Min(0)];
    constraints.extend(std::iter::repeat(Constraint::Length(BUTTON_HEIGHT)).take(total));
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for number in 1..=total {
        let Some(schema) = wizard.schema(number) else {
            continue;
        };
        let is_completed = wizard.is_completed(number);
        let is_selected =
            app.state.current_view == View::Wizard && wizard.current() == number;
        let marker = if is_completed {
            "✓".to_string()
        } else {
            number.to_string()
        };
        render_step_button(
            frame,
            chunks[number],
            &marker,
            &schema.title,
            is_selected,
            is_completed,
        );
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![Span::styled(
        format!(
            " Step {}/{} ",
            app.state.wizard.current(),
            app.state.wizard.total()
        ),
        Style::default().fg(Color::Cyan),
    )];

    if app.hints_enabled() {
        spans.push(Span::styled(
            view_hints(app),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(message) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    // Quit hint on the right
    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for the focused element
fn view_hints(app: &App) -> String {
    if app.state.current_view == View::Complete {
        return "Enter:exit".to_string();
    }
    match app.state.form.focused() {
        FocusTarget::Buttons => {
            format!("←/→:choose  Enter:activate  {SUBMIT_SHORTCUT}:submit step")
        }
        FocusTarget::ListAppend(_) => {
            format!("Enter:add row  Tab:next  {SUBMIT_SHORTCUT}:submit step")
        }
        FocusTarget::Field(path) => {
            let kind = app
                .state
                .form
                .binding(&path)
                .map(|b| b.spec.kind.clone());
            let field_hint = match kind {
                Some(FieldKind::Select { .. }) => "←/→:choose",
                Some(FieldKind::MultiSelect { .. }) => "↑/↓:move  Space:toggle",
                Some(FieldKind::Entries) => "type + Enter:add  Backspace:remove",
                Some(FieldKind::Number) => "digits:edit",
                _ => "type to edit",
            };
            if path.row_id().is_some() {
                format!("{field_hint}  {ADD_ROW_SHORTCUT}:add row  Tab:next")
            } else {
                format!("{field_hint}  Tab:next  {SUBMIT_SHORTCUT}:submit step")
            }
        }
    }
}
