//! Generic step page
//!
//! Renders a step's fields, list sections, and action buttons as a
//! vertically scrolling sequence of rows. The same row model drives
//! the scroll math that keeps the focused element visible.

use super::field_renderer::{draw_field, field_height};
use crate::app::App;
use crate::state::{
    FieldPath, FocusTarget, ListValue, StepForm, StepItem, Value,
};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// One vertical slot of the step page
#[derive(Debug, Clone, PartialEq)]
pub enum PageRow {
    /// Section heading of a list field
    ListHeader { label: String },
    /// Heading of one list row ("Skill 1")
    RowHeader { label: String },
    Target(FocusTarget),
}

/// The page's rows with their heights, in display order
pub fn page_rows(form: &StepForm) -> Vec<(PageRow, u16)> {
    let mut rows = Vec::new();
    for item in form.schema().items() {
        match item {
            StepItem::Field(spec) => {
                let target = FocusTarget::Field(spec.path.clone());
                let height = form
                    .binding(&spec.path)
                    .map(|b| field_height(&b))
                    .unwrap_or(BUTTON_HEIGHT);
                rows.push((PageRow::Target(target), height));
            }
            StepItem::List(spec) => {
                rows.push((
                    PageRow::ListHeader {
                        label: spec.label.clone(),
                    },
                    1,
                ));
                let ids = form
                    .values()
                    .get(&spec.path)
                    .and_then(Value::as_list)
                    .map(ListValue::ids)
                    .unwrap_or_default();
                for (index, id) in ids.iter().enumerate() {
                    rows.push((
                        PageRow::RowHeader {
                            label: format!("{} {}", spec.row_label, index + 1),
                        },
                        1,
                    ));
                    for sub in &spec.fields {
                        let path = spec.path.clone().row(*id).join(&sub.path);
                        let height = form
                            .binding(&path)
                            .map(|b| field_height(&b))
                            .unwrap_or(BUTTON_HEIGHT);
                        rows.push((PageRow::Target(FocusTarget::Field(path)), height));
                    }
                }
                rows.push((
                    PageRow::Target(FocusTarget::ListAppend(spec.path.clone())),
                    BUTTON_HEIGHT,
                ));
            }
        }
    }
    rows.push((PageRow::Target(FocusTarget::Buttons), BUTTON_HEIGHT));
    rows
}

/// First visible row index that keeps the focused element on screen
pub fn scroll_for_focus(form: &StepForm, viewport: u16, current_offset: usize) -> usize {
    let rows = page_rows(form);
    if rows.is_empty() {
        return 0;
    }
    let focused = form.focused();
    let focus_row = rows
        .iter()
        .position(|(row, _)| matches!(row, PageRow::Target(t) if *t == focused))
        .unwrap_or(0);

    // Keep a list/row heading attached to its first field
    let mut top_needed = focus_row;
    while top_needed > 0
        && matches!(
            rows[top_needed - 1].0,
            PageRow::ListHeader { .. } | PageRow::RowHeader { .. }
        )
    {
        top_needed -= 1;
    }

    let mut offset = current_offset.min(rows.len() - 1).min(top_needed);
    loop {
        let visible: u16 = rows[offset..=focus_row].iter().map(|(_, h)| *h).sum();
        if visible <= viewport || offset >= focus_row {
            break;
        }
        offset += 1;
    }
    offset
}

/// Draw the current step's page
pub fn draw_step_page(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.form;
    let schema = form.schema();

    let block = Block::default()
        .title(format!(" Step {}: {} ", schema.number, schema.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = page_rows(form);
    let focused = form.focused();
    let mut y = inner.y;
    for (row, height) in rows.iter().skip(app.state.scroll_offset) {
        if y + height > inner.y + inner.height {
            break;
        }
        let slot = Rect {
            x: inner.x,
            y,
            width: inner.width,
            height: *height,
        };
        match row {
            PageRow::ListHeader { label } => {
                let heading = Paragraph::new(Line::from(Span::styled(
                    label.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                frame.render_widget(heading, slot);
            }
            PageRow::RowHeader { label } => {
                let heading = Paragraph::new(Line::from(vec![
                    Span::styled(label.clone(), Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("  ({}: remove)", crate::platform::REMOVE_ROW_SHORTCUT),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]));
                frame.render_widget(heading, slot);
            }
            PageRow::Target(FocusTarget::Field(path)) => {
                if let Some(binding) = form.binding(path) {
                    let is_active = focused == FocusTarget::Field(path.clone());
                    draw_field(frame, slot, &binding, is_active);
                }
            }
            PageRow::Target(FocusTarget::ListAppend(path)) => {
                draw_append_button(frame, slot, form, path, &focused);
            }
            PageRow::Target(FocusTarget::Buttons) => {
                draw_buttons_row(frame, slot, app);
            }
        }
        y += height;
    }
}

fn draw_append_button(
    frame: &mut Frame,
    area: Rect,
    form: &StepForm,
    path: &FieldPath,
    focused: &FocusTarget,
) {
    let row_label = form
        .schema()
        .list_spec(path)
        .map(|spec| spec.row_label.to_lowercase())
        .unwrap_or_else(|| "row".to_string());
    let is_selected = *focused == FocusTarget::ListAppend(path.clone());
    let slot = Rect {
        width: area.width.min(24),
        ..area
    };
    render_button(
        frame,
        slot,
        &format!("+ Add {row_label}"),
        is_selected,
        true,
        Some(Color::Green),
    );
}

fn draw_buttons_row(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.state.form;
    let wizard = &app.state.wizard;
    let on_buttons = form.on_buttons_row();

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(14), // Back
            Constraint::Length(1),
            Constraint::Length(14), // Next / Submit
            Constraint::Min(0),
        ])
        .split(area);

    let back_enabled = wizard.current() > 1;
    render_button(
        frame,
        chunks[0],
        "Back",
        on_buttons && form.selected_button() == 0,
        back_enabled,
        Some(Color::Gray),
    );

    let primary = if wizard.on_last_step() {
        "Submit"
    } else {
        "Next"
    };
    render_button(
        frame,
        chunks[2],
        primary,
        on_buttons && form.selected_button() == 1,
        true,
        Some(Color::Green),
    );
}
