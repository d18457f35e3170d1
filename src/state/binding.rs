//! Field binding
//!
//! The one mechanism tying widgets to form values: widgets are
//! stateless and render from a [`FieldBinding`] read view; every user
//! edit arrives as a semantic [`FieldEdit`] that the step form applies
//! to the authoritative value. A widget can never drift from the value
//! mapping because it has nothing of its own to drift with.

use super::field::{FieldKind, FieldSpec, FieldStatus};
use super::value::Value;

/// Semantic edit operations, already translated from raw key events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    Insert(char),
    Backspace,
    /// Line break in a multiline field
    Newline,
    /// Next option of a select field
    CycleNext,
    CyclePrev,
    /// Move the highlight of a multi-select field
    CursorNext,
    CursorPrev,
    /// Toggle the highlighted multi-select option
    Toggle,
    /// Commit the pending entry of an entries field
    Commit,
}

/// Read view of one bound field, handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct FieldBinding<'a> {
    pub spec: &'a FieldSpec,
    pub value: &'a Value,
    pub error: Option<&'a str>,
    pub status: FieldStatus,
    /// Uncommitted entry text of an entries field
    pub pending: &'a str,
    /// Highlighted option of a multi-select field
    pub option_cursor: usize,
}

/// Mutable editing state owned by the step form, never by a widget
pub(crate) struct EditContext<'a> {
    /// Pending entry text for entries fields
    pub buffer: &'a mut String,
    /// Highlighted option for multi-select fields
    pub cursor: &'a mut usize,
}

/// Apply a semantic edit to the authoritative value. Returns true when
/// the stored value changed (moving a cursor or typing into a pending
/// buffer does not count).
pub(crate) fn apply_edit(
    kind: &FieldKind,
    value: &mut Value,
    ctx: EditContext<'_>,
    edit: FieldEdit,
) -> bool {
    match kind {
        FieldKind::Text { multiline } => apply_text(value, *multiline, edit),
        FieldKind::Number => apply_number(value, edit),
        FieldKind::Select { options } => apply_select(value, options, edit),
        FieldKind::MultiSelect { options } => apply_multi_select(value, options, ctx, edit),
        FieldKind::Entries => apply_entries(value, ctx, edit),
    }
}

fn apply_text(value: &mut Value, multiline: bool, edit: FieldEdit) -> bool {
    let text = match value {
        Value::Text(s) => s,
        _ => {
            *value = Value::Text(String::new());
            match value {
                Value::Text(s) => s,
                _ => unreachable!(),
            }
        }
    };
    match edit {
        FieldEdit::Insert(c) => {
            text.push(c);
            true
        }
        FieldEdit::Newline if multiline => {
            text.push('\n');
            true
        }
        FieldEdit::Backspace => text.pop().is_some(),
        _ => false,
    }
}

fn apply_number(value: &mut Value, edit: FieldEdit) -> bool {
    match edit {
        FieldEdit::Insert(c) => {
            let Some(digit) = c.to_digit(10) else {
                return false;
            };
            let current = value.as_number().unwrap_or(0);
            match current
                .checked_mul(10)
                .and_then(|n| n.checked_add(i64::from(digit)))
            {
                Some(next) => {
                    *value = Value::Number(next);
                    true
                }
                None => false,
            }
        }
        FieldEdit::Backspace => match value.as_number() {
            Some(n) if n >= 10 => {
                *value = Value::Number(n / 10);
                true
            }
            Some(_) => {
                *value = Value::Empty;
                true
            }
            None => false,
        },
        _ => false,
    }
}

fn apply_select(
    value: &mut Value,
    options: &[super::field::SelectOption],
    edit: FieldEdit,
) -> bool {
    if options.is_empty() {
        return false;
    }
    let selected = value
        .as_text()
        .and_then(|v| options.iter().position(|o| o.value == v));
    match edit {
        FieldEdit::CycleNext => {
            let next = match selected {
                Some(i) => (i + 1) % options.len(),
                None => 0,
            };
            *value = Value::Text(options[next].value.clone());
            true
        }
        FieldEdit::CyclePrev => {
            let prev = match selected {
                Some(0) | None => options.len() - 1,
                Some(i) => i - 1,
            };
            *value = Value::Text(options[prev].value.clone());
            true
        }
        FieldEdit::Backspace => {
            if selected.is_some() {
                *value = Value::Text(String::new());
                true
            } else {
                false
            }
        }
        _ => false,
    }
}

fn apply_multi_select(
    value: &mut Value,
    options: &[super::field::SelectOption],
    ctx: EditContext<'_>,
    edit: FieldEdit,
) -> bool {
    if options.is_empty() {
        return false;
    }
    match edit {
        FieldEdit::CursorNext => {
            *ctx.cursor = (*ctx.cursor + 1) % options.len();
            false
        }
        FieldEdit::CursorPrev => {
            *ctx.cursor = if *ctx.cursor == 0 {
                options.len() - 1
            } else {
                *ctx.cursor - 1
            };
            false
        }
        FieldEdit::Toggle => {
            let choice = &options[(*ctx.cursor).min(options.len() - 1)].value;
            let items = match value {
                Value::StringList(items) => items,
                _ => {
                    *value = Value::StringList(vec![]);
                    match value {
                        Value::StringList(items) => items,
                        _ => unreachable!(),
                    }
                }
            };
            match items.iter().position(|item| item == choice) {
                Some(index) => {
                    items.remove(index);
                }
                None => items.push(choice.clone()),
            }
            true
        }
        _ => false,
    }
}

fn apply_entries(value: &mut Value, ctx: EditContext<'_>, edit: FieldEdit) -> bool {
    let items = match value {
        Value::StringList(items) => items,
        _ => {
            *value = Value::StringList(vec![]);
            match value {
                Value::StringList(items) => items,
                _ => unreachable!(),
            }
        }
    };
    match edit {
        FieldEdit::Insert(c) => {
            ctx.buffer.push(c);
            false
        }
        FieldEdit::Backspace => {
            if ctx.buffer.pop().is_some() {
                false
            } else {
                items.pop().is_some()
            }
        }
        FieldEdit::Commit => {
            let entry = ctx.buffer.trim().to_string();
            ctx.buffer.clear();
            if entry.is_empty() {
                false
            } else {
                // Duplicates are allowed in; an explicit rule flags them
                items.push(entry);
                true
            }
        }
        _ => false,
    }
}
