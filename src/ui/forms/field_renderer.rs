//! Field rendering utilities for forms
//!
//! Widgets are stateless: everything drawn here comes out of the
//! field's binding. Errors render into the bottom border so a field's
//! box keeps a constant height.

use crate::state::{FieldBinding, FieldKind, Value};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const CURSOR: &str = "▌";

/// Rows a field's box occupies, including its borders
pub fn field_height(binding: &FieldBinding<'_>) -> u16 {
    match &binding.spec.kind {
        FieldKind::Text { multiline: true } => 5,
        FieldKind::MultiSelect { options } => options.len() as u16 + 2,
        _ => 3,
    }
}

/// Draw one bound field
pub fn draw_field(frame: &mut Frame, area: Rect, binding: &FieldBinding<'_>, is_active: bool) {
    let border_style = if binding.status.is_invalid() {
        Style::default().fg(Color::Red)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let required_marker = if binding.spec.is_required() { " *" } else { "" };
    let mut block = Block::default()
        .title(format!(" {}{} ", binding.spec.label, required_marker))
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(error) = binding.error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red),
        )));
    }

    let content = match &binding.spec.kind {
        FieldKind::Text { multiline } => {
            text_content(display_text(binding.value), *multiline, is_active)
        }
        FieldKind::Number => {
            let display = match binding.value {
                Value::Number(n) => n.to_string(),
                _ => String::new(),
            };
            text_content(display, false, is_active)
        }
        FieldKind::Select { options } => {
            let selected = binding
                .value
                .as_text()
                .and_then(|v| options.iter().find(|o| o.value == v))
                .map(|o| o.label.clone());
            let label = selected.unwrap_or_else(|| "(none)".to_string());
            let line = if is_active {
                Line::from(vec![
                    Span::styled("◄ ", Style::default().fg(Color::Cyan)),
                    Span::raw(label),
                    Span::styled(" ►", Style::default().fg(Color::Cyan)),
                ])
            } else {
                Line::from(Span::styled(label, Style::default().fg(Color::Gray)))
            };
            Paragraph::new(line)
        }
        FieldKind::MultiSelect { options } => {
            let chosen = binding.value.as_string_list().unwrap_or(&[]);
            let lines: Vec<Line> = options
                .iter()
                .enumerate()
                .map(|(i, option)| {
                    let marker = if chosen.contains(&option.value) {
                        "[x] "
                    } else {
                        "[ ] "
                    };
                    let style = if is_active && i == binding.option_cursor {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::Gray)
                    };
                    Line::from(Span::styled(
                        format!("{marker}{}", option.label),
                        style,
                    ))
                })
                .collect();
            Paragraph::new(lines)
        }
        FieldKind::Entries => {
            let mut spans: Vec<Span> = Vec::new();
            if let Some(items) = binding.value.as_string_list() {
                for item in items {
                    spans.push(Span::styled(
                        format!("[{item}]"),
                        Style::default().fg(Color::Cyan),
                    ));
                    spans.push(Span::raw(" "));
                }
            }
            spans.push(Span::raw(binding.pending.to_string()));
            if is_active {
                spans.push(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
            }
            Paragraph::new(Line::from(spans))
        }
    };

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

fn display_text(value: &Value) -> String {
    value.as_text().unwrap_or("").to_string()
}

fn text_content(display: String, multiline: bool, is_active: bool) -> Paragraph<'static> {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    let display = if display.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        display
    };

    if multiline {
        let mut lines: Vec<Line> = display
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect();
        if is_active {
            if let Some(last) = lines.last_mut() {
                last.spans
                    .push(Span::styled(CURSOR, Style::default().fg(Color::Cyan)));
            } else {
                lines.push(Line::from(Span::styled(
                    CURSOR,
                    Style::default().fg(Color::Cyan),
                )));
            }
        }
        Paragraph::new(lines)
    } else {
        let cursor = if is_active { CURSOR } else { "" };
        Paragraph::new(Line::from(vec![
            Span::styled(display, style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]))
    }
}
