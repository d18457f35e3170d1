//! Summary panel of the review step
//!
//! Shows what the earlier steps accumulated, read straight from the
//! wizard; the review step's own fields render below in the normal
//! step page.

use crate::app::App;
use crate::state::{FieldPath, FormValues, Value};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows the summary panel occupies, including borders
pub const SUMMARY_HEIGHT: u16 = 8;

pub fn draw_summary(frame: &mut Frame, area: Rect, app: &App) {
    let personal = app.state.wizard.accumulated(1);
    let contact = app.state.wizard.accumulated(2);

    let name = format!(
        "{} {}",
        text_at(personal, &FieldPath::key("first_name")),
        text_at(personal, &FieldPath::key("last_name"))
    );
    let age = personal
        .and_then(|v| v.get(&FieldPath::key("age")))
        .and_then(Value::as_number)
        .map(|n| n.to_string())
        .unwrap_or_else(|| "Not provided".to_string());
    let gender = match personal
        .and_then(|v| v.get(&FieldPath::key("gender")))
        .and_then(Value::as_text)
    {
        Some("male") => "Male".to_string(),
        Some("female") => "Female".to_string(),
        Some("other") => "Other".to_string(),
        _ => "Not provided".to_string(),
    };
    let address = format!(
        "{}, {}, {} {}",
        text_at(contact, &FieldPath::key("address").then("street")),
        text_at(contact, &FieldPath::key("address").then("city")),
        text_at(contact, &FieldPath::key("address").then("province")),
        contact
            .and_then(|v| v.get(&FieldPath::key("address").then("zip_code")))
            .and_then(Value::as_text)
            .unwrap_or("")
    );

    let lines = vec![
        summary_line("Name", name.trim()),
        summary_line("Age", &age),
        summary_line("Gender", &gender),
        summary_line("Email", &text_at(contact, &FieldPath::key("email"))),
        summary_line("Phone", &text_at(contact, &FieldPath::key("phone"))),
        summary_line("Address", address.trim()),
    ];

    let block = Block::default()
        .title(" Your details so far ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn text_at(values: Option<&FormValues>, path: &FieldPath) -> String {
    values
        .and_then(|v| v.get(path))
        .and_then(Value::as_text)
        .filter(|s| !s.is_empty())
        .unwrap_or("Not provided")
        .to_string()
}

fn summary_line<'a>(label: &'a str, value: &str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
        Span::raw(value.to_string()),
    ])
}
