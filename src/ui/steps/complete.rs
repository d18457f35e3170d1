//! Completion screen after final submission

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Registration complete ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  ✓ Your registration has been submitted.",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if let Some(completion) = &app.state.completion {
        lines.push(Line::from(vec![
            Span::styled("  Saved to: ", Style::default().fg(Color::DarkGray)),
            Span::raw(completion.location.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("  Submitted: ", Style::default().fg(Color::DarkGray)),
            Span::raw(
                completion
                    .submitted_at
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string(),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("  Press "),
        Span::styled("Enter", Style::default().fg(Color::Cyan)),
        Span::raw(" to exit"),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}
