//! Detail overlay rendering.
//!
//! Displays a modal overlay with everything recorded about the selected trace.

use std::collections::BTreeMap;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};
use serde_json::Value;

use crate::app::App;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// Header values arrive as strings or as arrays of strings.
pub fn header_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(header_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Render the selected trace as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(ref trace) = app.selected_trace else {
        return;
    };

    let overlay_width = (area.width * 95 / 100).clamp(MIN_OVERLAY_WIDTH, 110);
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 50);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(6), // Summary
        Constraint::Min(8),    // Header tables
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== SUMMARY =====
    let health = trace.health();
    let status = trace
        .response
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let summary_lines = vec![
        Line::from(vec![Span::styled(
            format!(" {} {} ", trace.request.method, trace.request.uri),
            bold,
        )]),
        Line::from(""),
        Line::from(vec![
            Span::raw(" Status: "),
            Span::styled(
                format!("{} ({})", status, trace.class().label()),
                app.theme.status_style(health).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Took: "),
            Span::styled(
                trace
                    .time_taken
                    .map(|ms| format!("{}ms", ms))
                    .unwrap_or_else(|| "-".to_string()),
                bold,
            ),
            Span::raw("    From: "),
            Span::styled(
                trace.request.remote_address.clone().unwrap_or_else(|| "-".to_string()),
                bold,
            ),
        ]),
        Line::from(vec![Span::raw(" At: "), Span::raw(trace.timestamp.clone())]),
    ];

    let summary = Paragraph::new(summary_lines).block(
        Block::default()
            .title(" Trace Detail ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.highlight)),
    );
    frame.render_widget(summary, chunks[0]);

    // ===== HEADERS =====
    let content_chunks =
        Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)]).split(chunks[1]);

    render_headers(frame, app, " Request headers ", &trace.request.headers, content_chunks[0]);
    render_headers(frame, app, " Response headers ", &trace.response.headers, content_chunks[1]);

    // ===== FOOTER =====
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[2]);
}

fn render_headers(
    frame: &mut Frame,
    app: &App,
    title: &str,
    headers: &BTreeMap<String, Value>,
    area: Rect,
) {
    let block = Block::default()
        .title(format!("{}({}) ", title, headers.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if headers.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No headers recorded",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![Cell::from("Name"), Cell::from("Value")])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = headers
        .iter()
        .map(|(name, value)| Row::new(vec![Cell::from(name.clone()), Cell::from(header_value(value))]))
        .collect();

    let widths = [Constraint::Fill(1), Constraint::Fill(3)];
    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_header_value() {
        assert_eq!(header_value(&json!("text/html")), "text/html");
        assert_eq!(
            header_value(&json!(["gzip", "deflate"])),
            "gzip, deflate"
        );
        assert_eq!(header_value(&json!(42)), "42");
        assert_eq!(header_value(&Value::Null), "");
    }
}
