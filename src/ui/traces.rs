//! Traces view rendering.
//!
//! A table of recorded exchanges for the selected bucket, in the order the
//! server returned them, narrowed by the search text.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::{App, TraceFilter};
use crate::data::Trace;

fn format_status(trace: &Trace) -> String {
    trace
        .response
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_time_taken(trace: &Trace) -> String {
    trace
        .time_taken
        .map(|ms| format!("{}ms", ms))
        .unwrap_or_else(|| "-".to_string())
}

/// Render the Traces view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let traces = app.visible_traces();

    let header = Row::new(vec![
        Cell::from("Time"),
        Cell::from("Method"),
        Cell::from("URI"),
        Cell::from("Status"),
        Cell::from("Took"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = traces
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.timestamp.clone()),
                Cell::from(t.request.method.clone()),
                Cell::from(t.request.uri.clone()),
                Cell::from(format_status(t)).style(app.theme.status_style(t.health())),
                Cell::from(format_time_taken(t)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(24),
        Constraint::Length(7),
        Constraint::Fill(3),
        Constraint::Length(6),
        Constraint::Length(8),
    ];

    let selected = app.selected_trace_index.min(traces.len().saturating_sub(1));

    let bucket_total = match app.trace_filter {
        TraceFilter::All => app.data.traces.len(),
        TraceFilter::Class(class) => app.data.buckets.bucket(class).len(),
    };

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !traces.is_empty() {
        format!(" [{}/{}]", selected + 1, traces.len())
    } else {
        String::new()
    };

    let title = format!(
        " Traces ({}/{}) [b:{}]{}{} ",
        traces.len(),
        bucket_total,
        app.trace_filter.label(),
        filter_info,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_offset(app.trace_scroll_offset.get());
    if !traces.is_empty() {
        state.select(Some(selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
    app.trace_scroll_offset.set(state.offset());
}
