//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::HealthStatus;

/// Render the header bar.
///
/// Displays: health indicator, CPU count, live uptime, trace total.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let data = &app.data;

    if data.last_updated.is_none() && data.errors.is_empty() {
        let line = Line::from(vec![
            Span::styled(" ACTUATOR ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let level = match &data.health {
        Some(health) => health.level(),
        None => HealthStatus::Warning,
    };
    let status_text = data
        .health
        .as_ref()
        .and_then(|h| h.status.clone())
        .unwrap_or_else(|| "?".to_string());

    let cpu = data
        .cpu_count()
        .map(|n| format!("{}", n))
        .unwrap_or_else(|| "-".to_string());

    let mut spans = vec![
        Span::styled(format!(" {} ", level.symbol()), app.theme.status_style(level)),
        Span::styled("ACTUATOR ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(status_text, app.theme.status_style(level)),
        Span::raw(" │ CPUs "),
        Span::styled(cpu, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" │ up "),
        Span::styled(
            data.uptime.formatted(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(
            data.traces.len().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" traces"),
    ];

    if !data.errors.is_empty() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("{} failing", data.errors.len()),
            Style::default().fg(app.theme.critical),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![Line::from(" 1:Overview "), Line::from(" 2:Traces ")];

    let selected = match app.current_view {
        View::Overview => 0,
        View::Traces => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the data source, time since last update and available controls.
/// Temporary status messages and source errors take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.filter_active {
        "Type to search | Enter:apply Esc:cancel"
    } else {
        match app.current_view {
            View::Overview => "Tab:switch b:bucket r:refresh e:export ?:help q:quit",
            View::Traces => "/:search b:bucket Enter:detail r:refresh ?:help q:quit",
        }
    };

    let status = if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else if let Some(updated) = app.data.last_updated {
        let mut line = format!(
            " {} | Updated {:.1}s ago",
            app.source_description(),
            updated.elapsed().as_secs_f64()
        );
        // One failing endpoint at a time; the header carries the count
        if let Some((endpoint, error)) = app.data.errors.iter().next() {
            line.push_str(&format!(" | {}: {}", endpoint, error));
        }
        format!("{} | {}", line, controls)
    } else if let Some((endpoint, error)) = app.data.errors.iter().next() {
        format!(" {}: {} | q:quit r:retry", endpoint, error)
    } else {
        format!(" {} | Loading... | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  Tab ←/→     Switch views"),
        Line::from("  1 / 2       Overview / Traces"),
        Line::from("  ↑/↓ j/k     Navigate traces"),
        Line::from("  PgUp/PgDn   Jump 10 traces"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Trace detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Traces"),
        Line::from("  b / B       Next / previous bucket"),
        Line::from("  /           Search URI or method"),
        Line::from("  c           Clear search"),
        Line::from(""),
        section(" General"),
        Line::from("  r           Refresh now"),
        Line::from("  e           Export to JSON"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 25u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
