//! Overview view: health, CPU and uptime panels above the bucket chart.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use serde_json::Value;

use crate::app::App;
use crate::data::{format_bytes, DiskFree};
use crate::source::Endpoint;
use crate::ui::chart;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([Constraint::Length(8), Constraint::Min(6)]).split(area);
    let panels = Layout::horizontal([
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ])
    .split(rows[0]);

    render_health(frame, app, panels[0]);
    render_cpu(frame, app, panels[1]);
    render_uptime(frame, app, panels[2]);
    chart::render(frame, app, rows[1]);
}

fn panel<'a>(app: &App, title: &'a str) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

fn field<'a>(app: &App, label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {:<10}", label), app.theme.label),
        Span::raw(value),
    ])
}

fn error_line<'a>(app: &App, endpoint: Endpoint) -> Option<Line<'a>> {
    let error = app.data.errors.get(&endpoint)?;
    Some(Line::from(Span::styled(
        format!(" ! {}", error),
        Style::default().fg(app.theme.critical),
    )))
}

fn placeholder<'a>() -> Line<'a> {
    Line::from(Span::styled(
        " No data yet",
        Style::default().add_modifier(Modifier::DIM),
    ))
}

/// Disk detail values other than `free` are byte counts in practice.
fn detail_value(value: &Value) -> String {
    match value.as_f64() {
        Some(bytes) => format_bytes(bytes).unwrap_or_else(|_| bytes.to_string()),
        None => match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}

fn render_health(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    match &app.data.health {
        Some(health) => {
            let level = health.level();
            lines.push(Line::from(vec![
                Span::styled(format!(" {:<10}", "Status"), app.theme.label),
                Span::styled(
                    health.status.clone().unwrap_or_else(|| "UNKNOWN".to_string()),
                    app.theme.status_style(level).add_modifier(Modifier::BOLD),
                ),
            ]));

            if let Some(disk) = &health.components.disk_space {
                if let Some(status) = &disk.status {
                    lines.push(field(app, "Disk", status.clone()));
                }
                let free = match &disk.details.free {
                    Some(DiskFree::Formatted(s)) => s.clone(),
                    Some(DiskFree::Bytes(b)) => format!("{} bytes", b),
                    None => "-".to_string(),
                };
                lines.push(field(app, "Free", free));
                for (key, value) in &disk.details.other {
                    lines.push(Line::from(vec![
                        Span::styled(format!(" {:<10}", key), app.theme.label),
                        Span::raw(detail_value(value)),
                    ]));
                }
            }

            let others = health.components.other.len();
            if others > 0 {
                lines.push(field(app, "Other", format!("{} components", others)));
            }
        }
        None => lines.push(placeholder()),
    }

    lines.extend(error_line(app, Endpoint::Health));
    let paragraph = Paragraph::new(lines)
        .block(panel(app, " Health "))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_cpu(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    match &app.data.cpu {
        Some(cpu) => {
            lines.push(Line::from(Span::styled(
                format!(" {}", cpu.name),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for m in &cpu.measurements {
                lines.push(field(app, "", format!("{} {}", m.statistic, m.value)));
            }
            if let Some(unit) = &cpu.base_unit {
                lines.push(field(app, "Unit", unit.clone()));
            }
        }
        None => lines.push(placeholder()),
    }

    lines.extend(error_line(app, Endpoint::Cpu));
    frame.render_widget(Paragraph::new(lines).block(panel(app, " CPU ")), area);
}

fn render_uptime(frame: &mut Frame, app: &App, area: Rect) {
    let uptime = &app.data.uptime;
    let state = if uptime.is_running() {
        Span::styled(" ticking", Style::default().fg(app.theme.healthy))
    } else {
        Span::styled(" stopped", Style::default().add_modifier(Modifier::DIM))
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!(" {}", uptime.formatted()),
            Style::default()
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(state),
    ];

    lines.extend(error_line(app, Endpoint::Uptime));
    frame.render_widget(Paragraph::new(lines).block(panel(app, " Uptime ")), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChannelSource, Update};
    use crate::ui::Theme;
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    #[test]
    fn test_detail_value() {
        assert_eq!(detail_value(&json!(1073741824)), "1 GB");
        assert_eq!(detail_value(&json!("/data")), "/data");
        assert_eq!(detail_value(&json!(true)), "true");
    }

    #[test]
    fn test_overview_renders_health_panel() {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), Theme::dark());
        let health = serde_json::from_value(json!({
            "status": "UP",
            "components": {
                "diskSpace": { "status": "UP", "details": { "free": 1572864, "total": 1073741824 } }
            }
        }))
        .unwrap();
        tx.try_send(Update::Health(health)).unwrap();
        app.reload_data();

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, &app, f.area())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("1.5 MB"));
        assert!(text.contains("1 GB"));
        assert!(text.contains("No data yet"));
        assert!(text.contains("00h 00m 00s"));
    }
}
