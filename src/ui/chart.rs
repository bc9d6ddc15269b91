//! Bar chart of trace counts per status bucket.

use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
    Frame,
};

use crate::app::App;
use crate::data::{BucketSet, StatusClass};

/// `(label, count)` for each bucket, in [`StatusClass::ALL`] order.
pub fn bucket_bars(buckets: &BucketSet) -> Vec<(&'static str, u64)> {
    buckets
        .counts()
        .iter()
        .map(|(class, count)| (class.label(), *count as u64))
        .collect()
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let bars: Vec<Bar> = bucket_bars(&app.data.buckets)
        .into_iter()
        .zip(StatusClass::ALL)
        .map(|((label, count), class)| {
            Bar::default()
                .value(count)
                .label(Line::from(label))
                .style(Style::default().fg(app.theme.class_color(class)))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(" Traces by status ({}) ", app.data.traces.len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(2);

    frame.render_widget(chart, area);
}
