// Payment status chart.
// Renders the paid/unpaid breakdown as a bar chart with a freshness line.

use ratatui::{prelude::*, widgets::*};

use crate::metrics;
use crate::service::{Origin, StatusLookup};
use crate::state::{DashboardState, LoadingState};

use super::panels::{format_relative_time, render_error, render_loading};

/// Parse a `#rrggbb` color.
pub fn hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    Some(Color::Rgb(
        (value >> 16) as u8,
        (value >> 8) as u8,
        value as u8,
    ))
}

/// Human label for where the breakdown came from.
fn origin_label(lookup: &StatusLookup, revalidating: bool) -> (String, Color) {
    let age = format_relative_time(&lookup.computed_at);
    match lookup.origin {
        Origin::Fresh => (format!("em cache ({})", age), Color::Green),
        Origin::Stale if revalidating => (format!("desatualizado ({}), atualizando", age), Color::Yellow),
        Origin::Stale => (format!("desatualizado ({})", age), Color::Yellow),
        Origin::Computed => ("recalculado agora".to_string(), Color::Cyan),
    }
}

/// Render the status panel.
pub fn render_status(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Situação: {} ", state.scope_label()));

    let lookup = match &state.status {
        LoadingState::Idle | LoadingState::Loading => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_loading(frame, inner, "Calculando situação");
            return;
        }
        LoadingState::Error(e) => {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            render_error(frame, inner, e);
            return;
        }
        LoadingState::Loaded(lookup) => lookup,
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let bars: Vec<Bar> = lookup
        .breakdown
        .iter()
        .map(|bucket| {
            let color = hex_color(&bucket.color).unwrap_or(Color::White);
            Bar::default()
                .value(bucket.value)
                .label(Line::from(bucket.name.clone()))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(15)
        .bar_gap(4);
    frame.render_widget(chart, chunks[0]);

    let (label, color) = origin_label(lookup, state.revalidating);
    let footer = Line::from(vec![
        Span::styled(
            format!("Total: {}  ", metrics::total(&lookup.breakdown)),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(label, Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(footer), chunks[1]);
}
