// Side panels: financial summary and announcements.
// Also the shared loading, error and empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::backend::Announcement;
use crate::report::{FinancialSummary, format_currency};
use crate::state::LoadingState;

/// Format a timestamp as relative time (e.g., "2h atrás").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d atrás", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h atrás", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}min atrás", duration.num_minutes())
    } else {
        "agora".to_string()
    }
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an error message.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(format!("❌ {}\n\nPressione r para tentar de novo", error))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

fn summary_line(label: &str, amount: f64, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<12}", label), Style::default().fg(Color::Gray)),
        Span::styled(format_currency(amount), Style::default().fg(color)),
    ])
}

/// Render the financial summary panel.
pub fn render_summary(frame: &mut Frame, summary: &LoadingState<FinancialSummary>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Resumo ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match summary {
        LoadingState::Idle | LoadingState::Loading => render_loading(frame, inner, "Carregando"),
        LoadingState::Error(e) => render_error(frame, inner, e),
        LoadingState::Loaded(summary) => {
            let balance_color = if summary.balance < 0.0 {
                Color::Red
            } else {
                Color::Green
            };
            let lines = vec![
                summary_line("Receitas", summary.income, Color::Green),
                summary_line("Em aberto", summary.pending, Color::Yellow),
                summary_line("Despesas", summary.expenses, Color::Red),
                summary_line("Saldo", summary.balance, balance_color),
            ];
            frame.render_widget(Paragraph::new(lines), inner);
        }
    }
}

/// Render the announcements list.
pub fn render_announcements(
    frame: &mut Frame,
    announcements: &LoadingState<Vec<Announcement>>,
    area: Rect,
) {
    let block = Block::default().borders(Borders::ALL).title(" Avisos ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match announcements {
        LoadingState::Idle | LoadingState::Loading => render_loading(frame, inner, "Carregando"),
        LoadingState::Error(e) => render_error(frame, inner, e),
        LoadingState::Loaded(items) if items.is_empty() => {
            render_empty(frame, inner, "Nenhum aviso")
        }
        LoadingState::Loaded(items) => {
            let list_items: Vec<ListItem> = items
                .iter()
                .map(|a| {
                    ListItem::new(vec![
                        Line::from(vec![
                            Span::styled(
                                a.title.clone(),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                            Span::styled(
                                format!("  {}", format_relative_time(&a.created_at)),
                                Style::default().fg(Color::DarkGray),
                            ),
                        ]),
                        Line::from(Span::styled(
                            a.content.lines().next().unwrap_or_default().to_string(),
                            Style::default().fg(Color::Gray),
                        )),
                    ])
                })
                .collect();
            frame.render_widget(List::new(list_items), inner);
        }
    }
}
