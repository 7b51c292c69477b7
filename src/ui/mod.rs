// UI module for rendering the TUI.
// Contains the header, status chart, side panels, status bar and help overlay.

mod chart;
mod panels;

use ratatui::{prelude::*, widgets::*};

use crate::state::DashboardState;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, state: &DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, state, chunks[0]);
    draw_content(frame, state, chunks[1]);
    draw_status_bar(frame, state, chunks[2]);

    // Help overlay (rendered last, on top of everything)
    if state.show_help {
        draw_help_overlay(frame);
    }
}

fn draw_header(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let header = Line::from(vec![
        Span::styled(
            state.club_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("  │  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("◀ {} ▶", state.period),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled("  │  ", Style::default().fg(Color::DarkGray)),
        Span::raw(state.scope_label().to_string()),
    ]);

    let widget = Paragraph::new(header).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" clubdues ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
    );
    frame.render_widget(widget, area);
}

fn draw_content(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    chart::render_status(frame, state, columns[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(columns[1]);

    panels::render_summary(frame, &state.summary, side[0]);
    panels::render_announcements(frame, &state.announcements, side[1]);
}

fn draw_status_bar(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let line = match &state.notice {
        Some(notice) => Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => {
            let mut hints = Vec::new();
            for (key, action) in [
                ("←/→", "mês"),
                ("m", "associado"),
                ("r", "atualizar"),
                ("e", "exportar"),
                ("?", "ajuda"),
                ("q", "sair"),
            ] {
                hints.push(Span::styled(
                    format!(" {} ", key),
                    Style::default().fg(Color::Cyan),
                ));
                hints.push(Span::styled(
                    format!("{} ", action),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(hints)
        }
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width: u16 = 46u16.min(area.width);
    let popup_height: u16 = 13u16.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let shortcut = |keys: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(keys, Style::default().fg(Color::Cyan)),
            Span::raw(text),
        ])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Atalhos",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        shortcut("  ←/→ ou h/l    ", "Mês anterior / seguinte"),
        shortcut("  m             ", "Alternar associado"),
        shortcut("  r             ", "Recalcular situação"),
        shortcut("  e             ", "Exportar relatório"),
        shortcut("  Esc           ", "Fechar aviso / ajuda"),
        shortcut("  ?             ", "Mostrar/ocultar ajuda"),
        shortcut("  q             ", "Sair"),
        Line::from(""),
        Line::from(vec![
            Span::styled("Pressione ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" para fechar", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Ajuda ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}
