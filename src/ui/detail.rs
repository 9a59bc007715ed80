//! Detail overlay rendering.
//!
//! Displays a modal overlay with the selected group's description and its
//! member workers, including the raw status labels the backend reported.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::TIME_PLACEHOLDER;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 14;

/// Render the group detail as a modal overlay.
///
/// Shows the group's composite status, description, message, and one row
/// per member worker present in the current snapshot.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if the terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(ref snapshot) = app.snapshot else {
        return;
    };
    let Some(state) = app.selected_group_state() else {
        return;
    };
    let Some(group) = app.selected_group() else {
        return;
    };

    // Width: 90% of screen, clamped to [MIN_OVERLAY_WIDTH, 100]
    let overlay_width = (area.width * 90 / 100).clamp(MIN_OVERLAY_WIDTH, 100);
    // Height: 80% of screen, clamped to [MIN_OVERLAY_HEIGHT, 40]
    let overlay_height = (area.height * 80 / 100).clamp(MIN_OVERLAY_HEIGHT, 40);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(6), // Header with group info
        Constraint::Min(6),    // Member worker table
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    // ===== HEADER SECTION =====
    let status_style = app.theme.status_style(state.status);

    let mut header_lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {} ", state.label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} {}", state.status.symbol(), state.status.label()),
                status_style.add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  [{}]", state.mode.label()),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]),
        Line::from(format!(" {}", group.description)),
        Line::from(vec![
            Span::raw(" Last run: "),
            Span::styled(state.last_run.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("    Next run: "),
            Span::styled(state.next_run.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
    ];

    if let Some(ref message) = state.message {
        header_lines.push(Line::from(vec![
            Span::raw(" Message: "),
            Span::styled(message.clone(), Style::default().fg(app.theme.highlight)),
        ]));
    } else if state.overdue_minutes > 0 {
        header_lines.push(Line::from(vec![
            Span::raw(" Overdue by: "),
            Span::styled(
                format!("{} min", state.overdue_minutes),
                Style::default().fg(app.theme.overdue),
            ),
        ]));
    }

    let header_block = Block::default()
        .title(" Group Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let header = Paragraph::new(header_lines).block(header_block);
    frame.render_widget(header, chunks[0]);

    // ===== MEMBER WORKER TABLE =====
    let members: Vec<Row> = snapshot
        .workers_in_group(group)
        .map(|worker| {
            let status_style = app.theme.status_style(worker.status);
            Row::new(vec![
                Cell::from(worker.key.clone()),
                // Raw label, so statuses this client doesn't know still
                // show what the backend actually said.
                Cell::from(worker.status_label.clone()).style(status_style),
                Cell::from(
                    worker
                        .last_run
                        .as_ref()
                        .map(|s| s.display.clone())
                        .unwrap_or_else(|| TIME_PLACEHOLDER.to_string()),
                ),
                Cell::from(
                    worker
                        .next_run
                        .as_ref()
                        .map(|s| s.display.clone())
                        .unwrap_or_else(|| TIME_PLACEHOLDER.to_string()),
                ),
                Cell::from(worker.message.clone().unwrap_or_default()),
            ])
        })
        .collect();

    if members.is_empty() {
        let empty = Paragraph::new(" No worker records in the current report ")
            .style(Style::default().fg(app.theme.error))
            .block(
                Block::default()
                    .title(" Workers ")
                    .borders(Borders::ALL)
                    .border_type(app.theme.border_type)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        frame.render_widget(empty, chunks[1]);
    } else {
        let member_header = Row::new(vec![
            Cell::from("Worker"),
            Cell::from("Status"),
            Cell::from("Last run"),
            Cell::from("Next run"),
            Cell::from("Message"),
        ])
        .style(app.theme.header);

        let widths = [
            Constraint::Fill(2),
            Constraint::Min(9),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(2),
        ];

        let table = Table::new(members, widths).header(member_header).block(
            Block::default()
                .title(format!(" Workers ({}) ", group.keys.len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );

        frame.render_widget(table, chunks[1]);
    }

    // ===== FOOTER =====
    let footer = Paragraph::new(" Esc/Enter: close  ↑↓: other groups ")
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(footer, chunks[2]);
}
