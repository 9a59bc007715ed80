//! Group summary table rendering.
//!
//! Displays one row per configured group: composite status, last and next
//! run, mode, overdue magnitude, and the first member message.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;

/// Render the group table.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let Some(ref snapshot) = app.snapshot else {
        return;
    };

    let header = Row::new(vec![
        Cell::from("Group"),
        Cell::from("Status"),
        Cell::from("Last run"),
        Cell::from("Next run"),
        Cell::from("Mode"),
        Cell::from("Overdue"),
        Cell::from("Message"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = snapshot
        .groups
        .iter()
        .map(|group| {
            let status_style = app.theme.status_style(group.status);

            let overdue = if group.overdue_minutes > 0 {
                format!("{}m", group.overdue_minutes)
            } else {
                "-".to_string()
            };
            let overdue_style = if group.overdue_minutes > 0 {
                Style::default().fg(app.theme.overdue)
            } else {
                Style::default().add_modifier(Modifier::DIM)
            };

            let mode_style = Style::default().add_modifier(Modifier::DIM);

            Row::new(vec![
                Cell::from(group.label.clone()),
                Cell::from(group.status.symbol()).style(status_style),
                Cell::from(group.last_run.clone()),
                Cell::from(group.next_run.clone()),
                Cell::from(group.mode.label()).style(mode_style),
                Cell::from(overdue).style(overdue_style),
                Cell::from(group.message.clone().unwrap_or_default()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2),  // Group - widest
        Constraint::Min(7),   // Status
        Constraint::Fill(1),  // Last run
        Constraint::Fill(1),  // Next run
        Constraint::Min(7),   // Mode
        Constraint::Min(8),   // Overdue
        Constraint::Fill(2),  // Message
    ];

    let selected = app.selected_group_index.min(snapshot.groups.len().saturating_sub(1));

    let position_info = if !snapshot.groups.is_empty() {
        format!(" [{}/{}]", selected + 1, snapshot.groups.len())
    } else {
        String::new()
    };

    let title = format!(" Groups ({}){} ", snapshot.groups.len(), position_info);

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

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
