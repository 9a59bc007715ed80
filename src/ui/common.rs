//! Common UI components shared across views.
//!
//! This module contains the header bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::WorkerStatus;

/// Render the header bar with overall worker health.
///
/// Displays: status indicator, overall label, group counts by health,
/// and when the backend assembled the report.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref snapshot) = app.snapshot else {
        let line = Line::from(vec![
            Span::styled(
                " SYNC DOCTOR ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    // Count groups by composite status
    let mut ok = 0;
    let mut waiting = 0;
    let mut overdue = 0;
    let mut errors = 0;

    for group in &snapshot.groups {
        match group.status {
            WorkerStatus::Error => errors += 1,
            WorkerStatus::Overdue => overdue += 1,
            s if s.is_waiting() => waiting += 1,
            _ => ok += 1,
        }
    }

    let status_style = app.theme.status_style(snapshot.overall.status);

    let line = Line::from(vec![
        Span::styled(" ● ", status_style),
        Span::styled("SYNC DOCTOR ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            snapshot.overall.label.clone(),
            status_style.add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(format!("{}", ok), Style::default().fg(app.theme.ok)),
        Span::raw(" ok "),
        if waiting > 0 {
            Span::styled(format!("{}", waiting), Style::default().fg(app.theme.waiting))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" waiting "),
        if overdue > 0 {
            Span::styled(format!("{}", overdue), Style::default().fg(app.theme.overdue))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" overdue "),
        if errors > 0 {
            Span::styled(
                format!("{}", errors),
                Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        },
        Span::raw(" err │ "),
        Span::raw(format!("checked {}", snapshot.checked_at)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows: polling state, time since last update, the source description,
/// and available controls. Transport errors and temporary status messages
/// take over the whole bar.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for a temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    // A failed fetch owns the status bar until the next good snapshot
    if let Some(err) = app.snapshot.as_ref().and_then(|s| s.error.as_deref()) {
        let paragraph = Paragraph::new(format!(" Error: {} | p:pause r:retry q:quit ", err))
            .style(Style::default().fg(app.theme.error));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if app.snapshot.is_some() {
        let age = app
            .last_update
            .map(|t| format!("{:.1}s ago", t.elapsed().as_secs_f64()))
            .unwrap_or_else(|| "never".to_string());
        let mode = if app.paused { "paused" } else { "live" };

        format!(
            " {} | Updated {} | {} | ↑↓:select Enter:detail p:pause r:refresh ?:help q:quit",
            mode,
            age,
            app.source_description(),
        )
    } else {
        format!(" Loading... | {} | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ↑/↓ j/k     Select group"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Group detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Polling",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  p         Pause/resume live polling"),
        Line::from("  r         One-shot refresh (while paused)"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  q         Quit"),
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

    // Center the help overlay - responsive to terminal size
    let help_width = 42u16.min(area.width.saturating_sub(4));
    let help_height = 20u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
