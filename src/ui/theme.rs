//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::WorkerStatus;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for healthy workers.
    pub ok: Color,
    /// Color for the waiting family (waiting/cooldown/locked).
    pub waiting: Color,
    /// Color for overdue workers.
    pub overdue: Color,
    /// Color for errors and no-data groups.
    pub error: Color,
    /// Color for unknown statuses and de-emphasized text.
    pub muted: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            ok: Color::Green,
            waiting: Color::Yellow,
            overdue: Color::LightRed,
            error: Color::Red,
            muted: Color::Gray,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            ok: Color::Green,
            waiting: Color::Yellow,
            overdue: Color::LightRed,
            error: Color::Red,
            muted: Color::DarkGray,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a worker status
    pub fn status_style(&self, status: WorkerStatus) -> Style {
        match status {
            WorkerStatus::Ok => Style::default().fg(self.ok),
            WorkerStatus::Waiting | WorkerStatus::Cooldown | WorkerStatus::Locked => {
                Style::default().fg(self.waiting)
            }
            WorkerStatus::Overdue => Style::default().fg(self.overdue),
            WorkerStatus::Error => Style::default().fg(self.error).add_modifier(Modifier::BOLD),
            WorkerStatus::Unknown => Style::default().fg(self.muted),
        }
    }
}
