use std::cmp::min;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::model::Priority;

pub const BG_BASE: Color = Color::Rgb(14, 17, 23);
pub const BG_PANEL: Color = Color::Rgb(22, 26, 34);
pub const BG_ACCENT: Color = Color::Rgb(32, 37, 47);
pub const FG_ACCENT: Color = Color::Rgb(120, 161, 255);

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::A => Color::Rgb(239, 68, 68),
        Priority::B => Color::Rgb(249, 115, 22),
        Priority::C => Color::Rgb(14, 165, 233),
        Priority::D => Color::Rgb(161, 161, 170),
    }
}

pub fn build_help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("j / k or ↓ / ↑", "Move selection"),
        ("Home / End", "Jump to first / last task"),
        ("[ / ] or ← / →", "Previous / next day"),
        ("t", "Jump to today"),
        ("g", "View another date"),
        ("a", "Add a task"),
        ("e / Enter", "Edit selected task"),
        ("Space / d", "Toggle done"),
        ("x / Delete", "Delete task (with confirmation)"),
        ("c", "Carry incomplete tasks over to the next day"),
        ("i", "Import open tasks into an empty day"),
        ("r", "Refresh from storage"),
        ("h / ?", "Toggle this help overlay"),
        ("Esc", "Cancel/close overlays"),
        ("q / Ctrl+C", "Quit"),
    ]
}

pub fn accent_title(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_owned(),
        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
    )])
}
