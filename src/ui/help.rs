use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;

pub fn build_help_text() -> Text<'static> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Key bindings",
        Style::default()
            .fg(Theme::amount())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    lines.push(section_title("Global"));
    lines.extend(section_lines(&[
        "q: Quit",
        "?: Toggle help",
        "d: Dashboard",
        "s: Settings",
        "r: Reload current view",
        "esc: Back",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Dashboard"));
    lines.extend(section_lines(&[
        "Left/Right or [/]: Previous/next month",
        "e: Export the top categories chart as PNG",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Settings"));
    lines.extend(section_lines(&[
        "Tab/Shift+Tab: Switch between categories, tags and accounts",
        "Up/Down: Move selection",
        "a or n: Add",
        "e or Enter: Edit selected",
        "x or Delete: Delete selected",
        "D: Delete my account",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Popups"));
    lines.extend(section_lines(&[
        "Category: Tab switch field, Left/Right pick icon, Enter save, Esc cancel",
        "Account: Tab or Up/Down switch field, Enter save, Esc cancel",
        "Confirm: y/Enter confirm, n/Esc cancel",
    ]));

    Text::from(lines)
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(Theme::border())
            .add_modifier(Modifier::BOLD),
    ))
}

fn section_lines(items: &[&str]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            Line::from(Span::styled(
                format!("  - {item}"),
                Style::default().fg(Theme::text()),
            ))
        })
        .collect()
}
