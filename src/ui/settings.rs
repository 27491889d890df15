use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{category_color, clamp_name, mask_account_number};
use super::theme::Theme;
use crate::api::SettingsData;
use crate::app::{App, Loadable, SETTINGS_LOAD_FAILED, SettingsSection};
use crate::icons;

pub fn build_settings_text(app: &App) -> Text<'_> {
    let mut lines = vec![section_tabs(app.settings.section), Line::from("")];

    match &app.settings.data {
        Loadable::Loading => lines.push(Line::from(Span::styled(
            "  Loading...",
            Style::default().fg(Theme::muted()),
        ))),
        Loadable::Failed => lines.push(Line::from(Span::styled(
            format!("  {SETTINGS_LOAD_FAILED}"),
            Style::default().fg(Theme::negative()),
        ))),
        Loadable::Loaded(data) => {
            let section = app.settings.section;
            let selected = app.settings.selected_index(section);
            let rows = match section {
                SettingsSection::Categories => category_rows(data),
                SettingsSection::Tags => tag_rows(data),
                SettingsSection::Accounts => account_rows(data),
            };
            if rows.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("  No {} yet. Press a to add one.", section.title().to_lowercase()),
                    Style::default().fg(Theme::muted()),
                )));
            }
            for (index, row) in rows.into_iter().enumerate() {
                lines.push(with_marker(row, index == selected));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Danger zone: ", Style::default().fg(Theme::negative())),
        Span::styled(
            "press D to delete your account",
            Style::default().fg(Theme::muted()),
        ),
    ]));

    Text::from(lines)
}

fn section_tabs(active: SettingsSection) -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (index, section) in SettingsSection::ALL.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Theme::muted())));
        }
        let style = if *section == active {
            Style::default()
                .fg(Theme::focus())
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Theme::muted())
        };
        spans.push(Span::styled(section.title(), style));
    }
    Line::from(spans)
}

fn with_marker(mut row: Vec<Span<'static>>, selected: bool) -> Line<'static> {
    let marker = if selected {
        Span::styled(
            "  > ",
            Style::default()
                .fg(Theme::marker())
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw("    ")
    };
    row.insert(0, marker);
    if selected {
        for span in row.iter_mut().skip(1) {
            span.style = span.style.add_modifier(Modifier::BOLD);
        }
    }
    Line::from(row)
}

fn category_rows(data: &SettingsData) -> Vec<Vec<Span<'static>>> {
    data.categories
        .iter()
        .map(|category| {
            let glyph = category
                .icon_name
                .as_deref()
                .map(icons::glyph)
                .unwrap_or(" ");
            let mut row = vec![
                Span::styled("●", Style::default().fg(category_color(&category.name, category.id))),
                Span::raw(format!(" {glyph} ")),
                Span::styled(
                    clamp_name(&category.name, 24),
                    Style::default().fg(Theme::text()),
                ),
            ];
            if category.is_income {
                row.push(Span::styled(
                    " income",
                    Style::default().fg(Theme::positive()),
                ));
            }
            row
        })
        .collect()
}

fn tag_rows(data: &SettingsData) -> Vec<Vec<Span<'static>>> {
    data.tags
        .iter()
        .map(|tag| {
            vec![
                Span::styled("# ", Style::default().fg(Theme::muted())),
                Span::styled(tag.name.clone(), Style::default().fg(Theme::text())),
            ]
        })
        .collect()
}

fn account_rows(data: &SettingsData) -> Vec<Vec<Span<'static>>> {
    data.accounts
        .iter()
        .map(|account| {
            let number = account
                .account_number
                .as_deref()
                .map(mask_account_number)
                .unwrap_or_default();
            vec![
                Span::styled(
                    clamp_name(&account.name, 20),
                    Style::default().fg(Theme::text()),
                ),
                Span::styled(
                    format!(" {} ", clamp_name(&account.kind, 12)),
                    Style::default().fg(Theme::amount()),
                ),
                Span::styled(
                    format!("{} ", clamp_name(&account.provider, 16)),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(number, Style::default().fg(Theme::muted())),
            ]
        })
        .collect()
}
