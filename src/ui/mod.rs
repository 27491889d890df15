mod dashboard;
mod help;
mod helpers;
mod settings;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::app::{
    AccountField, AccountModal, App, AppView, CategoryField, CategoryModal, ConfirmDelete,
    DeleteAccountPopup, NoticeKind, TABS, TagModal,
};
use crate::icons;
use theme::Theme;

pub(crate) use helpers::format_amount;

/// Renders the entire UI for a single frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let body_text = match app.view {
        AppView::Dashboard => dashboard::build_dashboard_text(app),
        AppView::Settings => settings::build_settings_text(app),
        AppView::Help => help::build_help_text(),
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let header_lines = vec![Line::from(vec![
        Span::styled(
            "  Spendr  ",
            Style::default().fg(Color::Black).bg(Theme::brand()),
        ),
        Span::raw(" "),
        Span::styled(
            "expense tracker",
            Style::default()
                .fg(Theme::border())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  [{}]", app.options.backend_label),
            Style::default().fg(Theme::muted()),
        ),
    ])];
    let header = Paragraph::new(Text::from(header_lines))
        .alignment(Alignment::Left)
        .block(panel());
    frame.render_widget(header, layout[0]);

    let mut body_lines = vec![
        tabs_line(app),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", app.view.title()),
            Style::default()
                .fg(Theme::amount())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    body_lines.extend(body_text.lines);
    body_lines.push(Line::from(""));
    body_lines.push(Line::from(Span::styled(
        "----------------------------------------",
        Style::default().fg(Theme::muted()),
    )));
    body_lines.extend(keybinds_lines(app));
    let body = Paragraph::new(Text::from(body_lines))
        .style(Style::default().fg(Theme::text()))
        .alignment(Alignment::Left)
        .block(panel());
    frame.render_widget(body, layout[1]);

    let footer = Paragraph::new(Text::from(status_line(app)))
        .alignment(Alignment::Left)
        .block(panel());
    frame.render_widget(footer, layout[2]);

    if let Some(modal) = &app.category_modal {
        render_category_modal(frame, modal);
    }
    if let Some(modal) = &app.tag_modal {
        render_tag_modal(frame, modal);
    }
    if let Some(modal) = &app.account_modal {
        render_account_modal(frame, modal);
    }
    if let Some(confirm) = &app.confirm_delete {
        render_confirm_popup(frame, confirm);
    }
    if let Some(popup) = &app.delete_account_popup {
        render_delete_account_popup(frame, popup);
    }
}

fn panel() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Theme::border()))
}

fn popup_block(title: &str) -> Block<'static> {
    panel().title(format!(" {title} "))
}

fn field_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Theme::focus())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::text())
    }
}

fn label_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Theme::focus())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::muted())
    }
}

fn marker(active: bool) -> Span<'static> {
    Span::styled(
        if active { "> " } else { "  " },
        Style::default()
            .fg(Theme::marker())
            .add_modifier(Modifier::BOLD),
    )
}

fn popup_heading(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Theme::amount())
            .add_modifier(Modifier::BOLD),
    ))
}

fn error_line(error: Option<&str>) -> Option<Line<'_>> {
    error.map(|message| {
        Line::from(Span::styled(
            message,
            Style::default().fg(Theme::negative()),
        ))
    })
}

fn hint_line(hint: &str) -> Line<'_> {
    Line::from(Span::styled(hint, Style::default().fg(Theme::muted())))
}

fn render_category_modal(frame: &mut Frame, modal: &CategoryModal) {
    let area = centered_rect(60, 45, frame.area());
    frame.render_widget(Clear, area);

    let name_active = modal.field == CategoryField::Name;
    let icon_active = modal.field == CategoryField::Icon;

    let mut lines = vec![popup_heading(modal.title()), Line::from("")];
    lines.push(Line::from(vec![
        marker(name_active),
        Span::styled("Name: ", label_style(name_active)),
        Span::styled(modal.name.as_str(), field_style(name_active)),
    ]));
    lines.push(Line::from(""));

    let icon_value = match modal.selected_icon() {
        Some(icon) => format!("◀ {} {icon} ▶", icons::glyph(icon)),
        None => "◀ none ▶".to_string(),
    };
    lines.push(Line::from(vec![
        marker(icon_active),
        Span::styled("Icon: ", label_style(icon_active)),
        Span::styled(icon_value, field_style(icon_active)),
    ]));
    lines.push(Line::from(Span::styled(
        format!("  {} icons available", modal.icons.len()),
        Style::default().fg(Theme::muted()),
    )));
    if let Some(category) = &modal.editing {
        if category.is_income {
            lines.push(Line::from(Span::styled(
                "  Income category",
                Style::default().fg(Theme::positive()),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.extend(error_line(modal.error.as_deref()));
    lines.push(hint_line(
        "Type to edit name. Tab: switch field. Left/Right: pick icon. Enter: save. Esc: cancel.",
    ));

    let popup = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(popup_block("Category"));
    frame.render_widget(popup, area);
}

fn render_tag_modal(frame: &mut Frame, modal: &TagModal) {
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![popup_heading(modal.title()), Line::from("")];
    lines.push(Line::from(vec![
        Span::styled("Name: ", Style::default().fg(Theme::muted())),
        Span::styled(modal.name.as_str(), field_style(true)),
    ]));
    lines.push(Line::from(""));
    lines.extend(error_line(modal.error.as_deref()));
    lines.push(hint_line("Type to edit. Enter: save. Esc: cancel."));

    let popup = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(popup_block("Tag"));
    frame.render_widget(popup, area);
}

fn render_account_modal(frame: &mut Frame, modal: &AccountModal) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![popup_heading(modal.title()), Line::from("")];
    for field in [
        AccountField::Name,
        AccountField::Kind,
        AccountField::Provider,
        AccountField::Number,
    ] {
        let active = modal.field == field;
        lines.push(Line::from(vec![
            marker(active),
            Span::styled(format!("{}: ", field.label()), label_style(active)),
            Span::styled(modal.value(field), field_style(active)),
        ]));
    }
    lines.push(Line::from(""));
    lines.extend(error_line(modal.error.as_deref()));
    lines.push(hint_line(
        "Type to edit. Tab/Up/Down: switch field. Enter: save. Esc: cancel.",
    ));

    let popup = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(popup_block("Account"));
    frame.render_widget(popup, area);
}

fn render_confirm_popup(frame: &mut Frame, confirm: &ConfirmDelete) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        popup_heading("Confirm Delete"),
        Line::from(""),
        Line::from(Span::styled(
            format!("Delete {} '{}'?", confirm.section.noun(), confirm.name),
            Style::default().fg(Theme::text()),
        )),
        Line::from(Span::styled(
            "Are you sure? This cannot be undone.",
            Style::default().fg(Theme::warn()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Theme::muted())),
            Span::styled(
                "Y",
                Style::default()
                    .fg(Theme::focus())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to confirm or ", Style::default().fg(Theme::muted())),
            Span::styled(
                "N",
                Style::default()
                    .fg(Theme::focus())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("/", Style::default().fg(Theme::muted())),
            Span::styled(
                "ESC",
                Style::default()
                    .fg(Theme::focus())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to cancel", Style::default().fg(Theme::muted())),
        ]),
    ];

    let popup = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .block(popup_block("Confirm"));
    frame.render_widget(popup, area);
}

fn render_delete_account_popup(frame: &mut Frame, popup: &DeleteAccountPopup) {
    let area = centered_rect(60, 35, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        popup_heading("Delete My Account"),
        Line::from(""),
        Line::from(Span::styled(
            "This permanently removes your account and all of its data.",
            Style::default().fg(Theme::warn()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Password: ", Style::default().fg(Theme::muted())),
            Span::styled(popup.masked(), field_style(true)),
        ]),
        Line::from(""),
    ];
    lines.extend(error_line(popup.error.as_deref()));
    lines.push(hint_line("Enter: delete account. Esc: cancel."));

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(popup_block("Danger Zone"));
    frame.render_widget(widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn tabs_line(app: &App) -> Line<'static> {
    let selected = app.selected_tab_index();
    let mut spans = Vec::new();
    for (index, view) in TABS.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if selected == Some(index) {
            Style::default()
                .fg(Color::Black)
                .bg(Theme::focus())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::muted())
        };
        spans.push(Span::styled(format!(" {} ", view.title()), style));
    }
    Line::from(spans)
}

fn status_line(app: &App) -> Line<'_> {
    if let Some(notice) = &app.notice {
        let color = match notice.kind {
            NoticeKind::Info => Theme::focus(),
            NoticeKind::Success => Theme::positive(),
            NoticeKind::Error => Theme::negative(),
        };
        return Line::from(Span::styled(
            notice.message.as_str(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
    }
    if app.is_loading() {
        return Line::from(Span::styled(
            "⠋ Loading...",
            Style::default().fg(Theme::warn()),
        ));
    }
    Line::from(Span::styled(
        "● Ready",
        Style::default().fg(Theme::muted()),
    ))
}

fn keybinds_lines(app: &App) -> Vec<Line<'static>> {
    let (primary, secondary) = match app.view {
        AppView::Dashboard => (
            "Left/Right: Change month  e: Export chart",
            "d: Dashboard  s: Settings  r: Refresh  ?: Help  q: Quit",
        ),
        AppView::Settings => (
            "Tab: Next section  Up/Down: Select  a: Add  e: Edit  x: Delete  D: Delete my account",
            "esc: Back  r: Refresh  ?: Help  q: Quit",
        ),
        AppView::Help => ("Press ? or ESC to close this help screen", ""),
    };
    vec![
        Line::from(Span::styled(primary, Style::default().fg(Theme::focus()))),
        Line::from(Span::styled(secondary, Style::default().fg(Theme::muted()))),
    ]
}
