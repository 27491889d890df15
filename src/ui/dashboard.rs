use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{bar, category_color, clamp_name, format_amount, sparkline};
use super::theme::Theme;
use crate::app::{App, DASHBOARD_LOAD_FAILED, DashboardContent, Loadable};
use crate::icons;
use crate::types::TransactionKind;

const TREND_WIDTH: usize = 62;
const BAR_WIDTH: usize = 20;

pub fn build_dashboard_text(app: &App) -> Text<'_> {
    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("  ◀ ", Style::default().fg(Theme::muted())),
        Span::styled(
            app.dashboard.month.label(),
            Style::default()
                .fg(Theme::amount())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", Style::default().fg(Theme::muted())),
    ]));
    lines.push(Line::from(""));

    match &app.dashboard.content {
        Loadable::Loading => lines.push(Line::from(Span::styled(
            "  Loading Dashboard...",
            Style::default().fg(Theme::muted()),
        ))),
        Loadable::Failed => lines.push(Line::from(Span::styled(
            format!("  {DASHBOARD_LOAD_FAILED}"),
            Style::default().fg(Theme::negative()),
        ))),
        Loadable::Loaded(content) => {
            let symbol = app.options.currency_symbol.as_str();
            lines.extend(kpi_lines(content, symbol));
            lines.push(Line::from(""));
            lines.extend(trend_lines(content));
            lines.push(Line::from(""));
            lines.extend(top_category_lines(content, symbol));
            lines.push(Line::from(""));
            lines.extend(recent_lines(content, symbol));
        }
    }

    Text::from(lines)
}

fn section_title(title: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default()
                .fg(Theme::border())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  {}", "─".repeat(title.chars().count())),
            Style::default().fg(Theme::muted()),
        )),
    ]
}

fn kpi_line(label: &str, value: Span<'static>) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {}", clamp_name(label, 18)),
            Style::default().fg(Theme::muted()),
        ),
        value,
    ])
}

fn kpi_lines(content: &DashboardContent, symbol: &str) -> Vec<Line<'static>> {
    let data = &content.data;
    let amount_style = Style::default()
        .fg(Theme::text())
        .add_modifier(Modifier::BOLD);

    let change = match data.percent_change_from_last_month {
        Some(change) if change > 0.0 => Span::styled(
            format!("▲ {change:.1}%"),
            Style::default().fg(Theme::negative()),
        ),
        Some(change) if change < 0.0 => Span::styled(
            format!("▼ {:.1}%", change.abs()),
            Style::default().fg(Theme::positive()),
        ),
        Some(_) => Span::styled("0.0%", Style::default().fg(Theme::muted())),
        None => Span::styled("n/a", Style::default().fg(Theme::muted())),
    };

    let mut lines = section_title("Overview");
    lines.push(kpi_line(
        "Total Spent",
        Span::styled(format_amount(data.total_spent, symbol), amount_style),
    ));
    lines.push(kpi_line(
        "Daily Average",
        Span::styled(format_amount(data.daily_average_spend, symbol), amount_style),
    ));
    lines.push(kpi_line(
        "Projected Spend",
        Span::styled(
            format_amount(data.projected_monthly_spend, symbol),
            amount_style,
        ),
    ));
    lines.push(kpi_line("vs Last Month", change));
    lines
}

fn trend_lines(content: &DashboardContent) -> Vec<Line<'static>> {
    let mut lines = section_title("Spending Trend");
    let values: Vec<f64> = content
        .data
        .spending_trend
        .iter()
        .map(|point| point.amount)
        .collect();
    if values.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No spending recorded",
            Style::default().fg(Theme::muted()),
        )));
        return lines;
    }
    lines.push(Line::from(Span::styled(
        format!("  {}", sparkline(&values, TREND_WIDTH)),
        Style::default().fg(Theme::amount()),
    )));
    if let (Some(first), Some(last)) = (
        content.data.spending_trend.first(),
        content.data.spending_trend.last(),
    ) {
        lines.push(Line::from(Span::styled(
            format!("  {} .. {}", first.date, last.date),
            Style::default().fg(Theme::muted()),
        )));
    }
    lines
}

fn top_category_lines(content: &DashboardContent, symbol: &str) -> Vec<Line<'static>> {
    let mut lines = section_title("Top Spending Categories");
    let top = &content.data.top_spending_categories;
    if top.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No categorized spending this month",
            Style::default().fg(Theme::muted()),
        )));
        return lines;
    }

    let max = top.iter().map(|c| c.amount).fold(0.0, f64::max);
    let total: f64 = top.iter().map(|c| c.amount).sum();
    for entry in top {
        let color = category_color(&entry.category, entry.id);
        let glyph = content
            .categories
            .iter()
            .find(|category| category.id == entry.id)
            .and_then(|category| category.icon_name.as_deref())
            .map(icons::glyph)
            .unwrap_or(" ");
        let share = if total > 0.0 {
            entry.amount / total * 100.0
        } else {
            0.0
        };
        lines.push(Line::from(vec![
            Span::styled("  ● ", Style::default().fg(color)),
            Span::raw(format!("{glyph} ")),
            Span::styled(
                clamp_name(&entry.category, 16),
                Style::default().fg(Theme::text()),
            ),
            Span::styled(
                format!("{:>14} ", format_amount(entry.amount, symbol)),
                Style::default().fg(Theme::amount()),
            ),
            Span::styled(
                format!("{:<width$}", bar(entry.amount, max, BAR_WIDTH), width = BAR_WIDTH),
                Style::default().fg(color),
            ),
            Span::styled(format!(" {share:>5.1}%"), Style::default().fg(Theme::muted())),
        ]));
    }
    lines
}

fn recent_lines(content: &DashboardContent, symbol: &str) -> Vec<Line<'static>> {
    let mut lines = section_title("Recent Transactions");
    let recent = &content.data.recent_transactions;
    if recent.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No transactions this month",
            Style::default().fg(Theme::muted()),
        )));
        return lines;
    }

    for txn in recent {
        let category = content
            .category(txn.category_id)
            .map(|category| category.name.as_str())
            .unwrap_or("Uncategorized");
        let (sign, amount_color) = match txn.kind {
            TransactionKind::Debit => ("-", Theme::negative()),
            TransactionKind::Credit => ("+", Theme::positive()),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {}  ", txn.txn_date.format("%d %b")),
                Style::default().fg(Theme::muted()),
            ),
            Span::styled(
                clamp_name(&txn.description, 28),
                Style::default().fg(Theme::text()),
            ),
            Span::styled(
                format!(" {} ", clamp_name(category, 16)),
                Style::default().fg(Theme::focus()),
            ),
            Span::styled(
                format!("{sign}{}", format_amount(txn.amount, symbol)),
                Style::default().fg(amount_color),
            ),
        ]));
    }
    lines
}
