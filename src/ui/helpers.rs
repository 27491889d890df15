use ratatui::style::Color;

use crate::color::{Rgb, resolve_color};
use crate::types::CategoryId;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn clamp_name(value: &str, width: usize) -> String {
    let value_len = value.chars().count();
    if value_len <= width {
        return format!("{value:<width$}", width = width);
    }
    let trimmed = value
        .chars()
        .take(width.saturating_sub(2))
        .collect::<String>();
    format!("{trimmed}..")
}

/// Terminal color for a category, same as the chart export uses.
pub fn category_color(name: &str, id: CategoryId) -> Color {
    let Rgb(r, g, b) = resolve_color(name, id).rgb();
    Color::Rgb(r, g, b)
}

/// Formats with Indian digit grouping, e.g. `₹12,34,567.50`.
pub fn format_amount(amount: f64, symbol: &str) -> String {
    let paise = (amount.abs() * 100.0).round() as u64;
    let whole = (paise / 100).to_string();
    let fraction = paise % 100;

    let grouped = if whole.len() <= 3 {
        whole
    } else {
        let (head, tail) = whole.split_at(whole.len() - 3);
        let mut groups = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (left, right) = rest.split_at(rest.len() - 2);
            groups.push(right);
            rest = left;
        }
        groups.push(rest);
        groups.reverse();
        format!("{},{tail}", groups.join(","))
    };

    let sign = if amount < 0.0 && paise > 0 { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{fraction:02}")
}

/// One-line sparkline, squeezed to `width` columns by taking bucket maxima.
pub fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let buckets: Vec<f64> = if values.len() <= width {
        values.to_vec()
    } else {
        let chunk = values.len().div_ceil(width);
        values
            .chunks(chunk)
            .map(|c| c.iter().copied().fold(0.0, f64::max))
            .collect()
    };
    let max = buckets.iter().copied().fold(0.0, f64::max);
    buckets
        .iter()
        .map(|value| {
            if max <= 0.0 {
                return SPARK_LEVELS[0];
            }
            let level = (value / max * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}

/// Horizontal bar proportional to `value / max`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

/// Last four characters of an account number, masked.
pub fn mask_account_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("••••{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_use_indian_grouping() {
        assert_eq!(format_amount(0.0, "₹"), "₹0.00");
        assert_eq!(format_amount(999.5, "₹"), "₹999.50");
        assert_eq!(format_amount(1234.0, "₹"), "₹1,234.00");
        assert_eq!(format_amount(1234567.891, "₹"), "₹12,34,567.89");
        assert_eq!(format_amount(-250.0, "$"), "-$250.00");
    }

    #[test]
    fn sparkline_scales_to_max() {
        assert_eq!(sparkline(&[0.0, 7.0, 14.0], 10), "▁▅█");
        assert_eq!(sparkline(&[0.0, 0.0], 10), "▁▁");
        assert_eq!(sparkline(&[1.0, 2.0, 3.0, 4.0], 2).chars().count(), 2);
    }

    #[test]
    fn bar_is_clamped() {
        assert_eq!(bar(5.0, 10.0, 10), "█████");
        assert_eq!(bar(20.0, 10.0, 4), "████");
        assert_eq!(bar(1.0, 0.0, 4), "");
    }

    #[test]
    fn account_numbers_show_last_four() {
        assert_eq!(mask_account_number("1234567890"), "••••7890");
        assert_eq!(mask_account_number("12"), "••••12");
    }

    #[test]
    fn curated_category_color_matches_chart() {
        assert_eq!(category_color("Food", 1), Color::Rgb(0x10, 0xB9, 0x81));
    }
}
