use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Formats `value` with two decimals and thousands separators.
pub fn format_amount(value: f64) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && rounded != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

pub fn format_money(value: f64, currency: &str) -> String {
    if currency.is_empty() {
        format_amount(value)
    } else {
        format!("{} {currency}", format_amount(value))
    }
}

/// Creates a styled span for a money amount with semantic coloring.
#[must_use]
pub fn styled_amount(value: f64, currency: &str, theme: &Theme) -> Span<'static> {
    let color = if value > 0.0 {
        theme.positive
    } else if value < 0.0 {
        theme.negative
    } else {
        theme.text
    };
    Span::styled(format_money(value, currency), Style::default().fg(color))
}

/// Creates a styled span with bold modifier for emphasis (e.g., totals).
#[must_use]
pub fn styled_amount_bold(value: f64, currency: &str, theme: &Theme) -> Span<'static> {
    let span = styled_amount(value, currency, theme);
    let style = span.style.add_modifier(Modifier::BOLD);
    span.style(style)
}
