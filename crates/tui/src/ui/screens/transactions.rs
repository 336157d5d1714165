use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Row, Table, TableState},
};

use crate::{
    app::{component::Component, transactions::TransactionsView},
    ui::{
        components::{card::Card, money::styled_amount},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, view: &TransactionsView, title: &str, theme: &Theme) {
    let mut title = match view.filter().describe() {
        Some(filter) => format!("{title} · {filter}"),
        None => title.to_string(),
    };
    title.push_str(&format!(" ({}/{})", view.rows().len(), view.total_rows()));
    let card = Card::new(title, theme).focused(view.is_focused());

    let header = Row::new(["Date", "Description", "From", "To", "Category", "Amount"])
        .style(
            Style::default()
                .fg(theme.text_muted)
                .add_modifier(Modifier::BOLD),
        );

    let rows = view.rows().iter().map(|row| {
        let split = &row.split;
        let description = match &row.title {
            Some(title) if title != &split.description => format!("{title} / {}", split.description),
            _ => split.description.clone(),
        };
        let mut amount = vec![styled_amount(split.amount, &split.currency_code, theme)];
        if let (Some(foreign), Some(code)) = (split.foreign_amount, &split.foreign_currency_code) {
            amount.push(Span::styled(
                format!(" ({foreign:.2} {code})"),
                Style::default().fg(theme.dim),
            ));
        }
        Row::new(vec![
            Cell::from(Span::styled(
                split.date.format("%Y-%m-%d").to_string(),
                Style::default().fg(theme.dim),
            )),
            Cell::from(description),
            Cell::from(split.source_name.clone()),
            Cell::from(split.destination_name.clone()),
            Cell::from(split.category_name.clone().unwrap_or_default()),
            Cell::from(Line::from(amount).right_aligned()),
        ])
    });

    let widths = [
        Constraint::Length(10),
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Length(16),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(card.block())
        .column_spacing(1)
        .row_highlight_style(Style::default().bg(theme.selection));

    let mut state = TableState::default();
    if !view.rows().is_empty() {
        state.select(Some(view.selected()));
    }
    frame.render_stateful_widget(table, area, &mut state);
}
