use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Row, Table, TableState},
};

use crate::{
    app::{component::Component, entity_list::{EntityList, SortMode}},
    ui::{
        components::{
            card::Card,
            money::{styled_amount, styled_amount_bold},
        },
        theme::Theme,
    },
};

pub fn render<E: Clone>(frame: &mut Frame<'_>, area: Rect, list: &EntityList<E>, theme: &Theme) {
    let mut title = list.title().to_string();
    if list.sort() == SortMode::ByValue {
        title.push_str(" ↓");
    }
    if !list.is_loaded() {
        title.push_str(" (loading)");
    }
    let card = Card::new(title, theme).focused(list.is_focused());

    let rows = list.rows().iter().map(|row| {
        let (label_style, amount) = if row.is_total() {
            (
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                styled_amount_bold(row.value, &row.currency, theme),
            )
        } else {
            (
                Style::default().fg(theme.text),
                styled_amount(row.value, &row.currency, theme),
            )
        };
        Row::new(vec![
            Cell::from(Span::styled(row.label.clone(), label_style)),
            Cell::from(Line::from(amount).right_aligned()),
        ])
    });

    let table = Table::new(rows, [Constraint::Fill(1), Constraint::Length(20)])
        .block(card.block())
        .row_highlight_style(Style::default().bg(theme.selection));

    let mut state = TableState::default();
    if list.is_focused() && !list.rows().is_empty() {
        state.select(Some(list.selected()));
    }
    frame.render_stateful_widget(table, area, &mut state);
}
