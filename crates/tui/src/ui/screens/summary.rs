use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Row, Table},
};

use crate::{
    app::summary::SummaryPanel,
    ui::{
        components::{card::Card, money::styled_amount},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, summary: &SummaryPanel, title: &str, theme: &Theme) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let card = Card::new(title, theme);

    if summary.is_empty() {
        let empty = Row::new(vec![Cell::from(Span::styled(
            "no data",
            Style::default().fg(theme.dim),
        ))]);
        frame.render_widget(
            Table::new([empty], [Constraint::Fill(1)]).block(card.block()),
            area,
        );
        return;
    }

    let rows = summary.items().iter().map(|item| {
        let value = if item.formatted.is_empty() {
            styled_amount(item.value, &item.currency_code, theme)
        } else {
            let color = if item.value < 0.0 { theme.negative } else { theme.text };
            Span::styled(item.formatted.clone(), Style::default().fg(color))
        };
        Row::new(vec![
            Cell::from(Span::styled(item.title.clone(), Style::default().fg(theme.text_muted))),
            Cell::from(Line::from(value).right_aligned()),
        ])
    });
    let table = Table::new(rows, [Constraint::Fill(1), Constraint::Length(18)]).block(card.block());
    frame.render_widget(table, area);
}
