use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{component::Component, new_transaction::{Field, NewTransactionForm}},
    ui::{components::card::Card, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, form: &NewTransactionForm, theme: &Theme) {
    let card = Card::new("New transaction", theme).focused(form.is_focused());

    let lines = Field::ALL
        .iter()
        .map(|field| {
            let active = *field == form.field();
            let label_style = if active {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_muted)
            };
            let value = match field {
                Field::Kind => format!("◀ {} ▶", form.value(*field)),
                _ if active => format!("{}▏", form.value(*field)),
                _ => form.value(*field).to_string(),
            };
            Line::from(vec![
                Span::styled(format!("{:>12}  ", field.label()), label_style),
                Span::styled(value, Style::default().fg(theme.text)),
            ])
        })
        .collect::<Vec<_>>();

    frame.render_widget(Paragraph::new(lines).block(card.block()), area);
}
