use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};

use crate::{
    app::prompt::Prompt,
    ui::{
        components::{card::Card, hints::hints_to_spans},
        keymap::PROMPT_HINTS,
        theme::Theme,
    },
};

/// Centered single-line input drawn over the dashboard.
pub fn render(frame: &mut Frame<'_>, area: Rect, prompt: &Prompt, theme: &Theme) {
    let (Some(label), Some(input)) = (prompt.label(), prompt.input()) else {
        return;
    };

    let width = (label.len() as u16 + 8).max(40).min(area.width);
    let [row] = Layout::vertical([Constraint::Length(4)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    let card = Card::new(label, theme).focused(true);
    let lines = vec![
        Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.accent)),
            Span::styled(format!("{input}▏"), Style::default().fg(theme.text)),
        ]),
        Line::from(hints_to_spans(PROMPT_HINTS, theme)),
    ];

    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(lines).block(card.block()), rect);
}
