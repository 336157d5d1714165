use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{app::view::View, ui::theme::Theme};

/// Renders the tab bar with the period and load state on the right.
pub fn render_tabs(
    frame: &mut Frame<'_>,
    area: Rect,
    active: View,
    right: Vec<Span<'static>>,
    theme: &Theme,
) {
    let mut spans = vec![Span::raw(" ")];

    for (i, view) in View::TABS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }

        let label = format!("{} {}", i + 1, view.label());
        if *view == active {
            spans.push(Span::styled("[", Style::default().fg(theme.accent)));
            spans.push(Span::styled(
                label,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("]", Style::default().fg(theme.accent)));
        } else {
            spans.push(Span::styled(label, Style::default().fg(theme.text_muted)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    frame.render_widget(Paragraph::new(Line::from(right)).right_aligned(), area);
}
