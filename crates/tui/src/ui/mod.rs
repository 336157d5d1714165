pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::app::{Dashboard, layout::STATUS_HEIGHT, view::View};

pub use terminal::{AppTerminal, restore_terminal, setup_terminal};
pub use theme::Theme;

use components::hints::{hint_separator, hints_to_spans};

pub fn render(frame: &mut Frame<'_>, dashboard: &Dashboard) {
    let theme = Theme::default();
    let area = frame.area();
    let layout = dashboard.layout();

    frame.render_widget(Block::default().style(Style::default().bg(theme.background)), area);

    let [top, body, legend, status] = Layout::vertical([
        Constraint::Length(layout.top_bar_height),
        Constraint::Min(0),
        Constraint::Length(layout.legend_height),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(area);

    components::tabs::render_tabs(
        frame,
        top,
        dashboard.view(),
        top_bar_status(dashboard, &theme),
        &theme,
    );
    render_body(frame, body, dashboard, &theme);
    render_legend(frame, legend, dashboard, &theme);
    components::status::render(frame, status, dashboard.status(), &theme);

    if dashboard.prompt().is_active() {
        screens::prompt::render(frame, area, dashboard.prompt(), &theme);
    }
}

fn top_bar_status(dashboard: &Dashboard, theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let pending = dashboard.loader().status().pending();
    if !pending.is_empty() {
        spans.push(Span::styled(
            format!("loading {}  ", pending.len()),
            Style::default().fg(theme.warning),
        ));
    }
    spans.push(Span::styled("◀ ", Style::default().fg(theme.dim)));
    spans.push(Span::styled(
        dashboard.period().label(),
        Style::default().fg(theme.text),
    ));
    spans.push(Span::styled(" ▶ ", Style::default().fg(theme.dim)));
    spans
}

fn render_body(frame: &mut Frame<'_>, area: Rect, dashboard: &Dashboard, theme: &Theme) {
    let layout = dashboard.layout();
    let [left, right] = Layout::horizontal([
        Constraint::Length(layout.left_panel_width),
        Constraint::Min(0),
    ])
    .areas(area);

    if left.width > 0 {
        let [summary, list] = Layout::vertical([
            Constraint::Length(layout.summary_height),
            Constraint::Min(0),
        ])
        .areas(left);

        let title = format!("Summary · {}", dashboard.period().label());
        screens::summary::render(frame, summary, dashboard.summary(), &title, theme);
        match dashboard.view() {
            View::Categories => {
                screens::entity_list::render(frame, list, dashboard.categories(), theme)
            }
            View::Expenses => screens::entity_list::render(frame, list, dashboard.expenses(), theme),
            View::Revenues => screens::entity_list::render(frame, list, dashboard.revenues(), theme),
            View::Liabilities => {
                screens::entity_list::render(frame, list, dashboard.liabilities(), theme)
            }
            View::Transactions | View::Assets | View::NewTransactionForm => {
                screens::entity_list::render(frame, list, dashboard.assets(), theme)
            }
        }
    }

    match dashboard.view() {
        View::NewTransactionForm => screens::form::render(frame, right, dashboard.form(), theme),
        _ => screens::transactions::render(
            frame,
            right,
            dashboard.transactions(),
            View::Transactions.label(),
            theme,
        ),
    }
}

fn render_legend(frame: &mut Frame<'_>, area: Rect, dashboard: &Dashboard, theme: &Theme) {
    let (local, global) = keymap::hints(dashboard.view());
    let mut first = vec![Span::raw(" ")];
    first.extend(hints_to_spans(local, theme));

    let lines = if dashboard.show_full_help() {
        let mut second = vec![Span::raw(" ")];
        second.extend(hints_to_spans(global, theme));
        vec![Line::from(first), Line::from(second)]
    } else {
        if !global.is_empty() {
            first.push(hint_separator(theme));
            first.extend(hints_to_spans(&global[global.len().saturating_sub(2)..], theme));
        }
        vec![Line::from(first)]
    };

    frame.render_widget(Paragraph::new(lines), area);
}
