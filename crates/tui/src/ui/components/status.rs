use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{StatusLine, command::Level},
    ui::theme::Theme,
};

/// One-line status bar showing the latest notification.
pub fn render(frame: &mut Frame<'_>, area: Rect, status: Option<&StatusLine>, theme: &Theme) {
    let Some(status) = status else {
        return;
    };

    let (tag, color) = match status.notification.level {
        Level::Info => ("info", theme.positive),
        Level::Warning => ("warn", theme.warning),
    };
    let line = Line::from(vec![
        Span::styled(format!(" {tag} "), Style::default().fg(theme.background).bg(color)),
        Span::raw(" "),
        Span::styled(
            status.notification.message.clone(),
            Style::default().fg(color),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
