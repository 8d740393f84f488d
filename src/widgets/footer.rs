use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, desc)) in hints(app).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key, Style::default().fg(theme::PURPLE)));
        spans.push(Span::styled(
            format!(":{}", desc),
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_SURFACE));
    frame.render_widget(widget, area);
}

fn hints(app: &App) -> Vec<(&'static str, &'static str)> {
    match app.input_mode {
        InputMode::Command => vec![("Esc", "cancel"), ("Tab", "complete"), ("Enter", "execute")],
        InputMode::PendingG => vec![("g", "top")],
        InputMode::Normal => {
            let mut hints = vec![("j/k", "scroll"), ("gg/G", "top/bottom")];
            if app.store.can_load_more() {
                hints.push(("m", "more"));
            }
            hints.extend([("^R", "refresh"), (":", "cmd"), ("?", "help"), ("q", "quit")]);
            hints
        }
    }
}
