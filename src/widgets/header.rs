use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let line = header_line(app, area.width);
    let widget = Paragraph::new(line).style(Style::default().bg(theme::BG_BAR));
    frame.render_widget(widget, area);
}

fn header_line(app: &App, width: u16) -> Line<'static> {
    let mut left_spans: Vec<Span> = vec![
        Span::styled(
            " rowlog ",
            Style::default()
                .fg(theme::PURPLE)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("| ", Style::default().fg(theme::TEXT_MUTED)),
        Span::styled(
            "History",
            Style::default()
                .fg(theme::TEXT)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(identity) = app.store.identity() {
        left_spans.push(Span::styled(" > ", Style::default().fg(theme::TEXT_MUTED)));
        left_spans.push(Span::styled(
            identity.to_string(),
            Style::default().fg(theme::TEXT_DIM),
        ));
    }

    let mut right_spans: Vec<Span> = Vec::new();
    let state = app.store.state();

    if state.loading {
        right_spans.push(Span::styled(
            "◌ loading",
            Style::default().fg(theme::YELLOW),
        ));
    } else if state.error.is_some() {
        right_spans.push(Span::styled("✗ failed", Style::default().fg(theme::RED)));
    } else if app.last_refresh.is_some() {
        right_spans.push(Span::styled("● synced", Style::default().fg(theme::GREEN)));
    }

    if app.store.identity().is_some() {
        right_spans.push(Span::styled(
            format!("  page {}/{}", state.page, state.total_pages),
            Style::default().fg(theme::PURPLE),
        ));
        right_spans.push(Span::styled(
            format!("  [{} changes]", state.entries.len()),
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }
    right_spans.push(Span::raw(" "));

    let left_width: usize = left_spans.iter().map(|s| s.width()).sum();
    let right_width: usize = right_spans.iter().map(|s| s.width()).sum();
    let gap = (width as usize).saturating_sub(left_width + right_width);

    let mut spans = left_spans;
    spans.push(Span::raw(" ".repeat(gap)));
    spans.extend(right_spans);
    Line::from(spans)
}
