use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{App, InputMode};
use crate::input::commands::{matching_commands, COMMANDS};
use crate::theme;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    if app.input_mode != InputMode::Command {
        return;
    }

    let mut spans = vec![
        Span::styled(":", Style::default().fg(theme::YELLOW)),
        Span::styled(app.input_buffer.as_str(), Style::default().fg(theme::TEXT)),
    ];
    if let Some(ghost) = ghost_completion(&app.input_buffer) {
        spans.push(Span::styled(ghost, Style::default().fg(theme::TEXT_MUTED)));
    }
    spans.push(Span::styled("_", Style::default().fg(theme::TEXT_MUTED)));

    let widget = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_HIGHLIGHT));
    frame.render_widget(widget, area);
}

pub fn render_suggestions(app: &App, frame: &mut Frame, area: Rect) {
    if app.input_mode != InputMode::Command {
        return;
    }

    let widget = Paragraph::new(suggestion_line(&app.input_buffer))
        .style(Style::default().bg(theme::BG_SURFACE));
    frame.render_widget(widget, area);
}

/// Remaining characters of the first matching command, shown dimmed while
/// the command word is still being typed.
fn ghost_completion(buffer: &str) -> Option<&'static str> {
    if buffer.is_empty() || buffer.contains(' ') {
        return None;
    }
    let cmd = matching_commands(buffer).into_iter().next()?;
    cmd.name
        .strip_prefix(buffer)
        .filter(|rest| !rest.is_empty())
}

fn suggestion_line(buffer: &str) -> Line<'static> {
    if buffer.contains(' ') {
        return Line::from("");
    }

    let input_cmd = buffer.trim();
    let matches: Vec<_> = if input_cmd.is_empty() {
        COMMANDS.iter().collect()
    } else {
        matching_commands(input_cmd)
    };
    if matches.is_empty() {
        return Line::from(Span::styled(
            " No matching commands",
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }

    let mut spans = vec![Span::raw(" ")];
    for (i, cmd) in matches.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let name_style = if i == 0 {
            Style::default().fg(theme::CYAN)
        } else {
            Style::default().fg(theme::TEXT_DIM)
        };
        spans.push(Span::styled(format!(":{}", cmd.name), name_style));
        for alias in cmd.aliases {
            spans.push(Span::styled(
                format!("|{}", alias),
                Style::default().fg(theme::TEXT_MUTED),
            ));
        }
        spans.push(Span::styled(
            format!(" {}", cmd.description),
            Style::default().fg(theme::TEXT_MUTED),
        ));
    }
    Line::from(spans)
}
