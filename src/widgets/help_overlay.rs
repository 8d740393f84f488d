use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::input::commands::COMMANDS;
use crate::theme;

const KEY_BINDINGS: &[(&str, &str)] = &[
    ("j / k / Up / Down", "Scroll one line"),
    ("gg / G", "Go to top / bottom (loads more)"),
    ("Ctrl+D / Ctrl+U", "Page down / up"),
    ("m / Enter", "Load the next page"),
    ("Ctrl+R", "Reload from the first page"),
    ("Esc", "Dismiss error"),
];

pub fn render(frame: &mut Frame, area: Rect) {
    let lines = help_lines();

    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(4));
    let modal_area = centered_rect(60, height, area);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::PURPLE))
        .title(" Help (? to close) ");

    frame.render_widget(Paragraph::new(lines).block(block), modal_area);
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(""), section("Navigation")];
    lines.extend(KEY_BINDINGS.iter().map(|(key, desc)| binding(key, desc)));

    lines.push(Line::from(""));
    lines.push(section("Commands"));
    for cmd in COMMANDS {
        let usage = if cmd.name == "open" {
            format!(":{} <base>/<table>/<record>", cmd.name)
        } else {
            format!(":{}", cmd.name)
        };
        lines.push(binding(&usage, cmd.description));
    }

    lines.push(Line::from(""));
    lines.push(section("General"));
    lines.push(binding("?", "Toggle this help"));
    lines.push(binding("q / Ctrl+C", "Quit"));
    lines
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", title),
        Style::default()
            .fg(theme::PURPLE)
            .add_modifier(Modifier::BOLD),
    ))
}

fn binding(key: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {:<32}", key), Style::default().fg(theme::YELLOW)),
        Span::styled(desc.to_string(), Style::default().fg(theme::TEXT)),
    ])
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .split(vertical[0]);
    horizontal[0]
}
