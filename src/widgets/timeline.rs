use std::fmt::Display;

use chrono::{Local, TimeZone, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::i18n::keys;
use crate::presenter::{EntryShape, EntryView, Presenter, CHANGE_ARROW};
use crate::store::HistoryStatus;
use crate::theme;

pub fn render(app: &mut App, frame: &mut Frame, area: Rect) {
    let presenter = Presenter::new(Local, app.locale, Utc::now());
    let lines = timeline_lines(app, &presenter);

    // Keep the scroll offset inside the content so `G` lands on the last page
    let max_scroll = lines.len().saturating_sub(area.height as usize);
    app.scroll = app.scroll.min(max_scroll.min(u16::MAX as usize) as u16);

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    frame.render_widget(paragraph, area);
}

pub fn timeline_lines<Tz>(app: &App, presenter: &Presenter<Tz>) -> Vec<Line<'static>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let catalog = &app.catalog;
    match app.store.status() {
        HistoryStatus::Idle => vec![muted(" No record selected. Use :open <base>/<table>/<record>")],
        HistoryStatus::Loading => vec![muted(format!(" {}", catalog.t(keys::LOADING)))],
        HistoryStatus::Failed(msg) => vec![Line::from(Span::styled(
            format!(" {}", msg),
            Style::default().fg(theme::RED),
        ))],
        HistoryStatus::Empty => vec![muted(format!(" {}", catalog.t(keys::NO_HISTORY)))],
        HistoryStatus::Ready => {
            let mut lines = vec![];
            for group in presenter.present(app.store.entries(), catalog) {
                if !lines.is_empty() {
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled(
                    format!(" {}", group.label),
                    Style::default()
                        .fg(theme::PURPLE)
                        .add_modifier(Modifier::BOLD),
                )));
                for item in &group.items {
                    lines.push(entry_line(item, app));
                }
            }

            if app.store.has_more() {
                lines.push(Line::from(""));
                if app.store.state().loading {
                    lines.push(muted(format!(" {}", catalog.t(keys::LOADING))));
                } else {
                    lines.push(Line::from(vec![
                        Span::styled(" [m] ", Style::default().fg(theme::YELLOW)),
                        Span::styled(
                            catalog.t(keys::LOAD_MORE).to_string(),
                            Style::default().fg(theme::TEXT),
                        ),
                    ]));
                }
            }
            lines
        }
    }
}

fn entry_line(item: &EntryView, app: &App) -> Line<'static> {
    let catalog = &app.catalog;
    let mut spans = vec![Span::styled(
        format!("   {:<20} ", item.timestamp),
        Style::default().fg(theme::TEXT_MUTED),
    )];

    match &item.shape {
        EntryShape::RecordCreated => {
            spans.push(banner(catalog.t(keys::RECORD_CREATED), theme::GREEN));
        }
        EntryShape::RecordDeleted => {
            spans.push(banner(catalog.t(keys::RECORD_DELETED), theme::RED));
        }
        EntryShape::FieldSet { field, after } => {
            spans.push(field_span(field));
            spans.push(verb_span(catalog.t(keys::FIELD_CREATED)));
            spans.push(Span::styled(after.clone(), Style::default().fg(theme::GREEN)));
        }
        EntryShape::FieldChanged {
            field,
            before,
            after,
        } => {
            spans.push(field_span(field));
            spans.push(verb_span(catalog.t(keys::FIELD_UPDATED)));
            spans.push(Span::styled(
                before.clone(),
                Style::default()
                    .fg(theme::TEXT_DIM)
                    .add_modifier(Modifier::CROSSED_OUT),
            ));
            spans.push(Span::styled(
                format!(" {} ", CHANGE_ARROW),
                Style::default().fg(theme::TEXT_MUTED),
            ));
            spans.push(Span::styled(after.clone(), Style::default().fg(theme::GREEN)));
        }
    }

    spans.push(Span::styled(
        format!("  {} ", catalog.t(keys::BY)),
        Style::default().fg(theme::TEXT_MUTED),
    ));
    spans.push(Span::styled(
        item.actor.clone(),
        Style::default().fg(theme::CYAN),
    ));

    Line::from(spans)
}

fn banner(label: &str, color: ratatui::style::Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", label),
        Style::default()
            .fg(theme::BG_DARK)
            .bg(color)
            .add_modifier(Modifier::BOLD),
    )
}

fn field_span(field: &str) -> Span<'static> {
    Span::styled(
        field.to_string(),
        Style::default()
            .fg(theme::TEXT)
            .add_modifier(Modifier::BOLD),
    )
}

fn verb_span(verb: &str) -> Span<'static> {
    Span::styled(format!(" {}: ", verb), Style::default().fg(theme::TEXT_DIM))
}

fn muted(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default().fg(theme::TEXT_MUTED),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::app::Effect;
    use crate::domain::{HistoryAction, HistoryPage, RecordIdentity, WHOLE_RECORD_FIELD};
    use crate::i18n::Catalog;
    use crate::store::LoadRequest;
    use crate::testing::{actor, at, entry, update};
    use chrono::Locale;
    use serde_json::json;

    fn text(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect()
    }

    fn presenter() -> Presenter<Utc> {
        Presenter::new(Utc, Locale::en_US, at(2026, 10, 18, 12, 0))
    }

    fn opened() -> (App, LoadRequest) {
        let mut app = App::new(Catalog::english(), Locale::en_US);
        let effects = app.open(RecordIdentity::new("bse1", "tbl1", "rec-1"));
        let Some(Effect::LoadHistory(request)) = effects.into_iter().next() else {
            panic!("expected a history load");
        };
        (app, request)
    }

    fn deliver(app: &mut App, request: &LoadRequest, page: HistoryPage) {
        app.update(Action::HistoryLoaded(request.ticket, page));
    }

    #[test]
    fn empty_history_shows_empty_message_without_load_more() {
        let (mut app, request) = opened();
        deliver(
            &mut app,
            &request,
            HistoryPage {
                records: vec![],
                total_pages: Some(1),
            },
        );

        let rendered = text(&timeline_lines(&app, &presenter()));
        assert_eq!(rendered, vec![" No history yet".to_string()]);
    }

    #[test]
    fn failed_initial_load_shows_error_only() {
        let (mut app, request) = opened();
        app.update(Action::HistoryLoadFailed(request.ticket, "refused".to_string()));

        let rendered = text(&timeline_lines(&app, &presenter()));
        assert_eq!(rendered, vec![" Failed to load history".to_string()]);
    }

    #[test]
    fn loading_state_uses_catalog_label() {
        let (app, _) = opened();
        let rendered = text(&timeline_lines(&app, &presenter()));
        assert_eq!(rendered, vec![" Loading history...".to_string()]);
    }

    #[test]
    fn created_record_renders_banner_with_actor() {
        let (mut app, request) = opened();
        let mut created = entry(1);
        created.action = HistoryAction::Create;
        created.field_id = WHOLE_RECORD_FIELD.to_string();
        created.changed_by = Some(actor(Some("Alice"), None, None));
        deliver(
            &mut app,
            &request,
            HistoryPage {
                records: vec![created],
                total_pages: Some(1),
            },
        );

        let rendered = text(&timeline_lines(&app, &presenter()));
        assert_eq!(rendered[0], " October 18, 2026");
        assert!(rendered[1].contains(" Record created "));
        assert!(rendered[1].ends_with("by Alice"));
        assert_eq!(rendered.len(), 2);
    }

    #[test]
    fn update_renders_both_values_and_load_more_when_pages_remain() {
        let (mut app, request) = opened();
        deliver(
            &mut app,
            &request,
            HistoryPage {
                records: vec![update(1, at(2026, 10, 17, 8, 15), json!("Old"), json!("New"))],
                total_pages: Some(3),
            },
        );

        let rendered = text(&timeline_lines(&app, &presenter()));
        assert_eq!(rendered[0], " October 17, 2026");
        assert!(rendered[1].contains("Status changed: Old → New"));
        assert_eq!(rendered.last().map(String::as_str), Some(" [m] Load more"));
    }
}
