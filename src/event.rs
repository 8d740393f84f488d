use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::app::{InputMode, Overlay};

pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Forwards terminal input and periodic ticks to the UI loop.
pub struct RawEventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl RawEventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick = tokio::time::interval(tick_rate);

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if tx.send(AppEvent::Tick).is_err() {
                            break;
                        }
                    }
                    event = reader.next() => {
                        let forwarded = match event {
                            Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                                tx.send(AppEvent::Key(key))
                            }
                            Some(Ok(Event::Resize(_, _))) => tx.send(AppEvent::Resize),
                            Some(Ok(_)) => Ok(()),
                            Some(Err(e)) => {
                                tracing::error!("terminal event stream failed: {}", e);
                                break;
                            }
                            None => break,
                        };
                        if forwarded.is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Map a key event to an action based on current app state
pub fn key_to_action(
    key: KeyEvent,
    input_mode: &InputMode,
    overlay: &Overlay,
    input_buffer: &str,
) -> Option<Action> {
    if let Overlay::Help = overlay {
        return match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Some(Action::ToggleHelp),
            _ => None,
        };
    }

    match input_mode {
        InputMode::Command => {
            return match key.code {
                KeyCode::Esc => Some(Action::CloseOverlay),
                KeyCode::Enter => Some(Action::SubmitCommandInput(input_buffer.to_string())),
                KeyCode::Tab => {
                    // Tab completion: fill with first matching command
                    let input_cmd = input_buffer.split_whitespace().next().unwrap_or("");
                    let matches = crate::input::commands::matching_commands(input_cmd);
                    matches
                        .first()
                        .map(|cmd| Action::UpdateInputBuffer(format!("{} ", cmd.name)))
                }
                KeyCode::Backspace => {
                    let mut buf = input_buffer.to_string();
                    buf.pop();
                    Some(Action::UpdateInputBuffer(buf))
                }
                KeyCode::Char(c) => {
                    let mut buf = input_buffer.to_string();
                    buf.push(c);
                    Some(Action::UpdateInputBuffer(buf))
                }
                _ => None,
            };
        }
        InputMode::PendingG => {
            return match key.code {
                KeyCode::Char('g') => Some(Action::NavigateTop),
                _ => Some(Action::Back), // Cancel the pending chord
            };
        }
        InputMode::Normal => {}
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('d') => Some(Action::PageDown),
            KeyCode::Char('u') => Some(Action::PageUp),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char(':') => Some(Action::OpenCommandInput),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::NavigateDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::NavigateUp),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::EnterPendingG),
        KeyCode::Char('G') | KeyCode::End => Some(Action::NavigateBottom),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Char('m') | KeyCode::Enter => Some(Action::LoadMore),
        KeyCode::Esc => Some(Action::ClearError),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn normal_mode_keys() {
        let map = |code| key_to_action(press(code), &InputMode::Normal, &Overlay::None, "");
        assert!(matches!(map(KeyCode::Char('m')), Some(Action::LoadMore)));
        assert!(matches!(map(KeyCode::Char('G')), Some(Action::NavigateBottom)));
        assert!(matches!(map(KeyCode::Char(':')), Some(Action::OpenCommandInput)));
        assert!(map(KeyCode::Char('z')).is_none());

        let refresh = key_to_action(
            KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL),
            &InputMode::Normal,
            &Overlay::None,
            "",
        );
        assert!(matches!(refresh, Some(Action::Refresh)));
    }

    #[test]
    fn command_mode_edits_buffer_and_completes() {
        let typed = key_to_action(press(KeyCode::Char('n')), &InputMode::Command, &Overlay::None, "ope");
        assert!(matches!(typed, Some(Action::UpdateInputBuffer(ref b)) if b == "open"));

        let completed = key_to_action(press(KeyCode::Tab), &InputMode::Command, &Overlay::None, "op");
        assert!(matches!(completed, Some(Action::UpdateInputBuffer(ref b)) if b == "open "));

        let submitted =
            key_to_action(press(KeyCode::Enter), &InputMode::Command, &Overlay::None, "refresh");
        assert!(matches!(submitted, Some(Action::SubmitCommandInput(ref c)) if c == "refresh"));
    }

    #[test]
    fn help_overlay_swallows_other_keys() {
        let action = key_to_action(press(KeyCode::Char('m')), &InputMode::Normal, &Overlay::Help, "");
        assert!(action.is_none());
        let close = key_to_action(press(KeyCode::Esc), &InputMode::Normal, &Overlay::Help, "");
        assert!(matches!(close, Some(Action::ToggleHelp)));
    }

    #[test]
    fn pending_g_chord() {
        let top = key_to_action(press(KeyCode::Char('g')), &InputMode::PendingG, &Overlay::None, "");
        assert!(matches!(top, Some(Action::NavigateTop)));
        let cancel = key_to_action(press(KeyCode::Char('x')), &InputMode::PendingG, &Overlay::None, "");
        assert!(matches!(cancel, Some(Action::Back)));
    }
}
