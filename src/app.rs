use std::time::{Duration, Instant};

use chrono::Locale;

use crate::action::Action;
use crate::domain::RecordIdentity;
use crate::i18n::Catalog;
use crate::nav::{format_record_link, parse_record_target};
use crate::store::{HistoryStore, LoadRequest};

const ERROR_TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    PendingG,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadHistory(LoadRequest),
    Quit,
}

pub struct App {
    pub input_mode: InputMode,
    pub overlay: Overlay,

    pub store: HistoryStore,
    pub catalog: Catalog,
    pub locale: Locale,

    // Timeline scroll, in rendered lines
    pub scroll: u16,

    pub input_buffer: String,

    pub should_quit: bool,
    pub last_error: Option<(String, Instant)>,
    pub last_refresh: Option<Instant>,
}

impl App {
    pub fn new(catalog: Catalog, locale: Locale) -> Self {
        Self {
            input_mode: InputMode::Normal,
            overlay: Overlay::None,

            store: HistoryStore::new(),
            catalog,
            locale,

            scroll: 0,

            input_buffer: String::new(),

            should_quit: false,
            last_error: None,
            last_refresh: None,
        }
    }

    /// Binds the view to `identity`. Re-opening the record already shown
    /// does nothing; use [`Action::Refresh`] to reload it.
    pub fn open(&mut self, identity: RecordIdentity) -> Vec<Effect> {
        if self.store.identity() == Some(&identity) {
            return vec![];
        }
        tracing::info!(
            record = %identity,
            link = %format_record_link(&identity),
            "opening record history"
        );
        self.scroll = 0;
        vec![Effect::LoadHistory(self.store.reset(identity))]
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        // Clear stale error toasts
        if let Some((_, at)) = &self.last_error {
            if at.elapsed() > ERROR_TOAST_TTL {
                self.last_error = None;
            }
        }

        match action {
            // Navigation
            Action::NavigateUp => {
                self.scroll = self.scroll.saturating_sub(1);
                vec![]
            }
            Action::NavigateDown => {
                self.scroll = self.scroll.saturating_add(1);
                vec![]
            }
            Action::NavigateTop => {
                self.input_mode = InputMode::Normal;
                self.scroll = 0;
                vec![]
            }
            Action::NavigateBottom => {
                self.scroll = u16::MAX;
                self.load_more()
            }
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(self.page_height());
                vec![]
            }
            Action::PageDown => {
                self.scroll = self.scroll.saturating_add(self.page_height());
                vec![]
            }
            Action::Back => {
                self.input_mode = InputMode::Normal;
                vec![]
            }

            // Vim chord
            Action::EnterPendingG => {
                self.input_mode = InputMode::PendingG;
                vec![]
            }

            // History
            Action::LoadMore => self.load_more(),
            Action::OpenRecord(identity) => self.open(identity),

            // UI
            Action::OpenCommandInput => {
                self.input_mode = InputMode::Command;
                self.input_buffer.clear();
                vec![]
            }
            Action::CloseOverlay => {
                if self.overlay != Overlay::None {
                    self.overlay = Overlay::None;
                } else if self.input_mode != InputMode::Normal {
                    self.input_mode = InputMode::Normal;
                    self.input_buffer.clear();
                }
                vec![]
            }
            Action::SubmitCommandInput(cmd) => {
                self.input_mode = InputMode::Normal;
                let effects = self.execute_command(&cmd);
                self.input_buffer.clear();
                effects
            }
            Action::UpdateInputBuffer(buf) => {
                self.input_buffer = buf;
                vec![]
            }
            Action::ToggleHelp => {
                self.overlay = if self.overlay == Overlay::Help {
                    Overlay::None
                } else {
                    Overlay::Help
                };
                vec![]
            }

            // Data responses
            Action::HistoryLoaded(ticket, page) => {
                if self.store.apply_loaded(ticket, page) {
                    self.last_refresh = Some(Instant::now());
                }
                vec![]
            }
            Action::HistoryLoadFailed(ticket, reason) => {
                self.store.apply_failed(ticket, &reason);
                vec![]
            }

            // App control
            Action::Refresh => match self.store.refresh() {
                Some(request) => {
                    self.scroll = 0;
                    vec![Effect::LoadHistory(request)]
                }
                None => vec![],
            },
            Action::Quit => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            Action::Tick => vec![],
            Action::ClearError => {
                self.last_error = None;
                vec![]
            }
        }
    }

    fn load_more(&mut self) -> Vec<Effect> {
        match self.store.load_more() {
            Some(request) => vec![Effect::LoadHistory(request)],
            None => vec![],
        }
    }

    fn execute_command(&mut self, cmd: &str) -> Vec<Effect> {
        let parts: Vec<&str> = cmd.trim().splitn(2, ' ').collect();
        let command = parts[0].to_lowercase();
        let args = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

        match command.as_str() {
            "open" | "o" => match args {
                Some(target) => match parse_record_target(target) {
                    Ok(identity) => self.open(identity),
                    Err(err) => {
                        self.show_error(format!("invalid record: {}", err));
                        vec![]
                    }
                },
                None => {
                    self.show_error("usage: :open <base>/<table>/<record>".to_string());
                    vec![]
                }
            },
            "refresh" | "r" => self.update(Action::Refresh),
            "more" | "m" => self.load_more(),
            "quit" | "q" => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            "help" | "h" => {
                self.overlay = Overlay::Help;
                vec![]
            }
            _ => {
                self.show_error(format!("unknown command: {}", command));
                vec![]
            }
        }
    }

    fn show_error(&mut self, msg: String) {
        self.last_error = Some((msg, Instant::now()));
    }

    fn page_height(&self) -> u16 {
        20 // approximate; could be made dynamic
    }
}
