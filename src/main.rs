use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use rowlog::action::Action;
use rowlog::app::{App, Effect, InputMode, Overlay};
use rowlog::client::{HistoryClient, HttpHistoryClient};
use rowlog::config::{Cli, ConfigFile};
use rowlog::event::{key_to_action, AppEvent, RawEventHandler};
use rowlog::i18n::Catalog;
use rowlog::widgets;
use rowlog::worker::{CliHandle, CliRequest, CliWorker};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Log to a file; stdout belongs to the terminal UI
    let _log_guard = match cli.log_file {
        Some(ref log_file) => {
            let file = std::fs::File::create(log_file)
                .wrap_err_with(|| format!("cannot create log file {}", log_file.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_writer(writer)
                .with_ansi(false)
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
                )
                .init();
            Some(guard)
        }
        None => None,
    };

    run_tui(cli).await
}

async fn run_tui(cli: Cli) -> Result<()> {
    let settings = cli.resolve(ConfigFile::load().unwrap_or_default())?;

    let mut catalog = Catalog::english();
    if let Some(ref path) = settings.strings {
        catalog.load_overrides(path)?;
    }

    let client: Arc<dyn HistoryClient> = Arc::new(HttpHistoryClient::new(
        &settings.api_url,
        settings.api_token.clone(),
        settings.timeout,
    )?);

    let mut app = App::new(catalog, settings.locale);

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (worker, cli_handle) = CliWorker::new(client, action_tx);
    tokio::spawn(worker.run());

    let effects = app.open(settings.identity.clone());
    handle_effects(effects, &cli_handle);

    let mut terminal = rowlog::tui::init()?;
    let mut events = RawEventHandler::new(Duration::from_secs(1));

    loop {
        terminal.draw(|frame| render(&mut app, frame))?;

        tokio::select! {
            Some(event) = events.next() => {
                let action = match event {
                    AppEvent::Key(key) => key_to_action(
                        key,
                        &app.input_mode,
                        &app.overlay,
                        &app.input_buffer,
                    ),
                    AppEvent::Tick => Some(Action::Tick),
                    // Redrawn at the top of the loop
                    AppEvent::Resize => None,
                };
                if let Some(action) = action {
                    let effects = app.update(action);
                    handle_effects(effects, &cli_handle);
                }
            }
            Some(action) = action_rx.recv() => {
                let effects = app.update(action);
                handle_effects(effects, &cli_handle);
            }
        }

        if app.should_quit {
            break;
        }
    }

    rowlog::tui::restore()?;
    tracing::info!("rowlog exited");

    Ok(())
}

fn render(app: &mut App, frame: &mut ratatui::Frame) {
    let area = frame.area();

    frame.render_widget(
        ratatui::widgets::Block::default()
            .style(ratatui::style::Style::default().bg(rowlog::theme::BG_DARK)),
        area,
    );

    let command_open = app.input_mode == InputMode::Command;
    let layout = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Fill(1),   // Timeline
        Constraint::Length(if command_open { 1 } else { 0 }),
        Constraint::Length(1), // Footer or command line
    ])
    .split(area);

    widgets::header::render(app, frame, layout[0]);
    widgets::timeline::render(app, frame, layout[1]);

    if command_open {
        widgets::command_input::render_suggestions(app, frame, layout[2]);
        widgets::command_input::render(app, frame, layout[3]);
    } else {
        widgets::footer::render(app, frame, layout[3]);
    }

    if app.overlay == Overlay::Help {
        widgets::help_overlay::render(frame, area);
    }

    widgets::error_toast::render(app, frame, area);
}

fn handle_effects(effects: Vec<Effect>, cli_handle: &CliHandle) {
    for effect in effects {
        match effect {
            Effect::LoadHistory(request) => cli_handle.send(CliRequest::LoadHistory(request)),
            Effect::Quit => {}
        }
    }
}
