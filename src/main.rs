use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tunebar::app::cli::Args;
use tunebar::app::input_handler::{self, ViewState};
use tunebar::app::{AppConfig, AppEvent, Session, UiEvent};
use tunebar::catalog::CatalogClient;
use tunebar::library::PlaylistManager;
use tunebar::player::RodioBackend;
use tunebar::theme;
use tunebar::ui::{self, Panel};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Daily rolling log file; the TUI owns stdout so nothing goes to the terminal.
fn init_logging(level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("tunebar")
        .join("logs");
    let file_appender = tracing_appender::rolling::daily(&log_dir, "tunebar.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(false)
        .init();
    guard
}

fn load_config(args: &Args) -> AppConfig {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    };
    if let Some(endpoint) = &args.endpoint {
        config.search_endpoint = endpoint.clone();
    }
    if let Some(library) = &args.library {
        config.library_path = Some(library.clone());
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();

    let args = Args::parse();

    if args.generate_config {
        println!("{}", toml::to_string_pretty(&AppConfig::default())?);
        return Ok(());
    }

    let _guard = init_logging(&args.log_level);
    info!("tunebar v{} starting", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args);
    let theme = theme::load_current_theme();

    // 1. Collaborators
    let catalog = CatalogClient::new(&config.search_endpoint, config.result_limit, &config.user_agent)
        .context("building HTTP client")?;
    let backend = RodioBackend::new(&config.user_agent);
    let library = PlaylistManager::open(config.library_file());

    let (tx, rx) = mpsc::unbounded_channel();
    let keys = config.keys.clone();
    let mut session = Session::new(config, Arc::new(catalog), Box::new(backend), library, tx.clone());

    // 2. Input Event Task
    let tx_input = tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if tx_input.send(AppEvent::Input(event)).is_err() {
                break;
            }
        }
    });

    let mut view = ViewState::default();
    if let Some(query) = args.query.as_deref().filter(|q| !q.trim().is_empty()) {
        view.search = query.to_string();
        session.handle(AppEvent::Ui(UiEvent::SearchChanged(view.search.clone())));
    }

    // 3. Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run(&mut terminal, &mut session, &mut view, &theme, &keys, rx).await;

    // 4. Teardown
    session.shutdown();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!("event loop failed: {:#}", e);
    }
    info!("tunebar exiting");
    result
}

async fn run(
    terminal: &mut Tui,
    session: &mut Session,
    view: &mut ViewState,
    theme: &theme::Theme,
    keys: &tunebar::app::keys::KeyConfig,
    mut rx: mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    // Animations (cover slide, toast) need frames even without events
    let mut frame_tick = tokio::time::interval(Duration::from_millis(50));

    while view.is_running {
        view.clamp(session.rows().len());
        terminal.draw(|f| {
            let panel = Panel { session: &*session, view: &*view, theme, keys };
            ui::ui(f, &panel);
        })?;

        tokio::select! {
            _ = frame_tick.tick() => {}
            event = rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    AppEvent::Input(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if let Some(ui_event) = input_handler::handle_key(view, session, keys, key) {
                            session.handle(AppEvent::Ui(ui_event));
                        }
                    }
                    AppEvent::Input(_) => {}
                    other => session.handle(other),
                }
            }
        }
    }

    Ok(())
}
