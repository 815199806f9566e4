mod api;
mod app;
mod browse;
mod config;
mod debounce;
mod event;
mod modal;
mod model;
mod ui;
mod workflow;

#[cfg(test)]
mod testing;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api::{CatalogApi, HttpCatalog, Surface};
use app::App;
use browse::GamesPane;
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::event::{self as term, Event, KeyEventKind};
use event::AppEvent;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;
use tracing_subscriber::EnvFilter;
use workflow::Runtime;

/// Terminal client for a board-game catalog backend
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides the config file)
    #[arg(short, long, global = true)]
    base_url: Option<String>,

    /// Path to an alternate config.json
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write logs here instead of the cache directory
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and search the public catalog (default)
    Browse,
    /// Manage folders and games
    Admin,
    /// Print public search results and exit
    Search {
        /// Free-text query
        query: String,
    },
    /// Print the folder list and exit
    Folders,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(cli.log_file)?;

    let config = Config::load(cli.config.as_deref())?.with_base_url(cli.base_url)?;
    info!(base_url = %config.base_url, "starting");

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => run_tui(Surface::Public, &config).await?,
        Commands::Admin => run_tui(Surface::Admin, &config).await?,
        Commands::Search { query } => {
            let api = HttpCatalog::new(&config.base_url, Surface::Public, config.request_timeout())?;
            let query = query.trim();
            if query.is_empty() {
                eprintln!("Error: search query is empty");
                std::process::exit(1);
            }
            let result = api.search(query).await;
            for line in GamesPane::for_search(query, &result).text() {
                println!("{}", line);
            }
            if let Err(e) = result {
                eprintln!("Error: {}", e.user_message());
                std::process::exit(1);
            }
        }
        Commands::Folders => {
            let api = HttpCatalog::new(&config.base_url, Surface::Public, config.request_timeout())?;
            match api.list_folders().await {
                Ok(folders) => {
                    for folder in folders {
                        println!("{:>5}  {}", folder.id, folder.name);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e.user_message());
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Send tracing output to a file; the terminal belongs to the TUI.
fn init_logging(path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => p,
        None => {
            let dirs = config::project_dirs().ok_or("Could not determine home directory")?;
            let cache_dir = dirs.cache_dir();
            std::fs::create_dir_all(cache_dir)?;
            cache_dir.join("games-catalog.log")
        }
    };
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_tui(surface: Surface, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let api = HttpCatalog::new(&config.base_url, surface, config.request_timeout())?;
    let site = api.base_url().clone();

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let runtime = Runtime::new(Arc::new(api), events_tx, site);

    let mut app = App::new(surface, config);
    runtime.dispatch(app.init());

    // Init terminal
    let mut terminal = ratatui::init();

    // Main loop
    let result = run_app(&mut terminal, &mut app, &runtime, events_rx).await;

    // Restore terminal
    ratatui::restore();

    if let Err(e) = &result {
        tracing::error!(error = %e, "terminal loop failed");
    }
    result
}

async fn run_app<A: CatalogApi>(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    runtime: &Runtime<A>,
    mut events_rx: UnboundedReceiver<AppEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Drain whatever the background tasks reported since the last frame.
        while let Ok(event) = events_rx.try_recv() {
            let commands = app.handle_event(event);
            runtime.dispatch(commands);
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            info!("quit");
            return Ok(());
        }

        // Short poll so task results show up promptly
        if term::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = term::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let commands = app.handle_key(key);
                runtime.dispatch(commands);
            }
        }
    }
}
