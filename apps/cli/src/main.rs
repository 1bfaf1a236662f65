//! `shoplist`: command-line front end for the synced shopping list.

mod args;
mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use shoplist_core::presenter::{ListPresenter, SurfaceEventSink};
use shoplist_core::sync::{FanOutEventSink, ItemRepository};
use shoplist_remote_store::ShoppingApiClient;
use shoplist_storage_sqlite::SqliteItemStore;

use args::Cli;
use terminal::{format_view, LogEventSink, TerminalSurface};

const APP_DIR_NAME: &str = "shoplist";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(".shoplist"))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let config = cli.client_config().context("invalid HTTP client settings")?;
    let remote = ShoppingApiClient::new(&config).context("failed to build HTTP client")?;

    let data_dir = resolve_data_dir(cli.data_dir.clone());
    debug!("Using data directory {}", data_dir.display());
    let pool = shoplist_storage_sqlite::open(&data_dir.to_string_lossy())
        .context("failed to open the local cache")?;

    let surface = Arc::new(TerminalSurface::default());
    let events = FanOutEventSink::new()
        .with(Arc::new(SurfaceEventSink::new(surface.clone())))
        .with(Arc::new(LogEventSink));
    let repository = Arc::new(
        ItemRepository::new(Arc::new(remote))
            .with_local_store(Arc::new(SqliteItemStore::new(pool)))
            .with_event_sink(Arc::new(events)),
    );

    if let Err(err) = repository.restore_from_cache() {
        warn!("Could not read cached items: {}", err);
    }
    if let Err(failure) = repository.refresh().await {
        debug!("Initial refresh failed: {}", failure);
    }

    let presenter = ListPresenter::new(repository.clone(), surface.clone());
    let mut exit = ExitCode::SUCCESS;
    if let Some(gesture) = cli.command.and_then(|command| command.into_gesture()) {
        match presenter.handle(gesture).await {
            Ok(Some(outcome)) if !outcome.is_success() => exit = ExitCode::FAILURE,
            Ok(_) => {}
            Err(err) => {
                debug!("Gesture rejected: {}", err);
                exit = ExitCode::FAILURE;
            }
        }
    }

    if let Some(editor) = surface.take_editor() {
        println!("{}", editor.title);
        if !editor.initial_note.is_empty() {
            println!("{}", editor.initial_note);
        }
        return Ok(exit);
    }

    presenter.present();
    if let Some(view) = surface.latest_view() {
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&view)?);
        } else {
            print!("{}", format_view(&view));
        }
    }
    Ok(exit)
}
