//! Binary entry point: load configuration, start file logging, open the
//! SQLite slot and drive the Ratatui event loop until the user exits.
use anyhow::{anyhow, Context};
use bookshelf::{ensure_schema, logging, run_app, App, AppConfig, BookStore, Route, SqliteStorage};
use tracing::{error, info};

/// An optional first argument names the start page, e.g. `detail?id=...`.
fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    let data_dir = config.data_dir()?;
    let _guard = logging::init(&config.log, &config.log_dir()?)?;
    info!(data_dir = %data_dir.display(), "starting bookshelf");

    let start = match std::env::args().nth(1) {
        Some(raw) => Route::parse(&raw).ok_or_else(|| anyhow!("unknown page \"{raw}\""))?,
        None => Route::Home,
    };

    let conn = ensure_schema(&data_dir)?;
    let store = BookStore::with_key(SqliteStorage::new(conn), config.storage_key.clone());
    info!(storage_key = store.key(), "book store opened");

    let mut app = App::new(store);
    app.open(start)?;
    let result = run_app(&mut app);
    if let Err(err) = &result {
        error!(err = %format!("{err:#}"), "exited with error");
    }
    result
}
