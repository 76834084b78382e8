//! Shared helpers for CLI commands.

use std::error::Error;
use std::sync::Arc;

use lectio_core::config::data_dir;
use lectio_core::{Config, Engine, SqliteStore, SystemClock};

/// Open the engine over the on-disk store, materializing the built-in
/// plans on first use.
pub fn open_engine() -> Result<(Engine, Config), Box<dyn Error>> {
    let config = Config::load()?;
    let store = SqliteStore::open(&data_dir()?.join("lectio.db"))?;
    let engine = Engine::new(
        Arc::new(store),
        Arc::new(SystemClock),
        config.day_boundary(),
    );
    engine.ensure_presets()?;
    Ok((engine, config))
}

/// The user id a command acts as: `--user` flag or the configured
/// default.
pub fn user_or_default(user: Option<String>, config: &Config) -> String {
    user.unwrap_or_else(|| config.user.default_user.clone())
}
