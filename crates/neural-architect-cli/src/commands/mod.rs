pub mod config;
pub mod stats;
pub mod tag;
pub mod timer;

use std::sync::Arc;

use neural_architect_core::{
    AppHooks, Config, KeyValueStore, Result, SqliteStore, SystemClock, TimerEngine,
};
use serde::Serialize;

use crate::notifier::TerminalNotifier;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

pub fn open_store() -> Result<Arc<dyn KeyValueStore>> {
    Ok(Arc::new(SqliteStore::open()?))
}

/// Timer engine wired to every persisted aggregate.
///
/// Fails without touching storage when any snapshot cannot be read.
pub fn open_engine(config: &Config) -> Result<TimerEngine<AppHooks>> {
    let store = open_store()?;
    let notifier = TerminalNotifier::from_config(&config.notifications);
    let hooks = AppHooks::load(store.clone(), Box::new(notifier))?;
    TimerEngine::load(
        store,
        config.timer_config(),
        Arc::new(SystemClock),
        hooks,
    )
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
