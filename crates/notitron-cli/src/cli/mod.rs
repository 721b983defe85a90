//! CLI command implementations

pub mod add;
pub mod check_config;
pub mod clean;
pub mod definition;
pub mod list;
pub mod run;
pub mod scan;

pub use definition::{Cli, Commands};

use std::sync::Arc;

use anyhow::{Context, Result};
use notitron_core::config::Config;
use notitron_core::impls::JsonFileTaskStore;
use notitron_core::ports::TaskStore;

/// Open the configured store and make sure it is usable.
pub async fn open_store(config: &Config) -> Result<Arc<dyn TaskStore>> {
    let store = Arc::new(JsonFileTaskStore::new(&config.store.path));
    store
        .ping()
        .await
        .with_context(|| format!("task store at {} is not usable", config.store.path.display()))?;
    Ok(store)
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max <= 3 {
        s.chars().take(max).collect()
    } else {
        let mut out: String = s.chars().take(max - 3).collect();
        out.push_str("...");
        out
    }
}
