//! `notitron clean` command implementation

use std::sync::Arc;

use anyhow::Result;
use notitron_core::app::CleanerLoop;
use notitron_core::config::Config;
use notitron_core::ports::SystemClock;

pub async fn run(config: &Config) -> Result<()> {
    let store = super::open_store(config).await?;
    let cleaner = CleanerLoop::new(store, Arc::new(SystemClock), &config.schedule());
    let removed = cleaner.sweep_once().await?;
    println!("removed {removed} expired task(s)");
    Ok(())
}
