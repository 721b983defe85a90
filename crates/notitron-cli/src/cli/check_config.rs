//! `notitron check-config` command implementation

use anyhow::Result;
use notitron_core::config::Config;

pub fn run(config: &Config) -> Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

/// TOML with the bot token masked.
fn render(config: &Config) -> Result<String> {
    let mut shown = config.clone();
    if !shown.discord.bot_token.is_empty() {
        shown.discord.bot_token = "********".to_string();
    }
    Ok(toml::to_string_pretty(&shown)?)
}
