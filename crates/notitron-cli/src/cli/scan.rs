//! `notitron scan` command implementation

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use clap::Args;
use notitron_core::app::NotifierLoop;
use notitron_core::config::Config;
use notitron_core::domain::{NotiError, Reminder};
use notitron_core::ports::{MessageSink, SystemClock};

use crate::discord::DiscordRest;

#[derive(Args)]
pub struct ScanArgs {
    /// Print reminders instead of sending them to Discord
    #[arg(long)]
    dry_run: bool,
}

/// Prints reminders to stdout.
struct StdoutSink;

#[async_trait]
impl MessageSink for StdoutSink {
    async fn deliver(&self, reminder: &Reminder) -> Result<(), NotiError> {
        let target = match &reminder.channel_id {
            Some(channel) => format!("#{channel}"),
            None => format!("dm:{}", reminder.user_id),
        };
        println!("[{target}] {}", reminder.text);
        Ok(())
    }
}

pub async fn run(config: &Config, args: ScanArgs) -> Result<()> {
    let sink: Arc<dyn MessageSink> = if args.dry_run {
        Arc::new(StdoutSink)
    } else {
        if config.discord.bot_token.trim().is_empty() {
            bail!("discord bot token is not configured (set DISCORD_BOT_KEY or use --dry-run)");
        }
        Arc::new(DiscordRest::new(&config.discord.bot_token))
    };

    let store = super::open_store(config).await?;
    let notifier = NotifierLoop::new(store, sink, Arc::new(SystemClock), &config.schedule());
    let report = notifier.scan_once().await?;

    println!(
        "scanned {} task(s): {} due today, {} due tomorrow, {} delivered, {} failed",
        report.scanned, report.due_today, report.due_tomorrow, report.delivered, report.failed
    );
    Ok(())
}
