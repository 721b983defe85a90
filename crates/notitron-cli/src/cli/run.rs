//! `notitron run` - bot 本体
//!
//! 1. store を開いて ping（失敗したら起動しない）
//! 2. Notifier / Cleaner を spawn
//! 3. Discord gateway から受けたメッセージを CommandHandler に流して返信
//! 4. Ctrl-C でループを止めて終了

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use notitron_core::app::{AppBuilder, CommandContext, CommandHandler};
use notitron_core::config::Config;
use notitron_core::domain::{ChannelId, UserId};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::discord::{DiscordGateway, DiscordRest, InboundMessage};

const INBOUND_BUFFER: usize = 64;

pub async fn run(config: &Config) -> Result<()> {
    if config.discord.bot_token.trim().is_empty() {
        bail!("discord bot token is not configured (set DISCORD_BOT_KEY or discord.bot_token)");
    }

    let rest = Arc::new(DiscordRest::new(&config.discord.bot_token));
    let store = super::open_store(config).await?;
    let app = AppBuilder::new()
        .store(store)
        .sink(rest.clone())
        .schedule(config.schedule())
        .command_prefix(&config.command_prefix)
        .build()?;
    app.check_store().await.context("task store unavailable at startup")?;

    if !rest.health_check().await.unwrap_or(false) {
        warn!("discord token check failed; the gateway will keep retrying");
    }

    let loops = app.start();

    let (inbound_tx, mut inbound_rx) = mpsc::channel::<InboundMessage>(INBOUND_BUFFER);
    let gateway = DiscordGateway::new(&config.discord.bot_token, config.discord.guild_id.clone());
    let gateway_task = tokio::spawn(async move { gateway.run_forever(inbound_tx).await });

    info!(
        store = %config.store.path.display(),
        prefix = %config.command_prefix,
        "notitron running"
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("shutdown requested");
                break;
            }
            maybe = inbound_rx.recv() => {
                let Some(message) = maybe else {
                    warn!("gateway stopped");
                    break;
                };
                let commands = app.commands.clone();
                let rest = rest.clone();
                tokio::spawn(async move { handle_inbound(&commands, &rest, message).await });
            }
        }
    }

    gateway_task.abort();
    loops.shutdown_and_join().await;
    Ok(())
}

async fn handle_inbound(commands: &CommandHandler, rest: &DiscordRest, message: InboundMessage) {
    debug!(
        author = %message.author_id,
        channel = %message.channel_id,
        guild = message.guild_id.as_deref().unwrap_or("dm"),
        "inbound message"
    );
    let ctx = CommandContext {
        user_id: UserId::new(&message.author_id),
        channel_id: Some(ChannelId::new(&message.channel_id)),
    };
    let Some(reply) = commands.handle_text(&ctx, &message.content).await else {
        return;
    };
    if let Err(e) = rest.send_channel_message(&message.channel_id, &reply).await {
        warn!(channel = %message.channel_id, error = %e, "reply failed");
    }
}
