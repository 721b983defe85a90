use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use super::API_BASE;

// GUILDS | GUILD_MESSAGES | DIRECT_MESSAGES | MESSAGE_CONTENT
const INTENTS: u64 = 1 | (1 << 9) | (1 << 12) | (1 << 15);

const OP_DISPATCH: u64 = 0;
const OP_HEARTBEAT: u64 = 1;
const OP_IDENTIFY: u64 = 2;
const OP_RECONNECT: u64 = 7;
const OP_INVALID_SESSION: u64 = 9;

/// A user message received through the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub author_id: String,
    pub channel_id: String,
    pub guild_id: Option<String>,
    pub content: String,
}

/// Discord gateway connection (receive side).
pub struct DiscordGateway {
    bot_token: String,
    guild_id: Option<String>,
    client: reqwest::Client,
}

impl DiscordGateway {
    pub fn new(bot_token: impl Into<String>, guild_id: Option<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            guild_id,
            client: reqwest::Client::new(),
        }
    }

    /// One gateway session. Returns an error when the connection ends; the
    /// caller decides whether to reconnect.
    pub async fn run(&self, inbound_tx: mpsc::Sender<InboundMessage>) -> anyhow::Result<()> {
        if self.bot_token.trim().is_empty() {
            anyhow::bail!("discord bot token is empty");
        }

        let gateway_resp: Value = self
            .client
            .get(format!("{API_BASE}/gateway/bot"))
            .header("Authorization", format!("Bot {}", self.bot_token))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let gateway_url = gateway_resp
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or("wss://gateway.discord.gg");
        let ws_url = format!("{gateway_url}/?v=10&encoding=json");

        let (stream, _) = tokio_tungstenite::connect_async(&ws_url).await?;
        let (mut write, mut read) = stream.split();

        let hello = read
            .next()
            .await
            .ok_or_else(|| anyhow::anyhow!("no hello"))??;
        let hello_text = match hello {
            Message::Text(text) => text.to_string(),
            _ => anyhow::bail!("unexpected discord hello payload"),
        };
        let hello_json: Value = serde_json::from_str(&hello_text)?;
        let heartbeat_interval_ms = hello_json
            .get("d")
            .and_then(|v| v.get("heartbeat_interval"))
            .and_then(Value::as_u64)
            .unwrap_or(41_250);

        let identify = json!({
            "op": OP_IDENTIFY,
            "d": {
                "token": self.bot_token,
                "intents": INTENTS,
                "properties": {
                    "os": std::env::consts::OS,
                    "browser": "notitron",
                    "device": "notitron"
                }
            }
        });
        write.send(Message::Text(identify.to_string())).await?;

        let mut heartbeat =
            tokio::time::interval(std::time::Duration::from_millis(heartbeat_interval_ms));
        let mut last_sequence: Option<u64> = None;
        let mut bot_user_id = String::new();

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    let payload = json!({"op": OP_HEARTBEAT, "d": last_sequence});
                    if write.send(Message::Text(payload.to_string())).await.is_err() {
                        anyhow::bail!("discord heartbeat failed");
                    }
                }
                maybe_msg = read.next() => {
                    let raw = match maybe_msg {
                        Some(Ok(Message::Text(text))) => text.to_string(),
                        Some(Ok(Message::Close(frame))) => {
                            anyhow::bail!("discord websocket closed: {frame:?}");
                        }
                        None => anyhow::bail!("discord websocket closed"),
                        Some(Ok(_)) => continue,
                        Some(Err(err)) => anyhow::bail!("discord websocket error: {err}"),
                    };

                    let payload: Value = match serde_json::from_str(&raw) {
                        Ok(v) => v,
                        Err(_) => continue,
                    };
                    if let Some(seq) = payload.get("s").and_then(Value::as_u64) {
                        last_sequence = Some(seq);
                    }

                    match payload.get("op").and_then(Value::as_u64) {
                        Some(OP_DISPATCH) => {}
                        Some(OP_HEARTBEAT) => {
                            let ack = json!({"op": OP_HEARTBEAT, "d": last_sequence});
                            write.send(Message::Text(ack.to_string())).await?;
                            continue;
                        }
                        Some(OP_RECONNECT) => anyhow::bail!("discord requested reconnect"),
                        Some(OP_INVALID_SESSION) => anyhow::bail!("discord invalidated the session"),
                        _ => continue,
                    }

                    let event_name = payload.get("t").and_then(Value::as_str).unwrap_or_default();
                    let Some(data) = payload.get("d") else {
                        continue;
                    };

                    if event_name == "READY" {
                        bot_user_id = data
                            .get("user")
                            .and_then(|u| u.get("id"))
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_owned();
                        info!(bot_user_id = %bot_user_id, "discord gateway ready");
                        continue;
                    }
                    if event_name != "MESSAGE_CREATE" {
                        continue;
                    }

                    let Some(inbound) = parse_message_create(data, &bot_user_id, self.guild_id.as_deref()) else {
                        continue;
                    };
                    debug!(author = %inbound.author_id, channel = %inbound.channel_id, "inbound message");
                    if inbound_tx.send(inbound).await.is_err() {
                        anyhow::bail!("discord inbound channel closed");
                    }
                }
            }
        }
    }

    /// Run sessions forever, reconnecting with a capped backoff.
    pub async fn run_forever(&self, inbound_tx: mpsc::Sender<InboundMessage>) {
        let mut backoff = std::time::Duration::from_secs(1);
        loop {
            match self.run(inbound_tx.clone()).await {
                Ok(()) => backoff = std::time::Duration::from_secs(1),
                Err(e) => {
                    if inbound_tx.is_closed() {
                        return;
                    }
                    warn!(error = %e, retry_in_secs = backoff.as_secs(), "discord gateway disconnected");
                }
            }
            tokio::time::sleep(backoff).await;
            backoff = (backoff * 2).min(std::time::Duration::from_secs(60));
        }
    }
}

/// MESSAGE_CREATE の `d` を InboundMessage に変換する。
/// bot 自身 / 他の bot / 対象外 guild / 空メッセージは None。
pub fn parse_message_create(
    data: &Value,
    bot_user_id: &str,
    required_guild: Option<&str>,
) -> Option<InboundMessage> {
    let author = data.get("author")?;
    let author_id = author.get("id").and_then(Value::as_str).unwrap_or_default();
    if author_id.is_empty() || author_id == bot_user_id {
        return None;
    }
    if author.get("bot").and_then(Value::as_bool).unwrap_or(false) {
        return None;
    }

    let guild_id = data.get("guild_id").and_then(Value::as_str);
    if let Some(required) = required_guild
        && guild_id != Some(required)
    {
        return None;
    }

    let channel_id = data.get("channel_id").and_then(Value::as_str).unwrap_or_default();
    let content = data
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();
    if channel_id.is_empty() || content.is_empty() {
        return None;
    }

    Some(InboundMessage {
        author_id: author_id.to_owned(),
        channel_id: channel_id.to_owned(),
        guild_id: guild_id.map(str::to_owned),
        content: content.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(author: &str, guild: Option<&str>, content: &str) -> Value {
        let mut d = json!({
            "author": { "id": author },
            "channel_id": "chan",
            "content": content,
        });
        if let Some(guild) = guild {
            d["guild_id"] = json!(guild);
        }
        d
    }

    #[test]
    fn plain_message_is_parsed() {
        let parsed = parse_message_create(&message("1", Some("g"), " /tasks "), "bot", None).unwrap();
        assert_eq!(
            parsed,
            InboundMessage {
                author_id: "1".into(),
                channel_id: "chan".into(),
                guild_id: Some("g".into()),
                content: "/tasks".into(),
            }
        );
    }

    #[test]
    fn own_and_bot_messages_are_skipped() {
        assert!(parse_message_create(&message("bot", None, "/tasks"), "bot", None).is_none());

        let mut other_bot = message("2", None, "/tasks");
        other_bot["author"]["bot"] = json!(true);
        assert!(parse_message_create(&other_bot, "bot", None).is_none());
    }

    #[test]
    fn guild_filter_drops_other_guilds_and_dms() {
        assert!(parse_message_create(&message("1", Some("other"), "/tasks"), "bot", Some("g")).is_none());
        assert!(parse_message_create(&message("1", None, "/tasks"), "bot", Some("g")).is_none());
        assert!(parse_message_create(&message("1", Some("g"), "/tasks"), "bot", Some("g")).is_some());
    }

    #[test]
    fn empty_content_is_skipped() {
        assert!(parse_message_create(&message("1", None, "   "), "bot", None).is_none());
    }

    #[test]
    fn intents_include_message_content_and_dms() {
        assert_eq!(INTENTS, 37377);
    }
}
