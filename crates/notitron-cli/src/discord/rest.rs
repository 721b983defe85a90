use async_trait::async_trait;
use notitron_core::domain::{NotiError, Reminder};
use notitron_core::ports::MessageSink;
use serde::Deserialize;
use serde_json::json;

use super::{API_BASE, truncate_message};

/// Discord REST client for outbound messages.
#[derive(Clone)]
pub struct DiscordRest {
    bot_token: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct DmChannel {
    id: String,
}

impl DiscordRest {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            base_url: API_BASE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// API の向き先を差し替える（テスト用のモックサーバなど）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn auth(&self) -> String {
        format!("Bot {}", self.bot_token)
    }

    pub async fn send_channel_message(&self, channel_id: &str, text: &str) -> anyhow::Result<()> {
        let url = format!("{}/channels/{channel_id}/messages", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth())
            .json(&json!({
                "content": truncate_message(text),
                "allowed_mentions": { "parse": ["users"] }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("discord send failed ({status}): {body}");
        }
        Ok(())
    }

    /// Open (or reuse) the DM channel with `user_id`.
    pub async fn open_dm(&self, user_id: &str) -> anyhow::Result<String> {
        let url = format!("{}/users/@me/channels", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", self.auth())
            .json(&json!({ "recipient_id": user_id }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("discord open dm failed ({status}): {body}");
        }
        Ok(response.json::<DmChannel>().await?.id)
    }

    pub async fn health_check(&self) -> anyhow::Result<bool> {
        if self.bot_token.trim().is_empty() {
            return Ok(false);
        }
        let response = self
            .client
            .get(format!("{}/users/@me", self.base_url))
            .header("Authorization", self.auth())
            .send()
            .await?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl MessageSink for DiscordRest {
    /// タスク作成チャンネルがあればそこへ、なければ owner の DM へ
    async fn deliver(&self, reminder: &Reminder) -> Result<(), NotiError> {
        let result = match &reminder.channel_id {
            Some(channel) => self.send_channel_message(channel.as_str(), &reminder.text).await,
            None => match self.open_dm(reminder.user_id.as_str()).await {
                Ok(dm) => self.send_channel_message(&dm, &reminder.text).await,
                Err(e) => Err(e),
            },
        };
        result.map_err(|e| NotiError::DeliveryFailure(e.to_string()))
    }
}
