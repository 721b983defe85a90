//! Discord adapter - gateway websocket で受信、REST API で送信
//!
//! - gateway: MESSAGE_CREATE を InboundMessage に変換して mpsc に流す
//! - rest: チャンネル / DM への送信。MessageSink の実装もここ

pub mod gateway;
pub mod rest;

pub use self::gateway::{DiscordGateway, InboundMessage};
pub use self::rest::DiscordRest;

pub const API_BASE: &str = "https://discord.com/api/v10";

/// Discord rejects message bodies over 2000 characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

pub fn truncate_message(text: &str) -> String {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(MAX_MESSAGE_CHARS - 3).collect();
    out.push_str("...");
    out
}
