//! Config - 設定の読み込み
//!
//! 読み込み順: デフォルト → TOML ファイル → 環境変数。
//! タイムゾーンと 2 つのタイマー間隔はここで確定し、`ScheduleConfig` として
//! Notifier / Cleaner の構築時に渡す（グローバル状態は持たない）。

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub const DEFAULT_INTERVAL_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_PREFIX: &str = "/";

pub const ENV_BOT_TOKEN: &str = "DISCORD_BOT_KEY";
pub const ENV_GUILD_ID: &str = "GUILD_ID";
pub const ENV_STORE_PATH: &str = "NOTITRON_STORE_PATH";
pub const ENV_TIMEZONE: &str = "NOTITRON_TIMEZONE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("unknown timezone {0:?}")]
    UnknownTimezone(String),

    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("command_prefix must not be empty")]
    EmptyPrefix,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IANA timezone used for every "today" computation.
    pub timezone: Tz,
    pub reminder_interval_secs: u64,
    pub cleanup_interval_secs: u64,
    pub command_prefix: String,
    pub store: StoreConfig,
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    pub bot_token: String,
    /// Commands from other guilds are ignored when set.
    pub guild_id: Option<String>,
}

/// Loop の設定。Config から作ってコンストラクタに渡す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub timezone: Tz,
    pub reminder_interval: Duration,
    pub cleanup_interval: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Los_Angeles,
            reminder_interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            cleanup_interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Los_Angeles,
            reminder_interval_secs: DEFAULT_INTERVAL_SECS,
            cleanup_interval_secs: DEFAULT_INTERVAL_SECS,
            command_prefix: DEFAULT_PREFIX.to_string(),
            store: StoreConfig::default(),
            discord: DiscordConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("notitron").join("tasks.json"))
        .unwrap_or_else(|| PathBuf::from("notitron-tasks.json"))
}

/// `~/.config/notitron/config.toml`（OS ごとの config dir）
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("notitron").join("config.toml"))
}

impl Config {
    /// Load from `path` (must exist) or the default location (may be missing),
    /// then apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// 環境変数で上書きする。`lookup` はテストで差し替える。
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(ENV_BOT_TOKEN) {
            self.discord.bot_token = token;
        }
        if let Some(guild) = lookup(ENV_GUILD_ID) {
            let guild = guild.trim().to_string();
            self.discord.guild_id = (!guild.is_empty()).then_some(guild);
        }
        if let Some(path) = lookup(ENV_STORE_PATH) {
            self.store.path = PathBuf::from(path);
        }
        if let Some(tz) = lookup(ENV_TIMEZONE) {
            self.timezone = tz
                .trim()
                .parse()
                .map_err(|_| ConfigError::UnknownTimezone(tz.clone()))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reminder_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval("reminder_interval_secs"));
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval("cleanup_interval_secs"));
        }
        if self.command_prefix.trim().is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        Ok(())
    }

    pub fn schedule(&self) -> ScheduleConfig {
        ScheduleConfig {
            timezone: self.timezone,
            reminder_interval: Duration::from_secs(self.reminder_interval_secs),
            cleanup_interval: Duration::from_secs(self.cleanup_interval_secs),
        }
    }
}
