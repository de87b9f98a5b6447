mod defaults;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::KurumiError;
use defaults::*;

/// Top-level Kurumi configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Display name, also sent as the linked-device name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Command prefix. Compared case-sensitively.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Root for `session/` and `logs/`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Process messages sent from the bot's own number (handy while testing).
    #[serde(default = "default_true")]
    pub dev_self: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_developer")]
    pub developer: String,
    #[serde(default = "default_mode")]
    pub mode: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            prefix: default_prefix(),
            data_dir: default_data_dir(),
            dev_self: true,
            log_level: default_log_level(),
            version: default_version(),
            developer: default_developer(),
            mode: default_mode(),
        }
    }
}

impl BotConfig {
    /// Directory holding the WhatsApp session database.
    pub fn session_dir(&self) -> PathBuf {
        Path::new(&shellexpand(&self.data_dir)).join("session")
    }

    /// Directory for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        Path::new(&shellexpand(&self.data_dir)).join("logs")
    }
}

/// Command manifest settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandsConfig {
    /// Command names that should not be registered.
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Video sent with the menu caption when present on disk.
    #[serde(default = "default_menu_video")]
    pub menu_video: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            menu_video: default_menu_video(),
        }
    }
}

/// Public HTTP endpoints used by the commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Text-to-image renderer (dummyimage-compatible).
    #[serde(default = "default_text_render")]
    pub text_render: String,
    /// AI text-to-image generator (pollinations-compatible).
    #[serde(default = "default_image_generation")]
    pub image_generation: String,
    /// JSON lookup returning `{"results":[{"url":..}]}`.
    #[serde(default = "default_neko_json")]
    pub neko_json: String,
    /// JSON lookup returning `{"url":..}`.
    #[serde(default = "default_neko_fallback")]
    pub neko_fallback: String,
    #[serde(default = "default_image_size")]
    pub image_width: u32,
    #[serde(default = "default_image_size")]
    pub image_height: u32,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            text_render: default_text_render(),
            image_generation: default_image_generation(),
            neko_json: default_neko_json(),
            neko_fallback: default_neko_fallback(),
            image_width: default_image_size(),
            image_height: default_image_size(),
        }
    }
}

/// Per-operation fetch budgets, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    #[serde(default = "default_text_render_secs")]
    pub text_render_secs: u64,
    #[serde(default = "default_image_generation_secs")]
    pub image_generation_secs: u64,
    #[serde(default = "default_lookup_secs")]
    pub lookup_secs: u64,
    #[serde(default = "default_media_secs")]
    pub media_secs: u64,
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            text_render_secs: default_text_render_secs(),
            image_generation_secs: default_image_generation_secs(),
            lookup_secs: default_lookup_secs(),
            media_secs: default_media_secs(),
        }
    }
}

impl TimeoutsConfig {
    pub fn text_render(&self) -> Duration {
        Duration::from_secs(self.text_render_secs)
    }

    pub fn image_generation(&self) -> Duration {
        Duration::from_secs(self.image_generation_secs)
    }

    pub fn lookup(&self) -> Duration {
        Duration::from_secs(self.lookup_secs)
    }

    pub fn media(&self) -> Duration {
        Duration::from_secs(self.media_secs)
    }
}

/// Supervisor policy for dropped connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectConfig {
    #[serde(default = "default_reconnect_delay")]
    pub delay_secs: u64,
    /// Consecutive reconnect attempts before giving up. 0 = never give up.
    #[serde(default)]
    pub max_attempts: u32,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            delay_secs: default_reconnect_delay(),
            max_attempts: 0,
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, KurumiError> {
    Ok(load_file(path)?.unwrap_or_default())
}

/// Read and parse `path`, or `None` when there is no file there.
///
/// Nothing is logged here: callers report the fallback once logging is up.
pub fn load_file(path: &str) -> Result<Option<Config>, KurumiError> {
    let path = Path::new(path);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| KurumiError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    parse(&content).map(Some)
}

/// Parse and validate configuration text.
pub fn parse(content: &str) -> Result<Config, KurumiError> {
    let config: Config = toml::from_str(content)
        .map_err(|e| KurumiError::Config(format!("failed to parse config: {}", e)))?;

    if config.bot.prefix.trim().is_empty() {
        return Err(KurumiError::Config("bot.prefix must not be empty".into()));
    }
    if config.bot.prefix.chars().any(char::is_whitespace) {
        return Err(KurumiError::Config(format!(
            "bot.prefix must not contain whitespace: {:?}",
            config.bot.prefix
        )));
    }

    Ok(config)
}
