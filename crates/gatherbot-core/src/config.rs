//! GatherBot configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{GatherBotError, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatherBotConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
}

impl GatherBotConfig {
    /// Load config from the default path (~/.gatherbot/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GatherBotError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| GatherBotError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| GatherBotError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the GatherBot home directory (~/.gatherbot).
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gatherbot")
    }
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    5000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Proposal store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the proposals document.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// How long a mutation may wait for exclusive access before failing.
    #[serde(default = "default_lock_timeout")]
    pub lock_timeout_secs: u64,
}

fn default_store_path() -> PathBuf {
    GatherBotConfig::home_dir().join("proposals.json")
}
fn default_lock_timeout() -> u64 {
    5
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            lock_timeout_secs: default_lock_timeout(),
        }
    }
}

/// Daily reminder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    /// 5-field schedule expression (MIN HOUR DOM MON DOW).
    #[serde(default = "default_schedule")]
    pub schedule: String,
}

fn bool_true() -> bool {
    true
}
fn default_schedule() -> String {
    "0 14 * * *".into()
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: default_schedule(),
        }
    }
}

/// Outbound channel configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Twilio WhatsApp credentials. When absent or disabled, GatherBot falls
    /// back to the console channel.
    #[serde(default)]
    pub twilio: Option<TwilioConfig>,
}

/// Twilio WhatsApp channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sending number, e.g. "whatsapp:+14155238886".
    pub from_number: String,
    /// The single broadcast destination (group or user number).
    pub group_number: String,
    #[serde(default = "bool_true")]
    pub enabled: bool,
}
