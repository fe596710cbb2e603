use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite file shared with the WhatsApp bot.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    std::env::var("DEAL_TRACKER_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data/deal_tracker.db"))
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    /// Sender number shown in the landing-page call to action.
    #[serde(default = "default_whatsapp_number")]
    pub number: String,
    /// Twilio sandbox join phrase users must text first.
    #[serde(default = "default_sandbox_join")]
    pub sandbox_join: String,
    /// Public base URL embedded in magic links.
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: i64,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            number: default_whatsapp_number(),
            sandbox_join: default_sandbox_join(),
            dashboard_url: default_dashboard_url(),
            token_expiry_hours: default_token_expiry_hours(),
        }
    }
}

fn default_whatsapp_number() -> String {
    std::env::var("WHATSAPP_NUMBER").unwrap_or_else(|_| "+14155238886".to_string())
}

fn default_sandbox_join() -> String {
    std::env::var("WHATSAPP_SANDBOX_JOIN").unwrap_or_else(|_| "join lucky-spoke".to_string())
}

fn default_dashboard_url() -> String {
    std::env::var("DASHBOARD_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

fn default_token_expiry_hours() -> i64 {
    24
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            info!("Loading configuration from {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| "Failed to parse configuration file")?;
            Ok(config)
        } else {
            info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }

    pub fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            whatsapp: WhatsAppConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
