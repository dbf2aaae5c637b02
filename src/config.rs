use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://serve-hub-green.vercel.app/api";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub storage_url: String,
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub message_poll_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            api: ApiConfig {
                base_url: env::var("SERVEHUB_API_URL")
                    .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
            },

            storage_url: env::var("SERVEHUB_STORAGE_URL")
                .unwrap_or_else(|_| "file://servehub-storage.json".to_string()),

            app: AppConfig {
                message_poll_interval_secs: env::var("MESSAGE_POLL_INTERVAL_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
            },
        })
    }
}

impl AppConfig {
    pub fn message_poll_interval(&self) -> Duration {
        Duration::from_secs(self.message_poll_interval_secs.max(1))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            message_poll_interval_secs: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage_url: "memory://".to_string(),
            app: AppConfig::default(),
        }
    }
}
