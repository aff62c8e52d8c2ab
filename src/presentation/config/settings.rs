use std::fmt;

use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::{Deserialize, Serialize};

use super::Environment;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub realtime: RealtimeSettings,
    pub messaging: MessagingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,
    #[serde(default)]
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeSettings {
    pub channel_capacity: usize,
    pub sse_keep_alive_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingSettings {
    pub max_text_length: usize,
    pub message_page_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseSettings {
                backend: StorageBackend::Memory,
                url: None,
                max_connections: 10,
            },
            realtime: RealtimeSettings {
                channel_capacity: 1024,
                sse_keep_alive_seconds: 15,
            },
            messaging: MessagingSettings {
                max_text_length: 4000,
                message_page_limit: 200,
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                enable_json: false,
            },
        }
    }
}

impl Settings {
    /// Layers, lowest precedence first: built-in defaults,
    /// `appsettings.{environment}.toml`, then `APP_*` variables with `__`
    /// between sections (e.g. `APP_DATABASE__URL`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let file_name = format!("appsettings.{}", environment.as_str().to_lowercase());

        Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name(&file_name).required(false))
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?
            .validated()
    }

    /// Rejects values that would break request handling at runtime.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.messaging.message_page_limit == 0 {
            return Err(ConfigError::Message(
                "messaging.message_page_limit must be at least 1".to_string(),
            ));
        }
        if self.messaging.max_text_length == 0 {
            return Err(ConfigError::Message(
                "messaging.max_text_length must be at least 1".to_string(),
            ));
        }
        if self.realtime.sse_keep_alive_seconds == 0 {
            return Err(ConfigError::Message(
                "realtime.sse_keep_alive_seconds must be at least 1".to_string(),
            ));
        }
        if self.realtime.channel_capacity == 0 {
            return Err(ConfigError::Message(
                "realtime.channel_capacity must be at least 1".to_string(),
            ));
        }

        Ok(self)
    }
}
