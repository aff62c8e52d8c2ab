mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, LoggingSettings, MessagingSettings, RealtimeSettings, ServerSettings,
    Settings, StorageBackend,
};
