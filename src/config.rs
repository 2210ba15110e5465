//! Portal configuration
//!
//! Persisted separately from application data, under its own storage key.

use serde::{Deserialize, Serialize};

use crate::platform::KeyValueStore;

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    pub fn to_level(&self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }

    pub fn to_level_filter(&self) -> log::LevelFilter {
        self.to_level().to_level_filter()
    }
}

/// Storage keys and logging preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key of the application state blob
    pub storage_key: String,
    /// Key of the remembered identity token
    pub auth_token_key: String,
    /// Key of the pending verification marker
    pub pending_verification_key: String,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: "ipt_demo_v1".to_string(),
            auth_token_key: "auth_token".to_string(),
            pending_verification_key: "unverified_email".to_string(),
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Storage key of the configuration itself
    pub const STORAGE_KEY: &'static str = "ipt_demo_config";

    /// Load configuration, falling back to defaults when absent or malformed.
    ///
    /// Runs before logging is initialised, so it stays quiet.
    pub fn load(storage: &impl KeyValueStore) -> Self {
        storage
            .get_item(Self::STORAGE_KEY)
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Set the log level from its name. Unknown names leave it unchanged.
    pub fn apply_log_level(&mut self, name: &str) -> bool {
        match LogLevel::from_str(name.trim()) {
            Some(level) => {
                self.log_level = level;
                true
            }
            None => false,
        }
    }

    pub fn save(&self, storage: &mut impl KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if let Err(e) = storage.set_item(Self::STORAGE_KEY, &json) {
                    log::error!("Failed to save config: {}", e);
                }
            }
            Err(e) => log::error!("Failed to encode config: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    #[test]
    fn test_defaults_when_missing_or_malformed() {
        let mut storage = MemoryStorage::new();
        assert_eq!(Config::load(&storage), Config::default());

        storage.set_item(Config::STORAGE_KEY, "{not json").unwrap();
        assert_eq!(Config::load(&storage), Config::default());
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(Config::STORAGE_KEY, r#"{"log_level":"Debug"}"#)
            .unwrap();
        let config = Config::load(&storage);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.storage_key, "ipt_demo_v1");
    }

    #[test]
    fn test_save_then_load() {
        let mut storage = MemoryStorage::new();
        let config = Config {
            storage_key: "custom".to_string(),
            log_level: LogLevel::Warn,
            ..Config::default()
        };
        config.save(&mut storage);
        assert_eq!(Config::load(&storage), config);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("loud"), None);
        assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_apply_log_level_persists() {
        let mut storage = MemoryStorage::new();
        let mut config = Config::load(&storage);
        assert!(config.apply_log_level(" debug "));
        assert!(!config.apply_log_level("chatty"));
        assert_eq!(config.log_level, LogLevel::Debug);

        config.save(&mut storage);
        assert_eq!(Config::load(&storage).log_level, LogLevel::Debug);
    }
}
