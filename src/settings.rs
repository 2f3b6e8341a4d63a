use crate::config::{ChatConfig, ConfigError};
use crate::filter::ChatFilter;
use crate::placeholder::WallClock;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

/// A configuration together with everything derived from it.
#[derive(Debug)]
pub struct ChatSettings {
    pub config: ChatConfig,
    pub filter: ChatFilter,
    pub clock: WallClock,
}

impl ChatSettings {
    /// Compiles the filter rules and validates the clock, logging and
    /// replacing anything invalid.
    pub fn new(config: ChatConfig) -> ChatSettings {
        let filter = ChatFilter::from_config(&config.chat.filter);
        let clock = WallClock::from_config(&config.chat.time_pattern, &config.chat.time_zone);
        ChatSettings {
            config,
            filter,
            clock,
        }
    }
}

/// Shared access to the current settings.
///
/// Every chat event works on the snapshot current when it started, so a reload
/// takes effect with the next message.
#[derive(Debug)]
pub struct SettingsHandle {
    path: Option<PathBuf>,
    current: RwLock<Arc<ChatSettings>>,
}

impl SettingsHandle {
    pub fn new(config: ChatConfig) -> SettingsHandle {
        SettingsHandle {
            path: None,
            current: RwLock::new(Arc::new(ChatSettings::new(config))),
        }
    }

    pub fn load(path: impl Into<PathBuf>) -> Result<SettingsHandle, ConfigError> {
        let path = path.into();
        let config = ChatConfig::load(&path)?;
        Ok(SettingsHandle {
            path: Some(path),
            current: RwLock::new(Arc::new(ChatSettings::new(config))),
        })
    }

    pub fn snapshot(&self) -> Arc<ChatSettings> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }

    pub fn replace(&self, config: ChatConfig) {
        let settings = Arc::new(ChatSettings::new(config));
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// Re-reads the config file. Settings created from a `ChatConfig` have no
    /// file and keep their config. On error the current settings stay.
    pub fn reload(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            self.replace(ChatConfig::load(path)?);
        }
        Ok(())
    }
}
