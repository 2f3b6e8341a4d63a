//! Chat formatting for MCHPRS.
//!
//! Chat lines are built from configurable formats with placeholders and
//! legacy `&` color codes. Messages can be filtered by blocked keywords and
//! replacement rules before they are broadcasted.

#![deny(rust_2018_idioms)]

pub mod color;
pub mod config;
pub mod filter;
pub mod listener;
pub mod permissions;
pub mod placeholder;
pub mod services;
pub mod settings;
pub mod template;

pub use config::{ChatConfig, ConfigError};
pub use filter::{ChatFilter, FilterResult};
pub use listener::ChatFormatListener;
pub use services::Services;
pub use settings::{ChatSettings, SettingsHandle};

use anyhow::Context;
use mchprs_plugin::PluginDetails;
use mchprs_plugin::event::{ChatEvent, EventHandler, ServerContext};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub const DETAILS: PluginDetails = PluginDetails {
    name: "chat_format",
    version: env!("CARGO_PKG_VERSION"),
};

pub struct ChatFormatPlugin {
    settings: Arc<SettingsHandle>,
    listener: ChatFormatListener,
}

impl ChatFormatPlugin {
    /// Loads the config at `config_path`, adding any missing keys to it, and
    /// wires the formatter with the given services.
    pub fn enable(config_path: impl AsRef<Path>, services: Services) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();
        let settings = SettingsHandle::load(config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?;
        let plugin = Self::from_settings(settings, services);
        info!("Enabled {} v{}", DETAILS.name, DETAILS.version);
        Ok(plugin)
    }

    /// Runs without a config file.
    pub fn with_config(config: ChatConfig, services: Services) -> Self {
        Self::from_settings(SettingsHandle::new(config), services)
    }

    fn from_settings(settings: SettingsHandle, services: Services) -> Self {
        services.log_hooked();
        let settings = Arc::new(settings);
        let listener = ChatFormatListener::new(Arc::clone(&settings), Arc::new(services));
        ChatFormatPlugin { settings, listener }
    }

    pub fn settings(&self) -> Arc<ChatSettings> {
        self.settings.snapshot()
    }

    pub fn reload(&self) -> anyhow::Result<()> {
        self.settings
            .reload()
            .context("failed to reload the chat config")?;
        info!("Reloaded chat config");
        Ok(())
    }

    pub fn listener(&self) -> &ChatFormatListener {
        &self.listener
    }
}

impl EventHandler for ChatFormatPlugin {
    fn on_chat(&self, ctx: &dyn ServerContext, event: &mut ChatEvent) {
        self.listener.on_chat(ctx, event);
    }
}
