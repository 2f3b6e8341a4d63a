//! Capabilities of optional services a plugin can hook into.
//!
//! None of these may block for long; they are queried on the event thread.

use crate::event::ChatSender;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0} is not available")]
    Unavailable(&'static str),
    #[error("lookup failed: {0}")]
    Lookup(String),
}

pub trait PermissionProvider: Send + Sync {
    fn has_permission(&self, player: &ChatSender, node: &str) -> bool;

    /// Elevated players pass every permission check.
    fn is_elevated(&self, player: &ChatSender) -> bool {
        player.op
    }
}

/// A source of chat prefixes, such as a permission system's meta data.
pub trait PrefixProvider: Send + Sync {
    fn name(&self) -> &str;

    fn prefix(&self, player: &ChatSender) -> Result<Option<String>, ProviderError>;
}

pub trait EconomyProvider: Send + Sync {
    fn balance(&self, player: &ChatSender) -> Result<f64, ProviderError>;

    /// Formats an amount the way the economy displays it, with its currency.
    fn format(&self, amount: f64) -> String;
}

/// An external placeholder expansion service.
pub trait PlaceholderHook: Send + Sync {
    fn set_placeholders(&self, player: u128, text: &str) -> String;
}

/// Friendly world names from a multi-world manager.
pub trait WorldAliasProvider: Send + Sync {
    fn alias(&self, world: &str) -> Result<Option<String>, ProviderError>;
}
