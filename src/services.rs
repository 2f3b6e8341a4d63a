use crate::permissions::PermissionTable;
use mchprs_plugin::event::ChatSender;
use mchprs_plugin::services::{
    EconomyProvider, PermissionProvider, PlaceholderHook, PrefixProvider, WorldAliasProvider,
};
use std::sync::Arc;
use tracing::{debug, info};

/// The optional services the formatter was wired with at startup.
///
/// Missing services degrade to empty or sentinel values; nothing here fails
/// a chat message.
#[derive(Clone)]
pub struct Services {
    pub permissions: Arc<dyn PermissionProvider>,
    /// Queried in order, the first non blank prefix wins
    pub prefixes: Vec<Arc<dyn PrefixProvider>>,
    pub economy: Option<Arc<dyn EconomyProvider>>,
    pub placeholders: Option<Arc<dyn PlaceholderHook>>,
    pub world_aliases: Option<Arc<dyn WorldAliasProvider>>,
}

impl Default for Services {
    fn default() -> Self {
        Services {
            permissions: Arc::new(PermissionTable::default()),
            prefixes: Vec::new(),
            economy: None,
            placeholders: None,
            world_aliases: None,
        }
    }
}

impl Services {
    pub fn with_permissions(mut self, permissions: Arc<dyn PermissionProvider>) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_prefix_provider(mut self, provider: Arc<dyn PrefixProvider>) -> Self {
        self.prefixes.push(provider);
        self
    }

    pub fn with_economy(mut self, economy: Arc<dyn EconomyProvider>) -> Self {
        self.economy = Some(economy);
        self
    }

    pub fn with_placeholder_hook(mut self, hook: Arc<dyn PlaceholderHook>) -> Self {
        self.placeholders = Some(hook);
        self
    }

    pub fn with_world_aliases(mut self, aliases: Arc<dyn WorldAliasProvider>) -> Self {
        self.world_aliases = Some(aliases);
        self
    }

    pub(crate) fn log_hooked(&self) {
        for provider in &self.prefixes {
            info!("Using {} for chat prefixes", provider.name());
        }
        if self.economy.is_some() {
            info!("Hooked into economy, balance placeholders enabled");
        }
        if self.placeholders.is_some() {
            info!("Hooked into placeholder service");
        }
        if self.world_aliases.is_some() {
            info!("Hooked into world aliases");
        }
    }

    /// Elevated players pass every check.
    pub fn has_permission(&self, player: &ChatSender, node: &str) -> bool {
        self.permissions.is_elevated(player) || self.permissions.has_permission(player, node)
    }

    pub fn resolve_prefix(&self, player: &ChatSender) -> String {
        for provider in &self.prefixes {
            match provider.prefix(player) {
                Ok(Some(prefix)) if !prefix.trim().is_empty() => return prefix,
                Ok(_) => {}
                Err(err) => debug!("{} prefix lookup failed: {}", provider.name(), err),
            }
        }
        String::new()
    }

    /// The alias from the world manager, or the world name itself.
    pub fn world_alias(&self, world: &str) -> String {
        let Some(aliases) = &self.world_aliases else {
            return world.to_string();
        };
        match aliases.alias(world) {
            Ok(Some(alias)) if !alias.trim().is_empty() => alias,
            Ok(_) => world.to_string(),
            Err(err) => {
                debug!("World alias lookup for {} failed: {}", world, err);
                world.to_string()
            }
        }
    }

    /// The raw balance with two decimals and the economy's own formatting.
    pub fn balances(&self, player: &ChatSender, unavailable: &str) -> (String, String) {
        let Some(economy) = &self.economy else {
            return (unavailable.to_string(), unavailable.to_string());
        };
        match economy.balance(player) {
            Ok(balance) => (format!("{:.2}", balance), economy.format(balance)),
            Err(err) => {
                debug!("Balance lookup for {} failed: {}", player.username, err);
                (unavailable.to_string(), unavailable.to_string())
            }
        }
    }
}
