#![allow(dead_code)]

use mchprs_chat::config::ChatConfig;
use mchprs_chat::permissions::PermissionTable;
use mchprs_chat::{ChatFormatPlugin, Services};
use mchprs_plugin::event::{ChatEvent, ChatSender, EventHandler, ServerContext, Viewer};
use mchprs_plugin::services::{
    EconomyProvider, PlaceholderHook, PrefixProvider, ProviderError, WorldAliasProvider,
};
use mchprs_text::TextComponent;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

pub const STEVE: u128 = 1;
pub const ALEX: u128 = 2;

pub fn init_logging() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var("MCHPRS_LOG")
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(env_filter)
        .try_init();
}

pub struct TestServer {
    pub online_players: usize,
    pub max_players: usize,
    world_times: FxHashMap<String, i64>,
    sent: Mutex<Vec<(u128, TextComponent)>>,
}

impl TestServer {
    pub fn new() -> TestServer {
        TestServer {
            online_players: 2,
            max_players: 20,
            world_times: FxHashMap::default(),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn with_world_time(mut self, world: &str, ticks: i64) -> TestServer {
        self.world_times.insert(world.to_string(), ticks);
        self
    }

    /// Messages sent directly to players, as plain text
    pub fn sent(&self) -> Vec<(u128, String)> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(player, message)| (*player, message.plain_text()))
            .collect()
    }

    pub fn sent_components(&self) -> Vec<(u128, TextComponent)> {
        self.sent.lock().unwrap().clone()
    }
}

impl ServerContext for TestServer {
    fn online_players(&self) -> usize {
        self.online_players
    }

    fn max_players(&self) -> usize {
        self.max_players
    }

    fn world_time(&self, world: &str) -> i64 {
        self.world_times.get(world).copied().unwrap_or(0)
    }

    fn send_message(&self, player: u128, message: TextComponent) {
        self.sent.lock().unwrap().push((player, message));
    }
}

pub fn steve() -> ChatSender {
    ChatSender::new(STEVE, "Steve", "world")
}

pub fn alex() -> ChatSender {
    ChatSender::new(ALEX, "Alex", "world")
}

/// A config with every default and `edit` applied.
pub fn config(edit: impl FnOnce(&mut ChatConfig)) -> ChatConfig {
    let mut config = ChatConfig::default();
    edit(&mut config);
    config
}

pub fn chat_plugin(config: ChatConfig, services: Services) -> ChatFormatPlugin {
    init_logging();
    ChatFormatPlugin::with_config(config, services)
}

/// Fires a chat event and renders it for the console if it was not cancelled.
pub fn chat(
    plugin: &ChatFormatPlugin,
    server: &TestServer,
    sender: ChatSender,
    message: &str,
) -> (ChatEvent, Option<TextComponent>) {
    let mut event = ChatEvent::new(sender, message);
    plugin.on_chat(server, &mut event);
    let rendered = (!event.is_cancelled()).then(|| event.render(Viewer::Console));
    (event, rendered)
}

/// A unique path in the temp directory, removed again on drop.
pub struct TempConfig {
    pub path: PathBuf,
}

impl TempConfig {
    pub fn new(name: &str) -> TempConfig {
        let path = std::env::temp_dir().join(format!(
            "mchprs_chat_{}_{}.toml",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        TempConfig { path }
    }
}

impl Drop for TempConfig {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

pub fn permissions(nodes: &[(u128, &str)]) -> Arc<PermissionTable> {
    let table = PermissionTable::default();
    for (uuid, node) in nodes {
        table.set(*uuid, node, true);
    }
    Arc::new(table)
}

pub struct FixedEconomy(pub f64);

impl EconomyProvider for FixedEconomy {
    fn balance(&self, _player: &ChatSender) -> Result<f64, ProviderError> {
        Ok(self.0)
    }

    fn format(&self, amount: f64) -> String {
        format!("${:.1}", amount)
    }
}

pub struct BrokenEconomy;

impl EconomyProvider for BrokenEconomy {
    fn balance(&self, _player: &ChatSender) -> Result<f64, ProviderError> {
        Err(ProviderError::Unavailable("economy"))
    }

    fn format(&self, amount: f64) -> String {
        amount.to_string()
    }
}

pub struct StaticPrefix {
    pub name: &'static str,
    pub prefix: Option<&'static str>,
}

impl PrefixProvider for StaticPrefix {
    fn name(&self) -> &str {
        self.name
    }

    fn prefix(&self, _player: &ChatSender) -> Result<Option<String>, ProviderError> {
        Ok(self.prefix.map(str::to_string))
    }
}

pub struct BrokenPrefix;

impl PrefixProvider for BrokenPrefix {
    fn name(&self) -> &str {
        "broken"
    }

    fn prefix(&self, player: &ChatSender) -> Result<Option<String>, ProviderError> {
        Err(ProviderError::Lookup(format!("no group for {}", player.username)))
    }
}

/// Expands `%server%` to a fixed name.
pub struct ServerNameHook;

impl PlaceholderHook for ServerNameHook {
    fn set_placeholders(&self, _player: u128, text: &str) -> String {
        text.replace("%server%", "Plots")
    }
}

pub struct Aliases(pub FxHashMap<String, String>);

impl Aliases {
    pub fn new(aliases: &[(&str, &str)]) -> Aliases {
        Aliases(
            aliases
                .iter()
                .map(|(world, alias)| (world.to_string(), alias.to_string()))
                .collect(),
        )
    }
}

impl WorldAliasProvider for Aliases {
    fn alias(&self, world: &str) -> Result<Option<String>, ProviderError> {
        Ok(self.0.get(world).cloned())
    }
}

pub struct BrokenAliases;

impl WorldAliasProvider for BrokenAliases {
    fn alias(&self, _world: &str) -> Result<Option<String>, ProviderError> {
        Err(ProviderError::Unavailable("worlds"))
    }
}
