//! A built-in permission table for servers without a permission system.
//!
//! Nodes follow the LuckPerms conventions: `*` matches any remaining
//! segments and `prefix.<priority>.<text>` nodes carry the chat prefix.

use mchprs_plugin::event::ChatSender;
use mchprs_plugin::services::{PermissionProvider, PrefixProvider, ProviderError};
use rustc_hash::FxHashMap;
use std::sync::{PoisonError, RwLock};

#[derive(Debug)]
enum PathSegment {
    WildCard,
    Named(String),
}

#[derive(Debug)]
struct PermissionNode {
    path: Vec<PathSegment>,
    value: bool,
}

impl PermissionNode {
    fn parse(name: &str, value: bool) -> PermissionNode {
        let path = name
            .split('.')
            .map(|s| match s {
                "*" => PathSegment::WildCard,
                s => PathSegment::Named(s.to_ascii_lowercase()),
            })
            .collect();
        PermissionNode { path, value }
    }

    fn matches(&self, str: &str) -> bool {
        let mut segments = str.split('.');
        for part in &self.path {
            match part {
                PathSegment::WildCard => return true,
                PathSegment::Named(name) => match segments.next() {
                    Some(segment) if segment.eq_ignore_ascii_case(name) => {}
                    _ => return false,
                },
            }
        }
        segments.next().is_none()
    }

    /// Longer paths are more specific, and an exact node beats a wildcard of
    /// the same length.
    fn specificity(&self) -> usize {
        let exact = !matches!(self.path.last(), Some(PathSegment::WildCard));
        self.path.len() * 2 + exact as usize
    }
}

#[derive(Debug, Default)]
pub struct PlayerPermissions {
    nodes: Vec<PermissionNode>,
    prefixes: Vec<(i32, String)>,
}

impl PlayerPermissions {
    pub fn get_node_val(&self, name: &str) -> Option<bool> {
        self.nodes
            .iter()
            .filter(|node| node.matches(name))
            .max_by_key(|node| node.specificity())
            .map(|node| node.value)
    }

    pub fn insert(&mut self, name: &str, value: bool) {
        if let Some(meta) = name.strip_prefix("prefix.") {
            if let Some((priority, prefix)) = meta.split_once('.') {
                if let Ok(priority) = priority.parse() {
                    if value {
                        self.prefixes.push((priority, prefix.to_string()));
                    }
                    return;
                }
            }
        }
        self.nodes.push(PermissionNode::parse(name, value));
    }

    /// The prefix with the highest priority
    pub fn prefix(&self) -> Option<&str> {
        self.prefixes
            .iter()
            .max_by_key(|(priority, _)| *priority)
            .map(|(_, prefix)| prefix.as_str())
    }
}

/// Permissions keyed by player uuid. Players without an entry have no nodes.
#[derive(Debug, Default)]
pub struct PermissionTable {
    players: RwLock<FxHashMap<u128, PlayerPermissions>>,
}

impl PermissionTable {
    pub fn set(&self, uuid: u128, node: &str, value: bool) {
        let mut players = self.players.write().unwrap_or_else(PoisonError::into_inner);
        players.entry(uuid).or_default().insert(node, value);
    }

    pub fn remove_player(&self, uuid: u128) {
        let mut players = self.players.write().unwrap_or_else(PoisonError::into_inner);
        players.remove(&uuid);
    }

    fn with_player<T>(&self, uuid: u128, f: impl FnOnce(&PlayerPermissions) -> T) -> Option<T> {
        let players = self.players.read().unwrap_or_else(PoisonError::into_inner);
        players.get(&uuid).map(f)
    }
}

impl PermissionProvider for PermissionTable {
    fn has_permission(&self, player: &ChatSender, node: &str) -> bool {
        self.with_player(player.uuid, |perms| perms.get_node_val(node))
            .flatten()
            .unwrap_or(false)
    }
}

impl PrefixProvider for PermissionTable {
    fn name(&self) -> &str {
        "permissions"
    }

    fn prefix(&self, player: &ChatSender) -> Result<Option<String>, ProviderError> {
        Ok(self
            .with_player(player.uuid, |perms| perms.prefix().map(str::to_string))
            .flatten())
    }
}
