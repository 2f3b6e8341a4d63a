use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{fs, io};
use thiserror::Error;
use toml_edit::{DocumentMut, TableLike};
use tracing::info;

/// The bundled configuration. Keys missing from the user's file are copied from here.
pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub const DEFAULT_FORMAT: &str = "&7[{time}] {prefix}&f{player}&7: {message}";
pub const DEFAULT_MESSAGE_FORMAT: &str = "{message}";
pub const DEFAULT_TIME_PATTERN: &str = "%H:%M:%S";
pub const DEFAULT_BLOCKED_MESSAGE: &str = "&cYour message was blocked by chat filters.";
pub const DEFAULT_BALANCE_UNAVAILABLE: &str = "N/A";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("invalid config syntax")]
    Parse(#[from] toml_edit::TomlError),

    #[error("invalid config value")]
    Deserialize(#[from] toml::de::Error),
}

/// Returns `value` unless it is blank.
fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ChatConfig {
    pub chat: ChatSection,
    pub permissions: PermissionKeys,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChatSection {
    pub format: String,
    pub message_format: String,
    pub enable_legacy_codes_in_format: bool,
    pub enable_legacy_codes_in_message_format: bool,
    pub enable_placeholder_hook: bool,
    pub time_pattern: String,
    pub time_zone: String,
    pub balance_unavailable: String,
    pub world_name_formats: WorldNameFormats,
    pub filter: FilterConfig,
}

impl Default for ChatSection {
    fn default() -> Self {
        ChatSection {
            format: DEFAULT_FORMAT.to_string(),
            message_format: DEFAULT_MESSAGE_FORMAT.to_string(),
            enable_legacy_codes_in_format: true,
            enable_legacy_codes_in_message_format: true,
            enable_placeholder_hook: true,
            time_pattern: DEFAULT_TIME_PATTERN.to_string(),
            time_zone: "server".to_string(),
            balance_unavailable: DEFAULT_BALANCE_UNAVAILABLE.to_string(),
            world_name_formats: Default::default(),
            filter: Default::default(),
        }
    }
}

impl ChatSection {
    pub fn format(&self) -> &str {
        or_default(&self.format, DEFAULT_FORMAT)
    }

    pub fn message_format(&self) -> &str {
        or_default(&self.message_format, DEFAULT_MESSAGE_FORMAT)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct WorldNameFormats {
    pub default: String,
    pub worlds: FxHashMap<String, String>,
}

impl WorldNameFormats {
    /// The per-world name if one is set, otherwise the default format with
    /// `{world}` replaced, otherwise the world name itself.
    pub fn resolve(&self, world: &str) -> String {
        if let Some(name) = self.worlds.get(world) {
            if !name.trim().is_empty() {
                return name.clone();
            }
        }
        if !self.default.trim().is_empty() {
            return self.default.replace("{world}", world);
        }
        world.to_string()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    pub enabled: bool,
    pub case_sensitive: bool,
    pub whole_word_only: bool,
    pub apply_replacements_before_block_check: bool,
    pub send_blocked_message: bool,
    pub blocked_message: String,
    pub blocked_keywords: Vec<String>,
    /// Applied in the order they are declared
    pub replacements: IndexMap<String, String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            enabled: true,
            case_sensitive: false,
            whole_word_only: false,
            apply_replacements_before_block_check: true,
            send_blocked_message: true,
            blocked_message: DEFAULT_BLOCKED_MESSAGE.to_string(),
            blocked_keywords: Vec::new(),
            replacements: IndexMap::new(),
        }
    }
}

impl FilterConfig {
    pub fn blocked_message(&self) -> &str {
        or_default(&self.blocked_message, DEFAULT_BLOCKED_MESSAGE)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PermissionKeys {
    pub chat_color: String,
    pub chat_format: String,
    pub chat_filter_bypass: String,
}

impl Default for PermissionKeys {
    fn default() -> Self {
        PermissionKeys {
            chat_color: "mchprs.chat.color".to_string(),
            chat_format: "mchprs.chat.format".to_string(),
            chat_filter_bypass: "mchprs.chat.filter.bypass".to_string(),
        }
    }
}

impl PermissionKeys {
    pub fn chat_color(&self) -> &str {
        or_default(&self.chat_color, "mchprs.chat.color")
    }

    pub fn chat_format(&self) -> &str {
        or_default(&self.chat_format, "mchprs.chat.format")
    }

    pub fn chat_filter_bypass(&self) -> &str {
        or_default(&self.chat_filter_bypass, "mchprs.chat.filter.bypass")
    }
}

/// Copies every key of `defaults` that is missing from `current`, descending
/// into tables present in both. Returns true if anything was added.
fn merge_defaults(current: &mut dyn TableLike, defaults: &dyn TableLike) -> bool {
    let mut changed = false;
    for (key, default) in defaults.iter() {
        if !current.contains_key(key) {
            current.insert(key, default.clone());
            changed = true;
            continue;
        }
        let nested = current
            .get_mut(key)
            .and_then(|item| item.as_table_like_mut())
            .zip(default.as_table_like());
        if let Some((current, defaults)) = nested {
            changed |= merge_defaults(current, defaults);
        }
    }
    changed
}

/// Parses `source` and fills in missing keys from [`DEFAULT_CONFIG`],
/// keeping the user's comments and ordering.
pub fn patch_document(source: &str) -> Result<String, ConfigError> {
    let mut doc = source.parse::<DocumentMut>()?;
    let defaults = DEFAULT_CONFIG.parse::<DocumentMut>()?;
    if merge_defaults(doc.as_table_mut(), defaults.as_table()) {
        Ok(doc.to_string())
    } else {
        Ok(source.to_string())
    }
}

impl ChatConfig {
    pub fn from_toml(source: &str) -> Result<ChatConfig, ConfigError> {
        let patched = patch_document(source)?;
        Ok(toml::from_str(&patched)?)
    }

    /// Loads the config at `path`, writing back any keys that were missing.
    /// A missing file is created with the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<ChatConfig, ConfigError> {
        let path = path.as_ref();
        let current = match fs::read_to_string(path) {
            Ok(str) => str,
            Err(err) if err.kind() == io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err.into()),
        };

        let patched = patch_document(&current)?;
        if current != patched {
            info!("Adding missing keys to {}", path.display());
            fs::write(path, &patched)?;
        }

        Ok(toml::from_str(&patched)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_config_matches_defaults() {
        let config: ChatConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, ChatConfig::default());
    }

    #[test]
    fn empty_document_gets_every_default() {
        assert_eq!(ChatConfig::from_toml("").unwrap(), ChatConfig::default());
    }

    #[test]
    fn merge_keeps_user_values() {
        let source = r#"
# my server
[chat]
format = "{player}: {message}"

[chat.filter]
case_sensitive = true
"#;
        let patched = patch_document(source).unwrap();
        assert!(patched.contains("# my server"));
        assert!(patched.contains("time_zone"));
        assert!(patched.contains("whole_word_only"));

        let config = ChatConfig::from_toml(source).unwrap();
        assert_eq!(config.chat.format, "{player}: {message}");
        assert!(config.chat.filter.case_sensitive);
        assert!(config.chat.filter.enabled);
        assert_eq!(config.permissions, PermissionKeys::default());
    }

    #[test]
    fn complete_document_is_untouched() {
        assert_eq!(patch_document(DEFAULT_CONFIG).unwrap(), DEFAULT_CONFIG);
    }

    #[test]
    fn replacements_keep_declared_order() {
        let config = ChatConfig::from_toml(
            r#"
[chat.filter.replacements]
zebra = "z"
apple = "a"
mango = "m"
"#,
        )
        .unwrap();
        let keys: Vec<_> = config.chat.filter.replacements.keys().collect();
        assert_eq!(keys, ["zebra", "apple", "mango"]);
    }

    #[test]
    fn blank_values_fall_back() {
        let mut config = ChatConfig::default();
        config.chat.format = "  ".to_string();
        config.chat.filter.blocked_message = String::new();
        config.permissions.chat_color = String::new();
        assert_eq!(config.chat.format(), DEFAULT_FORMAT);
        assert_eq!(config.chat.filter.blocked_message(), DEFAULT_BLOCKED_MESSAGE);
        assert_eq!(config.permissions.chat_color(), "mchprs.chat.color");
    }

    #[test]
    fn world_names() {
        let mut formats = WorldNameFormats::default();
        assert_eq!(formats.resolve("world"), "world");

        formats.default = "&a{world}".to_string();
        formats
            .worlds
            .insert("world_nether".to_string(), "&cNether".to_string());
        assert_eq!(formats.resolve("world"), "&aworld");
        assert_eq!(formats.resolve("world_nether"), "&cNether");
    }

    #[test]
    fn invalid_value_is_an_error() {
        let err = ChatConfig::from_toml("[chat]\nenable_placeholder_hook = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Deserialize(_)));
    }
}
