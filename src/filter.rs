//! Keyword blocking and replacement for chat messages.

use crate::config::FilterConfig;
use regex::{NoExpand, Regex, RegexBuilder};
use tracing::{debug, warn};

/// Rules starting with this (in any case) are regular expressions.
pub const REGEX_PREFIX: &str = "regex:";

fn strip_regex_prefix(rule: &str) -> Option<&str> {
    let prefix = rule.get(..REGEX_PREFIX.len())?;
    prefix
        .eq_ignore_ascii_case(REGEX_PREFIX)
        .then(|| &rule[REGEX_PREFIX.len()..])
}

#[derive(Debug, Clone)]
pub struct FilterRule {
    source: String,
    pattern: Regex,
}

impl FilterRule {
    /// Compiles a keyword or `regex:` rule.
    ///
    /// Case insensitive matching uses Unicode case folding. A rule that is not
    /// a valid regex is matched literally instead, prefix included.
    pub fn compile(rule: &str, case_sensitive: bool, whole_word_only: bool) -> Option<FilterRule> {
        let build = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(!case_sensitive)
                .build()
        };

        let pattern = match strip_regex_prefix(rule) {
            Some(regex) => regex.to_string(),
            None if whole_word_only => format!(r"\b{}\b", regex::escape(rule)),
            None => regex::escape(rule),
        };
        let pattern = match build(&pattern) {
            Ok(pattern) => pattern,
            Err(err) => {
                warn!("Invalid chat filter regex rule {:?}, matching it literally: {}", rule, err);
                match build(&regex::escape(rule)) {
                    Ok(pattern) => pattern,
                    Err(err) => {
                        warn!("Skipping chat filter rule {:?}: {}", rule, err);
                        return None;
                    }
                }
            }
        };

        Some(FilterRule {
            source: rule.to_string(),
            pattern,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, message: &str) -> bool {
        self.pattern.is_match(message)
    }
}

#[derive(Debug, Clone)]
pub struct ReplacementRule {
    rule: FilterRule,
    replacement: String,
}

impl ReplacementRule {
    /// Replaces every match, `$` in the replacement is not expanded.
    pub fn apply(&self, message: &str) -> String {
        self.rule
            .pattern
            .replace_all(message, NoExpand(&self.replacement))
            .into_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    pub blocked: bool,
    /// The replaced message if allowed, the original message if blocked
    pub message: String,
}

impl FilterResult {
    pub fn allowed(message: impl Into<String>) -> FilterResult {
        FilterResult {
            blocked: false,
            message: message.into(),
        }
    }

    pub fn blocked(message: impl Into<String>) -> FilterResult {
        FilterResult {
            blocked: true,
            message: message.into(),
        }
    }
}

/// The compiled filter rules of one configuration snapshot.
#[derive(Debug, Clone, Default)]
pub struct ChatFilter {
    enabled: bool,
    replacements_first: bool,
    blocked: Vec<FilterRule>,
    replacements: Vec<ReplacementRule>,
}

impl ChatFilter {
    pub fn from_config(config: &FilterConfig) -> ChatFilter {
        let compile = |rule: &str| {
            if rule.trim().is_empty() {
                return None;
            }
            FilterRule::compile(rule, config.case_sensitive, config.whole_word_only)
        };

        let blocked = config
            .blocked_keywords
            .iter()
            .filter_map(|rule| compile(rule.as_str()))
            .collect();
        let replacements = config
            .replacements
            .iter()
            .filter_map(|(rule, replacement)| {
                Some(ReplacementRule {
                    rule: compile(rule.as_str())?,
                    replacement: replacement.clone(),
                })
            })
            .collect();

        ChatFilter {
            enabled: config.enabled,
            replacements_first: config.apply_replacements_before_block_check,
            blocked,
            replacements,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The first blocked rule matching `message`
    pub fn find_blocked(&self, message: &str) -> Option<&FilterRule> {
        self.blocked.iter().find(|rule| rule.is_match(message))
    }

    pub fn apply_replacements(&self, message: &str) -> String {
        self.replacements
            .iter()
            .fold(message.to_string(), |message, rule| rule.apply(&message))
    }

    /// Runs the filter over a message. `exempt` senders always pass unchanged.
    pub fn check(&self, message: &str, exempt: bool) -> FilterResult {
        if !self.enabled || exempt {
            return FilterResult::allowed(message);
        }

        if !self.replacements_first {
            if let Some(rule) = self.find_blocked(message) {
                debug!("Chat message matched blocked rule {:?}", rule.source());
                return FilterResult::blocked(message);
            }
        }

        let replaced = self.apply_replacements(message);
        if let Some(rule) = self.find_blocked(&replaced) {
            debug!("Chat message matched blocked rule {:?}", rule.source());
            return FilterResult::blocked(message);
        }

        FilterResult::allowed(replaced)
    }
}
