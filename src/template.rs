//! Splitting chat formats around the `{message}` placeholder.

use crate::placeholder::Placeholders;
use mchprs_text::{LegacySerializer, TextComponent};

pub const MESSAGE_PLACEHOLDER: &str = "{message}";

/// Splits `template` at the first `{message}`. A template without one is
/// treated as if `" {message}"` was appended.
pub fn split_template(template: &str) -> (&str, &str) {
    match template.find(MESSAGE_PLACEHOLDER) {
        Some(pos) => (&template[..pos], &template[pos + MESSAGE_PLACEHOLDER.len()..]),
        None => (template, ""),
    }
}

fn parse_span(text: String, parse_legacy: bool) -> TextComponent {
    if parse_legacy {
        LegacySerializer::ampersand().deserialize(&text)
    } else {
        TextComponent::from(text)
    }
}

/// The rendered text before and after the message of a chat format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    before: TextComponent,
    after: TextComponent,
}

impl Template {
    /// Expands the placeholders on each side of `{message}` separately and
    /// parses `&` codes in them if `parse_legacy` is set.
    pub fn build(template: &str, placeholders: &Placeholders, parse_legacy: bool) -> Template {
        let (before, after) = split_template(template);
        let mut before = placeholders.expand(before);
        if !template.contains(MESSAGE_PLACEHOLDER) {
            before.push(' ');
        }
        Template {
            before: parse_span(before, parse_legacy),
            after: parse_span(placeholders.expand(after), parse_legacy),
        }
    }

    pub fn before(&self) -> &TextComponent {
        &self.before
    }

    pub fn after(&self) -> &TextComponent {
        &self.after
    }

    /// Puts `message` between the two halves. The halves are siblings of the
    /// message so their styles do not carry over into it.
    pub fn wrap(&self, message: TextComponent) -> TextComponent {
        if self.before.is_empty() && self.after.is_empty() {
            return message;
        }
        TextComponent::join([self.before.clone(), message, self.after.clone()])
    }
}
