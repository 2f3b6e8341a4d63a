//! Promotion of user typed `&` codes to the internal `§` escape.

use mchprs_text::{LegacySerializer, SECTION_SIGN, TextComponent};

pub const COLOR_CODES: &str = "0123456789abcdefx";
pub const FORMAT_CODES: &str = "klmno";

/// `r` resets both colors and formats, so either permission allows it.
pub fn is_allowed_code(code: char, allow_colors: bool, allow_formats: bool) -> bool {
    if allow_colors && COLOR_CODES.contains(code) {
        return true;
    }
    if allow_formats && FORMAT_CODES.contains(code) {
        return true;
    }
    code == 'r' && (allow_colors || allow_formats)
}

/// Rewrites every permitted `&<code>` to `§<code>`. Anything else, including
/// the `&` of a disallowed code, is kept as typed.
pub fn translate_ampersand_codes(message: &str, allow_colors: bool, allow_formats: bool) -> String {
    let mut output = String::with_capacity(message.len());
    let mut chars = message.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            if let Some(code) = chars.peek().map(|code| code.to_ascii_lowercase()) {
                if is_allowed_code(code, allow_colors, allow_formats) {
                    output.push(SECTION_SIGN);
                    output.push(code);
                    chars.next();
                    continue;
                }
            }
        }
        output.push(c);
    }
    output
}

/// Builds the component for a player's own message. Without either
/// permission the message is plain text, even if it contains `§`.
pub fn player_message(message: &str, allow_colors: bool, allow_formats: bool) -> TextComponent {
    if !allow_colors && !allow_formats {
        return TextComponent::from(message);
    }
    let translated = translate_ampersand_codes(message, allow_colors, allow_formats);
    LegacySerializer::section().deserialize(&translated)
}
