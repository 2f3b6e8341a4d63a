//! Chat text components and the legacy `&`/`§` style code format.

mod legacy;

pub use legacy::{LegacySerializer, SECTION_SIGN};

use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorCode {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Obfuscated,
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Reset,
}

impl ColorCode {
    /// Parses a legacy code character. Upper case codes are accepted.
    pub fn parse(code: char) -> Option<ColorCode> {
        Some(match code.to_ascii_lowercase() {
            '0' => ColorCode::Black,
            '1' => ColorCode::DarkBlue,
            '2' => ColorCode::DarkGreen,
            '3' => ColorCode::DarkAqua,
            '4' => ColorCode::DarkRed,
            '5' => ColorCode::DarkPurple,
            '6' => ColorCode::Gold,
            '7' => ColorCode::Gray,
            '8' => ColorCode::DarkGray,
            '9' => ColorCode::Blue,
            'a' => ColorCode::Green,
            'b' => ColorCode::Aqua,
            'c' => ColorCode::Red,
            'd' => ColorCode::LightPurple,
            'e' => ColorCode::Yellow,
            'f' => ColorCode::White,
            'k' => ColorCode::Obfuscated,
            'l' => ColorCode::Bold,
            'm' => ColorCode::Strikethrough,
            'n' => ColorCode::Underline,
            'o' => ColorCode::Italic,
            'r' => ColorCode::Reset,
            _ => return None,
        })
    }

    pub fn code(self) -> char {
        match self {
            ColorCode::Black => '0',
            ColorCode::DarkBlue => '1',
            ColorCode::DarkGreen => '2',
            ColorCode::DarkAqua => '3',
            ColorCode::DarkRed => '4',
            ColorCode::DarkPurple => '5',
            ColorCode::Gold => '6',
            ColorCode::Gray => '7',
            ColorCode::DarkGray => '8',
            ColorCode::Blue => '9',
            ColorCode::Green => 'a',
            ColorCode::Aqua => 'b',
            ColorCode::Red => 'c',
            ColorCode::LightPurple => 'd',
            ColorCode::Yellow => 'e',
            ColorCode::White => 'f',
            ColorCode::Obfuscated => 'k',
            ColorCode::Bold => 'l',
            ColorCode::Strikethrough => 'm',
            ColorCode::Underline => 'n',
            ColorCode::Italic => 'o',
            ColorCode::Reset => 'r',
        }
    }

    /// Decorations stack on top of the current color instead of replacing it.
    pub fn is_formatting(self) -> bool {
        use ColorCode::*;
        matches!(self, Obfuscated | Bold | Strikethrough | Underline | Italic)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum TextColor {
    /// Always stored as `#rrggbb` in lower case
    Hex(String),
    ColorCode(ColorCode),
}

impl TextColor {
    /// Builds a hex color from six hex digits, without the leading `#`.
    pub fn hex(digits: &str) -> Option<TextColor> {
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(TextColor::Hex(format!("#{}", digits.to_ascii_lowercase())))
    }
}

/// This is only used for `TextComponent` serialize
#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(field: &bool) -> bool {
    !*field
}

pub struct TextComponentBuilder {
    component: TextComponent,
}

impl TextComponentBuilder {
    pub fn new(text: String) -> Self {
        let component = TextComponent {
            text,
            ..Default::default()
        };
        Self { component }
    }

    pub fn color(mut self, color: TextColor) -> Self {
        self.component.color = Some(color);
        self
    }

    pub fn color_code(mut self, color: ColorCode) -> Self {
        self.component.color = Some(TextColor::ColorCode(color));
        self
    }

    pub fn bold(mut self, val: bool) -> Self {
        self.component.bold = val;
        self
    }

    pub fn append(mut self, child: TextComponent) -> Self {
        self.component.extra.push(child);
        self
    }

    pub fn finish(self) -> TextComponent {
        self.component
    }
}

#[derive(Serialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct TextComponent {
    pub text: String,
    #[serde(skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub underlined: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub obfuscated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<TextColor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<TextComponent>,
}

impl TextComponent {
    /// Joins `parts` as children of an unstyled root, skipping empty parts so
    /// that no style is inherited between siblings.
    pub fn join(parts: impl IntoIterator<Item = TextComponent>) -> TextComponent {
        TextComponent {
            extra: parts.into_iter().filter(|part| !part.is_empty()).collect(),
            ..Default::default()
        }
    }

    pub fn append(mut self, child: TextComponent) -> TextComponent {
        self.extra.push(child);
        self
    }

    pub fn encode_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }

    /// The text of this component and all of its children with every style dropped.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain_text(&mut out);
        out
    }

    fn push_plain_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.extra {
            child.push_plain_text(out);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.extra.iter().all(TextComponent::is_empty)
    }
}

impl<S> From<S> for TextComponent
where
    S: Into<String>,
{
    fn from(value: S) -> Self {
        TextComponent {
            text: value.into(),
            ..Default::default()
        }
    }
}
