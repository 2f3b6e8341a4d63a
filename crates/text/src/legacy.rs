use crate::{ColorCode, TextColor, TextComponent};

/// The escape character the client renders legacy styles with.
pub const SECTION_SIGN: char = '§';

enum Style {
    Color(TextColor),
    Format(ColorCode),
    Reset,
}

/// Converts between `TextComponent`s and legacy text such as `&7[&cAdmin&7]`.
///
/// With hex colors enabled both `<marker>#rrggbb` and the repeated
/// `<marker>x<marker>r<marker>r<marker>g<marker>g<marker>b<marker>b` form are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacySerializer {
    marker: char,
    hex_colors: bool,
}

impl LegacySerializer {
    pub const fn new(marker: char) -> LegacySerializer {
        LegacySerializer {
            marker,
            hex_colors: false,
        }
    }

    pub const fn with_hex_colors(mut self) -> LegacySerializer {
        self.hex_colors = true;
        self
    }

    /// The user facing format, `&c`
    pub const fn ampersand() -> LegacySerializer {
        LegacySerializer::new('&').with_hex_colors()
    }

    /// The internal format, `§c`
    pub const fn section() -> LegacySerializer {
        LegacySerializer::new(SECTION_SIGN).with_hex_colors()
    }

    pub fn deserialize(&self, input: &str) -> TextComponent {
        let chars: Vec<char> = input.chars().collect();
        let mut components = Vec::new();
        let mut cur_component = TextComponent::default();

        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == self.marker {
                if let Some((style, len)) = self.parse_style(&chars[i + 1..]) {
                    match style {
                        Style::Format(code) => {
                            if !cur_component.text.is_empty() {
                                let mut finished = cur_component.clone();
                                finished.text = std::mem::take(&mut cur_component.text);
                                components.push(finished);
                            }
                            match code {
                                ColorCode::Bold => cur_component.bold = true,
                                ColorCode::Italic => cur_component.italic = true,
                                ColorCode::Underline => cur_component.underlined = true,
                                ColorCode::Strikethrough => cur_component.strikethrough = true,
                                ColorCode::Obfuscated => cur_component.obfuscated = true,
                                _ => {}
                            }
                        }
                        Style::Color(color) => {
                            push_non_empty(&mut components, cur_component);
                            cur_component = TextComponent {
                                color: Some(color),
                                ..Default::default()
                            };
                        }
                        Style::Reset => {
                            push_non_empty(&mut components, cur_component);
                            cur_component = Default::default();
                        }
                    }
                    i += 1 + len;
                    continue;
                }
            }
            cur_component.text.push(c);
            i += 1;
        }
        push_non_empty(&mut components, cur_component);

        match components.len() {
            0 => TextComponent::default(),
            1 => components.remove(0),
            _ => TextComponent {
                extra: components,
                ..Default::default()
            },
        }
    }

    /// Returns the style following a marker and how many characters it spans.
    fn parse_style(&self, rest: &[char]) -> Option<(Style, usize)> {
        let code = *rest.first()?;
        if self.hex_colors {
            if code == '#' {
                let color = rest
                    .get(1..7)
                    .and_then(|digits| TextColor::hex(&digits.iter().collect::<String>()));
                if let Some(color) = color {
                    return Some((Style::Color(color), 7));
                }
            }
            if code == 'x' || code == 'X' {
                if let Some(color) = rest.get(1..13).and_then(|pairs| self.repeated_hex(pairs)) {
                    return Some((Style::Color(color), 13));
                }
            }
        }

        let code = ColorCode::parse(code)?;
        let style = match code {
            ColorCode::Reset => Style::Reset,
            code if code.is_formatting() => Style::Format(code),
            code => Style::Color(TextColor::ColorCode(code)),
        };
        Some((style, 1))
    }

    fn repeated_hex(&self, pairs: &[char]) -> Option<TextColor> {
        let mut digits = String::with_capacity(6);
        for pair in pairs.chunks(2) {
            match pair {
                [marker, digit] if *marker == self.marker => digits.push(*digit),
                _ => return None,
            }
        }
        TextColor::hex(&digits)
    }

    pub fn serialize(&self, component: &TextComponent) -> String {
        let mut out = String::new();
        let mut last = Decoration::default();
        self.write_component(component, &Decoration::default(), &mut last, &mut out);
        out
    }

    fn write_component(
        &self,
        component: &TextComponent,
        parent: &Decoration,
        last: &mut Decoration,
        out: &mut String,
    ) {
        let style = parent.inherit(component);
        if !component.text.is_empty() {
            if style != *last {
                self.write_style(&style, last, out);
                *last = style.clone();
            }
            out.push_str(&component.text);
        }
        for child in &component.extra {
            self.write_component(child, &style, last, out);
        }
    }

    fn write_style(&self, style: &Decoration, last: &Decoration, out: &mut String) {
        // Decorations can only be cleared by a reset or a new color
        if style.color.is_none() && *last != Decoration::default() {
            out.push(self.marker);
            out.push(ColorCode::Reset.code());
        }
        match &style.color {
            Some(TextColor::ColorCode(code)) => {
                out.push(self.marker);
                out.push(code.code());
            }
            Some(TextColor::Hex(hex)) if self.hex_colors => {
                out.push(self.marker);
                out.push_str(hex);
            }
            _ => {}
        }
        let decorations = [
            (style.obfuscated, ColorCode::Obfuscated),
            (style.bold, ColorCode::Bold),
            (style.strikethrough, ColorCode::Strikethrough),
            (style.underlined, ColorCode::Underline),
            (style.italic, ColorCode::Italic),
        ];
        for (enabled, code) in decorations {
            if enabled {
                out.push(self.marker);
                out.push(code.code());
            }
        }
    }
}

fn push_non_empty(components: &mut Vec<TextComponent>, component: TextComponent) {
    if !component.text.is_empty() {
        components.push(component);
    }
}

/// The effective style of a component after inheriting from its parents.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Decoration {
    color: Option<TextColor>,
    bold: bool,
    italic: bool,
    underlined: bool,
    strikethrough: bool,
    obfuscated: bool,
}

impl Decoration {
    fn inherit(&self, component: &TextComponent) -> Decoration {
        Decoration {
            color: component.color.clone().or_else(|| self.color.clone()),
            bold: self.bold || component.bold,
            italic: self.italic || component.italic,
            underlined: self.underlined || component.underlined,
            strikethrough: self.strikethrough || component.strikethrough,
            obfuscated: self.obfuscated || component.obfuscated,
        }
    }
}
