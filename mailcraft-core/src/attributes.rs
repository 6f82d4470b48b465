//! Attribute Bags - Wire Format for Component Data
//!
//! Components travel as string-keyed bags. Everything in this module exists to
//! turn those bags into typed values once, at the boundary, and back again.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Flat attribute map. Ordered so re-serialization is deterministic.
pub type AttributeBag = BTreeMap<String, String>;

/// Deserialize a bag, coercing non-string JSON values into strings.
///
/// Numbers keep their decimal form, booleans become `"true"`/`"false"`, nulls
/// are dropped, and arrays/objects are re-encoded as compact JSON.
pub fn lenient_bag<'de, D>(deserializer: D) -> Result<AttributeBag, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| value_to_string(value).map(|v| (key, v)))
        .collect())
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => serde_json::to_string(&other).ok(),
    }
}

/// Horizontal alignment shared by text, images, buttons and dividers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Some(TextAlign::Left),
            "center" | "centre" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            _ => None,
        }
    }
}

/// Read-only view over a bag with per-use fallbacks.
pub struct Attrs<'a> {
    bag: &'a AttributeBag,
}

impl<'a> Attrs<'a> {
    pub fn new(bag: &'a AttributeBag) -> Self {
        Self { bag }
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.bag.get(key).map(String::as_str)
    }

    /// Free text. Present-but-empty is kept as empty.
    pub fn text(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    /// Style token such as a color or font weight. Blank falls back.
    pub fn token(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => default.to_string(),
        }
    }

    /// Non-negative integer. Accepts a trailing `px` or `%` and a fractional
    /// part, which is truncated.
    pub fn number(&self, key: &str, default: u32) -> u32 {
        self.get(key).and_then(parse_number).unwrap_or(default)
    }

    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(parse_flag).unwrap_or(default)
    }

    pub fn align(&self, key: &str, default: TextAlign) -> TextAlign {
        self.get(key).and_then(TextAlign::parse).unwrap_or(default)
    }
}

pub fn parse_number(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    let trimmed = trimmed
        .strip_suffix("px")
        .or_else(|| trimmed.strip_suffix('%'))
        .unwrap_or(trimmed)
        .trim();
    let parsed: f64 = trimmed.parse().ok()?;
    if parsed.is_finite() && parsed >= 0.0 && parsed <= f64::from(u32::MAX) {
        Some(parsed as u32)
    } else {
        None
    }
}

pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Builder used by the typed model to write itself back into a bag.
#[derive(Default)]
pub struct BagWriter {
    bag: AttributeBag,
}

impl BagWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.bag.insert(key.to_string(), value.to_string());
        self
    }

    pub fn put_align(&mut self, key: &str, align: TextAlign) -> &mut Self {
        self.put(key, align.as_str())
    }

    pub fn finish(self) -> AttributeBag {
        self.bag
    }
}

/// Top/right/bottom/left padding in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Padding {
    pub fn new(top: u32, right: u32, bottom: u32, left: u32) -> Self {
        Self { top, right, bottom, left }
    }

    pub fn read(attrs: &Attrs<'_>, defaults: Padding) -> Self {
        Self {
            top: attrs.number("paddingTop", defaults.top),
            right: attrs.number("paddingRight", defaults.right),
            bottom: attrs.number("paddingBottom", defaults.bottom),
            left: attrs.number("paddingLeft", defaults.left),
        }
    }

    pub fn write(&self, out: &mut BagWriter) {
        out.put("paddingTop", self.top)
            .put("paddingRight", self.right)
            .put("paddingBottom", self.bottom)
            .put("paddingLeft", self.left);
    }

    pub fn css(&self) -> String {
        format!("{}px {}px {}px {}px", self.top, self.right, self.bottom, self.left)
    }
}

/// Style group for one independently styled line of an offer block.
///
/// Stored under `<prefix>FontSize`, `<prefix>Color`, `<prefix>BgColor`,
/// `<prefix>TextAlign`, `<prefix>PaddingTop` and `<prefix>PaddingBottom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    pub font_size: u32,
    pub color: String,
    pub bg_color: String,
    pub text_align: TextAlign,
    pub padding_top: u32,
    pub padding_bottom: u32,
}

impl TextStyle {
    pub fn new(font_size: u32, color: &str, text_align: TextAlign) -> Self {
        Self {
            font_size,
            color: color.to_string(),
            bg_color: "transparent".to_string(),
            text_align,
            padding_top: 5,
            padding_bottom: 5,
        }
    }

    pub fn with_padding(mut self, top: u32, bottom: u32) -> Self {
        self.padding_top = top;
        self.padding_bottom = bottom;
        self
    }

    pub fn with_bg(mut self, bg_color: &str) -> Self {
        self.bg_color = bg_color.to_string();
        self
    }

    pub fn read(attrs: &Attrs<'_>, prefix: &str, defaults: &TextStyle) -> Self {
        let key = |suffix: &str| format!("{prefix}{suffix}");
        Self {
            font_size: attrs.number(&key("FontSize"), defaults.font_size),
            color: attrs.token(&key("Color"), &defaults.color),
            bg_color: attrs.token(&key("BgColor"), &defaults.bg_color),
            text_align: attrs.align(&key("TextAlign"), defaults.text_align),
            padding_top: attrs.number(&key("PaddingTop"), defaults.padding_top),
            padding_bottom: attrs.number(&key("PaddingBottom"), defaults.padding_bottom),
        }
    }

    pub fn write(&self, prefix: &str, out: &mut BagWriter) {
        let key = |suffix: &str| format!("{prefix}{suffix}");
        out.put(&key("FontSize"), self.font_size)
            .put(&key("Color"), &self.color)
            .put(&key("BgColor"), &self.bg_color)
            .put_align(&key("TextAlign"), self.text_align)
            .put(&key("PaddingTop"), self.padding_top)
            .put(&key("PaddingBottom"), self.padding_bottom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_bag_coerces_values() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "lenient_bag")]
            data: AttributeBag,
        }

        let w: Wrapper = serde_json::from_str(
            r#"{"data": {"fontSize": 24, "matchBackground": true, "gone": null, "additionalOffers": [{"offer": "x"}]}}"#,
        )
        .unwrap();
        assert_eq!(w.data["fontSize"], "24");
        assert_eq!(w.data["matchBackground"], "true");
        assert!(!w.data.contains_key("gone"));
        assert_eq!(w.data["additionalOffers"], r#"[{"offer":"x"}]"#);
    }

    #[test]
    fn test_number_parsing_fallbacks() {
        assert_eq!(parse_number("24"), Some(24));
        assert_eq!(parse_number(" 80% "), Some(80));
        assert_eq!(parse_number("12px"), Some(12));
        assert_eq!(parse_number("12.9"), Some(12));
        assert_eq!(parse_number("wide"), None);
        assert_eq!(parse_number("-4"), None);

        let mut bag = AttributeBag::new();
        bag.insert("width".into(), "abc%".into());
        assert_eq!(Attrs::new(&bag).number("width", 100), 100);
    }

    #[test]
    fn test_flags_and_tokens() {
        let mut bag = AttributeBag::new();
        bag.insert("a".into(), "TRUE".into());
        bag.insert("b".into(), "maybe".into());
        bag.insert("color".into(), "  ".into());
        let attrs = Attrs::new(&bag);
        assert!(attrs.flag("a", false));
        assert!(attrs.flag("b", true));
        assert!(!attrs.flag("missing", false));
        assert_eq!(attrs.token("color", "#333333"), "#333333");
    }

    #[test]
    fn test_text_style_prefix_keys() {
        let style = TextStyle::new(18, "#111111", TextAlign::Center).with_padding(2, 8);
        let mut out = BagWriter::new();
        style.write("vehicle", &mut out);
        let bag = out.finish();
        assert_eq!(bag["vehicleFontSize"], "18");
        assert_eq!(bag["vehicleTextAlign"], "center");
        assert_eq!(bag["vehiclePaddingBottom"], "8");

        let fallback = TextStyle::new(1, "#000", TextAlign::Left);
        let read = TextStyle::read(&Attrs::new(&bag), "vehicle", &fallback);
        assert_eq!(read, style);
    }
}
