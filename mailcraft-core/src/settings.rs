//! Design Settings - Global Styling Inputs
//!
//! One instance per project. The editing surface owns and mutates it; the
//! renderer only ever receives it by reference.

use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_FAMILY: &str = "Arial, Helvetica, sans-serif";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSettings {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub button_style: ButtonStyle,
    /// Reserved. No render rule reads this yet.
    #[serde(default)]
    pub offers_layout: OffersLayout,
}

fn default_font_family() -> String { DEFAULT_FONT_FAMILY.to_string() }

impl Default for DesignSettings {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            button_style: ButtonStyle::default(),
            offers_layout: OffersLayout::default(),
        }
    }
}

/// Shape applied to every button-like fragment in the email.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    #[default]
    Rounded,
    Pill,
    Square,
    Outlined,
}

impl ButtonStyle {
    /// Corner radius as a CSS length. Outlined buttons borrow the rounded radius.
    pub fn radius(self) -> &'static str {
        match self {
            ButtonStyle::Rounded | ButtonStyle::Outlined => "8px",
            ButtonStyle::Pill => "50px",
            ButtonStyle::Square => "0px",
        }
    }

    pub fn is_outlined(self) -> bool {
        self == ButtonStyle::Outlined
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffersLayout {
    #[default]
    List,
    Grid,
}
