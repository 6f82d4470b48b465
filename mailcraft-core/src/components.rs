//! Component Model - Typed Blocks Over a Flexible Wire Format
//!
//! `EmailComponent` is what the editing surface stores and sends: an id, a
//! type string and a string bag. `Block` is the typed form the renderer works
//! on. Conversion is total; missing or unparsable values take the variant's
//! defaults, and unknown types become `BlockContent::Unknown`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

use crate::attributes::{lenient_bag, AttributeBag, Attrs, BagWriter, Padding, TextAlign, TextStyle};
use crate::offers::{decode_offers, encode_offers, AdditionalOffer, OfferId, OfferLine};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailComponent {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default, deserialize_with = "lenient_bag")]
    pub data: AttributeBag,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "component id must be a string or number, got {other}"
        ))),
    }
}

impl EmailComponent {
    pub fn new(
        id: impl Into<String>,
        component_type: impl Into<String>,
        data: AttributeBag,
    ) -> Self {
        Self {
            id: id.into(),
            component_type: component_type.into(),
            data,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Field-level mutation as performed by the editing surface.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn kind(&self) -> Option<ComponentType> {
        ComponentType::parse(&self.component_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Header,
    TextBlock,
    Image,
    Button,
    Divider,
    Spacer,
    ServiceOffer,
    SalesOffer,
}

impl ComponentType {
    pub const ALL: [ComponentType; 8] = [
        ComponentType::Header,
        ComponentType::TextBlock,
        ComponentType::Image,
        ComponentType::Button,
        ComponentType::Divider,
        ComponentType::Spacer,
        ComponentType::ServiceOffer,
        ComponentType::SalesOffer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Header => "header",
            ComponentType::TextBlock => "text_block",
            ComponentType::Image => "image",
            ComponentType::Button => "button",
            ComponentType::Divider => "divider",
            ComponentType::Spacer => "spacer",
            ComponentType::ServiceOffer => "service_offer",
            ComponentType::SalesOffer => "sales_offer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Typed variants ---

/// Shared shape of `header` and `text_block`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextContent {
    pub text: String,
    pub font_size: u32,
    pub font_weight: String,
    pub font_style: String,
    pub color: String,
    pub background_color: String,
    pub text_align: TextAlign,
    pub line_height: String,
    pub padding: Padding,
}

impl TextContent {
    pub fn header() -> Self {
        Self {
            text: "Your Header Text".to_string(),
            font_size: 24,
            font_weight: "bold".to_string(),
            font_style: "normal".to_string(),
            color: "#333333".to_string(),
            background_color: "transparent".to_string(),
            text_align: TextAlign::Center,
            line_height: "1.3".to_string(),
            padding: Padding::new(20, 20, 20, 20),
        }
    }

    pub fn text_block() -> Self {
        Self {
            text: "Your text content goes here.".to_string(),
            font_size: 16,
            font_weight: "normal".to_string(),
            font_style: "normal".to_string(),
            color: "#555555".to_string(),
            background_color: "transparent".to_string(),
            text_align: TextAlign::Left,
            line_height: "1.6".to_string(),
            padding: Padding::new(10, 20, 10, 20),
        }
    }

    fn read(attrs: &Attrs<'_>, d: TextContent) -> Self {
        Self {
            text: attrs.text("text", &d.text),
            font_size: attrs.number("fontSize", d.font_size),
            font_weight: attrs.token("fontWeight", &d.font_weight),
            font_style: attrs.token("fontStyle", &d.font_style),
            color: attrs.token("color", &d.color),
            background_color: attrs.token("backgroundColor", &d.background_color),
            text_align: attrs.align("textAlign", d.text_align),
            line_height: attrs.token("lineHeight", &d.line_height),
            padding: Padding::read(attrs, d.padding),
        }
    }

    fn write(&self, out: &mut BagWriter) {
        out.put("text", &self.text)
            .put("fontSize", self.font_size)
            .put("fontWeight", &self.font_weight)
            .put("fontStyle", &self.font_style)
            .put("color", &self.color)
            .put("backgroundColor", &self.background_color)
            .put_align("textAlign", self.text_align)
            .put("lineHeight", &self.line_height);
        self.padding.write(out);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlock {
    pub src: String,
    pub alt: String,
    pub link: String,
    /// Percentage of the content column.
    pub width_percent: u32,
    pub align: TextAlign,
    pub padding: Padding,
}

impl Default for ImageBlock {
    fn default() -> Self {
        Self {
            src: "https://placehold.co/600x300".to_string(),
            alt: "Image".to_string(),
            link: String::new(),
            width_percent: 100,
            align: TextAlign::Center,
            padding: Padding::default(),
        }
    }
}

/// Button sizing mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthType {
    Auto,
    #[default]
    Full,
    Small,
    Medium,
    Large,
}

impl WidthType {
    pub fn as_str(self) -> &'static str {
        match self {
            WidthType::Auto => "auto",
            WidthType::Full => "full",
            WidthType::Small => "small",
            WidthType::Medium => "medium",
            WidthType::Large => "large",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(WidthType::Auto),
            "full" => Some(WidthType::Full),
            "small" => Some(WidthType::Small),
            "medium" => Some(WidthType::Medium),
            "large" => Some(WidthType::Large),
            _ => None,
        }
    }

    /// Literal pixel width for the button table, if the mode has one.
    pub fn table_width(self) -> Option<u32> {
        match self {
            WidthType::Small => Some(160),
            WidthType::Medium => Some(280),
            WidthType::Large => Some(400),
            WidthType::Auto | WidthType::Full => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonBlock {
    pub text: String,
    pub link: String,
    pub background_color: String,
    pub text_color: String,
    pub align: TextAlign,
    pub width_type: WidthType,
    pub font_size: u32,
    pub padding_top: u32,
    pub padding_bottom: u32,
}

impl Default for ButtonBlock {
    fn default() -> Self {
        Self {
            text: "Click Here".to_string(),
            link: "https://example.com".to_string(),
            background_color: "#007bff".to_string(),
            text_color: "#ffffff".to_string(),
            align: TextAlign::Center,
            width_type: WidthType::Full,
            font_size: 16,
            padding_top: 15,
            padding_bottom: 15,
        }
    }
}

/// Divider geometry is kept as authored; see the render rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DividerBlock {
    pub width: String,
    pub thickness: String,
    pub color: String,
    pub align: TextAlign,
    pub padding_top: u32,
    pub padding_bottom: u32,
}

impl Default for DividerBlock {
    fn default() -> Self {
        Self {
            width: "100".to_string(),
            thickness: "1".to_string(),
            color: "#dddddd".to_string(),
            align: TextAlign::Center,
            padding_top: 20,
            padding_bottom: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpacerBlock {
    pub height: u32,
    pub background_color: String,
    pub match_background: bool,
}

impl Default for SpacerBlock {
    fn default() -> Self {
        Self {
            height: 30,
            background_color: "#ffffff".to_string(),
            match_background: true,
        }
    }
}

/// Call-to-action shared by both offer blocks, stored under `button*` keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferButton {
    pub text: String,
    pub link: String,
    pub bg_color: String,
    pub text_color: String,
    pub font_size: u32,
    pub padding_top: u32,
    pub padding_bottom: u32,
    pub align: TextAlign,
}

impl OfferButton {
    fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            link: "https://example.com".to_string(),
            bg_color: "#007bff".to_string(),
            text_color: "#ffffff".to_string(),
            font_size: 16,
            padding_top: 12,
            padding_bottom: 12,
            align: TextAlign::Center,
        }
    }

    fn read(attrs: &Attrs<'_>, d: OfferButton) -> Self {
        Self {
            text: attrs.text("buttonText", &d.text),
            link: attrs.text("buttonLink", &d.link),
            bg_color: attrs.token("buttonBgColor", &d.bg_color),
            text_color: attrs.token("buttonTextColor", &d.text_color),
            font_size: attrs.number("buttonFontSize", d.font_size),
            padding_top: attrs.number("buttonPaddingTop", d.padding_top),
            padding_bottom: attrs.number("buttonPaddingBottom", d.padding_bottom),
            align: attrs.align("buttonAlign", d.align),
        }
    }

    fn write(&self, out: &mut BagWriter) {
        out.put("buttonText", &self.text)
            .put("buttonLink", &self.link)
            .put("buttonBgColor", &self.bg_color)
            .put("buttonTextColor", &self.text_color)
            .put("buttonFontSize", self.font_size)
            .put("buttonPaddingTop", self.padding_top)
            .put("buttonPaddingBottom", self.padding_bottom)
            .put_align("buttonAlign", self.align);
    }
}

/// Text line of a service offer: `<prefix>FontSize`, `<prefix>Color`, `<prefix>Align`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLine {
    pub text: String,
    pub font_size: u32,
    pub color: String,
    pub align: TextAlign,
}

impl ServiceLine {
    fn new(text: &str, font_size: u32, color: &str) -> Self {
        Self {
            text: text.to_string(),
            font_size,
            color: color.to_string(),
            align: TextAlign::Center,
        }
    }

    fn read(attrs: &Attrs<'_>, prefix: &str, d: ServiceLine) -> Self {
        Self {
            text: attrs.text(prefix, &d.text),
            font_size: attrs.number(&format!("{prefix}FontSize"), d.font_size),
            color: attrs.token(&format!("{prefix}Color"), &d.color),
            align: attrs.align(&format!("{prefix}Align"), d.align),
        }
    }

    fn write(&self, prefix: &str, out: &mut BagWriter) {
        out.put(prefix, &self.text)
            .put(&format!("{prefix}FontSize"), self.font_size)
            .put(&format!("{prefix}Color"), &self.color)
            .put_align(&format!("{prefix}Align"), self.align);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    pub text: String,
    pub font_size: u32,
    pub color: String,
    pub bg_color: String,
    pub show_border: bool,
    pub border_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOffer {
    pub show_image: bool,
    pub image_url: String,
    pub image_alt: String,
    pub title: ServiceLine,
    pub coupon: Coupon,
    pub details: ServiceLine,
    pub disclaimer: ServiceLine,
    pub button: OfferButton,
    pub background_color: String,
}

impl Default for ServiceOffer {
    fn default() -> Self {
        Self {
            show_image: false,
            image_url: "https://placehold.co/600x250".to_string(),
            image_alt: "Service offer".to_string(),
            title: ServiceLine::new("Oil Change Special", 22, "#333333"),
            coupon: Coupon {
                text: "$29.95".to_string(),
                font_size: 28,
                color: "#d32f2f".to_string(),
                bg_color: "#fff3e0".to_string(),
                show_border: true,
                border_color: "#d32f2f".to_string(),
            },
            details: ServiceLine::new(
                "Includes up to 5 quarts of conventional oil and a new filter.",
                14,
                "#555555",
            ),
            disclaimer: ServiceLine::new("Offer expires at the end of the month.", 11, "#888888"),
            button: OfferButton::with_text("Schedule Service"),
            background_color: "#ffffff".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageLayout {
    Left,
    #[default]
    Center,
    Right,
}

impl ImageLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageLayout::Left => "left",
            ImageLayout::Center => "center",
            ImageLayout::Right => "right",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        TextAlign::parse(value).map(|align| match align {
            TextAlign::Left => ImageLayout::Left,
            TextAlign::Center => ImageLayout::Center,
            TextAlign::Right => ImageLayout::Right,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StockVinType {
    #[default]
    Stock,
    Vin,
}

impl StockVinType {
    pub fn as_str(self) -> &'static str {
        match self {
            StockVinType::Stock => "stock",
            StockVinType::Vin => "vin",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StockVinType::Stock => "Stock #:",
            StockVinType::Vin => "VIN:",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stock" => Some(StockVinType::Stock),
            "vin" => Some(StockVinType::Vin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesOffer {
    pub show_image: bool,
    pub image_url: String,
    pub image_alt: String,
    pub image_link: String,
    pub layout: ImageLayout,
    /// Side-column width in pixels for the left/right layouts.
    pub image_width: u32,
    pub vehicle: OfferLine,
    pub offer: OfferLine,
    pub details: OfferLine,
    pub additional_offers: Vec<AdditionalOffer>,
    pub stock_vin_type: StockVinType,
    pub stock_vin: OfferLine,
    pub mileage: OfferLine,
    pub disclaimer: OfferLine,
    pub button: OfferButton,
    pub background_color: String,
}

impl Default for SalesOffer {
    fn default() -> Self {
        let line = |text: &str, style: TextStyle| OfferLine {
            text: text.to_string(),
            style,
        };
        Self {
            show_image: true,
            image_url: "https://placehold.co/600x400".to_string(),
            image_alt: "Vehicle".to_string(),
            image_link: String::new(),
            layout: ImageLayout::Center,
            image_width: 240,
            vehicle: line(
                "2025 Vehicle Make Model",
                TextStyle::new(20, "#333333", TextAlign::Center).with_padding(15, 5),
            ),
            offer: line(
                "$299/mo for 36 months",
                TextStyle::new(28, "#d32f2f", TextAlign::Center),
            ),
            details: line(
                "$2,999 due at signing. Tax, title and fees extra.",
                TextStyle::new(14, "#555555", TextAlign::Center),
            ),
            additional_offers: Vec::new(),
            stock_vin_type: StockVinType::Stock,
            stock_vin: line("", TextStyle::new(12, "#777777", TextAlign::Center)),
            mileage: line("", TextStyle::new(12, "#777777", TextAlign::Center)),
            disclaimer: line(
                "See dealer for complete details. Offer subject to credit approval.",
                TextStyle::new(10, "#999999", TextAlign::Center).with_padding(10, 10),
            ),
            button: OfferButton::with_text("View Offer"),
            background_color: "#ffffff".to_string(),
        }
    }
}

impl SalesOffer {
    /// Stable-id editing API for the nested offers.
    pub fn push_offer(&mut self, offer: AdditionalOffer) -> OfferId {
        let id = offer.id;
        self.additional_offers.push(offer);
        id
    }

    pub fn remove_offer(&mut self, id: OfferId) -> Option<AdditionalOffer> {
        let index = self.position_of(id)?;
        Some(self.additional_offers.remove(index))
    }

    pub fn offer_mut(&mut self, id: OfferId) -> Option<&mut AdditionalOffer> {
        self.additional_offers.iter_mut().find(|o| o.id == id)
    }

    /// Current display position. Transient: valid only until the next edit.
    pub fn position_of(&self, id: OfferId) -> Option<usize> {
        self.additional_offers.iter().position(|o| o.id == id)
    }
}

const SALES_LINES: [&str; 6] = ["vehicle", "offer", "details", "stockVin", "mileage", "disclaimer"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockContent {
    Header(TextContent),
    TextBlock(TextContent),
    Image(ImageBlock),
    Button(ButtonBlock),
    Divider(DividerBlock),
    Spacer(SpacerBlock),
    ServiceOffer(ServiceOffer),
    SalesOffer(SalesOffer),
    /// Unrecognized type name; renders nothing.
    Unknown(String),
}

impl BlockContent {
    /// Factory defaults for a variant.
    pub fn defaults(kind: ComponentType) -> Self {
        match kind {
            ComponentType::Header => BlockContent::Header(TextContent::header()),
            ComponentType::TextBlock => BlockContent::TextBlock(TextContent::text_block()),
            ComponentType::Image => BlockContent::Image(ImageBlock::default()),
            ComponentType::Button => BlockContent::Button(ButtonBlock::default()),
            ComponentType::Divider => BlockContent::Divider(DividerBlock::default()),
            ComponentType::Spacer => BlockContent::Spacer(SpacerBlock::default()),
            ComponentType::ServiceOffer => BlockContent::ServiceOffer(ServiceOffer::default()),
            ComponentType::SalesOffer => BlockContent::SalesOffer(SalesOffer::default()),
        }
    }

    pub fn kind(&self) -> Option<ComponentType> {
        Some(match self {
            BlockContent::Header(_) => ComponentType::Header,
            BlockContent::TextBlock(_) => ComponentType::TextBlock,
            BlockContent::Image(_) => ComponentType::Image,
            BlockContent::Button(_) => ComponentType::Button,
            BlockContent::Divider(_) => ComponentType::Divider,
            BlockContent::Spacer(_) => ComponentType::Spacer,
            BlockContent::ServiceOffer(_) => ComponentType::ServiceOffer,
            BlockContent::SalesOffer(_) => ComponentType::SalesOffer,
            BlockContent::Unknown(_) => return None,
        })
    }

    pub fn type_name(&self) -> &str {
        match self {
            BlockContent::Unknown(name) => name,
            known => known.kind().map_or("", ComponentType::as_str),
        }
    }

    /// Parse a bag for the given type name. Never fails.
    pub fn from_bag(type_name: &str, bag: &AttributeBag) -> Self {
        let Some(kind) = ComponentType::parse(type_name) else {
            return BlockContent::Unknown(type_name.to_string());
        };
        let attrs = Attrs::new(bag);
        match kind {
            ComponentType::Header => {
                BlockContent::Header(TextContent::read(&attrs, TextContent::header()))
            }
            ComponentType::TextBlock => {
                BlockContent::TextBlock(TextContent::read(&attrs, TextContent::text_block()))
            }
            ComponentType::Image => {
                let d = ImageBlock::default();
                BlockContent::Image(ImageBlock {
                    src: attrs.text("src", &d.src),
                    alt: attrs.text("alt", &d.alt),
                    link: attrs.text("link", &d.link),
                    width_percent: attrs.number("width", d.width_percent),
                    align: attrs.align("align", d.align),
                    padding: Padding::read(&attrs, d.padding),
                })
            }
            ComponentType::Button => {
                let d = ButtonBlock::default();
                BlockContent::Button(ButtonBlock {
                    text: attrs.text("text", &d.text),
                    link: attrs.text("link", &d.link),
                    background_color: attrs.token("backgroundColor", &d.background_color),
                    text_color: attrs.token("textColor", &d.text_color),
                    align: attrs.align("align", d.align),
                    width_type: attrs
                        .get("widthType")
                        .and_then(WidthType::parse)
                        .unwrap_or(d.width_type),
                    font_size: attrs.number("fontSize", d.font_size),
                    padding_top: attrs.number("paddingTop", d.padding_top),
                    padding_bottom: attrs.number("paddingBottom", d.padding_bottom),
                })
            }
            ComponentType::Divider => {
                let d = DividerBlock::default();
                BlockContent::Divider(DividerBlock {
                    width: attrs.text("width", &d.width),
                    thickness: attrs.text("thickness", &d.thickness),
                    color: attrs.token("color", &d.color),
                    align: attrs.align("align", d.align),
                    padding_top: attrs.number("paddingTop", d.padding_top),
                    padding_bottom: attrs.number("paddingBottom", d.padding_bottom),
                })
            }
            ComponentType::Spacer => {
                let d = SpacerBlock::default();
                BlockContent::Spacer(SpacerBlock {
                    height: attrs.number("height", d.height),
                    background_color: attrs.token("backgroundColor", &d.background_color),
                    match_background: attrs.flag("matchBackground", d.match_background),
                })
            }
            ComponentType::ServiceOffer => {
                let d = ServiceOffer::default();
                BlockContent::ServiceOffer(ServiceOffer {
                    show_image: attrs.flag("showImage", d.show_image),
                    image_url: attrs.text("imageUrl", &d.image_url),
                    image_alt: attrs.text("imageAlt", &d.image_alt),
                    title: ServiceLine::read(&attrs, "title", d.title),
                    coupon: Coupon {
                        text: attrs.text("couponText", &d.coupon.text),
                        font_size: attrs.number("couponFontSize", d.coupon.font_size),
                        color: attrs.token("couponColor", &d.coupon.color),
                        bg_color: attrs.token("couponBgColor", &d.coupon.bg_color),
                        show_border: attrs.flag("couponShowBorder", d.coupon.show_border),
                        border_color: attrs.token("couponBorderColor", &d.coupon.border_color),
                    },
                    details: ServiceLine::read(&attrs, "details", d.details),
                    disclaimer: ServiceLine::read(&attrs, "disclaimer", d.disclaimer),
                    button: OfferButton::read(&attrs, d.button),
                    background_color: attrs.token("backgroundColor", &d.background_color),
                })
            }
            ComponentType::SalesOffer => BlockContent::SalesOffer(read_sales_offer(&attrs)),
        }
    }

    pub fn to_bag(&self) -> AttributeBag {
        let mut out = BagWriter::new();
        match self {
            BlockContent::Header(t) | BlockContent::TextBlock(t) => t.write(&mut out),
            BlockContent::Image(img) => {
                out.put("src", &img.src)
                    .put("alt", &img.alt)
                    .put("link", &img.link)
                    .put("width", format!("{}%", img.width_percent))
                    .put_align("align", img.align);
                img.padding.write(&mut out);
            }
            BlockContent::Button(b) => {
                out.put("text", &b.text)
                    .put("link", &b.link)
                    .put("backgroundColor", &b.background_color)
                    .put("textColor", &b.text_color)
                    .put_align("align", b.align)
                    .put("widthType", b.width_type.as_str())
                    .put("fontSize", b.font_size)
                    .put("paddingTop", b.padding_top)
                    .put("paddingBottom", b.padding_bottom);
            }
            BlockContent::Divider(d) => {
                out.put("width", &d.width)
                    .put("thickness", &d.thickness)
                    .put("color", &d.color)
                    .put_align("align", d.align)
                    .put("paddingTop", d.padding_top)
                    .put("paddingBottom", d.padding_bottom);
            }
            BlockContent::Spacer(s) => {
                out.put("height", s.height)
                    .put("backgroundColor", &s.background_color)
                    .put("matchBackground", s.match_background);
            }
            BlockContent::ServiceOffer(s) => {
                out.put("showImage", s.show_image)
                    .put("imageUrl", &s.image_url)
                    .put("imageAlt", &s.image_alt)
                    .put("couponText", &s.coupon.text)
                    .put("couponFontSize", s.coupon.font_size)
                    .put("couponColor", &s.coupon.color)
                    .put("couponBgColor", &s.coupon.bg_color)
                    .put("couponShowBorder", s.coupon.show_border)
                    .put("couponBorderColor", &s.coupon.border_color)
                    .put("backgroundColor", &s.background_color);
                s.title.write("title", &mut out);
                s.details.write("details", &mut out);
                s.disclaimer.write("disclaimer", &mut out);
                s.button.write(&mut out);
            }
            BlockContent::SalesOffer(s) => {
                out.put("showImage", s.show_image)
                    .put("imageUrl", &s.image_url)
                    .put("imageAlt", &s.image_alt)
                    .put("imageLink", &s.image_link)
                    .put("layout", s.layout.as_str())
                    .put("imageWidth", s.image_width)
                    .put("stockVinType", s.stock_vin_type.as_str())
                    .put("additionalOffers", encode_offers(&s.additional_offers))
                    .put("backgroundColor", &s.background_color);
                let lines = [
                    &s.vehicle,
                    &s.offer,
                    &s.details,
                    &s.stock_vin,
                    &s.mileage,
                    &s.disclaimer,
                ];
                for (&prefix, line) in SALES_LINES.iter().zip(lines) {
                    let text_key = if prefix == "stockVin" { "stockVinValue" } else { prefix };
                    out.put(text_key, &line.text);
                    line.style.write(prefix, &mut out);
                }
                s.button.write(&mut out);
            }
            BlockContent::Unknown(_) => {}
        }
        out.finish()
    }
}

fn read_sales_offer(attrs: &Attrs<'_>) -> SalesOffer {
    let d = SalesOffer::default();
    let line = |prefix: &str, fallback: &OfferLine| {
        let text_key = if prefix == "stockVin" { "stockVinValue" } else { prefix };
        OfferLine {
            text: attrs.text(text_key, &fallback.text),
            style: TextStyle::read(attrs, prefix, &fallback.style),
        }
    };

    let additional_offers = match attrs.get("additionalOffers") {
        Some(raw) => decode_offers(raw).unwrap_or_else(|err| {
            warn!(error = %err, "malformed additionalOffers, rendering none");
            Vec::new()
        }),
        None => Vec::new(),
    };

    SalesOffer {
        show_image: attrs.flag("showImage", d.show_image),
        image_url: attrs.text("imageUrl", &d.image_url),
        image_alt: attrs.text("imageAlt", &d.image_alt),
        image_link: attrs.text("imageLink", &d.image_link),
        layout: attrs.get("layout").and_then(ImageLayout::parse).unwrap_or(d.layout),
        image_width: attrs.number("imageWidth", d.image_width),
        vehicle: line("vehicle", &d.vehicle),
        offer: line("offer", &d.offer),
        details: line("details", &d.details),
        additional_offers,
        stock_vin_type: attrs
            .get("stockVinType")
            .and_then(StockVinType::parse)
            .unwrap_or(d.stock_vin_type),
        stock_vin: line("stockVin", &d.stock_vin),
        mileage: line("mileage", &d.mileage),
        disclaimer: line("disclaimer", &d.disclaimer),
        button: OfferButton::read(attrs, d.button),
        background_color: attrs.token("backgroundColor", &d.background_color),
    }
}

/// A typed component with its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: String,
    pub content: BlockContent,
}

impl Block {
    pub fn from_component(component: &EmailComponent) -> Self {
        Self {
            id: component.id.clone(),
            content: BlockContent::from_bag(&component.component_type, &component.data),
        }
    }

    pub fn to_component(&self) -> EmailComponent {
        EmailComponent::new(self.id.clone(), self.content.type_name(), self.content.to_bag())
    }
}
