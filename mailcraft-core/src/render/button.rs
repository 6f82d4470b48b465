//! Buttons - table-based and VML dual-path variants.
//!
//! Corner radius and fill mode always come from `DesignSettings::button_style`.

use super::RenderContext;
use crate::components::{ButtonBlock, OfferButton, WidthType};
use crate::sanitize;

/// VML has no intrinsic sizing; the legacy-engine button gets a fixed width.
const VML_BUTTON_WIDTH: u32 = 220;

/// Arc size used when the radius is not expressed in pixels.
const FALLBACK_ARCSIZE: u32 = 8;

/// Height of the legacy-engine rounded rectangle, in whole pixels.
pub fn vml_height(padding_top: u32, padding_bottom: u32, font_size: u32) -> u32 {
    let total = f64::from(padding_top) + f64::from(padding_bottom) + f64::from(font_size);
    (total * 1.3).round() as u32
}

/// VML `arcsize` percentage for a CSS radius on a box of `height` pixels.
pub fn vml_arcsize(radius: &str, height: u32) -> u32 {
    let pixels = radius
        .trim()
        .strip_suffix("px")
        .and_then(|v| v.trim().parse::<f64>().ok());
    match pixels {
        Some(px) if height > 0 => {
            let percent = px / (f64::from(height) / 2.0) * 100.0;
            percent.clamp(0.0, 50.0).round() as u32
        }
        _ => FALLBACK_ARCSIZE,
    }
}

/// Resolved colors and border for one button under the current style.
struct Paint {
    radius: &'static str,
    background: String,
    text_color: String,
    border: String,
    outlined: bool,
    fill: String,
}

impl Paint {
    fn new(fill: &str, text_color: &str, ctx: &RenderContext<'_>) -> Self {
        let style = ctx.settings.button_style;
        let fill = sanitize::css_value(fill);
        if style.is_outlined() {
            Self {
                radius: style.radius(),
                background: "transparent".to_string(),
                text_color: fill.clone(),
                border: format!("border:2px solid {fill};"),
                outlined: true,
                fill,
            }
        } else {
            Self {
                radius: style.radius(),
                background: fill.clone(),
                text_color: sanitize::css_value(text_color),
                border: String::new(),
                outlined: false,
                fill,
            }
        }
    }
}

/// Inputs shared by every table-based button.
struct TableButton<'a> {
    text: &'a str,
    link: &'a str,
    fill: &'a str,
    text_color: &'a str,
    font_size: u32,
    inner_padding: (u32, u32),
    width_type: WidthType,
}

fn table_button(button: &TableButton<'_>, ctx: &RenderContext<'_>) -> String {
    let paint = Paint::new(button.fill, button.text_color, ctx);
    let width_attr = button
        .width_type
        .table_width()
        .map(|w| format!(" width=\"{w}\""))
        .unwrap_or_default();
    let width_style = if button.width_type == WidthType::Full { "width:100%;" } else { "" };
    let bgcolor_attr = if paint.outlined {
        String::new()
    } else {
        format!(" bgcolor=\"{}\"", paint.fill)
    };

    format!(
        "<table role=\"presentation\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"{width_attr} style=\"border-collapse:separate;{width_style}\">\
<tr><td align=\"center\"{bgcolor_attr} style=\"border-radius:{radius};background-color:{bg};{border}\">\
<a href=\"{href}\" target=\"_blank\" style=\"display:block;padding:{pt}px 24px {pb}px 24px;font-family:{font};font-size:{size}px;font-weight:bold;line-height:1.2;color:{color};text-decoration:none;border-radius:{radius};\">{text}</a>\
</td></tr></table>",
        radius = paint.radius,
        bg = paint.background,
        border = paint.border,
        href = sanitize::url(button.link),
        pt = button.inner_padding.0,
        pb = button.inner_padding.1,
        font = ctx.font_family,
        size = button.font_size,
        color = paint.text_color,
        text = sanitize::text(button.text),
    )
}

pub(super) fn standalone(block: &ButtonBlock, ctx: &RenderContext<'_>) -> String {
    if block.text.trim().is_empty() {
        return String::new();
    }
    let inner = table_button(
        &TableButton {
            text: &block.text,
            link: &block.link,
            fill: &block.background_color,
            text_color: &block.text_color,
            font_size: block.font_size,
            inner_padding: (12, 12),
            width_type: block.width_type,
        },
        ctx,
    );
    format!(
        "<tr>\n<td align=\"{align}\" style=\"padding:{top}px 20px {bottom}px 20px;\">{inner}</td>\n</tr>\n",
        align = block.align.as_str(),
        top = block.padding_top,
        bottom = block.padding_bottom,
    )
}

/// Offer call-to-action rendered as a plain table button.
pub(super) fn offer_table_button(button: &OfferButton, ctx: &RenderContext<'_>) -> String {
    table_button(
        &TableButton {
            text: &button.text,
            link: &button.link,
            fill: &button.bg_color,
            text_color: &button.text_color,
            font_size: button.font_size,
            inner_padding: (button.padding_top, button.padding_bottom),
            width_type: WidthType::Auto,
        },
        ctx,
    )
}

/// Offer call-to-action with a VML rectangle for the legacy engine and an
/// anchor for everything else. The guards are mutually exclusive.
pub(super) fn offer_dual_path_button(button: &OfferButton, ctx: &RenderContext<'_>) -> String {
    let paint = Paint::new(&button.bg_color, &button.text_color, ctx);
    let height = vml_height(button.padding_top, button.padding_bottom, button.font_size);
    let arcsize = vml_arcsize(paint.radius, height);
    let href = sanitize::url(&button.link);
    let text = sanitize::text(&button.text);

    let vml_paint = if paint.outlined {
        format!("strokecolor=\"{fill}\" strokeweight=\"2px\" filled=\"f\"", fill = paint.fill)
    } else {
        format!("stroke=\"f\" fillcolor=\"{fill}\"", fill = paint.fill)
    };

    format!(
        "<!--[if mso]>\n\
<v:roundrect xmlns:v=\"urn:schemas-microsoft-com:vml\" xmlns:w=\"urn:schemas-microsoft-com:office:word\" href=\"{href}\" style=\"height:{height}px;v-text-anchor:middle;width:{width}px;\" arcsize=\"{arcsize}%\" {vml_paint}>\n\
<w:anchorlock/>\n\
<center style=\"color:{color};font-family:{font};font-size:{size}px;font-weight:bold;\">{text}</center>\n\
</v:roundrect>\n\
<![endif]-->\n\
<!--[if !mso]><!-- -->\n\
<a href=\"{href}\" target=\"_blank\" style=\"display:inline-block;padding:{pt}px 24px {pb}px 24px;background-color:{bg};{border}border-radius:{radius};color:{color};font-family:{font};font-size:{size}px;font-weight:bold;line-height:1.2;text-decoration:none;mso-hide:all;\">{text}</a>\n\
<!--<![endif]-->",
        width = VML_BUTTON_WIDTH,
        color = paint.text_color,
        font = ctx.font_family,
        size = button.font_size,
        pt = button.padding_top,
        pb = button.padding_bottom,
        bg = paint.background,
        border = paint.border,
        radius = paint.radius,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ButtonStyle, DesignSettings};

    fn settings(style: ButtonStyle) -> DesignSettings {
        DesignSettings {
            button_style: style,
            ..DesignSettings::default()
        }
    }

    #[test]
    fn test_vml_geometry() {
        assert_eq!(vml_height(12, 12, 16), 52);
        assert_eq!(vml_arcsize("8px", 52), 31);
        assert_eq!(vml_arcsize("50px", 52), 50);
        assert_eq!(vml_arcsize("0px", 52), 0);
        assert_eq!(vml_arcsize("1em", 52), 8);
        assert_eq!(vml_arcsize("8px", 0), 8);
    }

    #[test]
    fn test_vml_height_saturates() {
        let height = vml_height(4_000_000_000, 4_000_000_000, 16);
        assert_eq!(height, u32::MAX);
        assert_eq!(vml_arcsize("8px", height), 0);
    }

    #[test]
    fn test_width_attribute_per_type() {
        let s = settings(ButtonStyle::Rounded);
        let ctx = RenderContext::new(&s);
        let render = |width_type: WidthType| {
            standalone(&ButtonBlock { width_type, ..ButtonBlock::default() }, &ctx)
        };
        assert!(render(WidthType::Small).contains("width=\"160\""));
        assert!(render(WidthType::Medium).contains("width=\"280\""));
        assert!(render(WidthType::Large).contains("width=\"400\""));

        let auto = render(WidthType::Auto);
        assert!(!auto.contains("width=\""));
        assert!(!auto.contains("width:100%"));

        let full = render(WidthType::Full);
        assert!(!full.contains("width=\""));
        assert!(full.contains("width:100%"));
    }

    #[test]
    fn test_outlined_paint() {
        let s = settings(ButtonStyle::Outlined);
        let ctx = RenderContext::new(&s);
        let html = standalone(&ButtonBlock::default(), &ctx);
        assert!(html.contains("background-color:transparent;border:2px solid #007bff;"));
        assert!(html.contains("border-radius:8px"));
        assert!(!html.contains("bgcolor="));
    }

    #[test]
    fn test_pill_radius() {
        let s = settings(ButtonStyle::Pill);
        let ctx = RenderContext::new(&s);
        let html = standalone(&ButtonBlock::default(), &ctx);
        assert!(html.contains("border-radius:50px"));
        assert!(!html.contains("border-radius:8px"));
    }

    #[test]
    fn test_dual_path_guards() {
        let s = settings(ButtonStyle::Rounded);
        let ctx = RenderContext::new(&s);
        let button = OfferButton {
            text: "Book".into(),
            link: "https://example.com".into(),
            bg_color: "#007bff".into(),
            text_color: "#ffffff".into(),
            font_size: 16,
            padding_top: 12,
            padding_bottom: 12,
            align: crate::attributes::TextAlign::Center,
        };
        let html = offer_dual_path_button(&button, &ctx);
        assert!(html.starts_with("<!--[if mso]>"));
        assert!(html.contains("arcsize=\"31%\""));
        assert!(html.contains("height:52px"));
        assert!(html.contains("<!--[if !mso]><!-- -->"));
        assert!(html.ends_with("<!--<![endif]-->"));
    }
}
