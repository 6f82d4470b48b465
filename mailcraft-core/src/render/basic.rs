//! Render rules for the simple blocks: text, image, divider, spacer.

use super::{RenderContext, CONTENT_WIDTH};
use crate::attributes::TextAlign;
use crate::components::{DividerBlock, ImageBlock, SpacerBlock, TextContent};
use crate::sanitize;

pub(super) fn text_block(block: &TextContent, tag: &str, ctx: &RenderContext<'_>) -> String {
    if block.text.trim().is_empty() {
        return String::new();
    }
    let align = block.text_align.as_str();
    format!(
        "<tr>\n<td style=\"padding:{padding};background-color:{bg};text-align:{align};\">\
<{tag} style=\"margin:0;font-family:{font};font-size:{size}px;font-weight:{weight};font-style:{style};color:{color};line-height:{lh};text-align:{align};\">{text}</{tag}>\
</td>\n</tr>\n",
        padding = block.padding.css(),
        bg = sanitize::css_value(&block.background_color),
        font = ctx.font_family,
        size = block.font_size,
        weight = sanitize::css_value(&block.font_weight),
        style = sanitize::css_value(&block.font_style),
        color = sanitize::css_value(&block.color),
        lh = sanitize::css_value(&block.line_height),
        text = sanitize::multiline(&block.text),
    )
}

fn block_margin(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "margin:0;",
        TextAlign::Center => "margin:0 auto;",
        TextAlign::Right => "margin:0 0 0 auto;",
    }
}

pub(super) fn image(block: &ImageBlock) -> String {
    if block.src.trim().is_empty() {
        return String::new();
    }
    let percent = block.width_percent.min(100);
    let horizontal = block.padding.left.saturating_add(block.padding.right);
    let available = CONTENT_WIDTH.saturating_sub(horizontal);
    let pixels = available * percent / 100;

    let img = format!(
        "<img src=\"{src}\" alt=\"{alt}\" width=\"{pixels}\" style=\"display:block;width:{percent}%;max-width:{pixels}px;height:auto;border:0;outline:none;text-decoration:none;{margin}\" />",
        src = sanitize::url(&block.src),
        alt = sanitize::attr(&block.alt),
        margin = block_margin(block.align),
    );
    let content = if block.link.trim().is_empty() {
        img
    } else {
        format!(
            "<a href=\"{href}\" target=\"_blank\" style=\"text-decoration:none;\">{img}</a>",
            href = sanitize::url(&block.link)
        )
    };

    format!(
        "<tr>\n<td align=\"{align}\" style=\"padding:{padding};\">{content}</td>\n</tr>\n",
        align = block.align.as_str(),
        padding = block.padding.css(),
    )
}

/// Width and thickness go out as authored. Upstream editing is trusted to keep
/// them numeric; they are escaped, not corrected.
pub(super) fn divider(block: &DividerBlock) -> String {
    let align = block.align.as_str();
    let width = sanitize::attr(block.width.trim());
    let thickness = sanitize::attr(block.thickness.trim());
    let color = sanitize::css_value(&block.color);
    format!(
        "<tr>\n<td align=\"{align}\" style=\"padding:{top}px 20px {bottom}px 20px;\">\
<table role=\"presentation\" width=\"{width}%\" align=\"{align}\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\">\
<tr><td height=\"{thickness}\" style=\"font-size:0;line-height:0;border-top:{border}px solid {color};\">&nbsp;</td></tr>\
</table></td>\n</tr>\n",
        top = block.padding_top,
        bottom = block.padding_bottom,
        border = sanitize::css_value(block.thickness.trim()),
    )
}

pub(super) fn spacer(block: &SpacerBlock) -> String {
    let bg = if block.match_background {
        "transparent".to_string()
    } else {
        sanitize::css_value(&block.background_color)
    };
    format!(
        "<tr>\n<td height=\"{h}\" style=\"height:{h}px;font-size:{h}px;line-height:{h}px;background-color:{bg};\">&nbsp;</td>\n</tr>\n",
        h = block.height,
    )
}
