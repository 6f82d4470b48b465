//! Render rules for the promotional blocks.

use super::button::{offer_dual_path_button, offer_table_button};
use super::{RenderContext, CONTENT_WIDTH};
use crate::components::{ImageLayout, SalesOffer, ServiceLine, ServiceOffer};
use crate::offers::OfferLine;
use crate::sanitize;

const CONTENT_TABLE_OPEN: &str =
    "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\">";

fn wrap_row(background: &str, inner: &str) -> String {
    format!(
        "<tr>\n<td style=\"padding:0;background-color:{bg};\">{inner}</td>\n</tr>\n",
        bg = sanitize::css_value(background),
    )
}

fn image_tag(url: &str, alt: &str, width: u32) -> String {
    format!(
        "<img src=\"{src}\" alt=\"{alt}\" width=\"{width}\" style=\"display:block;width:100%;max-width:{width}px;height:auto;border:0;outline:none;text-decoration:none;\" />",
        src = sanitize::url(url),
        alt = sanitize::attr(alt),
    )
}

// --- service_offer ---

fn service_line(
    line: &ServiceLine,
    tag: &str,
    padding: &str,
    bold: bool,
    ctx: &RenderContext<'_>,
) -> String {
    if line.text.trim().is_empty() {
        return String::new();
    }
    let weight = if bold { "bold" } else { "normal" };
    format!(
        "<tr><td style=\"padding:{padding};text-align:{align};\">\
<{tag} style=\"margin:0;font-family:{font};font-size:{size}px;font-weight:{weight};color:{color};line-height:1.4;\">{text}</{tag}>\
</td></tr>",
        align = line.align.as_str(),
        font = ctx.font_family,
        size = line.font_size,
        color = sanitize::css_value(&line.color),
        text = sanitize::multiline(&line.text),
    )
}

pub(super) fn service_offer(offer: &ServiceOffer, ctx: &RenderContext<'_>) -> String {
    let mut rows = String::new();

    if offer.show_image && !offer.image_url.trim().is_empty() {
        rows.push_str(&format!(
            "<tr><td align=\"center\" style=\"padding:0;\">{}</td></tr>",
            image_tag(&offer.image_url, &offer.image_alt, CONTENT_WIDTH)
        ));
    }

    rows.push_str(&service_line(&offer.title, "h2", "20px 20px 10px 20px", true, ctx));

    let coupon = &offer.coupon;
    if !coupon.text.trim().is_empty() {
        let border = if coupon.show_border {
            format!("border:2px dashed {};", sanitize::css_value(&coupon.border_color))
        } else {
            String::new()
        };
        rows.push_str(&format!(
            "<tr><td align=\"center\" style=\"padding:10px 20px;\">\
<table role=\"presentation\" align=\"center\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\">\
<tr><td style=\"padding:12px 24px;background-color:{bg};{border}font-family:{font};font-size:{size}px;font-weight:bold;color:{color};text-align:center;\">{text}</td></tr>\
</table></td></tr>",
            bg = sanitize::css_value(&coupon.bg_color),
            font = ctx.font_family,
            size = coupon.font_size,
            color = sanitize::css_value(&coupon.color),
            text = sanitize::text(&coupon.text),
        ));
    }

    rows.push_str(&service_line(&offer.details, "p", "10px 20px", false, ctx));
    rows.push_str(&service_line(&offer.disclaimer, "p", "5px 20px 10px 20px", false, ctx));

    if !offer.button.text.trim().is_empty() {
        rows.push_str(&format!(
            "<tr><td align=\"{align}\" style=\"padding:15px 20px 25px 20px;\">\n{button}\n</td></tr>",
            align = offer.button.align.as_str(),
            button = offer_dual_path_button(&offer.button, ctx),
        ));
    }

    wrap_row(&offer.background_color, &format!("{CONTENT_TABLE_OPEN}{rows}</table>"))
}

// --- sales_offer ---

fn sales_line(line: &OfferLine, text: &str, ctx: &RenderContext<'_>) -> String {
    let style = &line.style;
    format!(
        "<tr><td style=\"padding:{pt}px 20px {pb}px 20px;background-color:{bg};text-align:{align};font-family:{font};font-size:{size}px;color:{color};line-height:1.4;\">{text}</td></tr>",
        pt = style.padding_top,
        pb = style.padding_bottom,
        bg = sanitize::css_value(&style.bg_color),
        align = style.text_align.as_str(),
        font = ctx.font_family,
        size = style.font_size,
        color = sanitize::css_value(&style.color),
    )
}

fn optional_line(line: &OfferLine, ctx: &RenderContext<'_>) -> String {
    if line.text.trim().is_empty() {
        String::new()
    } else {
        sales_line(line, &sanitize::multiline(&line.text), ctx)
    }
}

fn sales_content(offer: &SalesOffer, ctx: &RenderContext<'_>) -> String {
    let mut rows = String::new();
    rows.push_str(&optional_line(&offer.vehicle, ctx));
    rows.push_str(&optional_line(&offer.offer, ctx));
    rows.push_str(&optional_line(&offer.details, ctx));

    for extra in &offer.additional_offers {
        for line in extra.lines() {
            rows.push_str(&sales_line(line, &sanitize::multiline(&line.text), ctx));
        }
    }

    if !offer.stock_vin.text.trim().is_empty() {
        let text = format!(
            "{} {}",
            offer.stock_vin_type.label(),
            sanitize::text(offer.stock_vin.text.trim())
        );
        rows.push_str(&sales_line(&offer.stock_vin, &text, ctx));
    }
    rows.push_str(&optional_line(&offer.mileage, ctx));
    rows.push_str(&optional_line(&offer.disclaimer, ctx));

    if !offer.button.text.trim().is_empty() {
        rows.push_str(&format!(
            "<tr><td align=\"{align}\" style=\"padding:15px 20px 25px 20px;\">{button}</td></tr>",
            align = offer.button.align.as_str(),
            button = offer_table_button(&offer.button, ctx),
        ));
    }

    format!("{CONTENT_TABLE_OPEN}{rows}</table>")
}

fn sales_image(offer: &SalesOffer, width: u32) -> String {
    let img = image_tag(&offer.image_url, &offer.image_alt, width);
    if offer.image_link.trim().is_empty() {
        img
    } else {
        format!(
            "<a href=\"{href}\" target=\"_blank\" style=\"text-decoration:none;\">{img}</a>",
            href = sanitize::url(&offer.image_link)
        )
    }
}

pub(super) fn sales_offer(offer: &SalesOffer, ctx: &RenderContext<'_>) -> String {
    let content = sales_content(offer, ctx);
    if !offer.show_image || offer.image_url.trim().is_empty() {
        return wrap_row(&offer.background_color, &content);
    }

    let inner = match offer.layout {
        ImageLayout::Center => format!(
            "{CONTENT_TABLE_OPEN}\
<tr><td align=\"center\" style=\"padding:20px 20px 0 20px;\">{image}</td></tr>\
<tr><td style=\"padding:0;\">{content}</td></tr>\
</table>",
            image = sales_image(offer, CONTENT_WIDTH - 40),
        ),
        ImageLayout::Left | ImageLayout::Right => {
            let column = offer.image_width.clamp(1, CONTENT_WIDTH);
            let image_cell = format!(
                "<td class=\"mobile-stack mobile-padding-bottom\" width=\"{column}\" valign=\"top\" style=\"width:{column}px;padding:20px;\">{image}</td>",
                image = sales_image(offer, column),
            );
            let content_cell = format!(
                "<td class=\"mobile-stack\" valign=\"top\" style=\"padding:0;\">{content}</td>"
            );
            let cells = if offer.layout == ImageLayout::Left {
                format!("{image_cell}{content_cell}")
            } else {
                format!("{content_cell}{image_cell}")
            };
            format!("{CONTENT_TABLE_OPEN}<tr>{cells}</tr></table>")
        }
    };

    wrap_row(&offer.background_color, &inner)
}
