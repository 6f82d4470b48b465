//! Rendering Engine - Blocks In, Email HTML Out
//!
//! `render` is pure: no I/O, no caching, no errors. Each block maps to zero or
//! more `<tr>` rows of the 600px content table, in document order, and the
//! shell adds the client-compatibility boilerplate around them.

mod basic;
mod button;
mod offers;

pub use button::{vml_arcsize, vml_height};

use tracing::{debug, trace};

use crate::components::{BlockContent, EmailComponent};
use crate::document::Document;
use crate::sanitize;
use crate::settings::DesignSettings;

/// Body text shown when nothing in the document produces markup.
pub const EMPTY_PLACEHOLDER: &str = "No content yet. Add components to build your email.";

/// Fixed content width shared by the shell and image sizing.
pub const CONTENT_WIDTH: u32 = 600;

/// Per-call values derived once from the settings.
pub(crate) struct RenderContext<'a> {
    pub settings: &'a DesignSettings,
    pub font_family: String,
}

impl<'a> RenderContext<'a> {
    fn new(settings: &'a DesignSettings) -> Self {
        Self {
            settings,
            font_family: sanitize::css_value(&settings.font_family),
        }
    }
}

/// Compile a document into a complete HTML email.
pub fn render(document: &Document, settings: &DesignSettings) -> String {
    let ctx = RenderContext::new(settings);
    let rows: String = document
        .blocks()
        .iter()
        .map(|block| {
            let fragment = render_block(&block.content, &ctx);
            if fragment.is_empty() {
                trace!(
                    id = %block.id,
                    kind = block.content.type_name(),
                    "block produced no markup"
                );
            }
            fragment
        })
        .collect();

    let html = assemble(&rows, &ctx);
    debug!(blocks = document.len(), bytes = html.len(), "rendered email");
    html
}

/// Parse wire components at the boundary, then render.
pub fn render_components(components: &[EmailComponent], settings: &DesignSettings) -> String {
    render(&Document::from_components(components), settings)
}

fn render_block(content: &BlockContent, ctx: &RenderContext<'_>) -> String {
    match content {
        BlockContent::Header(text) => basic::text_block(text, "h1", ctx),
        BlockContent::TextBlock(text) => basic::text_block(text, "p", ctx),
        BlockContent::Image(image) => basic::image(image),
        BlockContent::Button(b) => button::standalone(b, ctx),
        BlockContent::Divider(divider) => basic::divider(divider),
        BlockContent::Spacer(spacer) => basic::spacer(spacer),
        BlockContent::ServiceOffer(offer) => offers::service_offer(offer, ctx),
        BlockContent::SalesOffer(offer) => offers::sales_offer(offer, ctx),
        BlockContent::Unknown(_) => String::new(),
    }
}

const HEAD: &str = r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:v="urn:schemas-microsoft-com:vml" xmlns:o="urn:schemas-microsoft-com:office:office">
<head>
<meta http-equiv="Content-Type" content="text/html; charset=UTF-8" />
<meta http-equiv="Content-Security-Policy" content="default-src 'none'; style-src 'unsafe-inline'; img-src https: data:;" />
<meta name="viewport" content="width=device-width, initial-scale=1.0" />
<meta http-equiv="X-UA-Compatible" content="IE=edge" />
<title></title>
<!--[if mso]>
<style type="text/css">
body, table, td, p, a, h1, h2 { font-family: Arial, Helvetica, sans-serif !important; }
</style>
<noscript><xml><o:OfficeDocumentSettings><o:PixelsPerInch>96</o:PixelsPerInch></o:OfficeDocumentSettings></xml></noscript>
<![endif]-->
<style type="text/css">
body { margin: 0; padding: 0; width: 100% !important; -webkit-text-size-adjust: 100%; -ms-text-size-adjust: 100%; }
table, td { border-collapse: collapse; mso-table-lspace: 0pt; mso-table-rspace: 0pt; }
img { border: 0; outline: none; text-decoration: none; -ms-interpolation-mode: bicubic; }
@media only screen and (max-width: 600px) {
  .mobile-stack { display: block !important; width: 100% !important; max-width: 100% !important; }
  .mobile-padding-bottom { padding-bottom: 20px !important; }
}
</style>
</head>
"#;

fn assemble(rows: &str, ctx: &RenderContext<'_>) -> String {
    let rows = if rows.is_empty() {
        empty_row(ctx)
    } else {
        rows.to_string()
    };

    let mut html = String::with_capacity(HEAD.len() + rows.len() + 1024);
    html.push_str(HEAD);
    html.push_str(&format!(
        "<body style=\"margin:0;padding:0;background-color:#f4f4f4;font-family:{font};\">\n",
        font = ctx.font_family
    ));
    html.push_str(&format!(
        "<!--[if mso]>\n<table role=\"presentation\" width=\"{w}\" align=\"center\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"><tr><td>\n<![endif]-->\n",
        w = CONTENT_WIDTH
    ));
    html.push_str(&format!(
        "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\" style=\"max-width:{w}px;margin:0 auto;background-color:#ffffff;\">\n",
        w = CONTENT_WIDTH
    ));
    html.push_str(&rows);
    html.push_str("</table>\n");
    html.push_str("<!--[if mso]>\n</td></tr></table>\n<![endif]-->\n");
    html.push_str("</body>\n</html>\n");
    html
}

fn empty_row(ctx: &RenderContext<'_>) -> String {
    format!(
        "<tr>\n<td style=\"padding:40px 20px;text-align:center;font-family:{font};font-size:14px;color:#999999;\">{text}</td>\n</tr>\n",
        font = ctx.font_family,
        text = sanitize::text(EMPTY_PLACEHOLDER)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_has_placeholder() {
        let html = render(&Document::new(), &DesignSettings::default());
        assert!(html.starts_with("<!DOCTYPE html"));
        assert!(html.contains(EMPTY_PLACEHOLDER));
        assert!(html.contains("max-width:600px"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_unknown_only_document_has_placeholder() {
        let components = vec![EmailComponent::new("1", "carousel", Default::default())];
        let html = render_components(&components, &DesignSettings::default());
        assert!(html.contains(EMPTY_PLACEHOLDER));
    }

    #[test]
    fn test_font_family_is_sanitized_in_shell() {
        let settings = DesignSettings {
            font_family: "Arial\"><script>alert(1)</script>".to_string(),
            ..DesignSettings::default()
        };
        let html = render(&Document::new(), &settings);
        assert!(!html.contains("<script"));
    }
}
