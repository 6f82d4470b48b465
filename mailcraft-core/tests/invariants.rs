//! Contract Invariant Tests
//!
//! These tests verify the compiler's non-negotiable guarantees.

use std::io::Write;

use mailcraft_core::{
    attributes::AttributeBag, default_attributes, render, render_components, ButtonStyle,
    CompilationPipeline, DesignSettings, Document, EmailComponent, Project, EMPTY_PLACEHOLDER,
};

fn component(id: &str, kind: &str, overrides: &[(&str, &str)]) -> EmailComponent {
    let mut data: AttributeBag = default_attributes(kind);
    for (k, v) in overrides {
        data.insert(k.to_string(), v.to_string());
    }
    EmailComponent::new(id, kind, data)
}

fn settings(style: ButtonStyle) -> DesignSettings {
    DesignSettings {
        button_style: style,
        ..DesignSettings::default()
    }
}

/// Drop every block between `start` and the next `end`, markers included.
fn strip_between(html: &str, start: &str, end: &str) -> String {
    let mut out = String::new();
    let mut rest = html;
    while let Some(i) = rest.find(start) {
        out.push_str(&rest[..i]);
        let after = &rest[i + start.len()..];
        match after.find(end) {
            Some(j) => rest = &after[j + end.len()..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}

/// What a standards-based client sees: legacy-only blocks are comments.
fn standard_view(html: &str) -> String {
    strip_between(html, "<!--[if mso]>", "<![endif]-->")
}

/// What the legacy engine sees: the `!mso` blocks are skipped.
fn legacy_view(html: &str) -> String {
    strip_between(html, "<!--[if !mso]><!-- -->", "<!--<![endif]-->")
}

fn body_rows(html: &str) -> &str {
    let open = "background-color:#ffffff;\">\n";
    let start = html.find(open).unwrap() + open.len();
    let end = html.rfind("</table>\n<!--[if mso]>").unwrap();
    &html[start..end]
}

#[test]
fn invariant_render_is_pure() {
    let components = vec![
        component("1", "header", &[]),
        component("2", "image", &[("link", "https://example.com")]),
        component("3", "service_offer", &[("showImage", "true")]),
        component("4", "sales_offer", &[("layout", "right")]),
    ];
    let s = settings(ButtonStyle::Pill);
    assert_eq!(render_components(&components, &s), render_components(&components, &s));
}

#[test]
fn invariant_rows_follow_component_order() {
    let components = vec![
        component("1", "text_block", &[("text", "Alpha")]),
        component("2", "header", &[("text", "Beta")]),
        component("3", "button", &[("text", "Gamma")]),
        component("4", "text_block", &[("text", "Delta")]),
    ];
    let html = render_components(&components, &DesignSettings::default());
    let positions: Vec<_> = ["Alpha", "Beta", "Gamma", "Delta"]
        .iter()
        .map(|t| html.find(t).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn invariant_empty_document_has_placeholder() {
    let html = render(&Document::new(), &DesignSettings::default());
    let rows = body_rows(&html);
    assert!(rows.contains(EMPTY_PLACEHOLDER));
    assert!(EMPTY_PLACEHOLDER.starts_with("No content"));
    assert_eq!(rows.matches("<tr>").count(), 1);
    assert!(!rows.contains("<img"));
    assert!(!rows.contains("<a "));
    assert!(html.contains("<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0 Transitional//EN\""));
}

#[test]
fn invariant_shell_boilerplate() {
    let html = render(&Document::new(), &DesignSettings::default());
    assert!(html.contains("Content-Security-Policy"));
    assert!(html.contains("img-src https: data:"));
    assert!(html.contains("name=\"viewport\""));
    assert!(html.contains("@media only screen and (max-width: 600px)"));
    assert!(html.contains(".mobile-stack"));
    assert!(html.contains(".mobile-padding-bottom"));
    assert!(html.contains("<table role=\"presentation\" width=\"600\""));
    assert!(!standard_view(&html).contains("width=\"600\""));
}

#[test]
fn invariant_user_text_is_sanitized_and_merge_fields_survive() {
    let payload = "<script>alert('x')</script> {{a.b.c}}";
    let offers = format!(
        r#"[{{"separator": "{payload}", "offer": "{payload}", "details": "", "disclaimer": ""}}]"#
    );
    let components = vec![
        component("1", "header", &[("text", payload)]),
        component("2", "text_block", &[("text", payload)]),
        component("3", "button", &[("text", payload), ("link", "javascript:alert(1)")]),
        component("4", "image", &[("alt", payload), ("src", "\"><script>x</script>")]),
        component(
            "5",
            "service_offer",
            &[("title", payload), ("couponText", payload), ("buttonText", payload)],
        ),
        component(
            "6",
            "sales_offer",
            &[("vehicle", payload), ("stockVinValue", payload), ("additionalOffers", &offers)],
        ),
    ];
    let html = render_components(&components, &DesignSettings::default());

    assert!(!html.to_lowercase().contains("<script"));
    assert!(!html.contains("javascript:"));
    assert!(html.matches("{{a.b.c}}").count() >= 9);
}

#[test]
fn invariant_button_width_types() {
    let s = DesignSettings::default();
    let rows_for = |width_type: &str| {
        let html = render_components(&[component("1", "button", &[("widthType", width_type)])], &s);
        body_rows(&html).to_string()
    };

    assert!(rows_for("small").contains("width=\"160\""));
    assert!(rows_for("medium").contains("width=\"280\""));
    assert!(rows_for("large").contains("width=\"400\""));

    let auto = rows_for("auto");
    assert!(!auto.contains("width=\""));
    assert!(!auto.contains("width:100%"));

    let full = rows_for("full");
    assert!(!full.contains("width=\""));
    assert!(full.contains("width:100%"));
}

fn button_bearing_components(fill: &str) -> Vec<EmailComponent> {
    vec![
        component("1", "button", &[("backgroundColor", fill)]),
        component("2", "service_offer", &[("buttonBgColor", fill)]),
        component("3", "sales_offer", &[("buttonBgColor", fill), ("showImage", "false")]),
    ]
}

#[test]
fn invariant_outlined_style_reaches_every_button() {
    let components = button_bearing_components("#ff6600");
    let html = render_components(&components, &settings(ButtonStyle::Outlined));
    let outlined = "background-color:transparent;border:2px solid #ff6600;";
    assert_eq!(standard_view(&html).matches(outlined).count(), 3);
    assert!(!html.contains("bgcolor=\"#ff6600\""));
}

#[test]
fn invariant_outlined_style_reaches_legacy_engine() {
    let components = vec![component("1", "service_offer", &[("buttonBgColor", "#ff6600")])];
    let html = render_components(&components, &settings(ButtonStyle::Outlined));
    let legacy = legacy_view(body_rows(&html));

    let start = legacy.find("<v:roundrect").unwrap();
    let end = legacy[start..].find('>').unwrap() + start;
    let shape = &legacy[start..end];
    assert!(shape.contains("strokecolor=\"#ff6600\""));
    assert!(shape.contains("filled=\"f\""));
    assert!(!shape.contains("fillcolor"));
    assert!(legacy.contains("<center style=\"color:#ff6600;"));
}

#[test]
fn invariant_pill_style_reaches_every_button() {
    let components = button_bearing_components("#ff6600");
    let html = render_components(&components, &settings(ButtonStyle::Pill));
    let rows = body_rows(&html);
    assert!(rows.matches("border-radius:50px").count() >= 3);
    assert!(!rows.contains("border-radius:8px"));
    assert!(rows.contains("arcsize=\"50%\""));
}

#[test]
fn invariant_exactly_one_button_per_engine() {
    let s = DesignSettings::default();
    for c in button_bearing_components("#007bff") {
        let kind = c.component_type.clone();
        let html = render_components(&[c], &s);
        let standard = standard_view(body_rows(&html));
        let legacy = legacy_view(body_rows(&html));

        let interactive =
            |view: &str| view.matches("<a ").count() + view.matches("<v:roundrect").count();
        assert_eq!(interactive(&standard), 1, "{kind} in standard view");
        assert_eq!(interactive(&legacy), 1, "{kind} in legacy view");
        assert_eq!(standard.matches("<v:roundrect").count(), 0, "{kind}");
    }
}

#[test]
fn invariant_malformed_additional_offers_render_as_empty() {
    let s = DesignSettings::default();
    let with_offers = |raw: &str| {
        render_components(&[component("1", "sales_offer", &[("additionalOffers", raw)])], &s)
    };
    assert_eq!(with_offers("{not json"), with_offers("[]"));
}

#[test]
fn invariant_extreme_numbers_render() {
    let huge = "4000000000";
    let components = vec![
        component(
            "1",
            "service_offer",
            &[("buttonPaddingTop", huge), ("buttonPaddingBottom", huge)],
        ),
        component("2", "image", &[("paddingLeft", huge), ("paddingRight", huge)]),
        component("3", "button", &[("fontSize", huge), ("paddingTop", huge)]),
        component("4", "sales_offer", &[("imageWidth", huge), ("layout", "left")]),
        component("5", "spacer", &[("height", huge)]),
    ];
    let html = render_components(&components, &DesignSettings::default());
    let rows = body_rows(&html);

    assert!(rows.contains(&format!("height:{}px", u32::MAX)));
    assert!(rows.contains("max-width:0px"));
    assert!(rows.contains("width:600px;padding:20px;"));
    assert!(rows.contains("height:4000000000px"));
}

#[test]
fn invariant_merge_fields_survive_in_styles() {
    let token = "{{brand.primary_color}}";
    let components = vec![
        component("1", "button", &[("backgroundColor", token)]),
        component("2", "header", &[("color", token)]),
    ];
    let html = render_components(&components, &DesignSettings::default());

    assert!(html.contains("bgcolor=\"{{brand.primary_color}}\""));
    assert!(html.contains("background-color:{{brand.primary_color}};"));
    assert!(html.contains("color:{{brand.primary_color}};"));
    assert!(!html.contains("\"brand.primary_color\""));
}

#[test]
fn scenario_header_with_merge_field() {
    let components = vec![component(
        "1",
        "header",
        &[("text", "Hello {{recipient.first_name}}"), ("textAlign", "center"), ("fontSize", "24")],
    )];
    let html = render_components(&components, &DesignSettings::default());
    let rows = body_rows(&html);

    assert_eq!(rows.matches("<tr>").count(), 1);
    let end = rows.find("</h1>").unwrap();
    let start = rows[..end].rfind('>').unwrap() + 1;
    assert_eq!(&rows[start..end], "Hello {{recipient.first_name}}");

    let open = &rows[rows.find("<h1").unwrap()..start];
    assert!(open.contains("text-align:center"));
    assert!(open.contains("font-size:24px"));
}

#[test]
fn invariant_unknown_types_are_skipped() {
    let components = vec![
        component("1", "carousel", &[]),
        component("2", "text_block", &[("text", "Still here")]),
    ];
    let html = render_components(&components, &DesignSettings::default());
    assert!(html.contains("Still here"));
    assert!(!html.contains(EMPTY_PLACEHOLDER));
}

#[test]
fn invariant_legacy_file_loads_and_migrates() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"id": 1700000000000, "type": "button", "data": {{"text": "Go", "url": "https://legacy.test", "fullWidth": "true"}}}}]"#
    )
    .unwrap();

    let project = Project::load(file.path()).unwrap();
    assert_eq!(project.schema_version, "2.0.0");
    let html = render(&project.document(), &project.settings);
    assert!(html.contains("href=\"https://legacy.test\""));
    assert!(body_rows(&html).contains("width:100%"));
}

#[test]
fn invariant_compile_fingerprints_stable() {
    let project = Project::new(
        settings(ButtonStyle::Square),
        vec![component("1", "header", &[]), component("2", "sales_offer", &[])],
    );
    let pipeline = CompilationPipeline::default();
    let first = pipeline.compile(&project).unwrap();
    let second = pipeline.compile(&project).unwrap();

    assert_eq!(first.project_hash, second.project_hash);
    assert_eq!(first.html_hash, second.html_hash);
    assert_ne!(first.id, second.id);
    assert!(first.validation.valid);
}
