//! Built-in smart-object catalog registered at startup.

use pw_core::model::{Field, FieldKind, FieldSchema, TemplateDescriptor};
use std::collections::BTreeMap;

pub const CATEGORY_COMMERCE: &str = "Commerce";
pub const CATEGORY_MARKETING: &str = "Marketing";
pub const CATEGORY_LAYOUT: &str = "Layout";

fn pairs(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn template(
    id: &str,
    display_name: &str,
    category: &str,
    icon: &str,
    markup: &str,
    style: &[(&str, &str)],
    fields: Vec<Field>,
) -> TemplateDescriptor {
    TemplateDescriptor {
        id: id.to_string(),
        display_name: display_name.to_string(),
        category: category.to_string(),
        icon: icon.to_string(),
        default_markup: markup.to_string(),
        default_attributes: pairs(&[("data-smart-object", id)]),
        default_style: pairs(style),
        field_schema: FieldSchema::new(fields),
    }
}

fn color_scheme() -> Field {
    Field::select(
        "colorScheme",
        "Color Scheme",
        &[
            ("light", "Light"),
            ("dark", "Dark"),
            ("brand", "Brand"),
            ("muted", "Muted"),
        ],
    )
    .with_default("light")
}

fn alignment() -> Field {
    Field::select(
        "textAlignment",
        "Text Alignment",
        &[
            ("left", "Left"),
            ("center", "Center"),
            ("right", "Right"),
        ],
    )
}

pub fn builtin_templates() -> Vec<TemplateDescriptor> {
    vec![
        template(
            "product-card",
            "Product Card",
            CATEGORY_COMMERCE,
            "fa-tag",
            r##"<div class="pw-product-card"><img src="" alt="Product"/><h3>Product name</h3><p class="price">$0.00</p><a class="btn" href="#">Add to cart</a></div>"##,
            &[("padding", "16px"), ("border-radius", "8px")],
            vec![
                Field::new("productId", FieldKind::Text, "Product"),
                Field::new("src", FieldKind::Image, "Image"),
                Field::text("alt", "Alt Text"),
                Field::new("showPrice", FieldKind::Checkbox, "Show Price").with_default("true"),
                Field::text("buttonLabel", "Button Label").with_default("Add to cart"),
                color_scheme(),
            ],
        ),
        template(
            "product-grid",
            "Product Grid",
            CATEGORY_COMMERCE,
            "fa-th",
            r##"<div class="pw-product-grid grid"></div>"##,
            &[("display", "grid"), ("gap", "16px")],
            vec![
                Field::text("categoryId", "Category"),
                Field::range("columns", "Columns", 1.0, 6.0, 1.0).with_default("3"),
                Field::range("gap", "Gap", 0.0, 64.0, 4.0).with_default("16"),
                Field::new("limit", FieldKind::Number, "Max Products").with_default("12"),
                color_scheme(),
            ],
        ),
        template(
            "hero-banner",
            "Hero Banner",
            CATEGORY_MARKETING,
            "fa-image",
            r##"<section class="pw-hero"><h1>Headline</h1><p>Supporting copy</p><a class="btn" href="#">Shop now</a></section>"##,
            &[("min-height", "360px"), ("padding", "48px")],
            vec![
                Field::text("headline", "Headline"),
                Field::new("subheadline", FieldKind::Textarea, "Subheadline"),
                Field::new("backgroundImage", FieldKind::Image, "Background"),
                Field::text("linkUrl", "Button Link").with_placeholder("https://"),
                alignment(),
                color_scheme(),
            ],
        ),
        template(
            "pricing-table",
            "Pricing Table",
            CATEGORY_MARKETING,
            "fa-table",
            r##"<div class="pw-pricing row"><div class="col">Basic</div><div class="col">Pro</div></div>"##,
            &[("display", "flex"), ("gap", "24px")],
            vec![
                Field::range("columns", "Plans", 1.0, 4.0, 1.0).with_default("2"),
                Field::text("currency", "Currency").with_default("USD"),
                Field::new("highlightPlan", FieldKind::Number, "Highlighted Plan"),
                color_scheme(),
            ],
        ),
        template(
            "testimonial",
            "Testimonial",
            CATEGORY_MARKETING,
            "fa-quote-left",
            r##"<blockquote class="pw-testimonial"><p>Quote</p><cite>Customer</cite></blockquote>"##,
            &[("padding", "24px")],
            vec![
                Field::new("quote", FieldKind::Textarea, "Quote"),
                Field::text("author", "Author"),
                Field::new("avatar", FieldKind::Image, "Avatar"),
                alignment(),
            ],
        ),
        template(
            "feature-grid",
            "Feature Grid",
            CATEGORY_LAYOUT,
            "fa-th-large",
            r##"<div class="pw-features grid"><div class="feature"></div><div class="feature"></div><div class="feature"></div></div>"##,
            &[("display", "grid"), ("grid-template-columns", "repeat(3, 1fr)")],
            vec![
                Field::range("columns", "Columns", 1.0, 6.0, 1.0).with_default("3"),
                Field::range("gap", "Gap", 0.0, 64.0, 4.0).with_default("24"),
                Field::new("backgroundColor", FieldKind::Color, "Background"),
            ],
        ),
        template(
            "newsletter-signup",
            "Newsletter Signup",
            CATEGORY_MARKETING,
            "fa-envelope",
            r##"<form class="pw-newsletter"><input type="email" placeholder="you@example.com"/><button type="submit">Subscribe</button></form>"##,
            &[("display", "flex"), ("gap", "8px")],
            vec![
                Field::text("placeholder", "Placeholder").with_default("you@example.com"),
                Field::text("buttonLabel", "Button Label").with_default("Subscribe"),
                Field::text("listId", "Mailing List"),
                color_scheme(),
            ],
        ),
        template(
            "cta-button",
            "Call To Action",
            CATEGORY_MARKETING,
            "fa-hand-pointer",
            r##"<a class="pw-cta btn" href="#">Get started</a>"##,
            &[("display", "inline-block"), ("padding", "12px 24px")],
            vec![
                Field::text("linkUrl", "Link").with_placeholder("https://"),
                Field::new("openInNewTab", FieldKind::Checkbox, "Open in new tab"),
                color_scheme(),
            ],
        ),
    ]
}
