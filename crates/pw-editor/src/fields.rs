//! Field → attribute/style translation.
//!
//! Well-known field names map to fixed attribute or style writes. Anything
//! else with a non-empty value becomes a same-named attribute.

use pw_core::effect::CanvasEffect;
use pw_core::id::NodeId;

/// Custom properties driven by `colorScheme`: background, foreground, accent.
pub const SCHEME_PROPERTIES: [&str; 3] = ["--pw-bg", "--pw-fg", "--pw-accent"];

/// `(bg, fg, accent)` for a named scheme.
pub fn scheme_palette(scheme: &str) -> Option<[&'static str; 3]> {
    Some(match scheme {
        "light" => ["#ffffff", "#111827", "#2563eb"],
        "dark" => ["#111827", "#f9fafb", "#60a5fa"],
        "brand" => ["#4f46e5", "#ffffff", "#f59e0b"],
        "muted" => ["#f3f4f6", "#374151", "#6b7280"],
        _ => return None,
    })
}

/// `url("…")` with the value escaped as a CSS string.
fn css_url(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 7);
    out.push_str("url(\"");
    for c in value.chars() {
        match c {
            '"' | '\\' | ')' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            '\r' | '\u{c}' => {}
            _ => out.push(c),
        }
    }
    out.push_str("\")");
    out
}

enum Target {
    Attr(&'static str),
    Style(&'static str),
    /// Unitless numbers get `px` appended.
    PxStyle(&'static str),
}

fn well_known(name: &str) -> Option<Target> {
    Some(match name {
        "src" => Target::Attr("src"),
        "alt" => Target::Attr("alt"),
        "href" | "linkUrl" => Target::Attr("href"),
        "title" => Target::Attr("title"),
        "id" => Target::Attr("id"),
        "placeholder" => Target::Attr("placeholder"),
        "textAlignment" => Target::Style("text-align"),
        "textColor" => Target::Style("color"),
        "backgroundColor" => Target::Style("background-color"),
        "objectFit" => Target::Style("object-fit"),
        "fontSize" => Target::PxStyle("font-size"),
        "padding" => Target::PxStyle("padding"),
        "borderRadius" => Target::PxStyle("border-radius"),
        "gap" => Target::PxStyle("gap"),
        "width" => Target::PxStyle("width"),
        "height" => Target::PxStyle("height"),
        _ => return None,
    })
}

/// Append `px` to a bare number; leave values with units alone.
pub fn px(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.parse::<f64>().is_ok() {
        format!("{trimmed}px")
    } else {
        trimmed.to_string()
    }
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "on" | "yes"
    )
}

fn set_attr(id: NodeId, name: &str, value: &str) -> CanvasEffect {
    CanvasEffect::SetAttribute {
        id,
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn set_style(id: NodeId, property: &str, value: String) -> CanvasEffect {
    CanvasEffect::SetStyle {
        id,
        property: property.to_string(),
        value,
    }
}

/// Effects that apply `name = value` to node `id`.
pub fn map_field(id: NodeId, name: &str, value: &str) -> Vec<CanvasEffect> {
    let empty = value.trim().is_empty();

    if let Some(target) = well_known(name) {
        return match (target, empty) {
            (Target::Attr(attr), true) => vec![CanvasEffect::RemoveAttribute {
                id,
                name: attr.to_string(),
            }],
            (Target::Attr(attr), false) => vec![set_attr(id, attr, value.trim())],
            (Target::Style(prop) | Target::PxStyle(prop), true) => {
                vec![CanvasEffect::RemoveStyle {
                    id,
                    property: prop.to_string(),
                }]
            }
            (Target::Style(prop), false) => vec![set_style(id, prop, value.trim().to_string())],
            (Target::PxStyle(prop), false) => vec![set_style(id, prop, px(value))],
        };
    }

    match name {
        "colorScheme" => match scheme_palette(value.trim()) {
            Some(colors) => SCHEME_PROPERTIES
                .iter()
                .zip(colors)
                .map(|(prop, color)| set_style(id, prop, color.to_string()))
                .collect(),
            None => {
                log::debug!("ignoring unknown color scheme `{value}` on {id}");
                vec![]
            }
        },
        "openInNewTab" => {
            if truthy(value) {
                vec![
                    set_attr(id, "target", "_blank"),
                    set_attr(id, "rel", "noopener noreferrer"),
                ]
            } else {
                vec![
                    CanvasEffect::RemoveAttribute {
                        id,
                        name: "target".to_string(),
                    },
                    CanvasEffect::RemoveAttribute {
                        id,
                        name: "rel".to_string(),
                    },
                ]
            }
        }
        "cssClasses" => {
            let classes = value.split_whitespace().collect::<Vec<_>>().join(" ");
            vec![set_attr(id, "class", &classes)]
        }
        "columns" => match value.trim().parse::<u32>() {
            Ok(n) if n > 0 => vec![
                set_style(id, "--pw-columns", n.to_string()),
                set_style(
                    id,
                    "grid-template-columns",
                    format!("repeat({n}, minmax(0, 1fr))"),
                ),
            ],
            _ => vec![],
        },
        "backgroundImage" if !empty => vec![set_style(
            id,
            "background-image",
            css_url(value.trim()),
        )],
        "backgroundImage" => vec![CanvasEffect::RemoveStyle {
            id,
            property: "background-image".to_string(),
        }],
        _ if empty => vec![],
        _ => vec![set_attr(id, name, value)],
    }
}
