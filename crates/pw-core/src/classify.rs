//! Node classification and human-readable labels.
//!
//! `classify` maps the loose signals a host node carries (marker attribute,
//! tag, host type string, class names) onto a closed [`TypeTag`]. Precedence:
//!
//! 1. smart-object marker
//! 2. text-like tag or type
//! 3. button-like
//! 4. image
//! 5. link
//! 6. semantic container tag (`section`, `header`, …)
//! 7. class-name heuristics (`grid`, `flex`, `row`, `col`)
//! 8. raw host type string
//! 9. plain `div`
//! 10. `Unknown`

use crate::host::ComponentModel;
use crate::id::NodeId;
use crate::model::{SMART_OBJECT_ATTR, TypeTag};

/// The subset of a host node that classification looks at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeInfo {
    pub smart_object: Option<String>,
    pub node_type: Option<String>,
    pub tag_name: String,
    pub classes: Vec<String>,
    /// `type` attribute, relevant for `<input type="submit">`.
    pub input_type: Option<String>,
}

impl NodeInfo {
    /// Snapshot a node through the host model. `None` if the node is gone.
    pub fn read(model: &impl ComponentModel, id: NodeId) -> Option<NodeInfo> {
        let tag_name = model.tag_name(id)?;
        Some(NodeInfo {
            smart_object: model
                .attribute(id, SMART_OBJECT_ATTR)
                .filter(|s| !s.trim().is_empty()),
            node_type: model.node_type(id).filter(|s| !s.is_empty()),
            tag_name: tag_name.to_ascii_lowercase(),
            classes: model.classes(id),
            input_type: model.attribute(id, "type"),
        })
    }

    fn host_type(&self) -> Option<&str> {
        self.node_type
            .as_deref()
            .filter(|t| !t.is_empty() && *t != "default")
    }

    fn has_class_token(&self, needles: &[&str]) -> bool {
        self.classes.iter().any(|class| {
            let class = class.to_ascii_lowercase();
            class
                .split(['-', '_'])
                .any(|token| needles.contains(&token))
        })
    }
}

const TEXT_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "span", "label", "blockquote", "strong", "em",
    "small",
];
const CONTAINER_TAGS: &[&str] = &[
    "section", "header", "footer", "nav", "main", "article", "aside", "form",
];

pub fn classify(info: &NodeInfo) -> TypeTag {
    if info.smart_object.is_some() {
        return TypeTag::SmartObject;
    }

    let tag = info.tag_name.as_str();
    let host_type = info.host_type();

    if TEXT_TAGS.contains(&tag) || matches!(host_type, Some("text" | "textnode")) {
        return TypeTag::Text;
    }

    let submit = matches!(info.input_type.as_deref(), Some("submit" | "button"));
    if tag == "button"
        || host_type == Some("button")
        || (tag == "input" && submit)
        || (tag == "a" && info.has_class_token(&["btn", "button"]))
    {
        return TypeTag::Button;
    }

    if matches!(tag, "img" | "picture") || host_type == Some("image") {
        return TypeTag::Image;
    }

    if tag == "a" || host_type == Some("link") {
        return TypeTag::Link;
    }

    if CONTAINER_TAGS.contains(&tag) {
        return TypeTag::Container;
    }

    if info.has_class_token(&["grid", "flex", "row", "col"]) {
        return TypeTag::Grid;
    }

    if let Some(tag) = host_type.and_then(TypeTag::from_host_type) {
        return tag;
    }

    if tag == "div" {
        return TypeTag::Container;
    }

    TypeTag::Unknown
}

/// Turn an id into a title: `product-card` → `Product Card`,
/// `heroBanner` → `Hero Banner`.
pub fn humanize(raw: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in raw.chars() {
        if ch == '-' || ch == '_' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
        .iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn class_label(info: &NodeInfo) -> Option<&'static str> {
    const CLASS_LABELS: &[(&str, &str)] = &[
        ("grid", "Grid"),
        ("flex", "Flex Container"),
        ("row", "Row"),
        ("col", "Column"),
        ("btn", "Button"),
        ("card", "Card"),
        ("hero", "Hero Section"),
        ("navbar", "Navigation Bar"),
    ];
    CLASS_LABELS
        .iter()
        .find(|(needle, _)| info.has_class_token(&[*needle]))
        .map(|(_, label)| *label)
}

fn tag_label(tag: &str) -> Option<&'static str> {
    Some(match tag {
        "div" => "Container",
        "img" | "picture" => "Image",
        "p" => "Paragraph",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "Heading",
        "a" => "Link",
        "button" => "Button",
        "section" => "Section",
        "span" => "Text",
        "ul" | "ol" => "List",
        "li" => "List Item",
        "nav" => "Navigation",
        "header" => "Header",
        "footer" => "Footer",
        "form" => "Form",
        "input" => "Input",
        "video" => "Video",
        "table" => "Table",
        _ => return None,
    })
}

/// Label shown on the hover outline.
///
/// Smart-object id → host type → class heuristic → tag name.
pub fn component_label(info: &NodeInfo) -> String {
    if let Some(smart) = info.smart_object.as_deref() {
        return humanize(smart);
    }
    if let Some(host_type) = info.host_type() {
        return humanize(host_type);
    }
    if let Some(label) = class_label(info) {
        return label.to_string();
    }
    tag_label(&info.tag_name)
        .map(str::to_string)
        .unwrap_or_else(|| humanize(&info.tag_name))
}
