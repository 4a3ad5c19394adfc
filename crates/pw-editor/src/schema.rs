//! Built-in field schemas.
//!
//! Embedders with a remote schema service answer `ResolveSchema` requests
//! themselves; everyone else can answer them with [`resolve`].

use crate::templates::TemplateRegistry;
use pw_core::error::{CanvasError, Result};
use pw_core::model::{Field, FieldKind, FieldSchema, TypeTag};

fn typography() -> Vec<Field> {
    vec![
        Field::select(
            "textAlignment",
            "Alignment",
            &[
                ("left", "Left"),
                ("center", "Center"),
                ("right", "Right"),
                ("justify", "Justify"),
            ],
        ),
        Field::new("textColor", FieldKind::Color, "Text Color"),
        Field::range("fontSize", "Font Size", 8.0, 96.0, 1.0),
    ]
}

fn scheme() -> Field {
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
}

fn box_fields() -> Vec<Field> {
    vec![
        Field::new("backgroundColor", FieldKind::Color, "Background"),
        Field::range("padding", "Padding", 0.0, 128.0, 4.0),
        Field::range("borderRadius", "Corner Radius", 0.0, 64.0, 1.0),
    ]
}

/// Schema for a plain (non-smart) node of type `tag`.
pub fn builtin_schema(tag: TypeTag) -> FieldSchema {
    let mut fields = Vec::new();
    match tag {
        TypeTag::Text => {
            fields.extend(typography());
            fields.push(Field::text("title", "Tooltip"));
        }
        TypeTag::Button => {
            fields.push(Field::text("linkUrl", "Link").with_placeholder("https://"));
            fields.push(Field::new("openInNewTab", FieldKind::Checkbox, "Open in new tab"));
            fields.push(scheme());
            fields.push(Field::range("borderRadius", "Corner Radius", 0.0, 64.0, 1.0));
        }
        TypeTag::Image => {
            fields.push(Field::new("src", FieldKind::Image, "Image"));
            fields.push(Field::text("alt", "Alt Text").with_placeholder("Describe the image"));
            fields.push(Field::new("width", FieldKind::Number, "Width"));
            fields.push(Field::select(
                "objectFit",
                "Fit",
                &[
                    ("cover", "Cover"),
                    ("contain", "Contain"),
                    ("fill", "Stretch"),
                ],
            ));
            fields.push(Field::text("title", "Tooltip"));
        }
        TypeTag::Link => {
            fields.push(Field::text("href", "Link").with_placeholder("https://"));
            fields.push(Field::new("openInNewTab", FieldKind::Checkbox, "Open in new tab"));
            fields.push(Field::text("title", "Tooltip"));
        }
        TypeTag::Container => {
            fields.extend(box_fields());
            fields.push(scheme());
            fields.push(Field::text("cssClasses", "CSS Classes"));
        }
        TypeTag::Grid => {
            fields.push(Field::range("columns", "Columns", 1.0, 12.0, 1.0));
            fields.push(Field::range("gap", "Gap", 0.0, 64.0, 4.0));
            fields.extend(box_fields());
        }
        TypeTag::SmartObject | TypeTag::Unknown => return FieldSchema::fallback(),
    }
    FieldSchema::new(fields)
}

/// Resolve the schema for `(tag, smart_object)`.
///
/// Smart objects take their schema from the registry.
///
/// # Errors
/// `SchemaResolution` when a smart object id is missing or not registered.
pub fn resolve(
    tag: TypeTag,
    smart_object: Option<&str>,
    registry: &TemplateRegistry,
) -> Result<FieldSchema> {
    match (tag, smart_object) {
        (TypeTag::SmartObject, Some(id)) => registry
            .get(id)
            .map(|d| d.field_schema.clone())
            .ok_or_else(|| CanvasError::SchemaResolution {
                type_tag: tag.as_str().to_string(),
                reason: format!("no template registered under `{id}`"),
            }),
        (TypeTag::SmartObject, None) => Err(CanvasError::SchemaResolution {
            type_tag: tag.as_str().to_string(),
            reason: "smart object without an id".to_string(),
        }),
        (tag, _) => Ok(builtin_schema(tag)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_templates;
    use pretty_assertions::assert_eq;

    fn registry() -> TemplateRegistry {
        let mut reg = TemplateRegistry::new();
        for t in builtin_templates() {
            reg.register(t).unwrap();
        }
        reg
    }

    #[test]
    fn image_schema_has_src_and_alt() {
        let schema = resolve(TypeTag::Image, None, &registry()).unwrap();
        assert!(schema.get("src").is_some());
        assert!(schema.get("alt").is_some());
        assert_eq!(schema.get("src").unwrap().kind, FieldKind::Image);
    }

    #[test]
    fn smart_object_schema_comes_from_registry() {
        let schema = resolve(TypeTag::SmartObject, Some("product-card"), &registry()).unwrap();
        assert!(schema.get("productId").is_some());
        assert!(schema.get("colorScheme").is_some());
    }

    #[test]
    fn unknown_smart_object_fails() {
        let err = resolve(TypeTag::SmartObject, Some("nope"), &registry()).unwrap_err();
        assert!(matches!(err, CanvasError::SchemaResolution { .. }));
        assert!(resolve(TypeTag::SmartObject, None, &registry()).is_err());
    }

    #[test]
    fn unknown_type_gets_fallback() {
        assert_eq!(builtin_schema(TypeTag::Unknown), FieldSchema::fallback());
    }
}
