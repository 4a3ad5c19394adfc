//! Data model shared by every canvas controller.
//!
//! Component nodes themselves are owned by the host editor; the layer only
//! keeps [`NodeId`]s. What lives here are the layer's own value types:
//! template descriptors, field schemas, grid configuration, snap guides and
//! resize handle directions.

use crate::error::{CanvasError, Result};
use crate::id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Markers ─────────────────────────────────────────────────────────────

/// Attribute carrying a smart-object template id on rendered markup.
pub const SMART_OBJECT_ATTR: &str = "data-smart-object";

/// Attribute the host editor stamps on every component's element.
pub const HOST_TYPE_ATTR: &str = "data-gjs-type";

/// Element id of the single hover outline overlay.
pub const OUTLINE_ELEMENT_ID: &str = "pw-hover-outline";

/// Element id of the stylesheet injected for outline/handle/guide visuals.
pub const OVERLAY_STYLESHEET_ID: &str = "pw-canvas-overlays";

// ─── Semantic type ───────────────────────────────────────────────────────

/// Closed classification of a node, resolved by `classify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeTag {
    Text,
    Button,
    Image,
    Link,
    Container,
    Grid,
    SmartObject,
    Unknown,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Text => "text",
            TypeTag::Button => "button",
            TypeTag::Image => "image",
            TypeTag::Link => "link",
            TypeTag::Container => "container",
            TypeTag::Grid => "grid",
            TypeTag::SmartObject => "smartObject",
            TypeTag::Unknown => "unknown",
        }
    }

    /// Map a raw host type string. Unrecognized names yield `None`.
    pub fn from_host_type(raw: &str) -> Option<TypeTag> {
        match raw.to_ascii_lowercase().as_str() {
            "text" | "textnode" | "heading" | "paragraph" | "label" => Some(TypeTag::Text),
            "button" | "submit" => Some(TypeTag::Button),
            "image" | "img" | "picture" => Some(TypeTag::Image),
            "link" | "anchor" => Some(TypeTag::Link),
            "container" | "section" | "wrapper" | "box" => Some(TypeTag::Container),
            "grid" | "row" | "cell" | "column" | "flex" => Some(TypeTag::Grid),
            "smart-object" | "smartobject" => Some(TypeTag::SmartObject),
            _ => None,
        }
    }
}

// ─── Field schema ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Select,
    Checkbox,
    Color,
    Image,
    Textarea,
    Range,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Optional per-field limits and hints. Empty for most text fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub label: String,
    #[serde(default)]
    pub constraints: FieldConstraints,
}

impl Field {
    pub fn new(name: &str, kind: FieldKind, label: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            label: label.to_string(),
            constraints: FieldConstraints::default(),
        }
    }

    pub fn text(name: &str, label: &str) -> Self {
        Self::new(name, FieldKind::Text, label)
    }

    pub fn select(name: &str, label: &str, options: &[(&str, &str)]) -> Self {
        let mut f = Self::new(name, FieldKind::Select, label);
        f.constraints.options = options
            .iter()
            .map(|(value, label)| SelectOption {
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect();
        f
    }

    pub fn range(name: &str, label: &str, min: f64, max: f64, step: f64) -> Self {
        let mut f = Self::new(name, FieldKind::Range, label);
        f.constraints.min = Some(min);
        f.constraints.max = Some(max);
        f.constraints.step = Some(step);
        f
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.constraints.placeholder = Some(placeholder.to_string());
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.constraints.default = Some(value.to_string());
        self
    }
}

/// Ordered list of editable properties for one node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSchema {
    pub fields: Vec<Field>,
}

impl FieldSchema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Minimal schema installed when resolution fails: id, classes, title.
    pub fn fallback() -> Self {
        Self::new(vec![
            Field::text("id", "Id"),
            Field::text("cssClasses", "CSS Classes").with_placeholder("class-a class-b"),
            Field::text("title", "Title"),
        ])
    }
}

// ─── Templates ───────────────────────────────────────────────────────────

/// A registrable component template ("smart object").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDescriptor {
    pub id: String,
    pub display_name: String,
    pub category: String,
    #[serde(default)]
    pub icon: String,
    pub default_markup: String,
    #[serde(default)]
    pub default_attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub default_style: BTreeMap<String, String>,
    #[serde(default)]
    pub field_schema: FieldSchema,
}

impl TemplateDescriptor {
    pub fn palette_entry(&self) -> PaletteEntry {
        PaletteEntry {
            id: self.id.clone(),
            label: self.display_name.clone(),
            category: self.category.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// One entry in the host editor's drag palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub id: String,
    pub label: String,
    pub category: String,
    pub icon: String,
}

// ─── Grid ────────────────────────────────────────────────────────────────

/// Magnetic grid settings. Only changed through [`GridConfig::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Grid pitch in CSS pixels. Always > 0.
    pub cell_size: u32,
    /// Whether drags snap at all.
    pub enabled: bool,
    /// Max distance (px) from a grid line at which a coordinate snaps.
    pub snap_threshold: u32,
    /// Whether alignment guides are drawn during drags.
    pub show_guides: bool,
    /// Whether the grid background is painted on the surface.
    pub visible: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 20,
            enabled: true,
            snap_threshold: 10,
            show_guides: true,
            visible: false,
        }
    }
}

/// Partial update for [`GridConfig`]. Numeric fields are signed so that
/// negative input can be reported rather than failing to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfigPatch {
    pub cell_size: Option<i64>,
    pub enabled: Option<bool>,
    pub snap_threshold: Option<i64>,
    pub show_guides: Option<bool>,
    pub visible: Option<bool>,
}

impl GridConfig {
    /// Validate and apply a patch. On error `self` is left untouched.
    pub fn apply(&self, patch: &GridConfigPatch) -> Result<GridConfig> {
        let mut next = *self;
        if let Some(cell) = patch.cell_size {
            if cell <= 0 || cell > i64::from(u32::MAX) {
                return Err(CanvasError::InvalidConfig(format!(
                    "cellSize must be a positive integer, got {cell}"
                )));
            }
            next.cell_size = cell as u32;
        }
        if let Some(threshold) = patch.snap_threshold {
            if threshold < 0 || threshold > i64::from(u32::MAX) {
                return Err(CanvasError::InvalidConfig(format!(
                    "snapThreshold must be non-negative, got {threshold}"
                )));
            }
            next.snap_threshold = threshold as u32;
        }
        if let Some(enabled) = patch.enabled {
            next.enabled = enabled;
        }
        if let Some(show) = patch.show_guides {
            next.show_guides = show;
        }
        if let Some(visible) = patch.visible {
            next.visible = visible;
        }
        Ok(next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Transient alignment line drawn during a drag. Advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapGuide {
    pub axis: Axis,
    pub position: f64,
    pub is_center_guide: bool,
}

// ─── Resize handles ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleDirection {
    N,
    S,
    E,
    W,
    Ne,
    Nw,
    Se,
    Sw,
}

impl HandleDirection {
    /// Corners first, then edges.
    pub const ALL: [HandleDirection; 8] = [
        HandleDirection::Nw,
        HandleDirection::Ne,
        HandleDirection::Se,
        HandleDirection::Sw,
        HandleDirection::N,
        HandleDirection::E,
        HandleDirection::S,
        HandleDirection::W,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HandleDirection::N => "n",
            HandleDirection::S => "s",
            HandleDirection::E => "e",
            HandleDirection::W => "w",
            HandleDirection::Ne => "ne",
            HandleDirection::Nw => "nw",
            HandleDirection::Se => "se",
            HandleDirection::Sw => "sw",
        }
    }

    pub fn parse(s: &str) -> Option<HandleDirection> {
        HandleDirection::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
    }

    /// Sign applied to pointer delta-x for width: +1 east, -1 west, 0 none.
    pub fn width_sign(&self) -> f64 {
        match self {
            HandleDirection::E | HandleDirection::Ne | HandleDirection::Se => 1.0,
            HandleDirection::W | HandleDirection::Nw | HandleDirection::Sw => -1.0,
            HandleDirection::N | HandleDirection::S => 0.0,
        }
    }

    /// Sign applied to pointer delta-y for height: +1 south, -1 north, 0 none.
    pub fn height_sign(&self) -> f64 {
        match self {
            HandleDirection::S | HandleDirection::Se | HandleDirection::Sw => 1.0,
            HandleDirection::N | HandleDirection::Ne | HandleDirection::Nw => -1.0,
            HandleDirection::E | HandleDirection::W => 0.0,
        }
    }

    pub fn cursor(&self) -> &'static str {
        match self {
            HandleDirection::N | HandleDirection::S => "ns-resize",
            HandleDirection::E | HandleDirection::W => "ew-resize",
            HandleDirection::Ne | HandleDirection::Sw => "nesw-resize",
            HandleDirection::Nw | HandleDirection::Se => "nwse-resize",
        }
    }
}

// ─── Hover ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverState {
    pub hovered_node_id: Option<NodeId>,
    pub enabled: bool,
}

impl Default for HoverState {
    fn default() -> Self {
        Self {
            hovered_node_id: None,
            enabled: true,
        }
    }
}
