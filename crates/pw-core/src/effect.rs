//! The write vocabulary of the canvas layer.
//!
//! Controllers never mutate the host directly. They return `CanvasEffect`s
//! which the embedder applies through [`crate::host::EffectSink`]. Effects are
//! serializable so the WASM bridge can hand them to JavaScript as JSON.

use crate::geometry::Rect;
use crate::id::NodeId;
use crate::model::{
    FieldSchema, HandleDirection, PaletteEntry, SnapGuide, TemplateDescriptor, TypeTag,
};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Centre point and cursor of one resize handle, in surface document space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandlePlacement {
    pub direction: HandleDirection,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub cursor: &'static str,
}

/// Request for an asynchronous schema lookup. Answered through
/// `complete_schema(ticket, ..)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaRequest {
    pub ticket: u64,
    pub node: NodeId,
    pub type_tag: TypeTag,
    pub smart_object: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CanvasEffect {
    // ── Component model ──
    SetAttribute {
        id: NodeId,
        name: String,
        value: String,
    },
    RemoveAttribute {
        id: NodeId,
        name: String,
    },
    SetStyle {
        id: NodeId,
        property: String,
        value: String,
    },
    RemoveStyle {
        id: NodeId,
        property: String,
    },
    /// Install or replace a component type.
    RegisterType {
        descriptor: Box<TemplateDescriptor>,
    },
    /// Add or update one palette entry.
    UpsertPaletteEntry {
        entry: PaletteEntry,
    },
    /// Replace the node's trait list with `schema`.
    SetTraits {
        id: NodeId,
        schema: FieldSchema,
    },
    /// Re-render the trait panel for `id` without changing its schema.
    RefreshTraits {
        id: NodeId,
    },
    /// One history entry for the host's undo stack.
    ComponentUpdated {
        id: NodeId,
    },
    ResolveSchema {
        request: SchemaRequest,
    },

    // ── Overlays ──
    ShowOutline {
        target: NodeId,
        rect: Rect,
        label: String,
    },
    HideOutline,
    PlaceHandles {
        target: NodeId,
        handles: SmallVec<[HandlePlacement; 8]>,
    },
    ClearHandles,
    ShowGuides {
        guides: SmallVec<[SnapGuide; 6]>,
    },
    ClearGuides,
    ShowGrid {
        cell_size: u32,
    },
    HideGrid,
    InjectStylesheet {
        id: String,
        css: String,
    },
    RemoveStylesheet {
        id: String,
    },

    // ── Pointer plumbing ──
    /// Attach document-level pointer-move/up listeners.
    BeginPointerTracking,
    /// Detach the listeners installed by `BeginPointerTracking`.
    EndPointerTracking,
    SetCursor {
        cursor: Option<String>,
    },
    SuppressTextSelection {
        suppressed: bool,
    },
}

impl CanvasEffect {
    pub fn is_style_write(&self) -> bool {
        matches!(self, CanvasEffect::SetStyle { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn effect_fields_reach_json_in_camel_case() {
        let grid = serde_json::to_value(CanvasEffect::ShowGrid { cell_size: 20 }).unwrap();
        assert_eq!(grid, json!({ "op": "showGrid", "cellSize": 20 }));

        let style = serde_json::to_value(CanvasEffect::SetStyle {
            id: NodeId::intern("hero"),
            property: "left".into(),
            value: "40px".into(),
        })
        .unwrap();
        assert_eq!(
            style,
            json!({ "op": "setStyle", "id": "hero", "property": "left", "value": "40px" })
        );
    }
}
