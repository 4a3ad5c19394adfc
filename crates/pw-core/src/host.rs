//! Seam between the canvas layer and the host page editor.
//!
//! The host owns the component tree, the embedded rendering surface, and the
//! DOM. The layer reads through [`ComponentModel`] and writes by handing
//! [`CanvasEffect`]s to an [`EffectSink`].

use crate::effect::CanvasEffect;
use crate::geometry::{Rect, SurfaceMetrics};
use crate::id::NodeId;
use crate::model::FieldSchema;

/// Read-only view of the host's component tree and rendering surface.
///
/// Every query must tolerate ids the host no longer knows: return `None`
/// (or an empty list) rather than panicking.
pub trait ComponentModel {
    /// Host component type string (`"default"`, `"image"`, …).
    fn node_type(&self, id: NodeId) -> Option<String>;

    /// Lower-case element tag name. `None` means the node does not exist.
    fn tag_name(&self, id: NodeId) -> Option<String>;

    fn attribute(&self, id: NodeId, name: &str) -> Option<String>;

    fn style(&self, id: NodeId, property: &str) -> Option<String>;

    fn classes(&self, id: NodeId) -> Vec<String>;

    /// Parent element inside the surface document.
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// `true` for the surface document's `<html>` / `<body>`.
    fn is_document_root(&self, id: NodeId) -> bool;

    /// `getBoundingClientRect()` of the element, in surface viewport space.
    fn bounding_rect(&self, id: NodeId) -> Option<Rect>;

    /// Computed CSS `display` of the element.
    fn computed_display(&self, id: NodeId) -> Option<String>;

    /// Trait schema currently installed on the node, if any.
    fn traits(&self, id: NodeId) -> Option<FieldSchema>;

    /// Placement of the surface in the host page. `None` while detached.
    fn surface(&self) -> Option<SurfaceMetrics>;

    fn exists(&self, id: NodeId) -> bool {
        self.tag_name(id).is_some()
    }

    /// `true` if `node` is `ancestor` or lies beneath it.
    fn is_within(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }
}

/// Applies effects produced by the controllers.
pub trait EffectSink {
    fn apply(&mut self, effect: CanvasEffect);

    fn apply_all(&mut self, effects: Vec<CanvasEffect>) {
        for effect in effects {
            self.apply(effect);
        }
    }
}

/// A full host: readable model plus effect application.
pub trait HostEditor: ComponentModel + EffectSink {}

impl<T: ComponentModel + EffectSink> HostEditor for T {}
