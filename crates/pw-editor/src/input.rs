//! Events the layer consumes.
//!
//! `HostEvent` mirrors the host editor's lifecycle bus. `PointerEvent` covers
//! raw pointer input from the surface (hover) and from the resize handles.
//! Both deserialize from the JSON the WASM bridge receives.

use pw_core::geometry::Point;
use pw_core::id::NodeId;
use pw_core::model::HandleDirection;
use serde::{Deserialize, Serialize};

/// One edited trait value carried by an `update` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldUpdate {
    pub name: String,
    pub value: String,
}

impl FieldUpdate {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    /// Host and rendering surface finished loading.
    Ready,
    SelectionChanged { node: NodeId },
    Deselected,
    DragStart { node: NodeId },
    Drag { node: NodeId },
    DragEnd,
    Update { node: NodeId, fields: Vec<FieldUpdate> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PointerEvent {
    /// `mouseover` inside the surface.
    Over { target: NodeId },
    /// `mouseout` inside the surface; `related` is where the pointer went.
    Out {
        target: NodeId,
        related: Option<NodeId>,
    },
    /// Pointer pressed on a resize handle. Host-document coordinates.
    HandleDown {
        direction: HandleDirection,
        x: f64,
        y: f64,
    },
    /// Document-level move while a resize is tracked.
    Move { x: f64, y: f64 },
    /// Document-level release while a resize is tracked.
    Up { x: f64, y: f64 },
}

impl PointerEvent {
    /// Pointer position, for the variants that carry one.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::HandleDown { x, y, .. } | Self::Move { x, y } | Self::Up { x, y } => {
                Some(Point::new(*x, *y))
            }
            _ => None,
        }
    }
}
