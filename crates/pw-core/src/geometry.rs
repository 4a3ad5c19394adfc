//! Geometry bridge: coordinate translation between the embedded rendering
//! surface and the host document.
//!
//! Three spaces are in play:
//!
//! - **viewport**: what `getBoundingClientRect()` returns inside the surface.
//! - **document**: the surface's own document, i.e. viewport + surface scroll.
//! - **host**: the outer page, i.e. viewport + the surface element's offset
//!   within the host page.
//!
//! Every controller goes through [`measure`] instead of doing its own offset
//! math. Nothing here holds state.

use crate::error::{CanvasError, Result};
use crate::host::ComponentModel;
use crate::id::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle, origin at top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Same origin, new size.
    pub fn with_size(&self, size: Size) -> Rect {
        Rect::new(self.x, self.y, size.width, size.height)
    }
}

/// Placement of the embedded surface inside the host page.
///
/// Absent (`None` from [`ComponentModel::surface`]) while the surface is not
/// attached.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceMetrics {
    /// Top-left of the surface element in host-document coordinates.
    pub frame_origin: Point,
    /// Scroll offset of the surface's own document.
    pub scroll: Point,
}

/// One element's rectangle in all three coordinate spaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementGeometry {
    pub viewport: Rect,
    pub document: Rect,
    pub host: Rect,
}

/// Surface viewport → surface document.
pub fn viewport_to_document(rect: Rect, metrics: &SurfaceMetrics) -> Rect {
    rect.translate(metrics.scroll.x, metrics.scroll.y)
}

/// Surface viewport → host document.
pub fn viewport_to_host(rect: Rect, metrics: &SurfaceMetrics) -> Rect {
    rect.translate(metrics.frame_origin.x, metrics.frame_origin.y)
}

/// Host document point → surface document point (pointer events that
/// originate on host-level overlays such as resize handles).
pub fn host_point_to_document(p: Point, metrics: &SurfaceMetrics) -> Point {
    Point::new(
        p.x - metrics.frame_origin.x + metrics.scroll.x,
        p.y - metrics.frame_origin.y + metrics.scroll.y,
    )
}

/// Translate a viewport rect into every space.
///
/// Returns `NotReady` when the surface is not attached.
pub fn project(rect: Rect, metrics: Option<&SurfaceMetrics>) -> Result<ElementGeometry> {
    let metrics = metrics.ok_or(CanvasError::NotReady)?;
    Ok(ElementGeometry {
        viewport: rect,
        document: viewport_to_document(rect, metrics),
        host: viewport_to_host(rect, metrics),
    })
}

/// Measure an element living inside the surface.
///
/// `NotReady` if the surface is detached or the element has no layout box yet.
pub fn measure(model: &impl ComponentModel, id: NodeId) -> Result<ElementGeometry> {
    let metrics = model.surface().ok_or(CanvasError::NotReady)?;
    let rect = model.bounding_rect(id).ok_or(CanvasError::NotReady)?;
    project(rect, Some(&metrics))
}
