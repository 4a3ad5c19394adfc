//! Eight-handle resize for the selected node.
//!
//! `Idle → Active(direction) → Idle`. Handles are derived from the node's
//! rectangle every time it changes; they are never moved independently.
//! Only `pointer_up` produces a history entry.

use crate::config::ResizeConfig;
use crate::grid::snap;
use pw_core::effect::{CanvasEffect, HandlePlacement};
use pw_core::error::{CanvasError, Result};
use pw_core::geometry::{self, Point, Rect, Size};
use pw_core::host::ComponentModel;
use pw_core::id::NodeId;
use pw_core::model::HandleDirection;
use smallvec::SmallVec;

/// Displays that flow with text and never get handles.
const NO_HANDLE_DISPLAYS: &[&str] = &["inline", "contents", "none"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub node: NodeId,
    pub direction: HandleDirection,
    /// Surface document space.
    pub start_pointer: Point,
    pub start_size: Size,
    /// A size was written since the session began.
    pub changed: bool,
}

fn fit(length: f64, min: f64, grid: Option<u32>) -> f64 {
    let clamped = length.max(min);
    let Some(cell) = grid else {
        return clamped;
    };
    let rounded = snap(clamped, cell);
    if rounded < min {
        rounded + f64::from(cell)
    } else {
        rounded
    }
}

/// New size for a handle dragged by `delta` from `start`.
///
/// Axes the handle does not touch keep their starting length. Touched axes
/// are clamped to `min` and, with a grid, rounded to a cell multiple that
/// stays at or above `min`.
pub fn resize_dimensions(
    direction: HandleDirection,
    start: Size,
    delta: Point,
    min: Size,
    grid: Option<u32>,
) -> Size {
    let w_sign = direction.width_sign();
    let h_sign = direction.height_sign();
    let width = if w_sign == 0.0 {
        start.width
    } else {
        fit(start.width + w_sign * delta.x, min.width, grid)
    };
    let height = if h_sign == 0.0 {
        start.height
    } else {
        fit(start.height + h_sign * delta.y, min.height, grid)
    };
    Size::new(width, height)
}

/// Centre points of the eight handles around `rect`.
pub fn handle_positions(rect: Rect, size: f64) -> SmallVec<[HandlePlacement; 8]> {
    let center = rect.center();
    HandleDirection::ALL
        .into_iter()
        .map(|direction| {
            let x = match direction.width_sign() {
                s if s > 0.0 => rect.right(),
                s if s < 0.0 => rect.x,
                _ => center.x,
            };
            let y = match direction.height_sign() {
                s if s > 0.0 => rect.bottom(),
                s if s < 0.0 => rect.y,
                _ => center.y,
            };
            HandlePlacement {
                direction,
                x,
                y,
                size,
                cursor: direction.cursor(),
            }
        })
        .collect()
}

pub struct ResizeController {
    config: ResizeConfig,
    enabled: bool,
    selected: Option<NodeId>,
    /// Node the handles are currently drawn around.
    handles_on: Option<NodeId>,
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn new(config: ResizeConfig) -> Self {
        Self {
            config,
            enabled: true,
            selected: None,
            handles_on: None,
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }

    pub fn handles_on(&self) -> Option<NodeId> {
        self.handles_on
    }

    fn min_size(&self) -> Size {
        Size::new(self.config.min_width, self.config.min_height)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Tear down any handles and rebuild them around `node`.
    pub fn on_select(&mut self, node: NodeId, model: &impl ComponentModel) -> Vec<CanvasEffect> {
        let mut effects = Vec::new();
        if self.session.is_some_and(|s| s.node != node) {
            effects.extend(self.force_close());
        }
        effects.extend(self.clear_handles());
        self.selected = Some(node);
        if self.enabled {
            effects.extend(self.place_handles(node, model, None));
        }
        effects
    }

    pub fn on_deselect(&mut self) -> Vec<CanvasEffect> {
        self.selected = None;
        let mut effects = self.force_close();
        effects.extend(self.clear_handles());
        effects
    }

    /// Re-place handles after the selected node moved.
    pub fn refresh(&mut self, model: &impl ComponentModel) -> Vec<CanvasEffect> {
        match (self.handles_on, self.session) {
            (Some(node), None) => self.place_handles(node, model, None),
            _ => vec![],
        }
    }

    fn accepts_handles(model: &impl ComponentModel, node: NodeId) -> bool {
        model
            .computed_display(node)
            .is_some_and(|d| !NO_HANDLE_DISPLAYS.contains(&d.trim()))
    }

    /// `size` overrides the measured size while the host has not re-laid
    /// the node out yet.
    fn place_handles(
        &mut self,
        node: NodeId,
        model: &impl ComponentModel,
        size: Option<Size>,
    ) -> Vec<CanvasEffect> {
        if !Self::accepts_handles(model, node) {
            log::trace!("{node} flows inline; no handles");
            return vec![];
        }
        let rect = match geometry::measure(model, node) {
            Ok(geo) => geo.document,
            Err(e) => {
                log::trace!("no handles for {node}: {e}");
                return vec![];
            }
        };
        let rect = size.map_or(rect, |s| rect.with_size(s));
        self.handles_on = Some(node);
        vec![CanvasEffect::PlaceHandles {
            target: node,
            handles: handle_positions(rect, self.config.handle_size),
        }]
    }

    fn clear_handles(&mut self) -> Vec<CanvasEffect> {
        match self.handles_on.take() {
            Some(_) => vec![CanvasEffect::ClearHandles],
            None => vec![],
        }
    }

    // ─── Session ─────────────────────────────────────────────────────────

    /// Begin a session at `pointer` (surface document space).
    ///
    /// # Errors
    /// `SessionActive` if a session is already running; `NotReady` if the
    /// node cannot be measured.
    pub fn start_session(
        &mut self,
        node: NodeId,
        direction: HandleDirection,
        pointer: Point,
        model: &impl ComponentModel,
    ) -> Result<Vec<CanvasEffect>> {
        if let Some(active) = self.session {
            return Err(CanvasError::SessionActive(active.node));
        }
        let start_size = geometry::measure(model, node)?.document.size();
        log::debug!("resize {node} from {} handle", direction.as_str());
        self.session = Some(ResizeSession {
            node,
            direction,
            start_pointer: pointer,
            start_size,
            changed: false,
        });
        Ok(vec![
            CanvasEffect::BeginPointerTracking,
            CanvasEffect::SetCursor {
                cursor: Some(direction.cursor().to_string()),
            },
            CanvasEffect::SuppressTextSelection { suppressed: true },
        ])
    }

    /// Remove the running session's listeners and document side effects.
    fn force_close(&mut self) -> Vec<CanvasEffect> {
        let Some(session) = self.session.take() else {
            return vec![];
        };
        let mut effects = vec![
            CanvasEffect::EndPointerTracking,
            CanvasEffect::SetCursor { cursor: None },
            CanvasEffect::SuppressTextSelection { suppressed: false },
        ];
        if session.changed {
            effects.push(CanvasEffect::ComponentUpdated { id: session.node });
        }
        effects
    }

    /// Pointer pressed on a handle. `at` is in host document space.
    pub fn pointer_down(
        &mut self,
        direction: HandleDirection,
        at: Point,
        model: &impl ComponentModel,
    ) -> Vec<CanvasEffect> {
        let (Some(node), true) = (self.handles_on, self.enabled) else {
            log::trace!("handle press without handles on screen");
            return vec![];
        };
        let Some(metrics) = model.surface() else {
            log::debug!("handle pressed while the surface is detached");
            return vec![];
        };
        let mut effects = self.force_close();
        let pointer = geometry::host_point_to_document(at, &metrics);
        match self.start_session(node, direction, pointer, model) {
            Ok(started) => effects.extend(started),
            Err(e) => log::debug!("resize of {node} not started: {e}"),
        }
        effects
    }

    /// Pointer moved while a session is active. `grid` is the active cell
    /// size, if any.
    pub fn pointer_move(
        &mut self,
        at: Point,
        model: &impl ComponentModel,
        grid: Option<u32>,
    ) -> Vec<CanvasEffect> {
        let Some(session) = self.session else {
            return vec![];
        };
        let Some(metrics) = model.surface() else {
            return vec![];
        };
        let pointer = geometry::host_point_to_document(at, &metrics);
        let delta = Point::new(
            pointer.x - session.start_pointer.x,
            pointer.y - session.start_pointer.y,
        );
        let size = resize_dimensions(
            session.direction,
            session.start_size,
            delta,
            self.min_size(),
            grid,
        );
        log::trace!("resize {} → {}×{}", session.node, size.width, size.height);

        let mut effects = Vec::new();
        if session.direction.width_sign() != 0.0 {
            effects.push(CanvasEffect::SetStyle {
                id: session.node,
                property: "width".to_string(),
                value: format!("{}px", size.width),
            });
        }
        if session.direction.height_sign() != 0.0 {
            effects.push(CanvasEffect::SetStyle {
                id: session.node,
                property: "height".to_string(),
                value: format!("{}px", size.height),
            });
        }
        if let Some(active) = self.session.as_mut() {
            active.changed = true;
        }
        effects.extend(self.place_handles(session.node, model, Some(size)));
        effects
    }

    /// Pointer released: end the session with one history entry.
    pub fn pointer_up(&mut self) -> Vec<CanvasEffect> {
        let Some(session) = self.session.take() else {
            return vec![];
        };
        vec![
            CanvasEffect::EndPointerTracking,
            CanvasEffect::SetCursor { cursor: None },
            CanvasEffect::SuppressTextSelection { suppressed: false },
            CanvasEffect::ComponentUpdated { id: session.node },
        ]
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    pub fn set_enabled(&mut self, enabled: bool, model: &impl ComponentModel) -> Vec<CanvasEffect> {
        self.enabled = enabled;
        if !enabled {
            let mut effects = self.force_close();
            effects.extend(self.clear_handles());
            return effects;
        }
        match self.selected {
            Some(node) if self.handles_on.is_none() => self.place_handles(node, model, None),
            _ => vec![],
        }
    }

    pub fn destroy(&mut self) -> Vec<CanvasEffect> {
        self.selected = None;
        let mut effects = self.force_close();
        effects.extend(self.clear_handles());
        effects
    }
}
