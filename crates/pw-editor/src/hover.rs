//! Hover outline over the component under the pointer.
//!
//! A single outline element follows the nearest ancestor that carries a
//! component marker attribute. Pointer-out hides it only after a debounce,
//! and only if nothing re-targeted the outline meanwhile, so moving between
//! children of one component never flickers.

use crate::config::HoverConfig;
use pw_core::classify::{NodeInfo, component_label};
use pw_core::effect::CanvasEffect;
use pw_core::geometry;
use pw_core::host::ComponentModel;
use pw_core::id::NodeId;
use pw_core::model::{HoverState, OUTLINE_ELEMENT_ID, OVERLAY_STYLESHEET_ID};

/// Styles for the outline, its label, resize handles and guides.
pub const OVERLAY_CSS: &str = "\
#pw-hover-outline{position:absolute;pointer-events:none;border:1px dashed #3b82f6;z-index:9998}
#pw-hover-outline>.pw-label{position:absolute;top:-18px;left:-1px;padding:1px 6px;font:11px/16px system-ui,sans-serif;color:#fff;background:#3b82f6;white-space:nowrap}
.pw-resize-handle{position:absolute;background:#fff;border:1px solid #3b82f6;z-index:9999}
.pw-snap-guide{position:absolute;pointer-events:none;background:#f43f5e;z-index:9997}
.pw-snap-guide.pw-center{background:#a855f7}
body.pw-grid{background-image:linear-gradient(to right,rgba(0,0,0,.06) 1px,transparent 1px),linear-gradient(to bottom,rgba(0,0,0,.06) 1px,transparent 1px)}
";

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingHide {
    target: NodeId,
    due: f64,
}

pub struct HoverOutlineTracker {
    config: HoverConfig,
    state: HoverState,
    selected: Option<NodeId>,
    pending_hide: Option<PendingHide>,
    stylesheet_injected: bool,
}

impl HoverOutlineTracker {
    pub fn new(config: HoverConfig) -> Self {
        Self {
            config,
            state: HoverState::default(),
            selected: None,
            pending_hide: None,
            stylesheet_injected: false,
        }
    }

    pub fn state(&self) -> HoverState {
        self.state
    }

    pub fn stylesheet_injected(&self) -> bool {
        self.stylesheet_injected
    }

    fn is_outline(node: NodeId) -> bool {
        node.as_str() == OUTLINE_ELEMENT_ID
    }

    fn is_component(&self, model: &impl ComponentModel, node: NodeId) -> bool {
        self.config.marker_attributes.iter().any(|attr| {
            model
                .attribute(node, attr)
                .is_some_and(|v| !v.trim().is_empty())
        })
    }

    /// Nearest marked ancestor of `target`, itself included.
    pub fn find_component(&self, model: &impl ComponentModel, target: NodeId) -> Option<NodeId> {
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            if model.is_document_root(node) {
                return None;
            }
            if self.is_component(model, node) {
                return Some(node);
            }
            cursor = model.parent(node);
        }
        None
    }

    fn hide(&mut self) -> Vec<CanvasEffect> {
        self.pending_hide = None;
        match self.state.hovered_node_id.take() {
            Some(_) => vec![CanvasEffect::HideOutline],
            None => vec![],
        }
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    pub fn on_pointer_over(
        &mut self,
        target: NodeId,
        model: &impl ComponentModel,
    ) -> Vec<CanvasEffect> {
        if !self.state.enabled || Self::is_outline(target) || model.is_document_root(target) {
            return vec![];
        }
        let Some(component) = self.find_component(model, target) else {
            return vec![];
        };
        if self.state.hovered_node_id == Some(component) {
            self.pending_hide = None;
            return vec![];
        }
        if self.selected == Some(component) {
            return self.hide();
        }

        let geo = match geometry::measure(model, component) {
            Ok(geo) => geo,
            Err(e) => {
                log::trace!("cannot outline {component}: {e}");
                return vec![];
            }
        };
        let label = NodeInfo::read(model, component)
            .map(|info| component_label(&info))
            .unwrap_or_default();
        self.pending_hide = None;
        self.state.hovered_node_id = Some(component);
        vec![CanvasEffect::ShowOutline {
            target: component,
            rect: geo.document,
            label,
        }]
    }

    pub fn on_pointer_out(
        &mut self,
        related: Option<NodeId>,
        model: &impl ComponentModel,
        now_ms: f64,
    ) {
        if !self.state.enabled {
            return;
        }
        let Some(hovered) = self.state.hovered_node_id else {
            return;
        };
        if let Some(related) = related
            && (Self::is_outline(related) || model.is_within(hovered, related))
        {
            return;
        }
        self.pending_hide = Some(PendingHide {
            target: hovered,
            due: now_ms + self.config.debounce_ms,
        });
    }

    // ─── Timers ──────────────────────────────────────────────────────────

    pub fn next_deadline(&self) -> Option<f64> {
        self.pending_hide.map(|p| p.due)
    }

    /// Run a due hide, provided the outline still belongs to its target.
    pub fn poll(&mut self, now_ms: f64) -> Vec<CanvasEffect> {
        match self.pending_hide {
            Some(p) if now_ms >= p.due => {
                if self.state.hovered_node_id == Some(p.target) {
                    self.hide()
                } else {
                    self.pending_hide = None;
                    vec![]
                }
            }
            _ => vec![],
        }
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Selection takes visual precedence over hover.
    pub fn set_selected(&mut self, node: Option<NodeId>) -> Vec<CanvasEffect> {
        self.selected = node;
        if node.is_some() && self.state.hovered_node_id == node {
            return self.hide();
        }
        vec![]
    }

    /// Disabling hides the outline now but keeps the stylesheet.
    pub fn set_enabled(&mut self, enabled: bool) -> Vec<CanvasEffect> {
        self.state.enabled = enabled;
        if enabled { vec![] } else { self.hide() }
    }

    /// Inject the overlay stylesheet once per surface.
    pub fn on_ready(&mut self, model: &impl ComponentModel) -> Vec<CanvasEffect> {
        if self.stylesheet_injected {
            return vec![];
        }
        if model.surface().is_none() {
            log::debug!("overlay stylesheet waits for the surface");
            return vec![];
        }
        self.stylesheet_injected = true;
        vec![CanvasEffect::InjectStylesheet {
            id: OVERLAY_STYLESHEET_ID.to_string(),
            css: OVERLAY_CSS.to_string(),
        }]
    }

    /// The surface went away with the stylesheet in it. The outline lives
    /// in the host page, so it is hidden explicitly.
    pub fn on_surface_lost(&mut self) -> Vec<CanvasEffect> {
        self.stylesheet_injected = false;
        self.hide()
    }

    pub fn destroy(&mut self) -> Vec<CanvasEffect> {
        let mut effects = self.hide();
        if std::mem::take(&mut self.stylesheet_injected) {
            effects.push(CanvasEffect::RemoveStylesheet {
                id: OVERLAY_STYLESHEET_ID.to_string(),
            });
        }
        self.selected = None;
        effects
    }
}
