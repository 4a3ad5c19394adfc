//! Magnetic grid: snap-to-grid placement during drags.
//!
//! `Idle → Dragging(node) → Idle`. Each `drag` tick reads the node's
//! rectangle through the geometry bridge and writes `left`/`top` when the
//! corresponding coordinate lies within `snap_threshold` of a grid line. The
//! two axes are decided independently.
//!
//! Guides are advisory decoration: they never influence where a node lands.

use pw_core::effect::CanvasEffect;
use pw_core::error::{CanvasError, Result};
use pw_core::geometry::{self, Rect};
use pw_core::host::ComponentModel;
use pw_core::id::NodeId;
use pw_core::model::{Axis, GridConfig, GridConfigPatch, SnapGuide};
use smallvec::SmallVec;

/// Round `value` to the nearest multiple of `cell`. Ties round up.
pub fn snap(value: f64, cell: u32) -> f64 {
    let cell = f64::from(cell);
    (value / cell + 0.5).floor() * cell
}

/// Snapped coordinate if `value` is within `threshold` of its grid line.
pub fn snap_within(value: f64, cell: u32, threshold: u32) -> Option<f64> {
    let snapped = snap(value, cell);
    ((value - snapped).abs() <= f64::from(threshold)).then_some(snapped)
}

/// Guides for a node at `rect`: its centre lines, plus grid lines within
/// `2 × snap_threshold` of each edge.
pub fn compute_guides(rect: Rect, config: &GridConfig) -> SmallVec<[SnapGuide; 6]> {
    let mut guides: SmallVec<[SnapGuide; 6]> = SmallVec::new();
    let center = rect.center();
    guides.push(SnapGuide {
        axis: Axis::Vertical,
        position: center.x,
        is_center_guide: true,
    });
    guides.push(SnapGuide {
        axis: Axis::Horizontal,
        position: center.y,
        is_center_guide: true,
    });

    if config.cell_size == 0 {
        return guides;
    }
    let cell = f64::from(config.cell_size);
    let reach = f64::from(config.snap_threshold) * 2.0;
    let edges = [
        (Axis::Vertical, rect.x),
        (Axis::Vertical, rect.right()),
        (Axis::Horizontal, rect.y),
        (Axis::Horizontal, rect.bottom()),
    ];
    for (axis, edge) in edges {
        let first = ((edge - reach) / cell).ceil() as i64;
        let last = ((edge + reach) / cell).floor() as i64;
        for k in first..=last {
            let line = k as f64 * cell;
            let duplicate = guides
                .iter()
                .any(|g| g.axis == axis && !g.is_center_guide && g.position == line);
            if !duplicate {
                guides.push(SnapGuide {
                    axis,
                    position: line,
                    is_center_guide: false,
                });
            }
        }
    }
    guides
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging(NodeId),
}

#[derive(Debug, Clone, Copy)]
struct GuideSet {
    expires_at: f64,
}

pub struct GridSnapEngine {
    config: GridConfig,
    guide_ttl_ms: f64,
    state: DragState,
    guides: Option<GuideSet>,
    /// Cell size the grid background is currently painted with.
    shown_cell: Option<u32>,
    /// Visibility was requested while the surface was detached.
    visual_pending: bool,
}

impl GridSnapEngine {
    pub fn new(config: GridConfig, guide_ttl_ms: f64) -> Self {
        Self {
            config,
            guide_ttl_ms,
            state: DragState::Idle,
            guides: None,
            shown_cell: None,
            visual_pending: false,
        }
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Cell size to snap to, or `None` while snapping is off.
    pub fn active_cell_size(&self) -> Option<u32> {
        self.config.enabled.then_some(self.config.cell_size)
    }

    pub fn guides_visible(&self) -> bool {
        self.guides.is_some()
    }

    pub fn grid_shown(&self) -> bool {
        self.shown_cell.is_some()
    }

    // ─── Toolbar API ─────────────────────────────────────────────────────

    /// Validate and apply `patch`, then bring overlays in line with it.
    ///
    /// # Errors
    /// `InvalidConfig` if the patch breaks an invariant; nothing changes.
    pub fn update_config(
        &mut self,
        patch: &GridConfigPatch,
        model: &impl ComponentModel,
    ) -> Result<Vec<CanvasEffect>> {
        self.config = self.config.apply(patch)?;
        let mut effects = Vec::new();
        if !self.config.show_guides {
            effects.extend(self.clear_guides());
        }
        effects.extend(self.sync_visual(model));
        Ok(effects)
    }

    /// Turning snapping off keeps positions already written.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    pub fn toggle_visibility(
        &mut self,
        visible: bool,
        model: &impl ComponentModel,
    ) -> Vec<CanvasEffect> {
        self.config.visible = visible;
        self.sync_visual(model)
    }

    /// The surface (re)mounted: anything painted before is gone.
    pub fn on_ready(&mut self, model: &impl ComponentModel) -> Vec<CanvasEffect> {
        self.shown_cell = None;
        self.sync_visual(model)
    }

    fn sync_visual(&mut self, model: &impl ComponentModel) -> Vec<CanvasEffect> {
        if !self.config.visible {
            self.visual_pending = false;
            return match self.shown_cell.take() {
                Some(_) => vec![CanvasEffect::HideGrid],
                None => vec![],
            };
        }
        if self.shown_cell == Some(self.config.cell_size) {
            return vec![];
        }
        if model.surface().is_none() {
            log::debug!("grid visual deferred until the surface is ready");
            self.visual_pending = true;
            return vec![];
        }
        self.visual_pending = false;
        self.shown_cell = Some(self.config.cell_size);
        vec![CanvasEffect::ShowGrid {
            cell_size: self.config.cell_size,
        }]
    }

    pub fn visual_pending(&self) -> bool {
        self.visual_pending
    }

    // ─── Drag lifecycle ──────────────────────────────────────────────────

    pub fn on_drag_start(
        &mut self,
        node: NodeId,
        model: &impl ComponentModel,
        now_ms: f64,
    ) -> Vec<CanvasEffect> {
        let mut effects = self.clear_guides();
        self.state = DragState::Dragging(node);
        if !self.config.show_guides {
            return effects;
        }
        match geometry::measure(model, node) {
            Ok(geo) => {
                effects.push(CanvasEffect::ShowGuides {
                    guides: compute_guides(geo.document, &self.config),
                });
                self.guides = Some(GuideSet {
                    expires_at: now_ms + self.guide_ttl_ms,
                });
            }
            Err(e) => log::trace!("no guides for {node}: {e}"),
        }
        effects
    }

    pub fn on_drag(&mut self, node: NodeId, model: &impl ComponentModel) -> Vec<CanvasEffect> {
        match self.state {
            DragState::Dragging(current) if current != node => {
                log::debug!(
                    "drag tick dropped while dragging {current}: {}",
                    CanvasError::StaleEvent(node)
                );
                return vec![];
            }
            DragState::Idle => self.state = DragState::Dragging(node),
            DragState::Dragging(_) => {}
        }
        if !self.config.enabled {
            return vec![];
        }
        let rect = match geometry::measure(model, node) {
            Ok(geo) => geo.document,
            Err(e) => {
                log::trace!("drag tick for {node} left unsnapped: {e}");
                return vec![];
            }
        };

        let GridConfig {
            cell_size,
            snap_threshold,
            ..
        } = self.config;
        let mut effects = Vec::new();
        for (property, raw) in [("left", rect.x), ("top", rect.y)] {
            let Some(snapped) = snap_within(raw, cell_size, snap_threshold) else {
                continue;
            };
            let value = format!("{snapped}px");
            if model.style(node, property).as_deref() == Some(value.as_str()) {
                continue;
            }
            log::trace!("snap {node} {property}: {raw} → {snapped}");
            effects.push(CanvasEffect::SetStyle {
                id: node,
                property: property.to_string(),
                value,
            });
        }
        effects
    }

    pub fn on_drag_end(&mut self) -> Vec<CanvasEffect> {
        self.state = DragState::Idle;
        self.clear_guides()
    }

    fn clear_guides(&mut self) -> Vec<CanvasEffect> {
        match self.guides.take() {
            Some(_) => vec![CanvasEffect::ClearGuides],
            None => vec![],
        }
    }

    // ─── Timers ──────────────────────────────────────────────────────────

    pub fn next_deadline(&self) -> Option<f64> {
        self.guides.map(|g| g.expires_at)
    }

    /// Expire guides whose lifetime has run out.
    pub fn poll(&mut self, now_ms: f64) -> Vec<CanvasEffect> {
        match self.guides {
            Some(g) if now_ms >= g.expires_at => self.clear_guides(),
            _ => vec![],
        }
    }

    pub fn destroy(&mut self) -> Vec<CanvasEffect> {
        self.state = DragState::Idle;
        self.visual_pending = false;
        let mut effects = self.clear_guides();
        if self.shown_cell.take().is_some() {
            effects.push(CanvasEffect::HideGrid);
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pw_core::geometry::{Point, SurfaceMetrics};
    use pw_core::host::EffectSink;
    use pw_core::tree::{ComponentNode, ComponentTree};

    fn engine() -> GridSnapEngine {
        GridSnapEngine::new(GridConfig::default(), 2000.0)
    }

    fn host_with(rect: Rect) -> (ComponentTree, NodeId) {
        let mut tree = ComponentTree::new();
        tree.attach_surface(SurfaceMetrics::default());
        let id = tree.add(
            None,
            ComponentNode::new(NodeId::intern("grid-box"), "div").with_rect(rect),
        );
        (tree, id)
    }

    fn styles(effects: &[CanvasEffect]) -> Vec<(String, String)> {
        effects
            .iter()
            .filter_map(|e| match e {
                CanvasEffect::SetStyle {
                    property, value, ..
                } => Some((property.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn snap_lands_on_multiples_within_half_a_cell() {
        for cell in [1_u32, 7, 20, 32] {
            let mut x = -500.0;
            while x <= 500.0 {
                let s = snap(x, cell);
                assert_eq!(s % f64::from(cell), 0.0, "snap({x}, {cell}) = {s}");
                assert!((s - x).abs() <= f64::from(cell) / 2.0, "snap({x}, {cell}) = {s}");
                x += 0.25;
            }
        }
    }

    #[test]
    fn ties_round_up() {
        assert_eq!(snap(170.0, 20), 180.0);
        assert_eq!(snap(-10.0, 20), 0.0);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(snap_within(187.0, 20, 10), Some(180.0));
        assert_eq!(snap_within(170.0, 20, 10), Some(180.0));
        assert_eq!(snap_within(165.0, 20, 10), Some(160.0));
        assert_eq!(snap_within(165.0, 20, 4), None);
    }

    #[test]
    fn drag_snaps_each_axis_independently() {
        let (tree, id) = host_with(Rect::new(187.0, 95.0, 50.0, 50.0));
        let mut grid = GridSnapEngine::new(
            GridConfig {
                snap_threshold: 3,
                ..GridConfig::default()
            },
            2000.0,
        );
        grid.on_drag_start(id, &tree, 0.0);
        // x=187 is 7 away from 180 (> 3): untouched. y=95 is 5 away: untouched.
        assert!(grid.on_drag(id, &tree).is_empty());

        let (tree, id) = host_with(Rect::new(182.0, 95.0, 50.0, 50.0));
        let effects = grid.on_drag(id, &tree);
        assert_eq!(styles(&effects), vec![("left".into(), "180px".into())]);
    }

    #[test]
    fn drag_uses_document_space() {
        let (mut tree, id) = host_with(Rect::new(41.0, 18.0, 10.0, 10.0));
        tree.attach_surface(SurfaceMetrics {
            frame_origin: Point::new(500.0, 500.0),
            scroll: Point::new(0.0, 200.0),
        });
        let mut grid = engine();
        grid.on_drag_start(id, &tree, 0.0);
        let effects = grid.on_drag(id, &tree);
        assert_eq!(
            styles(&effects),
            vec![
                ("left".into(), "40px".into()),
                ("top".into(), "220px".into())
            ]
        );
    }

    #[test]
    fn disabled_grid_stops_future_snapping_only() {
        let (mut tree, id) = host_with(Rect::new(183.0, 0.0, 10.0, 10.0));
        let mut grid = engine();
        grid.on_drag_start(id, &tree, 0.0);
        let effects = grid.on_drag(id, &tree);
        tree.apply_all(effects);
        assert_eq!(tree.style(id, "left").as_deref(), Some("180px"));

        grid.set_enabled(false);
        tree.set_rect(id, Rect::new(203.0, 0.0, 10.0, 10.0));
        assert!(grid.on_drag(id, &tree).is_empty());
        assert_eq!(tree.style(id, "left").as_deref(), Some("180px"));
    }

    #[test]
    fn guides_expire_or_clear_on_drag_end() {
        let (tree, id) = host_with(Rect::new(19.0, 41.0, 40.0, 20.0));
        let mut grid = engine();
        let effects = grid.on_drag_start(id, &tree, 1000.0);
        assert!(matches!(effects[0], CanvasEffect::ShowGuides { .. }));
        assert_eq!(grid.next_deadline(), Some(3000.0));
        assert!(grid.poll(2999.0).is_empty());
        assert_eq!(grid.poll(3000.0), vec![CanvasEffect::ClearGuides]);
        assert!(grid.on_drag_end().is_empty());

        grid.on_drag_start(id, &tree, 5000.0);
        assert_eq!(grid.on_drag_end(), vec![CanvasEffect::ClearGuides]);
        assert_eq!(grid.state(), DragState::Idle);
        assert!(grid.poll(9000.0).is_empty());
    }

    #[test]
    fn guides_cover_center_and_near_edges() {
        let guides = compute_guides(Rect::new(19.0, 41.0, 40.0, 20.0), &GridConfig::default());
        let centers = guides.iter().filter(|g| g.is_center_guide).count();
        assert_eq!(centers, 2);
        // left 19 and right 59 reach 0/20 and 40/60; top 41 and bottom 61
        // reach 40/60 and 60/80, with 60 shared
        let lines = |axis: Axis| -> Vec<f64> {
            guides
                .iter()
                .filter(|g| g.axis == axis && !g.is_center_guide)
                .map(|g| g.position)
                .collect()
        };
        assert_eq!(lines(Axis::Vertical), vec![0.0, 20.0, 40.0, 60.0]);
        assert_eq!(lines(Axis::Horizontal), vec![40.0, 60.0, 80.0]);
    }

    #[test]
    fn fine_grid_yields_every_line_within_reach() {
        let config = GridConfig {
            cell_size: 8,
            snap_threshold: 10,
            ..GridConfig::default()
        };
        let guides = compute_guides(Rect::new(100.0, 100.0, 0.0, 0.0), &config);
        let vertical: Vec<f64> = guides
            .iter()
            .filter(|g| g.axis == Axis::Vertical && !g.is_center_guide)
            .map(|g| g.position)
            .collect();
        assert_eq!(vertical, vec![80.0, 88.0, 96.0, 104.0, 112.0, 120.0]);
    }

    #[test]
    fn stale_drag_tick_is_dropped() {
        let (tree, id) = host_with(Rect::new(183.0, 0.0, 10.0, 10.0));
        let mut grid = engine();
        grid.on_drag_start(id, &tree, 0.0);
        assert!(grid.on_drag(NodeId::intern("someone-else"), &tree).is_empty());
    }

    #[test]
    fn visibility_waits_for_surface() {
        let mut tree = ComponentTree::new();
        let mut grid = engine();
        assert!(grid.toggle_visibility(true, &tree).is_empty());
        assert!(grid.visual_pending());

        tree.attach_surface(SurfaceMetrics::default());
        assert_eq!(
            grid.on_ready(&tree),
            vec![CanvasEffect::ShowGrid { cell_size: 20 }]
        );
        assert!(grid.toggle_visibility(true, &tree).is_empty());
        assert_eq!(
            grid.toggle_visibility(false, &tree),
            vec![CanvasEffect::HideGrid]
        );
    }

    #[test]
    fn invalid_patch_leaves_config_alone() {
        let tree = ComponentTree::new();
        let mut grid = engine();
        let err = grid.update_config(
            &GridConfigPatch {
                cell_size: Some(0),
                ..GridConfigPatch::default()
            },
            &tree,
        );
        assert!(err.is_err());
        assert_eq!(grid.config(), GridConfig::default());
    }

    #[test]
    fn cell_change_repaints_visible_grid() {
        let mut tree = ComponentTree::new();
        tree.attach_surface(SurfaceMetrics::default());
        let mut grid = engine();
        grid.toggle_visibility(true, &tree);
        let effects = grid
            .update_config(
                &GridConfigPatch {
                    cell_size: Some(10),
                    ..GridConfigPatch::default()
                },
                &tree,
            )
            .unwrap();
        assert_eq!(effects, vec![CanvasEffect::ShowGrid { cell_size: 10 }]);
    }
}
