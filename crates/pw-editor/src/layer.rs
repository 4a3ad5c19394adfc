//! The canvas layer: routes host events to the controllers.
//!
//! `CanvasLayer` owns one instance of every controller and applies what
//! they produce to the host as it goes, so each controller observes the
//! host after the previous one's writes. Template registrations are queued
//! until the host signals `ready`; surface-dependent setup retries while the
//! surface is detached.

use crate::catalog::builtin_templates;
use crate::config::LayerConfig;
use crate::grid::GridSnapEngine;
use crate::hover::HoverOutlineTracker;
use crate::input::{HostEvent, PointerEvent};
use crate::ready::{ReadyOutcome, ReadyRetry};
use crate::resize::ResizeController;
use crate::schema;
use crate::selection::SelectionSyncController;
use crate::templates::TemplateRegistry;
use pw_core::effect::CanvasEffect;
use pw_core::error::{CanvasError, Result};
use pw_core::geometry::Point;
use pw_core::host::HostEditor;
use pw_core::model::{FieldSchema, GridConfig, GridConfigPatch, TemplateDescriptor};

pub struct CanvasLayer {
    registry: TemplateRegistry,
    grid: GridSnapEngine,
    resize: ResizeController,
    hover: HoverOutlineTracker,
    selection: SelectionSyncController,
    ready: ReadyRetry,
    host_ready: bool,
    /// Registrations waiting for `ready`.
    queued: Vec<CanvasEffect>,
    destroyed: bool,
}

impl CanvasLayer {
    pub fn new(config: LayerConfig) -> Self {
        Self {
            registry: TemplateRegistry::new(),
            grid: GridSnapEngine::new(config.grid, config.guides.ttl_ms),
            resize: ResizeController::new(config.resize),
            hover: HoverOutlineTracker::new(config.hover),
            selection: SelectionSyncController::new(config.selection),
            ready: ReadyRetry::new(config.ready),
            host_ready: false,
            queued: Vec::new(),
            destroyed: false,
        }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn grid(&self) -> &GridSnapEngine {
        &self.grid
    }

    pub fn resize(&self) -> &ResizeController {
        &self.resize
    }

    pub fn hover(&self) -> &HoverOutlineTracker {
        &self.hover
    }

    pub fn selection(&self) -> &SelectionSyncController {
        &self.selection
    }

    pub fn is_ready(&self) -> bool {
        self.host_ready
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ─── Templates ───────────────────────────────────────────────────────

    /// Register (or replace) a template. Pushed to the host immediately once
    /// it is ready, otherwise on `ready`.
    ///
    /// # Errors
    /// `InvalidTemplate` from the registry.
    pub fn register_template(
        &mut self,
        host: &mut impl HostEditor,
        descriptor: TemplateDescriptor,
    ) -> Result<()> {
        if self.destroyed {
            log::debug!("layer destroyed; ignoring template {}", descriptor.id);
            return Ok(());
        }
        let effects = self.registry.register(descriptor)?;
        if self.host_ready {
            host.apply_all(effects);
        } else {
            self.queued.extend(effects);
        }
        Ok(())
    }

    /// Register the built-in catalog.
    ///
    /// # Errors
    /// `InvalidTemplate` if a catalog entry is malformed.
    pub fn register_catalog(&mut self, host: &mut impl HostEditor) -> Result<()> {
        for descriptor in builtin_templates() {
            self.register_template(host, descriptor)?;
        }
        Ok(())
    }

    // ─── Host events ─────────────────────────────────────────────────────

    pub fn handle_event(&mut self, host: &mut impl HostEditor, event: HostEvent, now_ms: f64) {
        if self.destroyed {
            log::debug!("layer destroyed; ignoring {event:?}");
            return;
        }
        match event {
            HostEvent::Ready => self.on_ready(host, now_ms),
            HostEvent::SelectionChanged { node } => {
                if !host.exists(node) {
                    log::debug!("selection dropped: {}", CanvasError::UnknownNode(node));
                    return;
                }
                let reselect = self.selection.last_selected() == Some(node);
                host.apply_all(self.selection.on_selected(node, host));
                if !reselect {
                    host.apply_all(self.resize.on_select(node, host));
                    host.apply_all(self.hover.set_selected(Some(node)));
                }
            }
            HostEvent::Deselected => {
                self.selection.on_deselected();
                host.apply_all(self.resize.on_deselect());
                host.apply_all(self.hover.set_selected(None));
            }
            HostEvent::DragStart { node } => {
                host.apply_all(self.grid.on_drag_start(node, host, now_ms));
            }
            HostEvent::Drag { node } => {
                host.apply_all(self.grid.on_drag(node, host));
                if self.resize.handles_on() == Some(node) {
                    host.apply_all(self.resize.refresh(host));
                }
            }
            HostEvent::DragEnd => {
                host.apply_all(self.grid.on_drag_end());
                host.apply_all(self.resize.refresh(host));
            }
            HostEvent::Update { node, fields } => {
                if !host.exists(node) {
                    log::debug!("update dropped: {}", CanvasError::UnknownNode(node));
                    return;
                }
                host.apply_all(self.selection.on_update(node, &fields, now_ms));
            }
        }
    }

    fn on_ready(&mut self, host: &mut impl HostEditor, now_ms: f64) {
        self.host_ready = true;
        let queued = std::mem::take(&mut self.queued);
        if !queued.is_empty() {
            log::debug!("flushing {} queued registrations", queued.len() / 2);
            host.apply_all(queued);
        }
        // A ready signal may follow a surface remount.
        host.apply_all(self.hover.on_surface_lost());
        self.ready.reset();
        self.surface_setup(host, now_ms);
    }

    fn surface_setup(&mut self, host: &mut impl HostEditor, now_ms: f64) {
        match self.ready.attempt(host.surface().is_some(), now_ms) {
            ReadyOutcome::Run => {
                host.apply_all(self.hover.on_ready(host));
                host.apply_all(self.grid.on_ready(host));
            }
            ReadyOutcome::Retry => log::debug!("surface not mounted yet; retrying setup"),
            ReadyOutcome::GiveUp => {}
        }
    }

    // ─── Pointer input ───────────────────────────────────────────────────

    /// Cell size resize rounds to: only while the grid is both snapping and
    /// drawn on the surface.
    fn resize_grid(&self) -> Option<u32> {
        self.grid
            .active_cell_size()
            .filter(|_| self.grid.grid_shown())
    }

    pub fn handle_pointer(&mut self, host: &mut impl HostEditor, event: PointerEvent, now_ms: f64) {
        if self.destroyed {
            return;
        }
        match event {
            PointerEvent::Over { target } => {
                host.apply_all(self.hover.on_pointer_over(target, host));
            }
            PointerEvent::Out { related, .. } => self.hover.on_pointer_out(related, host, now_ms),
            PointerEvent::HandleDown { direction, x, y } => {
                host.apply_all(self.resize.pointer_down(direction, Point::new(x, y), host));
            }
            PointerEvent::Move { x, y } => {
                let grid = self.resize_grid();
                host.apply_all(self.resize.pointer_move(Point::new(x, y), host, grid));
            }
            PointerEvent::Up { .. } => host.apply_all(self.resize.pointer_up()),
        }
    }

    // ─── Schema resolution ───────────────────────────────────────────────

    /// Deliver the answer to a `ResolveSchema` request.
    pub fn complete_schema(
        &mut self,
        host: &mut impl HostEditor,
        ticket: u64,
        result: std::result::Result<FieldSchema, String>,
    ) {
        if self.destroyed {
            return;
        }
        host.apply_all(self.selection.complete_schema(ticket, result));
        loop {
            let retry = self.selection.verify(host);
            if retry.is_empty() {
                break;
            }
            host.apply_all(retry);
        }
    }

    /// Answer the pending request from the built-in schema library.
    pub fn resolve_builtin(&mut self, host: &mut impl HostEditor) {
        let Some(request) = self.selection.pending().cloned() else {
            return;
        };
        let result = schema::resolve(
            request.type_tag,
            request.smart_object.as_deref(),
            &self.registry,
        )
        .map_err(|e| match e {
            CanvasError::SchemaResolution { reason, .. } => reason,
            other => other.to_string(),
        });
        self.complete_schema(host, request.ticket, result);
    }

    // ─── Timers ──────────────────────────────────────────────────────────

    /// Fire everything due at `now_ms`.
    pub fn tick(&mut self, host: &mut impl HostEditor, now_ms: f64) {
        if self.destroyed {
            return;
        }
        host.apply_all(self.grid.poll(now_ms));
        host.apply_all(self.hover.poll(now_ms));
        self.selection.poll(now_ms);
        if self.ready.is_due(now_ms) {
            self.surface_setup(host, now_ms);
        }
    }

    /// Earliest pending deadline across all controllers.
    pub fn next_deadline(&self) -> Option<f64> {
        [
            self.grid.next_deadline(),
            self.hover.next_deadline(),
            self.selection.next_deadline(),
            self.ready.next_due(),
        ]
        .into_iter()
        .flatten()
        .reduce(f64::min)
    }

    // ─── Toolbar API ─────────────────────────────────────────────────────

    pub fn grid_config(&self) -> GridConfig {
        self.grid.config()
    }

    pub fn set_grid_enabled(&mut self, enabled: bool) {
        if self.destroyed {
            return;
        }
        self.grid.set_enabled(enabled);
    }

    pub fn toggle_grid_visibility(&mut self, host: &mut impl HostEditor, visible: bool) {
        if self.destroyed {
            return;
        }
        host.apply_all(self.grid.toggle_visibility(visible, host));
    }

    /// # Errors
    /// `InvalidConfig` if the patch is rejected; nothing changes then.
    /// A destroyed layer accepts and ignores every patch.
    pub fn update_grid_config(
        &mut self,
        host: &mut impl HostEditor,
        patch: &GridConfigPatch,
    ) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        let effects = self.grid.update_config(patch, host)?;
        host.apply_all(effects);
        Ok(())
    }

    pub fn set_hover_enabled(&mut self, host: &mut impl HostEditor, enabled: bool) {
        if self.destroyed {
            return;
        }
        host.apply_all(self.hover.set_enabled(enabled));
    }

    pub fn set_resize_enabled(&mut self, host: &mut impl HostEditor, enabled: bool) {
        if self.destroyed {
            return;
        }
        host.apply_all(self.resize.set_enabled(enabled, host));
    }

    /// Remove every listener and overlay this layer installed.
    pub fn destroy(&mut self, host: &mut impl HostEditor) {
        if self.destroyed {
            return;
        }
        host.apply_all(self.resize.destroy());
        host.apply_all(self.grid.destroy());
        host.apply_all(self.hover.destroy());
        self.selection.destroy();
        self.queued.clear();
        self.destroyed = true;
        log::debug!("canvas layer destroyed");
    }
}
