//! WASM bridge for Pagewright: exposes the canvas layer to the page builder.
//!
//! Compiled via `wasm-pack build --target web`. JavaScript hands in a host
//! adapter (see [`host::JsHostEditor`]) and forwards editor events as JSON.
//! Every call applies its effects through the adapter and also returns them
//! as a JSON array for logging and tests.

mod console;
mod host;

use host::{JsHost, JsHostEditor};
use pw_core::model::{FieldSchema, GridConfigPatch, PaletteEntry, TemplateDescriptor, TypeTag};
use pw_editor::catalog::builtin_templates;
use pw_editor::grid::snap;
use pw_editor::schema;
use pw_editor::templates::TemplateRegistry;
use pw_editor::{CanvasLayer, HostEvent, LayerConfig, PointerEvent};
use wasm_bindgen::prelude::*;

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct PwCanvas {
    layer: CanvasLayer,
    host: JsHostEditor,
}

impl PwCanvas {
    /// Run `f` against the JS host and return what it applied as JSON.
    fn run(&mut self, f: impl FnOnce(&mut CanvasLayer, &mut JsHost<'_>)) -> String {
        let mut host = JsHost::new(&self.host);
        f(&mut self.layer, &mut host);
        serde_json::to_string(&host.applied).unwrap_or_else(|_| "[]".to_string())
    }

    fn try_run(
        &mut self,
        f: impl FnOnce(&mut CanvasLayer, &mut JsHost<'_>) -> pw_core::Result<()>,
    ) -> Result<String, JsValue> {
        let mut outcome = Ok(());
        let applied = self.run(|layer, host| outcome = f(layer, host));
        outcome.map(|()| applied).map_err(js_error)
    }
}

#[wasm_bindgen]
impl PwCanvas {
    /// Create the layer. `config_json` may be empty or any subset of the
    /// layer configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(host: JsHostEditor, config_json: &str) -> Result<PwCanvas, JsValue> {
        console::panic_hook_setup();
        console::init(log::LevelFilter::Info);

        let config = if config_json.trim().is_empty() {
            LayerConfig::default()
        } else {
            LayerConfig::from_json(config_json).map_err(js_error)?
        };
        Ok(Self {
            layer: CanvasLayer::new(config),
            host,
        })
    }

    // ─── Templates ───────────────────────────────────────────────────────

    pub fn register_catalog(&mut self) -> Result<String, JsValue> {
        self.try_run(|layer, host| layer.register_catalog(host))
    }

    /// Register a template from its JSON descriptor.
    pub fn register_template(&mut self, descriptor_json: &str) -> Result<String, JsValue> {
        let descriptor: TemplateDescriptor =
            serde_json::from_str(descriptor_json).map_err(js_error)?;
        self.try_run(|layer, host| layer.register_template(host, descriptor))
    }

    /// Palette entries of every registered template.
    pub fn palette(&self) -> String {
        let entries: Vec<PaletteEntry> = self
            .layer
            .registry()
            .iter()
            .map(TemplateDescriptor::palette_entry)
            .collect();
        serde_json::to_string(&entries).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── Events ──────────────────────────────────────────────────────────

    /// `{"type":"selectionChanged","node":"i3k9"}` and friends.
    pub fn handle_event(&mut self, event_json: &str, now_ms: f64) -> Result<String, JsValue> {
        let event: HostEvent = serde_json::from_str(event_json).map_err(js_error)?;
        Ok(self.run(|layer, host| layer.handle_event(host, event, now_ms)))
    }

    /// `{"type":"over","target":".."}`, `{"type":"move","x":..,"y":..}`, …
    pub fn handle_pointer(&mut self, event_json: &str, now_ms: f64) -> Result<String, JsValue> {
        let event: PointerEvent = serde_json::from_str(event_json).map_err(js_error)?;
        Ok(self.run(|layer, host| layer.handle_pointer(host, event, now_ms)))
    }

    /// Answer a `resolveSchema` request: pass the schema JSON on success, or
    /// leave it out and pass `error`.
    pub fn complete_schema(
        &mut self,
        ticket: f64,
        schema_json: Option<String>,
        error: Option<String>,
    ) -> String {
        let result = match schema_json {
            Some(json) => {
                serde_json::from_str::<FieldSchema>(&json).map_err(|e| format!("bad schema: {e}"))
            }
            None => Err(error.unwrap_or_else(|| "schema lookup failed".to_string())),
        };
        self.run(|layer, host| layer.complete_schema(host, ticket as u64, result))
    }

    /// Answer the pending request from the built-in schema library.
    pub fn resolve_builtin(&mut self) -> String {
        self.run(|layer, host| layer.resolve_builtin(host))
    }

    // ─── Timers ──────────────────────────────────────────────────────────

    pub fn tick(&mut self, now_ms: f64) -> String {
        self.run(|layer, host| layer.tick(host, now_ms))
    }

    /// When to call `tick` next, if anything is pending.
    pub fn next_deadline(&self) -> Option<f64> {
        self.layer.next_deadline()
    }

    // ─── Toolbar ─────────────────────────────────────────────────────────

    pub fn set_grid_enabled(&mut self, enabled: bool) {
        self.layer.set_grid_enabled(enabled);
    }

    pub fn toggle_grid_visibility(&mut self, visible: bool) -> String {
        self.run(|layer, host| layer.toggle_grid_visibility(host, visible))
    }

    pub fn update_grid_config(&mut self, patch_json: &str) -> Result<String, JsValue> {
        let patch: GridConfigPatch = serde_json::from_str(patch_json).map_err(js_error)?;
        self.try_run(|layer, host| layer.update_grid_config(host, &patch))
    }

    pub fn grid_config(&self) -> String {
        serde_json::to_string(&self.layer.grid_config()).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn set_hover_enabled(&mut self, enabled: bool) -> String {
        self.run(|layer, host| layer.set_hover_enabled(host, enabled))
    }

    pub fn set_resize_enabled(&mut self, enabled: bool) -> String {
        self.run(|layer, host| layer.set_resize_enabled(host, enabled))
    }

    pub fn set_log_level(&self, level: &str) {
        console::init(console::parse_level(level));
    }

    pub fn destroy(&mut self) -> String {
        self.run(|layer, host| layer.destroy(host))
    }
}

// ─── Standalone helpers (no host needed) ─────────────────────────────────

/// Built-in schema for a type tag (`"image"`, `"smartObject"`, …).
/// Returns JSON `{"ok":true,"schema":[...]}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn resolve_builtin_schema(type_tag: &str, smart_object: Option<String>) -> String {
    let tag: TypeTag = match serde_json::from_value(serde_json::Value::String(type_tag.into())) {
        Ok(tag) => tag,
        Err(_) => TypeTag::from_host_type(type_tag).unwrap_or(TypeTag::Unknown),
    };
    let mut registry = TemplateRegistry::new();
    for descriptor in builtin_templates() {
        if let Err(e) = registry.register(descriptor) {
            log::warn!("skipping catalog entry: {e}");
        }
    }
    let body = match schema::resolve(tag, smart_object.as_deref(), &registry) {
        Ok(schema) => serde_json::json!({ "ok": true, "schema": schema }),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }),
    };
    body.to_string()
}

/// Round `value` to the nearest multiple of `cell_size`.
#[wasm_bindgen]
pub fn snap_value(value: f64, cell_size: u32) -> f64 {
    if cell_size == 0 {
        return value;
    }
    snap(value, cell_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn snap_value_matches_grid_engine() {
        assert_eq!(snap_value(187.0, 20), 180.0);
        assert_eq!(snap_value(170.0, 20), 180.0);
        assert_eq!(snap_value(42.0, 0), 42.0);
    }

    #[test]
    fn builtin_image_schema_over_json() {
        let out: serde_json::Value =
            serde_json::from_str(&resolve_builtin_schema("image", None)).unwrap();
        assert_eq!(out["ok"], true);
        let names: Vec<&str> = out["schema"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|f| f["name"].as_str())
            .collect();
        assert!(names.contains(&"src"));
        assert!(names.contains(&"alt"));
    }

    #[test]
    fn host_type_names_are_accepted() {
        let out: serde_json::Value =
            serde_json::from_str(&resolve_builtin_schema("img", None)).unwrap();
        assert_eq!(out["ok"], true);
    }

    #[test]
    fn unknown_smart_object_reports_error() {
        let out: serde_json::Value = serde_json::from_str(&resolve_builtin_schema(
            "smartObject",
            Some("no-such-template".into()),
        ))
        .unwrap();
        assert_eq!(out["ok"], false);
    }
}
