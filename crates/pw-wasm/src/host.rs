//! `ComponentModel` / `EffectSink` over the JS host adapter.
//!
//! The page builder's glue code passes an object implementing the methods
//! declared below. Structured values cross the boundary as JSON strings.

use pw_core::effect::CanvasEffect;
use pw_core::geometry::{Rect, SurfaceMetrics};
use pw_core::host::{ComponentModel, EffectSink};
use pw_core::id::NodeId;
use pw_core::model::FieldSchema;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    /// Host editor adapter implemented in JavaScript.
    pub type JsHostEditor;

    #[wasm_bindgen(method, js_name = nodeType)]
    fn node_type(this: &JsHostEditor, id: &str) -> Option<String>;

    #[wasm_bindgen(method, js_name = tagName)]
    fn tag_name(this: &JsHostEditor, id: &str) -> Option<String>;

    #[wasm_bindgen(method)]
    fn attribute(this: &JsHostEditor, id: &str, name: &str) -> Option<String>;

    #[wasm_bindgen(method)]
    fn style(this: &JsHostEditor, id: &str, property: &str) -> Option<String>;

    /// Space-separated class list.
    #[wasm_bindgen(method, js_name = className)]
    fn class_name(this: &JsHostEditor, id: &str) -> Option<String>;

    #[wasm_bindgen(method)]
    fn parent(this: &JsHostEditor, id: &str) -> Option<String>;

    #[wasm_bindgen(method, js_name = isDocumentRoot)]
    fn is_document_root(this: &JsHostEditor, id: &str) -> bool;

    /// `{"x":..,"y":..,"width":..,"height":..}` in surface viewport space.
    #[wasm_bindgen(method, js_name = boundingRect)]
    fn bounding_rect(this: &JsHostEditor, id: &str) -> Option<String>;

    #[wasm_bindgen(method, js_name = computedDisplay)]
    fn computed_display(this: &JsHostEditor, id: &str) -> Option<String>;

    /// Installed trait list as a JSON array of fields.
    #[wasm_bindgen(method)]
    fn traits(this: &JsHostEditor, id: &str) -> Option<String>;

    /// `{"frameOrigin":{..},"scroll":{..}}`, or nothing while detached.
    #[wasm_bindgen(method)]
    fn surface(this: &JsHostEditor) -> Option<String>;

    /// Apply one effect, `{"op": .., ..}`.
    #[wasm_bindgen(method)]
    fn apply(this: &JsHostEditor, effect: &str);
}

fn parse<T: serde::de::DeserializeOwned>(what: &str, json: Option<String>) -> Option<T> {
    let json = json?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("host returned malformed {what}: {e}");
            None
        }
    }
}

/// One batch of calls into the JS adapter. Records what it applied so the
/// bridge can report it back.
pub struct JsHost<'a> {
    js: &'a JsHostEditor,
    pub applied: Vec<CanvasEffect>,
}

impl<'a> JsHost<'a> {
    pub fn new(js: &'a JsHostEditor) -> Self {
        Self {
            js,
            applied: Vec::new(),
        }
    }
}

impl ComponentModel for JsHost<'_> {
    fn node_type(&self, id: NodeId) -> Option<String> {
        self.js.node_type(id.as_str())
    }

    fn tag_name(&self, id: NodeId) -> Option<String> {
        self.js.tag_name(id.as_str())
    }

    fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.js.attribute(id.as_str(), name)
    }

    fn style(&self, id: NodeId, property: &str) -> Option<String> {
        self.js.style(id.as_str(), property)
    }

    fn classes(&self, id: NodeId) -> Vec<String> {
        self.js
            .class_name(id.as_str())
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.js.parent(id.as_str()).map(|p| NodeId::intern(&p))
    }

    fn is_document_root(&self, id: NodeId) -> bool {
        self.js.is_document_root(id.as_str())
    }

    fn bounding_rect(&self, id: NodeId) -> Option<Rect> {
        parse("rect", self.js.bounding_rect(id.as_str()))
    }

    fn computed_display(&self, id: NodeId) -> Option<String> {
        self.js.computed_display(id.as_str())
    }

    fn traits(&self, id: NodeId) -> Option<FieldSchema> {
        parse("traits", self.js.traits(id.as_str()))
    }

    fn surface(&self) -> Option<SurfaceMetrics> {
        parse("surface metrics", self.js.surface())
    }
}

impl EffectSink for JsHost<'_> {
    fn apply(&mut self, effect: CanvasEffect) {
        match serde_json::to_string(&effect) {
            Ok(json) => self.js.apply(&json),
            Err(e) => log::error!("cannot encode {effect:?}: {e}"),
        }
        self.applied.push(effect);
    }
}
