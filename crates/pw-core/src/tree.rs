//! In-memory host editor.
//!
//! `ComponentTree` is a complete [`HostEditor`]: a petgraph-backed component
//! tree with a simulated rendering surface and overlay layer. Native embedders
//! can drive the canvas layer with it directly, and the test suites use it as
//! the host double. Every applied effect is recorded in `applied`.

use crate::effect::{CanvasEffect, HandlePlacement, SchemaRequest};
use crate::geometry::{Rect, SurfaceMetrics};
use crate::host::{ComponentModel, EffectSink};
use crate::id::NodeId;
use crate::model::{FieldSchema, PaletteEntry, SnapGuide, TemplateDescriptor};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use std::collections::{BTreeMap, HashMap};

/// One element of the surface document.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    pub id: NodeId,
    /// Host component type; `"default"` for untyped elements.
    pub node_type: String,
    pub tag_name: String,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    pub classes: Vec<String>,
    /// Layout box in surface viewport space. `None` until laid out.
    pub rect: Option<Rect>,
    pub display: String,
}

impl ComponentNode {
    pub fn new(id: NodeId, tag_name: &str) -> Self {
        let display = match tag_name {
            "span" | "a" | "strong" | "em" | "small" | "label" => "inline",
            "img" | "button" | "input" => "inline-block",
            _ => "block",
        };
        Self {
            id,
            node_type: "default".to_string(),
            tag_name: tag_name.to_string(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            classes: Vec::new(),
            rect: None,
            display: display.to_string(),
        }
    }

    pub fn with_type(mut self, node_type: &str) -> Self {
        self.node_type = node_type.to_string();
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_display(mut self, display: &str) -> Self {
        self.display = display.to_string();
        self
    }
}

/// What the overlay layer currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayState {
    pub outline: Option<(NodeId, Rect, String)>,
    pub handles_target: Option<NodeId>,
    pub handles: Vec<HandlePlacement>,
    pub guides: Vec<SnapGuide>,
    pub grid_cell: Option<u32>,
    pub cursor: Option<String>,
    pub text_selection_suppressed: bool,
    /// Number of document-level pointer listener pairs attached.
    pub pointer_listeners: u32,
    pub stylesheets: BTreeMap<String, String>,
}

pub struct ComponentTree {
    pub graph: StableDiGraph<ComponentNode, ()>,
    /// The surface `<body>`.
    pub root: NodeIndex,
    pub id_index: HashMap<NodeId, NodeIndex>,
    pub surface: Option<SurfaceMetrics>,
    pub traits: HashMap<NodeId, FieldSchema>,
    pub types: Vec<TemplateDescriptor>,
    pub palette: Vec<PaletteEntry>,
    pub overlays: OverlayState,
    pub schema_requests: Vec<SchemaRequest>,
    /// History entries, one per `ComponentUpdated`.
    pub history: Vec<NodeId>,
    pub applied: Vec<CanvasEffect>,
    /// When set, `SetTraits` is recorded but not installed.
    pub reject_traits: bool,
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentTree {
    /// Empty surface document with a `<body>` root. The surface starts detached.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let body_id = NodeId::intern("body");
        let root = graph.add_node(ComponentNode::new(body_id, "body").with_type("wrapper"));
        let mut id_index = HashMap::new();
        id_index.insert(body_id, root);
        Self {
            graph,
            root,
            id_index,
            surface: None,
            traits: HashMap::new(),
            types: Vec::new(),
            palette: Vec::new(),
            overlays: OverlayState::default(),
            schema_requests: Vec::new(),
            history: Vec::new(),
            applied: Vec::new(),
            reject_traits: false,
        }
    }

    pub fn root_id(&self) -> NodeId {
        self.graph[self.root].id
    }

    pub fn attach_surface(&mut self, metrics: SurfaceMetrics) {
        self.surface = Some(metrics);
    }

    pub fn detach_surface(&mut self) {
        self.surface = None;
    }

    /// Insert `node` under `parent` (the body when `None`). Returns its id.
    pub fn add(&mut self, parent: Option<NodeId>, node: ComponentNode) -> NodeId {
        let parent_idx = parent
            .and_then(|p| self.index_of(p))
            .unwrap_or(self.root);
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent_idx, idx, ());
        self.id_index.insert(id, idx);
        id
    }

    /// Remove a node and its subtree.
    pub fn remove(&mut self, id: NodeId) {
        let Some(idx) = self.index_of(id) else {
            return;
        };
        for child in self.children(idx) {
            let child_id = self.graph[child].id;
            self.remove(child_id);
        }
        if let Some(node) = self.graph.remove_node(idx) {
            self.id_index.remove(&node.id);
            self.traits.remove(&node.id);
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&ComponentNode> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ComponentNode> {
        self.id_index
            .get(&id)
            .copied()
            .map(|idx| &mut self.graph[idx])
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Children in insertion order.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(node) = self.get_mut(id) {
            node.rect = Some(rect);
        }
    }

    /// Number of applied effects matching `pred`.
    pub fn count(&self, pred: impl Fn(&CanvasEffect) -> bool) -> usize {
        self.applied.iter().filter(|e| pred(e)).count()
    }

    fn parent_idx(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Keep the simulated layout box in step with pixel styles.
    fn relayout(&mut self, id: NodeId, property: &str, value: &str) {
        let Some(px) = value.strip_suffix("px").and_then(|v| v.trim().parse::<f64>().ok()) else {
            return;
        };
        let scroll = self.surface.map(|s| s.scroll).unwrap_or_default();
        if let Some(node) = self.get_mut(id)
            && let Some(rect) = node.rect.as_mut()
        {
            match property {
                "width" => rect.width = px,
                "height" => rect.height = px,
                "left" => rect.x = px - scroll.x,
                "top" => rect.y = px - scroll.y,
                _ => {}
            }
        }
    }
}

impl ComponentModel for ComponentTree {
    fn node_type(&self, id: NodeId) -> Option<String> {
        self.get(id).map(|n| n.node_type.clone())
    }

    fn tag_name(&self, id: NodeId) -> Option<String> {
        self.get(id).map(|n| n.tag_name.clone())
    }

    fn attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.get(id).and_then(|n| n.attributes.get(name).cloned())
    }

    fn style(&self, id: NodeId, property: &str) -> Option<String> {
        self.get(id).and_then(|n| n.style.get(property).cloned())
    }

    fn classes(&self, id: NodeId) -> Vec<String> {
        self.get(id).map(|n| n.classes.clone()).unwrap_or_default()
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        let idx = self.index_of(id)?;
        self.parent_idx(idx).map(|p| self.graph[p].id)
    }

    fn is_document_root(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.tag_name.as_str(), "html" | "body"))
    }

    fn bounding_rect(&self, id: NodeId) -> Option<Rect> {
        self.get(id).and_then(|n| n.rect)
    }

    fn computed_display(&self, id: NodeId) -> Option<String> {
        self.get(id).map(|n| n.display.clone())
    }

    fn traits(&self, id: NodeId) -> Option<FieldSchema> {
        self.traits.get(&id).cloned()
    }

    fn surface(&self) -> Option<SurfaceMetrics> {
        self.surface
    }
}

impl EffectSink for ComponentTree {
    fn apply(&mut self, effect: CanvasEffect) {
        match &effect {
            CanvasEffect::SetAttribute { id, name, value } => {
                if let Some(node) = self.get_mut(*id) {
                    if name == "class" {
                        node.classes = value.split_whitespace().map(str::to_string).collect();
                    }
                    node.attributes.insert(name.clone(), value.clone());
                }
            }
            CanvasEffect::RemoveAttribute { id, name } => {
                if let Some(node) = self.get_mut(*id) {
                    node.attributes.remove(name);
                }
            }
            CanvasEffect::SetStyle {
                id,
                property,
                value,
            } => {
                if let Some(node) = self.get_mut(*id) {
                    node.style.insert(property.clone(), value.clone());
                }
                self.relayout(*id, property, value);
            }
            CanvasEffect::RemoveStyle { id, property } => {
                if let Some(node) = self.get_mut(*id) {
                    node.style.remove(property);
                }
            }
            CanvasEffect::RegisterType { descriptor } => {
                match self.types.iter_mut().find(|t| t.id == descriptor.id) {
                    Some(existing) => *existing = (**descriptor).clone(),
                    None => self.types.push((**descriptor).clone()),
                }
            }
            CanvasEffect::UpsertPaletteEntry { entry } => {
                match self.palette.iter_mut().find(|p| p.id == entry.id) {
                    Some(existing) => *existing = entry.clone(),
                    None => self.palette.push(entry.clone()),
                }
            }
            CanvasEffect::SetTraits { id, schema } => {
                if self.reject_traits {
                    log::debug!("trait store rejected schema for {id}");
                } else if self.index_of(*id).is_some() {
                    self.traits.insert(*id, schema.clone());
                }
            }
            CanvasEffect::RefreshTraits { .. } => {}
            CanvasEffect::ComponentUpdated { id } => self.history.push(*id),
            CanvasEffect::ResolveSchema { request } => self.schema_requests.push(request.clone()),
            CanvasEffect::ShowOutline {
                target,
                rect,
                label,
            } => self.overlays.outline = Some((*target, *rect, label.clone())),
            CanvasEffect::HideOutline => self.overlays.outline = None,
            CanvasEffect::PlaceHandles { target, handles } => {
                self.overlays.handles_target = Some(*target);
                self.overlays.handles = handles.to_vec();
            }
            CanvasEffect::ClearHandles => {
                self.overlays.handles_target = None;
                self.overlays.handles.clear();
            }
            CanvasEffect::ShowGuides { guides } => self.overlays.guides = guides.to_vec(),
            CanvasEffect::ClearGuides => self.overlays.guides.clear(),
            CanvasEffect::ShowGrid { cell_size } => self.overlays.grid_cell = Some(*cell_size),
            CanvasEffect::HideGrid => self.overlays.grid_cell = None,
            CanvasEffect::InjectStylesheet { id, css } => {
                self.overlays.stylesheets.insert(id.clone(), css.clone());
            }
            CanvasEffect::RemoveStylesheet { id } => {
                self.overlays.stylesheets.remove(id);
            }
            CanvasEffect::BeginPointerTracking => self.overlays.pointer_listeners += 1,
            CanvasEffect::EndPointerTracking => {
                self.overlays.pointer_listeners = self.overlays.pointer_listeners.saturating_sub(1);
            }
            CanvasEffect::SetCursor { cursor } => self.overlays.cursor = cursor.clone(),
            CanvasEffect::SuppressTextSelection { suppressed } => {
                self.overlays.text_selection_suppressed = *suppressed;
            }
        }
        self.applied.push(effect);
    }
}
