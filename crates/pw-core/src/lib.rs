pub mod classify;
pub mod effect;
pub mod error;
pub mod geometry;
pub mod host;
pub mod id;
pub mod model;
pub mod tree;

pub use classify::{NodeInfo, classify, component_label, humanize};
pub use effect::{CanvasEffect, HandlePlacement, SchemaRequest};
pub use error::{CanvasError, Result};
pub use geometry::{ElementGeometry, Point, Rect, Size, SurfaceMetrics};
pub use host::{ComponentModel, EffectSink, HostEditor};
pub use id::NodeId;
pub use model::*;
pub use tree::{ComponentNode, ComponentTree};
