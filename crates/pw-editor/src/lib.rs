//! Canvas interaction and customization layer for the Pagewright page builder.
//!
//! Each controller is a sans-IO state machine: it reads the host through
//! [`pw_core::ComponentModel`] and answers with [`pw_core::CanvasEffect`]s.
//! [`layer::CanvasLayer`] wires them to the host editor's event bus.

pub mod catalog;
pub mod config;
pub mod fields;
pub mod grid;
pub mod hover;
pub mod input;
pub mod layer;
pub mod lock;
pub mod ready;
pub mod resize;
pub mod schema;
pub mod selection;
pub mod templates;

pub use config::LayerConfig;
pub use input::{HostEvent, PointerEvent};
pub use layer::CanvasLayer;
