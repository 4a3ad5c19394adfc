//! Error taxonomy for the canvas layer.
//!
//! Most of these never cross a public boundary: controllers log and degrade
//! (no highlight, default schema, unsnapped position). Only precondition
//! violations are returned to callers.

use crate::id::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanvasError {
    #[error("rendering surface is not mounted yet")]
    NotReady,

    #[error("event for {0} no longer matches the current selection")]
    StaleEvent(NodeId),

    #[error("schema resolution failed for `{type_tag}`: {reason}")]
    SchemaResolution { type_tag: String, reason: String },

    #[error("update for `{0}` is already being processed")]
    Reentrancy(String),

    #[error("invalid grid config: {0}")]
    InvalidConfig(String),

    #[error("a resize session is already active on {0}")]
    SessionActive(NodeId),

    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CanvasError {
    fn from(e: serde_json::Error) -> Self {
        CanvasError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CanvasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_events_describe_themselves() {
        let node = NodeId::intern("err-card");
        assert_eq!(
            CanvasError::StaleEvent(node).to_string(),
            "event for err-card no longer matches the current selection"
        );
        assert_eq!(
            CanvasError::Reentrancy("err-card".into()).to_string(),
            "update for `err-card` is already being processed"
        );
        assert_eq!(CanvasError::UnknownNode(node).to_string(), "unknown node err-card");
    }
}
