//! Layer configuration.
//!
//! One struct per controller, all gathered in [`LayerConfig`]. Every section
//! is `#[serde(default)]`, so a JSON document only needs the keys it changes.

use pw_core::error::Result;
use pw_core::model::{GridConfig, HOST_TYPE_ATTR, SMART_OBJECT_ATTR};
use serde::{Deserialize, Serialize};

/// Snap guide lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuideConfig {
    /// Guides vanish this long after being drawn, or at drag end. Default: **2000**.
    pub ttl_ms: f64,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self { ttl_ms: 2000.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeConfig {
    /// Default: **50**.
    pub min_width: f64,
    /// Default: **30**.
    pub min_height: f64,
    /// Edge length of a handle square. Default: **10**.
    pub handle_size: f64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            min_width: 50.0,
            min_height: 30.0,
            handle_size: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HoverConfig {
    /// Delay before a pointer-out hides the outline. Default: **50**.
    pub debounce_ms: f64,
    /// Attributes that mark an element as a component.
    pub marker_attributes: Vec<String>,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 50.0,
            marker_attributes: vec![HOST_TYPE_ATTR.to_string(), SMART_OBJECT_ATTR.to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionConfig {
    /// How long a node stays locked after this layer writes to it. The
    /// default of **50** ms is a heuristic; raise it when the host re-renders
    /// slowly.
    pub lock_ttl_ms: f64,
    /// Re-install attempts when a schema did not take. Default: **1**.
    pub verify_attempts: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            lock_ttl_ms: 50.0,
            verify_attempts: 1,
        }
    }
}

/// Bounded retry while the rendering surface is not mounted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReadyConfig {
    /// Default: **10**.
    pub max_attempts: u32,
    /// Default: **100**.
    pub retry_interval_ms: f64,
}

impl Default for ReadyConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            retry_interval_ms: 100.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerConfig {
    pub grid: GridConfig,
    pub guides: GuideConfig,
    pub resize: ResizeConfig,
    pub hover: HoverConfig,
    pub selection: SelectionConfig,
    pub ready: ReadyConfig,
}

impl LayerConfig {
    /// Parse a (possibly partial) JSON config. Missing keys take defaults.
    ///
    /// # Errors
    /// `CanvasError::Config` on malformed JSON, `InvalidConfig` when the grid
    /// section violates its invariants.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LayerConfig = serde_json::from_str(json)?;
        // Route the grid section through the validating patch path.
        let grid = GridConfig::default().apply(&pw_core::model::GridConfigPatch {
            cell_size: Some(i64::from(config.grid.cell_size)),
            enabled: Some(config.grid.enabled),
            snap_threshold: Some(i64::from(config.grid.snap_threshold)),
            show_guides: Some(config.grid.show_guides),
            visible: Some(config.grid.visible),
        })?;
        Ok(Self { grid, ..config })
    }
}
