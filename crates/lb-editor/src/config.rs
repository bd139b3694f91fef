//! Editor settings.
//!
//! Every field has a default, so a host can load a partial JSON document
//! (or none at all) and get a working editor.

use crate::viewport::{Viewport, ZoomSettle};
use kurbo::{Size, Vec2};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid editor config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Quiet period after the last wheel step before a zoom is reported.
    pub zoom_settle_ms: u64,
    /// Wheel delta that doubles the scale (`factor = 1 + delta / sensitivity`).
    pub zoom_sensitivity: f64,
    pub initial_scale: f64,
    pub initial_offset: [f64; 2],
    /// Smallest canvas the host may shrink to, in pixels.
    pub min_canvas: [f64; 2],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom_settle_ms: 300,
            zoom_sensitivity: 240.0,
            initial_scale: 1.0,
            initial_offset: [0.0, 0.0],
            min_canvas: [400.0, 400.0],
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the viewport cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("zoom_sensitivity", self.zoom_sensitivity),
            ("initial_scale", self.initial_scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        let [x, y] = self.initial_offset;
        Viewport::new(Vec2::new(x, y), self.initial_scale)
    }

    pub fn zoom_settle(&self) -> ZoomSettle {
        ZoomSettle::new(Duration::from_millis(self.zoom_settle_ms))
    }

    pub fn min_canvas_size(&self) -> Size {
        Size::new(self.min_canvas[0], self.min_canvas[1])
    }
}
