//! # Configuration
//!
//! Tunables of an editor session. Every field has a default, so a config file only needs
//! the keys it changes.

use crate::errors::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`EditorConfig::ingest_timeout_ms`].
pub const INGEST_TIMEOUT_ENV: &str = "SPLICE_INGEST_TIMEOUT_MS";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Step of the placement grid, in seconds.
    pub grid_step: f64,
    pub snap_to_grid: bool,
    /// Step durations are rounded to when resizing.
    pub resize_step: f64,
    pub min_layer_duration: f64,
    /// Duration given to image layers, which carry no intrinsic length.
    pub default_image_duration: f64,
    pub default_text_duration: f64,
    pub default_text: String,
    pub ingest_timeout_ms: u64,
    /// Cap on stored history entries; `None` keeps everything.
    pub history_limit: Option<usize>,
    pub canvas: CanvasSize,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_step: 0.5,
            snap_to_grid: true,
            resize_step: 0.5,
            min_layer_duration: 0.5,
            default_image_duration: 5.0,
            default_text_duration: 5.0,
            default_text: "Your Text Here".to_string(),
            ingest_timeout_ms: 10_000,
            history_limit: None,
            canvas: CanvasSize::default(),
        }
    }
}

impl EditorConfig {
    /// Loads a JSON config file, then applies environment overrides.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        Ok(config.with_env_overrides())
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(ms) = std::env::var(INGEST_TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.ingest_timeout_ms = ms;
        }
        self
    }

    pub fn ingest_timeout(&self) -> Duration {
        Duration::from_millis(self.ingest_timeout_ms)
    }
}
