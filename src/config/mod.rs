use std::time::Duration;

use serde::Deserialize;

use crate::viewport::{FitMode, ViewportPolicy};

const DEFAULT_MIN_WIDTH: u32 = 100;
const DEFAULT_MIN_HEIGHT: u32 = 100;
const DEFAULT_MAX_WIDTH: u32 = 1200;
const DEFAULT_MAX_HEIGHT: u32 = 550;
const DEFAULT_GEOMETRY_DEBOUNCE_MS: u64 = 1_000;
const DEFAULT_CONTENT_DEBOUNCE_MS: u64 = 2_500;
const DEFAULT_RATIO_TOLERANCE: f64 = 0.01;
const DEFAULT_MIN_CONTAINER_EXTENT: f64 = 100.0;

/// Unified logical-size limits shared by every resize call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SizeBounds {
    #[serde(default = "default_min_width")]
    pub min_width: u32,
    #[serde(default = "default_min_height")]
    pub min_height: u32,
    #[serde(default = "default_max_width")]
    pub max_width: u32,
    #[serde(default = "default_max_height")]
    pub max_height: u32,
}

impl SizeBounds {
    pub fn clamp_width(&self, width: u32) -> u32 {
        width.clamp(self.min_width, self.max_width)
    }

    pub fn clamp_height(&self, height: u32) -> u32 {
        height.clamp(self.min_height, self.max_height)
    }
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self {
            min_width: DEFAULT_MIN_WIDTH,
            min_height: DEFAULT_MIN_HEIGHT,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

/// Debounce intervals per mutation class. Geometry edits settle faster than
/// freeform content edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DebouncePolicy {
    #[serde(default = "default_geometry_debounce_ms")]
    pub geometry_ms: u64,
    #[serde(default = "default_content_debounce_ms")]
    pub content_ms: u64,
}

impl DebouncePolicy {
    pub fn geometry(&self) -> Duration {
        Duration::from_millis(self.geometry_ms)
    }

    pub fn content(&self) -> Duration {
        Duration::from_millis(self.content_ms)
    }
}

impl Default for DebouncePolicy {
    fn default() -> Self {
        Self {
            geometry_ms: DEFAULT_GEOMETRY_DEBOUNCE_MS,
            content_ms: DEFAULT_CONTENT_DEBOUNCE_MS,
        }
    }
}

/// Engine-wide settings, deserialized from JSON with per-field defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub bounds: SizeBounds,
    #[serde(default)]
    pub debounce: DebouncePolicy,
    #[serde(default)]
    pub viewport: ViewportPolicy,
    #[serde(default = "default_ratio_tolerance")]
    pub ratio_tolerance: f64,
    #[serde(default = "default_min_container_extent")]
    pub min_container_extent: f64,
}

impl EngineConfig {
    /// Parses a JSON config, falling back to defaults on malformed input.
    pub fn from_json(contents: &str) -> Self {
        serde_json::from_str(contents).unwrap_or_else(|err| {
            tracing::warn!(?err, "failed to parse engine config; using defaults");
            Self::default()
        })
    }

    pub fn contain_policy(&self) -> ViewportPolicy {
        ViewportPolicy {
            fit: FitMode::Contain,
            ..self.viewport
        }
    }

    pub fn exact_policy(&self) -> ViewportPolicy {
        ViewportPolicy {
            fit: FitMode::Exact,
            ..self.viewport
        }
    }
}

fn default_min_width() -> u32 {
    DEFAULT_MIN_WIDTH
}

fn default_min_height() -> u32 {
    DEFAULT_MIN_HEIGHT
}

fn default_max_width() -> u32 {
    DEFAULT_MAX_WIDTH
}

fn default_max_height() -> u32 {
    DEFAULT_MAX_HEIGHT
}

fn default_geometry_debounce_ms() -> u64 {
    DEFAULT_GEOMETRY_DEBOUNCE_MS
}

fn default_content_debounce_ms() -> u64 {
    DEFAULT_CONTENT_DEBOUNCE_MS
}

fn default_ratio_tolerance() -> f64 {
    DEFAULT_RATIO_TOLERANCE
}

fn default_min_container_extent() -> f64 {
    DEFAULT_MIN_CONTAINER_EXTENT
}
