//! Pure mapping from logical document size to on-screen display size and zoom.

use serde::Deserialize;

use crate::geometry::{LogicalSize, Size};

const ZOOM_MIN: f64 = 0.01;
const ZOOM_MAX: f64 = 16.0;

/// Containers narrower or shorter than this are treated as transient layout
/// states; the previous viewport is kept instead of computing a near-zero zoom.
pub const DEFAULT_MIN_CONTAINER_EXTENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitMode {
    /// Scale the document down (optionally up) so it fits the container.
    #[default]
    Contain,
    /// Show the document at its logical size, ignoring the container.
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ViewportPolicy {
    #[serde(default)]
    pub fit: FitMode,
    #[serde(default)]
    pub allow_upscale: bool,
    #[serde(default)]
    pub margin: f64,
}

impl Default for ViewportPolicy {
    fn default() -> Self {
        Self {
            fit: FitMode::Contain,
            allow_upscale: false,
            margin: 0.0,
        }
    }
}

/// Computed display mapping. Never persisted; recomputed whenever the
/// container or the logical size changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub container: Size,
    pub display: Size,
    pub zoom: f64,
    /// Backing pixel-buffer size (`display * device_pixel_ratio`). A
    /// rendering-surface concern only; no stored coordinate depends on it.
    pub backing: Size,
}

impl ViewportState {
    pub fn initial(logical: LogicalSize) -> Self {
        let display = logical.as_size();
        Self {
            container: display,
            display,
            zoom: 1.0,
            backing: display,
        }
    }
}

/// Computes the viewport for `logical` inside `container`.
///
/// Under `Contain`, a degenerate container (either extent below
/// `min_container_extent`) yields the `previous` viewport unchanged,
/// preventing flicker during layout transitions. `Exact` ignores the
/// container entirely, so the guard does not apply to it.
pub fn compute_viewport(
    logical: LogicalSize,
    container: Size,
    device_pixel_ratio: f64,
    policy: ViewportPolicy,
    previous: Option<&ViewportState>,
    min_container_extent: f64,
) -> ViewportState {
    let zoom = match policy.fit {
        FitMode::Exact => 1.0,
        FitMode::Contain => {
            if container.is_degenerate(min_container_extent) {
                tracing::debug!(
                    ?container,
                    "container below usable threshold; keeping previous viewport"
                );
                return previous
                    .copied()
                    .unwrap_or_else(|| ViewportState::initial(logical));
            }
            let usable_width = (container.width - 2.0 * policy.margin).max(1.0);
            let usable_height = (container.height - 2.0 * policy.margin).max(1.0);
            let fit = (usable_width / f64::from(logical.width.max(1)))
                .min(usable_height / f64::from(logical.height.max(1)));
            let capped = if policy.allow_upscale { fit } else { fit.min(1.0) };
            capped.clamp(ZOOM_MIN, ZOOM_MAX)
        }
    };

    let display = logical.as_size().scaled(zoom);
    let dpr = device_pixel_ratio.max(1.0);
    ViewportState {
        container,
        display,
        zoom,
        backing: display.scaled(dpr),
    }
}
