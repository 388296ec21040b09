//! Viewport scaling: fitting the fixed-size page into its container and
//! converting between screen and document coordinates.
//!
//! The scale is uniform (no independent x/y scaling) and applied by the
//! shell around [`TRANSFORM_ORIGIN`], the top centre of the page.

use serde::{Deserialize, Serialize};

use crate::{Point, Size};

/// Largest scale auto-fit will pick.
pub const FIT_MAX_SCALE: f32 = 1.5;

/// Smallest scale auto-fit will pick on wide viewports.
pub const FIT_MIN_SCALE: f32 = 0.3;

/// Safety margin applied to fit-to-width on narrow viewports.
pub const NARROW_FIT_MARGIN: f32 = 0.95;

/// Manual zoom increment.
pub const ZOOM_STEP: f32 = 0.1;

/// Lower bound for manual zoom.
pub const ZOOM_MIN: f32 = 0.2;

/// Upper bound for manual zoom.
pub const ZOOM_MAX: f32 = 3.0;

/// Window widths below this (in CSS pixels) count as narrow.
pub const NARROW_BREAKPOINT: f32 = 768.0;

/// CSS transform origin the scale is applied around.
pub const TRANSFORM_ORIGIN: &str = "top center";

/// Whether a window of the given width uses the narrow fitting rules.
#[must_use]
pub fn is_narrow(window_width: f32) -> bool {
    window_width < NARROW_BREAKPOINT
}

/// Scale that fits `page` into `container`.
///
/// Narrow viewports fit to width with a 5% margin and no lower clamp;
/// wide viewports fit both axes and clamp to [`FIT_MIN_SCALE`]. Both cap
/// at [`FIT_MAX_SCALE`].
///
/// Returns `None` when the container has not been laid out yet (zero or
/// non-finite size) or the page is degenerate.
#[must_use]
pub fn fit_scale(container: Size, page: Size, narrow: bool) -> Option<f32> {
    if !container.is_valid() || container.is_empty() || !page.is_valid() || page.is_empty() {
        return None;
    }

    let scale = if narrow {
        (container.width / page.width * NARROW_FIT_MARGIN).min(FIT_MAX_SCALE)
    } else {
        let fit = (container.width / page.width).min(container.height / page.height);
        fit.clamp(FIT_MIN_SCALE, FIT_MAX_SCALE)
    };
    Some(scale)
}

/// Per-session viewport state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Document-to-screen multiplier.
    scale: f32,
    /// Whether the scale follows the container size.
    auto_fit: bool,
    /// Last known container size (inner, after padding).
    container: Option<Size>,
    /// Whether the last resize reported a narrow window.
    narrow: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewport {
    /// A 1:1 viewport with auto-fit enabled and no container yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scale: 1.0,
            auto_fit: true,
            container: None,
            narrow: false,
        }
    }

    /// Current scale.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Whether auto-fit is enabled.
    #[must_use]
    pub const fn auto_fit(&self) -> bool {
        self.auto_fit
    }

    /// Last known container size.
    #[must_use]
    pub const fn container(&self) -> Option<Size> {
        self.container
    }

    /// Record a new container size and refit if auto-fit is on.
    ///
    /// Returns `true` if the scale was recomputed.
    pub fn resize(&mut self, container: Size, narrow: bool, page: Size) -> bool {
        self.container = Some(container);
        self.narrow = narrow;
        self.refit(page)
    }

    /// The page size changed (orientation toggle). Refits if auto-fit is on.
    pub fn page_changed(&mut self, page: Size) -> bool {
        self.refit(page)
    }

    /// Re-enable auto-fit and recompute immediately.
    pub fn fit_to_screen(&mut self, page: Size) -> bool {
        self.auto_fit = true;
        self.refit(page)
    }

    /// Zoom in one step. Disables auto-fit.
    pub fn zoom_in(&mut self) -> f32 {
        self.zoom_by(ZOOM_STEP)
    }

    /// Zoom out one step. Disables auto-fit.
    pub fn zoom_out(&mut self) -> f32 {
        self.zoom_by(-ZOOM_STEP)
    }

    /// Convert a screen point to document space given the canvas origin on screen.
    #[must_use]
    pub fn screen_to_document(&self, screen: Point, canvas_origin: Point) -> Point {
        Point::new(
            (screen.x - canvas_origin.x) / self.scale,
            (screen.y - canvas_origin.y) / self.scale,
        )
    }

    /// Convert a document point to screen space given the canvas origin on screen.
    #[must_use]
    pub fn document_to_screen(&self, document: Point, canvas_origin: Point) -> Point {
        Point::new(
            document.x * self.scale + canvas_origin.x,
            document.y * self.scale + canvas_origin.y,
        )
    }

    fn zoom_by(&mut self, delta: f32) -> f32 {
        self.auto_fit = false;
        self.scale = (self.scale + delta).clamp(ZOOM_MIN, ZOOM_MAX);
        tracing::debug!(scale = self.scale, "Manual zoom");
        self.scale
    }

    fn refit(&mut self, page: Size) -> bool {
        if !self.auto_fit {
            return false;
        }
        let Some(container) = self.container else {
            return false;
        };
        match fit_scale(container, page, self.narrow) {
            Some(scale) => {
                self.scale = scale;
                tracing::debug!(scale, narrow = self.narrow, "Auto-fit scale recomputed");
                true
            }
            None => {
                tracing::trace!("Container not laid out yet; keeping scale {}", self.scale);
                false
            }
        }
    }
}
