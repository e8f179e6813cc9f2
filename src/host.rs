//! Host-page seams: element lookup, frame display, progress rendering,
//! viewport metrics
//!
//! **Why**: The player drives an external display surface (think a DOM
//! image element) and reads ambient page state (scroll offset, layout
//! heights). Both are injected behind traits so the core runs headless -
//! tests and the demo binary supply their own implementations.
//!
//! **Used by**: Player (sink writes, metrics reads), Progress (surface
//! creation), scroll helpers (metrics reads)

use std::sync::Arc;

/// The target display surface: shows one frame source at a time.
///
/// Equivalent of setting an image element's `src` attribute. Writes are
/// synchronous; the player performs one write per scroll change or
/// autoplay tick, no debouncing.
pub trait FrameSink {
    /// Display the frame identified by `source`
    fn set_source(&self, source: &str);
}

/// A created progress-bar surface. Width is a percentage in 0..=100.
pub trait ProgressSurface {
    fn set_fill_percent(&self, percent: u32);
}

/// Visual parameters for the progress indicator.
///
/// Positioning is cosmetic; only height and fill color are part of the
/// functional contract.
#[derive(Debug, Clone)]
pub struct IndicatorStyle {
    /// Fixed bar height in pixels
    pub height_px: u32,
    /// Fill color (CSS-style string)
    pub color: String,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            height_px: 10,
            color: "#dadada".to_string(),
        }
    }
}

/// Element lookup and creation on the host page.
pub trait Host {
    /// Look up the target display surface by identifier.
    /// Returns None if no such element exists.
    fn frame_sink(&self, id: &str) -> Option<Arc<dyn FrameSink>>;

    /// Create a progress-bar surface next to the target element.
    /// `id` is the surface identifier (the player passes `{target}-progress`).
    fn create_progress_surface(
        &self,
        id: &str,
        style: &IndicatorStyle,
    ) -> Arc<dyn ProgressSurface>;
}

/// Read-only view of the host page's scroll state and layout.
///
/// All three reads are pure and safe to call at any time.
pub trait ViewportMetrics {
    /// Total height of the page content
    fn content_height(&self) -> f64;
    /// Height of the visible viewport
    fn viewport_height(&self) -> f64;
    /// Current vertical scroll offset from the top
    fn scroll_offset(&self) -> f64;
}
