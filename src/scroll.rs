//! Scroll measurement and range conversion
//!
//! **Why**: Frame selection is a linear mapping from normalized scroll
//! progress onto sequence indices. The math lives here as pure functions
//! over an injected [`ViewportMetrics`] so it is testable without a real
//! rendering surface.
//!
//! **Used by**: Player (frame selection), ScrollEvents (change stream)
//!
//! # Mapping
//!
//! fraction = clamp(offset / extent, 0, 1), rounded to two decimals.
//! index    = round(linear_map(fraction, [0,1], [0, len-1]))
//!
//! A page with no scrollable content (extent <= 0) yields fraction 0
//! rather than NaN.

use crate::host::ViewportMetrics;

/// General-purpose affine range converter.
///
/// Maps `value` from the source range `(a, b)` onto the target range
/// `(c, d)`: `(value - a) * (d - c) / (b - a) + c`. Values outside the
/// source range extrapolate; callers clamp when they need saturation.
///
/// # Panics
///
/// A degenerate source range (`a == b`) is a caller error and panics.
pub fn linear_map(value: f64, source: (f64, f64), target: (f64, f64)) -> f64 {
    let (a, b) = source;
    let (c, d) = target;
    assert!(a != b, "linear_map: degenerate source range [{}, {}]", a, b);
    (value - a) * (d - c) / (b - a) + c
}

/// Total scrollable height: content minus viewport. May be <= 0 for
/// pages shorter than the viewport.
pub fn max_scroll_extent(metrics: &dyn ViewportMetrics) -> f64 {
    metrics.content_height() - metrics.viewport_height()
}

/// Current vertical scroll offset from the page top.
pub fn scroll_position(metrics: &dyn ViewportMetrics) -> f64 {
    metrics.scroll_offset()
}

/// Normalized scroll progress in [0, 1], rounded to two decimals.
///
/// Zero or negative extent means nothing to scroll: returns 0.0.
pub fn scroll_fraction(metrics: &dyn ViewportMetrics) -> f64 {
    let extent = max_scroll_extent(metrics);
    if extent <= 0.0 {
        return 0.0;
    }
    let fraction = (scroll_position(metrics) / extent).clamp(0.0, 1.0);
    (fraction * 100.0).round() / 100.0
}

/// Map a scroll fraction onto a frame index for a sequence of `len`
/// frames. Result is clamped to [0, len-1].
///
/// # Panics
///
/// Panics on an empty sequence (`len == 0`); callers guard the empty
/// case before selecting frames.
pub fn frame_index_for(fraction: f64, len: usize) -> usize {
    assert!(len >= 1, "frame_index_for: empty sequence");
    if len == 1 {
        return 0;
    }
    let mapped = linear_map(fraction, (0.0, 1.0), (0.0, (len - 1) as f64));
    (mapped.round().max(0.0) as usize).min(len - 1)
}

/// What a [`ScrollEvents`] stream emits on each change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollUnit {
    /// Raw offset in page units
    Position,
    /// Normalized [0, 1] fraction
    Fraction,
}

/// Cold unicast change stream over the viewport's scroll state.
///
/// Each instance is an independent subscription: it remembers the last
/// value it emitted and reports a new one only when the observed value
/// differs. Poll it from the host's event loop (the player does this in
/// `update()`); drop it to detach.
pub struct ScrollEvents {
    metrics: std::sync::Arc<dyn ViewportMetrics>,
    unit: ScrollUnit,
    last: Option<f64>,
}

impl ScrollEvents {
    pub fn new(metrics: std::sync::Arc<dyn ViewportMetrics>, unit: ScrollUnit) -> Self {
        Self {
            metrics,
            unit,
            last: None,
        }
    }

    /// Observe the current value; Some on first poll and on every change.
    pub fn poll(&mut self) -> Option<f64> {
        let value = match self.unit {
            ScrollUnit::Position => scroll_position(self.metrics.as_ref()),
            ScrollUnit::Fraction => scroll_fraction(self.metrics.as_ref()),
        };
        if self.last == Some(value) {
            return None;
        }
        self.last = Some(value);
        Some(value)
    }
}
