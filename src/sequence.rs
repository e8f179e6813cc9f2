//! Frame sequence: ordered image sources with clamped indexed access
//!
//! **Why**: The player scrubs through an ordered list of image source
//! identifiers. Order is fixed at construction; every index access is
//! clamped so scroll math can never read out of bounds.
//!
//! **Used by**: Player (frame selection), Preload (request list),
//! demo binary (filesystem discovery)
//!
//! # Discovery
//!
//! Numbered sequences on disk (render.0001.png, render.0002.png...) are
//! discovered from a glob pattern or a directory scan. Ordering is
//! numeric-aware: the last run of digits in the file stem is the frame
//! number, so `frame.10.png` sorts after `frame.2.png`.

use log::{debug, info};
use regex::Regex;
use std::path::Path;

use crate::error::PlayerError;

/// Extensions considered frame images during directory discovery
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "tga"];

/// Ordered, immutable-after-construction list of frame sources.
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    sources: Vec<String>,
}

impl FrameSequence {
    /// Build a sequence from explicit sources, preserving order.
    ///
    /// An empty list is tolerated: the resulting player is non-functional
    /// but constructible.
    pub fn new(sources: Vec<String>) -> Self {
        Self { sources }
    }

    /// Discover a numbered sequence from a glob pattern or directory.
    pub fn discover(pattern: &str) -> Result<Self, PlayerError> {
        let path = Path::new(pattern);
        let mut sources: Vec<String> = if path.is_dir() {
            let entries = std::fs::read_dir(path).map_err(|e| PlayerError::Load {
                source: pattern.to_string(),
                reason: e.to_string(),
            })?;
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| {
                    p.extension()
                        .and_then(|ext| ext.to_str())
                        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                        .unwrap_or(false)
                })
                .map(|p| p.to_string_lossy().to_string())
                .collect()
        } else {
            glob::glob(pattern)
                .map_err(|e| PlayerError::Load {
                    source: pattern.to_string(),
                    reason: e.to_string(),
                })?
                .filter_map(|entry| entry.ok())
                .map(|p| p.to_string_lossy().to_string())
                .collect()
        };

        order_sources(&mut sources);
        info!("Discovered {} frames for '{}'", sources.len(), pattern);
        debug!("First frame: {:?}", sources.first());
        Ok(Self { sources })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// All sources in order (preload iterates this).
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Clamp an index into [0, len-1]. Meaningless for an empty sequence.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.sources.len().saturating_sub(1))
    }

    /// Source at `index`, clamped to the valid range. None when empty.
    pub fn source_at(&self, index: usize) -> Option<&str> {
        if self.sources.is_empty() {
            return None;
        }
        Some(self.sources[self.clamp_index(index)].as_str())
    }
}

/// Sort sources by trailing frame number, falling back to lexical order.
///
/// The frame number is the last run of digits before the extension;
/// sources without one sort ahead of numbered ones with the same prefix.
pub fn order_sources(sources: &mut [String]) {
    let re = Regex::new(r"(\d+)(?:\.[A-Za-z0-9]+)?$").expect("frame number regex");
    let frame_num = |s: &str| -> Option<u64> {
        re.captures(s)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
    };
    sources.sort_by(|a, b| match (frame_num(a), frame_num(b)) {
        (Some(na), Some(nb)) => na.cmp(&nb).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    });
}
