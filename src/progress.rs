//! Preload progress indicator
//!
//! A single bar per player, explicitly created through the [`Host`] and
//! reused thereafter (first creation wins). Width percentage is driven
//! solely by preload progress; setting it before creation is a usage
//! error.

use log::trace;
use std::sync::Arc;

use crate::error::PlayerError;
use crate::host::{Host, IndicatorStyle, ProgressSurface};

/// Handle to the player's progress bar surface.
pub struct ProgressIndicator {
    /// Surface id, `{target}-progress` by convention
    id: String,
    style: IndicatorStyle,
    surface: Option<Arc<dyn ProgressSurface>>,
}

impl ProgressIndicator {
    pub fn new(target_id: &str, style: IndicatorStyle) -> Self {
        Self {
            id: format!("{}-progress", target_id),
            style,
            surface: None,
        }
    }

    /// Create the bar surface on the host page.
    ///
    /// Idempotent: the first creation wins, later calls silently reuse
    /// the existing surface.
    pub fn create(&mut self, host: &dyn Host) -> &Arc<dyn ProgressSurface> {
        if self.surface.is_none() {
            trace!("Creating progress surface '{}'", self.id);
        }
        self.surface
            .get_or_insert_with(|| host.create_progress_surface(&self.id, &self.style))
    }

    pub fn is_created(&self) -> bool {
        self.surface.is_some()
    }

    /// Set the fill width. Fails if the bar was never created.
    pub fn set_percent(&self, percent: u32) -> Result<(), PlayerError> {
        let surface = self.surface.as_ref().ok_or_else(|| {
            PlayerError::NotInitialized(format!(
                "progress bar '{}' not created yet",
                self.id
            ))
        })?;
        surface.set_fill_percent(percent.min(100));
        Ok(())
    }
}
