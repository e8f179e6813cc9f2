//! SCROLLPLAY - Scroll-driven image sequence player
//!
//! Maps a page's scroll position onto an ordered list of preloaded image
//! sources, producing a scrubbable animation as the user scrolls. Also
//! supports a fixed-rate autoplay loop and a preload progress indicator.
//!
//! The host page (element lookup, frame display, scroll metrics, image
//! loading) is injected behind traits in [`host`] and [`preload`], so the
//! core runs headless.

pub mod cli;
pub mod error;
pub mod host;
pub mod player;
pub mod preload;
pub mod progress;
pub mod scroll;
pub mod sequence;
pub mod workers;

// Re-export the primary surface
pub use error::PlayerError;
pub use player::{PlayerOptions, ScrollPlayer};
pub use preload::{FileLoader, LoadFailurePolicy, Preload, PreloadEvent, SourceLoader};
pub use scroll::{ScrollEvents, ScrollUnit, frame_index_for, linear_map, scroll_fraction};
pub use sequence::FrameSequence;
