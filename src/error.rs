//! Error kinds for player construction and preload
//!
//! Configuration and NotInitialized are programmer errors: surfaced
//! synchronously, expected to abort the surrounding initialization.
//! Load is the only operational class - how it propagates is governed
//! by the configured [`LoadFailurePolicy`](crate::preload::LoadFailurePolicy).

/// Errors produced by [`ScrollPlayer`](crate::player::ScrollPlayer) and friends
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerError {
    /// Target element lookup failed at construction
    Configuration(String),
    /// Progress indicator mutated before it was created
    NotInitialized(String),
    /// An image source failed to load (or timed out)
    Load { source: String, reason: String },
}

impl std::fmt::Display for PlayerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            PlayerError::NotInitialized(msg) => write!(f, "Not initialized: {}", msg),
            PlayerError::Load { source, reason } => {
                write!(f, "Load error for '{}': {}", source, reason)
            }
        }
    }
}

impl std::error::Error for PlayerError {}
