//! Error types
//!
//! Pool exhaustion is reported, never panicked on: callers drop the spawn
//! request and keep simulating.

use std::fmt;

/// Which fixed-capacity pool rejected an insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolKind {
    Invaders,
    Bullets,
    Emitters,
    Particles,
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKind::Invaders => write!(f, "invader"),
            PoolKind::Bullets => write!(f, "bullet"),
            PoolKind::Emitters => write!(f, "emitter"),
            PoolKind::Particles => write!(f, "particle"),
        }
    }
}

/// Fixed-capacity pool errors
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// Every slot is live
    #[error("{pool} pool exhausted (capacity {capacity})")]
    Exhausted { pool: PoolKind, capacity: usize },
}

/// Errors raised across the platform boundary
#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    /// Window or GL context could not be created
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    /// Image missing or undecodable
    #[error("failed to load image {path}: {reason}")]
    ImageLoad { path: String, reason: String },
}

/// Tuning file errors
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
