//! Invaders - a minimal arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, particles, collisions, frame tick)
//! - `platform`: Window/clock/input/image boundary and a headless implementation
//! - `renderer`: Read-only frame snapshots and GPU-ready quad instances
//! - `tuning`: Data-driven gameplay constants
//! - `game`: The cooperative frame loop tying them together

pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use error::{PlatformError, PoolError, PoolKind, TuningError};
pub use game::{SessionStats, run};
pub use tuning::Tuning;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use sim::LehmerRng;

/// Game configuration constants
pub mod consts {
    /// Pool capacities
    pub const MAX_INVADERS: usize = 100;
    pub const MAX_BULLETS: usize = 200;
    pub const MAX_EMITTERS: usize = 200;
    pub const MAX_PARTICLES_PER_EMITTER: usize = 200;

    /// Pending input events before new ones are dropped
    pub const EVENT_QUEUE_CAPACITY: usize = 1000;

    /// Number of invader sprite variants
    pub const INVADER_SPRITE_COUNT: usize = 4;

    /// Half-extents of drawn quads (playfield units)
    pub const SHIP_DRAW_SIZE: f32 = 0.04;
    pub const BULLET_DRAW_SIZE: f32 = 0.02;
    pub const INVADER_DRAW_SIZE: f32 = 0.03;
}

/// Closed numeric interval, also used as a sampling range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Draw uniformly from the span
    #[inline]
    pub fn sample(&self, rng: &mut LehmerRng) -> f32 {
        rng.uniform_range(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    /// Clamp without panicking on an inverted span
    #[inline]
    pub fn clamp(&self, v: f32) -> f32 {
        if v < self.min {
            self.min
        } else if v > self.max {
            self.max
        } else {
            v
        }
    }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
