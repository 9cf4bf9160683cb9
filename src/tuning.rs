//! Data-driven game balance
//!
//! Every gameplay constant lives in `Tuning`. A JSON file may override any
//! subset of fields; missing fields keep their defaults.

use std::fs;
use std::path::Path;

use glam::Vec2;
use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize};

use crate::Span;
use crate::consts::MAX_INVADERS;
use crate::error::TuningError;
use crate::sim::particles::{EmitterConfig, EmitterOverride};
use crate::sim::rng::DEFAULT_SEED;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Gameplay RNG seed
    pub seed: i32,

    // === Window ===
    pub window_width: u32,
    pub window_height: u32,
    /// Pause between frames
    pub frame_sleep_ms: u64,
    /// Upper bound on a wall-clock frame delta
    pub max_frame_dt: f32,

    // === Invaders ===
    pub desired_invaders: usize,
    pub invader_speed: f32,
    /// Collision radius against bullets
    pub invader_radius: f32,
    /// Distance under which a seeking invader has arrived
    pub arrival_epsilon: f32,
    /// Pause after arriving, in seconds
    pub invader_sleep: Span,
    pub invader_spawn_height: f32,
    /// Targets keep this far from the left/right edges
    pub target_border: f32,
    pub target_y: Span,

    // === Bullets ===
    pub bullet_speed: f32,
    /// Horizontal offset of each twin bullet from the ship centre
    pub bullet_offset: f32,
    /// Bullets outside this vertical band are removed
    pub live_y: Span,

    // === Ship ===
    pub ship_speed: f32,
    pub ship_start: Vec2,
    pub ship_x: Span,
    pub ship_y: Span,

    // === Effects ===
    #[serde(deserialize_with = "explosion_overlay")]
    pub explosion: EmitterConfig,
    #[serde(deserialize_with = "trail_overlay")]
    pub trail: EmitterConfig,
}

fn explosion_overlay<'de, D: Deserializer<'de>>(d: D) -> Result<EmitterConfig, D::Error> {
    Ok(EmitterOverride::deserialize(d)?.apply(EmitterConfig::explosion()))
}

fn trail_overlay<'de, D: Deserializer<'de>>(d: D) -> Result<EmitterConfig, D::Error> {
    Ok(EmitterOverride::deserialize(d)?.apply(EmitterConfig::trail()))
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,

            window_width: 800,
            window_height: 600,
            frame_sleep_ms: 5,
            max_frame_dt: 0.25,

            desired_invaders: 15,
            invader_speed: 0.3,
            invader_radius: 0.03,
            arrival_epsilon: 0.005,
            invader_sleep: Span::new(0.1, 1.5),
            invader_spawn_height: 0.8,
            target_border: 0.05,
            target_y: Span::new(0.2, 0.7),

            bullet_speed: 0.4,
            bullet_offset: 0.023,
            live_y: Span::new(-0.1, 1.0),

            ship_speed: 0.3,
            ship_start: Vec2::new(0.5, 0.1),
            ship_x: Span::new(0.01, 0.99),
            ship_y: Span::new(0.02, 0.15),

            explosion: EmitterConfig::explosion(),
            trail: EmitterConfig::trail(),
        }
    }
}

impl Tuning {
    /// Playfield height for a [0,1] x [0,aspect] projection
    pub fn aspect(&self) -> f32 {
        if self.window_width == 0 {
            return 1.0;
        }
        self.window_height as f32 / self.window_width as f32
    }

    /// Horizontal range for invader targets
    pub fn target_x(&self) -> Span {
        Span::new(self.target_border, 1.0 - self.target_border)
    }

    /// Parse from JSON text
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Keep the desired invader count admissible
    pub(crate) fn sanitized(mut self) -> Self {
        if self.desired_invaders > MAX_INVADERS {
            warn!(
                "desired_invaders {} exceeds pool capacity, clamping to {}",
                self.desired_invaders, MAX_INVADERS
            );
            self.desired_invaders = MAX_INVADERS;
        }
        self
    }
}
