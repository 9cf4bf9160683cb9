//! Particle emitters
//!
//! An emitter is a timed particle source. It produces particles at a fixed
//! rate while `producing`, keeps simulating the ones already alive after it
//! stops, and is reclaimed once it has stopped and its last particle expired.

use std::f32::consts::TAU;

use glam::{Vec2, Vec4};
use log::trace;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};

use super::pool::FixedPool;
use super::rng::LehmerRng;
use crate::consts::{MAX_EMITTERS, MAX_PARTICLES_PER_EMITTER};
use crate::error::{PoolError, PoolKind};
use crate::{Span, polar_to_cartesian};

/// A single visual particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Half-extent of the drawn quad
    pub size: f32,
    /// Per-step velocity multiplier
    pub drag: f32,
    pub lifetime: f32,
    pub elapsed: f32,
    pub color: Vec4,
}

impl Particle {
    /// Move, damp, age
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel *= self.drag;
        self.elapsed += dt;
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.elapsed > self.lifetime
    }

    /// Opacity during the last `fadeout_period` seconds of life
    pub fn alpha(&self, fadeout_period: f32) -> f32 {
        let tail_time = self.lifetime - self.elapsed;
        if fadeout_period <= 0.0 {
            return if tail_time < 0.0 { 0.0 } else { 1.0 };
        }
        if tail_time < fadeout_period {
            (tail_time / fadeout_period).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Production parameters of an emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub particles_per_second: f32,
    /// Seconds over which a particle fades out before expiring
    pub fadeout_period: f32,
    pub speed: Span,
    pub size: Span,
    pub drag: Span,
    pub lifetime: Span,
    /// Emission angle range in radians
    pub theta: Span,
    /// Gradient endpoints; each particle picks a random point between them
    pub color0: Vec4,
    pub color1: Vec4,
    /// Seconds of production; negative means produce until stopped
    pub emitter_lifetime: f32,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            particles_per_second: 150.0,
            fadeout_period: 0.1,
            speed: Span::new(0.0, 0.1),
            size: Span::new(0.001, 0.005),
            drag: Span::new(0.9999, 0.9),
            lifetime: Span::new(0.4, 1.0),
            theta: Span::new(0.0, TAU),
            color0: Vec4::ZERO,
            color1: Vec4::ZERO,
            emitter_lifetime: -1.0,
        }
    }
}

impl EmitterConfig {
    /// Radial white-to-orange burst left behind by a destroyed invader
    pub fn explosion() -> Self {
        Self {
            size: Span::new(0.01, 0.04),
            color0: Vec4::ONE,
            color1: Vec4::new(1.0, 0.7, 0.1, 1.0),
            fadeout_period: 0.3,
            emitter_lifetime: 0.3,
            ..Self::default()
        }
    }

    /// Narrow downward cone streaming behind a bullet
    pub fn trail() -> Self {
        Self {
            theta: Span::new(TAU * 0.6, TAU * 0.9),
            drag: Span::new(0.9, 0.97),
            color0: Vec4::ONE,
            color1: Vec4::new(0.1, 0.1, 0.1, 1.0),
            ..Self::default()
        }
    }
}

/// Partial emitter settings layered over a preset
///
/// Fields left out of the JSON keep the preset's value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmitterOverride {
    pub particles_per_second: Option<f32>,
    pub fadeout_period: Option<f32>,
    pub speed: Option<Span>,
    pub size: Option<Span>,
    pub drag: Option<Span>,
    pub lifetime: Option<Span>,
    pub theta: Option<Span>,
    pub color0: Option<Vec4>,
    pub color1: Option<Vec4>,
    pub emitter_lifetime: Option<f32>,
}

impl EmitterOverride {
    pub fn apply(self, base: EmitterConfig) -> EmitterConfig {
        EmitterConfig {
            particles_per_second: self
                .particles_per_second
                .unwrap_or(base.particles_per_second),
            fadeout_period: self.fadeout_period.unwrap_or(base.fadeout_period),
            speed: self.speed.unwrap_or(base.speed),
            size: self.size.unwrap_or(base.size),
            drag: self.drag.unwrap_or(base.drag),
            lifetime: self.lifetime.unwrap_or(base.lifetime),
            theta: self.theta.unwrap_or(base.theta),
            color0: self.color0.unwrap_or(base.color0),
            color1: self.color1.unwrap_or(base.color1),
            emitter_lifetime: self.emitter_lifetime.unwrap_or(base.emitter_lifetime),
        }
    }
}

/// A live particle source
#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    pub pos: Vec2,
    pub vel: Vec2,
    config: EmitterConfig,
    particles: FixedPool<Particle>,
    /// Remaining production time (negative = unlimited)
    lifetime_left: f32,
    elapsed: f32,
    /// Time not yet converted into particles
    remainder: f32,
    producing: bool,
}

impl ParticleEmitter {
    pub fn new(config: &EmitterConfig, pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            config: config.clone(),
            particles: FixedPool::new(PoolKind::Particles, MAX_PARTICLES_PER_EMITTER),
            lifetime_left: config.emitter_lifetime,
            elapsed: 0.0,
            remainder: 0.0,
            producing: true,
        }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        self.particles.as_slice()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn is_producing(&self) -> bool {
        self.producing
    }

    /// Still producing, or still has particles to show
    pub fn is_alive(&self) -> bool {
        self.producing || !self.particles.is_empty()
    }

    /// Stop producing; existing particles finish their lives
    pub fn stop(&mut self) {
        self.producing = false;
    }

    /// Opacity of `particle` under this emitter's fade-out period
    pub fn particle_alpha(&self, particle: &Particle) -> f32 {
        particle.alpha(self.config.fadeout_period)
    }

    /// Emit one particle at the emitter position.
    ///
    /// Draw order (size, drag, lifetime, color, speed, angle) is part of the
    /// reproducible sequence and must not change.
    pub fn spawn_particle(&mut self, rng: &mut LehmerRng) -> Result<&mut Particle, PoolError> {
        if self.particles.is_full() {
            return Err(PoolError::Exhausted {
                pool: PoolKind::Particles,
                capacity: self.particles.capacity(),
            });
        }

        let cfg = &self.config;
        let size = cfg.size.sample(rng);
        let drag = cfg.drag.sample(rng);
        let lifetime = cfg.lifetime.sample(rng);
        let color_t = rng.uniform_range(0.0, 1.0);
        let speed = cfg.speed.sample(rng);
        let theta = cfg.theta.sample(rng);

        let particle = Particle {
            pos: self.pos,
            vel: self.vel + polar_to_cartesian(speed, theta),
            size,
            drag,
            lifetime,
            elapsed: 0.0,
            color: cfg.color0.lerp(cfg.color1, color_t),
        };
        self.particles.push(particle)
    }

    /// Advance one frame. Returns false once the emitter should be reclaimed.
    pub fn step(&mut self, dt: f32, rng: &mut LehmerRng) -> bool {
        self.particles.sweep(|p| {
            p.integrate(dt);
            p.is_expired()
        });

        self.elapsed += dt;
        self.remainder += dt;

        if self.lifetime_left >= 0.0 {
            self.lifetime_left -= dt;
            if self.lifetime_left < 0.0 {
                self.producing = false;
            }
        }

        if self.producing {
            self.produce(rng);
            true
        } else {
            !self.particles.is_empty()
        }
    }

    /// Convert accumulated time into particles, each aged by the time left
    /// over after its spawn point so emission is continuous across frames
    fn produce(&mut self, rng: &mut LehmerRng) {
        if self.config.particles_per_second <= 0.0 {
            return;
        }
        let dt_per_particle = 1.0 / self.config.particles_per_second;

        while self.remainder > dt_per_particle {
            self.remainder -= dt_per_particle;
            let leftover = self.remainder;
            match self.spawn_particle(rng) {
                Ok(p) => p.integrate(leftover),
                Err(err) => trace!("dropping particle: {err}"),
            }
        }
    }
}

new_key_type! {
    /// Generation-tagged handle to a live emitter
    pub struct EmitterId;
}

/// Fixed-capacity set of live emitters
#[derive(Debug, Clone)]
pub struct EmitterPool {
    slots: SlotMap<EmitterId, ParticleEmitter>,
    capacity: usize,
}

impl Default for EmitterPool {
    fn default() -> Self {
        Self::new(MAX_EMITTERS)
    }
}

impl EmitterPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Start a new emitter in a free slot
    pub fn spawn(
        &mut self,
        config: &EmitterConfig,
        pos: Vec2,
        vel: Vec2,
    ) -> Result<EmitterId, PoolError> {
        if self.slots.len() >= self.capacity {
            return Err(PoolError::Exhausted {
                pool: PoolKind::Emitters,
                capacity: self.capacity,
            });
        }
        Ok(self.slots.insert(ParticleEmitter::new(config, pos, vel)))
    }

    pub fn get(&self, id: EmitterId) -> Option<&ParticleEmitter> {
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: EmitterId) -> Option<&mut ParticleEmitter> {
        self.slots.get_mut(id)
    }

    pub fn contains(&self, id: EmitterId) -> bool {
        self.slots.contains_key(id)
    }

    /// Move an emitter along with its owner
    pub fn follow(&mut self, id: EmitterId, pos: Vec2, vel: Vec2) {
        if let Some(emitter) = self.slots.get_mut(id) {
            emitter.pos = pos;
            emitter.vel = vel;
        }
    }

    /// Stop production; returns false for a stale handle
    pub fn stop(&mut self, id: EmitterId) -> bool {
        match self.slots.get_mut(id) {
            Some(emitter) => {
                emitter.stop();
                true
            }
            None => false,
        }
    }

    /// Step every emitter and reclaim the finished ones
    pub fn step(&mut self, dt: f32, rng: &mut LehmerRng) {
        self.slots.retain(|_, emitter| emitter.step(dt, rng));
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmitterId, &ParticleEmitter)> {
        self.slots.iter()
    }

    /// Total live particles across all emitters
    pub fn particle_count(&self) -> usize {
        self.slots.values().map(ParticleEmitter::particle_count).sum()
    }
}
