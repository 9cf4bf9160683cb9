//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - One seeded `LehmerRng` drives every gameplay draw
//! - Time only enters through the `dt` handed to `tick`
//! - No rendering or platform dependencies beyond the input event types

pub mod collision;
pub mod particles;
pub mod pool;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::first_invader_hit;
pub use particles::{EmitterConfig, EmitterId, EmitterOverride, EmitterPool, Particle, ParticleEmitter};
pub use pool::FixedPool;
pub use rng::LehmerRng;
pub use state::{
    Bullet, BulletFate, GameEvent, GameState, HeldKeys, Invader, InvaderState,
};
pub use tick::{TickOutcome, step_bullets, step_invaders, tick};
