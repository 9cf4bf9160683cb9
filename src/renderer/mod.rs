//! Frame composition
//!
//! The renderer never mutates game state. `RenderFrame::capture` reads a
//! `GameState` after the tick and produces plain quad instances in draw
//! order: ship, bullets, invaders, then particles. A platform backend uploads
//! them as an instance buffer over a two-stop background gradient.

pub mod quad;

pub use quad::{NO_TEXTURE, QuadInstance, colors};

use glam::{Vec2, Vec4};

use crate::consts::{BULLET_DRAW_SIZE, INVADER_DRAW_SIZE, SHIP_DRAW_SIZE};
use crate::platform::Sprites;
use crate::sim::GameState;

/// Vertical background gradient across the playfield
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub bottom: Vec4,
    pub top: Vec4,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            bottom: colors::GRADIENT_BOTTOM,
            top: colors::GRADIENT_TOP,
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub clear_color: Vec4,
    pub gradient: Gradient,
    /// Playfield is [0,1] x [0,aspect]
    pub aspect: f32,
    pub ship: QuadInstance,
    pub bullets: Vec<QuadInstance>,
    pub invaders: Vec<QuadInstance>,
    pub particles: Vec<QuadInstance>,
}

impl RenderFrame {
    pub fn capture(state: &GameState, sprites: &Sprites) -> Self {
        let ship = QuadInstance::new(state.ship_pos, SHIP_DRAW_SIZE, sprites.ship, Vec4::ONE);

        let bullets = state
            .bullets
            .iter()
            .map(|b| QuadInstance::new(b.pos, BULLET_DRAW_SIZE, sprites.bullet, b.color))
            .collect();

        let invaders = state
            .invaders
            .iter()
            .map(|i| {
                QuadInstance::new(i.pos, INVADER_DRAW_SIZE, sprites.invader(i.sprite), Vec4::ONE)
            })
            .collect();

        let mut particles = Vec::with_capacity(state.emitters.particle_count());
        for (_, emitter) in state.emitters.iter() {
            for p in emitter.particles() {
                let alpha = emitter.particle_alpha(p);
                let color = p.color.truncate().extend(p.color.w * alpha);
                particles.push(QuadInstance::new(p.pos, p.size, sprites.contrail, color));
            }
        }

        Self {
            clear_color: colors::CLEAR,
            gradient: Gradient::default(),
            aspect: state.tuning.aspect(),
            ship,
            bullets,
            invaders,
            particles,
        }
    }

    /// All quads in draw order
    pub fn quads(&self) -> impl Iterator<Item = &QuadInstance> {
        std::iter::once(&self.ship)
            .chain(&self.bullets)
            .chain(&self.invaders)
            .chain(&self.particles)
    }

    pub fn quad_count(&self) -> usize {
        1 + self.bullets.len() + self.invaders.len() + self.particles.len()
    }

    /// Flatten into a contiguous instance list
    pub fn instances(&self) -> Vec<QuadInstance> {
        self.quads().copied().collect()
    }

    /// Background corners, bottom edge then top edge
    pub fn background(&self) -> [(Vec2, Vec4); 4] {
        let h = self.aspect;
        [
            (Vec2::new(0.0, 0.0), self.gradient.bottom),
            (Vec2::new(1.0, 0.0), self.gradient.bottom),
            (Vec2::new(1.0, h), self.gradient.top),
            (Vec2::new(0.0, h), self.gradient.top),
        ]
    }
}

/// Raw bytes of an instance list for buffer upload
pub fn as_bytes(instances: &[QuadInstance]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
