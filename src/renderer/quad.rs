//! Quad instance type for sprite rendering

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

use crate::platform::TextureHandle;

/// Texture slot meaning "no sprite, draw a flat placeholder"
pub const NO_TEXTURE: u32 = u32::MAX;

/// One camera-facing textured quad, laid out for a GPU instance buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadInstance {
    pub center: [f32; 2],
    pub half_size: f32,
    pub texture: u32,
    pub color: [f32; 4],
}

impl QuadInstance {
    pub fn new(center: Vec2, half_size: f32, sprite: Option<TextureHandle>, color: Vec4) -> Self {
        Self {
            center: center.to_array(),
            half_size,
            texture: sprite.map_or(NO_TEXTURE, |t| t.0),
            color: color.to_array(),
        }
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        (self.texture != NO_TEXTURE).then_some(TextureHandle(self.texture))
    }
}

/// Colors for frame composition
pub mod colors {
    use glam::Vec4;

    pub const CLEAR: Vec4 = Vec4::new(0.05, 0.05, 0.05, 1.0);
    pub const GRADIENT_BOTTOM: Vec4 =
        Vec4::new(0.0, 89.0 / 255.0 * 0.7, 131.0 / 255.0 * 0.7, 1.0);
    pub const GRADIENT_TOP: Vec4 =
        Vec4::new(40.0 / 255.0 * 0.3, 49.0 / 255.0 * 0.3, 95.0 / 255.0 * 0.3, 1.0);
}
