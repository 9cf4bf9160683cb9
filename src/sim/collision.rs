//! Bullet versus invader collision
//!
//! Invaders are circles of a shared radius; bullets are points. The first
//! overlapping invader in pool order wins. Pool order is swap-compacted, so
//! when two invaders overlap one bullet the winner is not tied to spawn order.

use glam::Vec2;

use super::pool::FixedPool;
use super::state::Invader;

/// Index of the first invader whose centre lies strictly within `radius` of `point`
pub fn first_invader_hit(point: Vec2, invaders: &FixedPool<Invader>, radius: f32) -> Option<usize> {
    invaders
        .iter()
        .position(|invader| point.distance(invader.pos) < radius)
}
