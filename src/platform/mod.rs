//! Platform abstraction layer
//!
//! The simulation never touches the OS directly. Window creation, clock,
//! input pump, image decoding and drawing all go through `Platform`:
//! - Time: `now_seconds` (monotonic) and `sleep_ms`
//! - Input: `poll_platform_events` fills the `EventQueue` the tick drains
//! - Assets: `load_image` + `upload_texture`, used once at startup
//! - Output: `clear_frame`, `draw_frame`, `present_frame`

pub mod headless;
pub mod input;

pub use headless::{HeadlessPlatform, InputScript, RandomPilot};
pub use input::{Event, EventQueue, KeyCode};

use glam::Vec4;
use log::{info, warn};

use crate::consts::INVADER_SPRITE_COUNT;
use crate::error::PlatformError;
use crate::renderer::RenderFrame;

/// Decoded RGBA image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Opaque GPU texture id handed out by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Services the host provides to the game
pub trait Platform {
    fn create_window(&mut self, width: u32, height: u32) -> Result<(), PlatformError>;

    fn clear_frame(&mut self, color: Vec4);

    /// Draw a captured frame as camera-facing quads
    fn draw_frame(&mut self, frame: &RenderFrame);

    fn present_frame(&mut self);

    /// Pump OS messages, translating input into `events`.
    /// Returns true when the OS asked the application to exit.
    fn poll_platform_events(&mut self, events: &mut EventQueue) -> bool;

    fn sleep_ms(&mut self, ms: u64);

    /// Monotonic clock in seconds
    fn now_seconds(&self) -> f64;

    fn load_image(&mut self, path: &str) -> Result<Image, PlatformError>;

    fn upload_texture(&mut self, image: &Image) -> TextureHandle;
}

/// Sprite files loaded at startup
pub const SHIP_SPRITE: &str = "ship.png";
pub const BULLET_SPRITE: &str = "bullet.png";
pub const CONTRAIL_SPRITE: &str = "contrail.png";
pub const INVADER_SPRITES: [&str; INVADER_SPRITE_COUNT] = ["bug1.png", "bug2.png", "bug3.png", "bug4.png"];

/// Uploaded sprite textures; `None` where the image failed to load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sprites {
    pub ship: Option<TextureHandle>,
    pub bullet: Option<TextureHandle>,
    pub contrail: Option<TextureHandle>,
    pub invaders: [Option<TextureHandle>; INVADER_SPRITE_COUNT],
}

impl Sprites {
    /// Load and upload every sprite, leaving failures unset
    pub fn load<P: Platform + ?Sized>(platform: &mut P) -> Self {
        let mut sprites = Self {
            ship: load_sprite(platform, SHIP_SPRITE),
            bullet: load_sprite(platform, BULLET_SPRITE),
            contrail: load_sprite(platform, CONTRAIL_SPRITE),
            invaders: [None; INVADER_SPRITE_COUNT],
        };
        for (slot, path) in sprites.invaders.iter_mut().zip(INVADER_SPRITES) {
            *slot = load_sprite(platform, path);
        }
        info!("Loaded {}/{} sprites", sprites.loaded_count(), 3 + INVADER_SPRITE_COUNT);
        sprites
    }

    /// Sprite for an invader variant
    pub fn invader(&self, index: usize) -> Option<TextureHandle> {
        self.invaders.get(index).copied().flatten()
    }

    pub fn loaded_count(&self) -> usize {
        [self.ship, self.bullet, self.contrail]
            .iter()
            .chain(self.invaders.iter())
            .filter(|s| s.is_some())
            .count()
    }
}

fn load_sprite<P: Platform + ?Sized>(platform: &mut P, path: &str) -> Option<TextureHandle> {
    match platform.load_image(path) {
        Ok(image) => Some(platform.upload_texture(&image)),
        Err(err) => {
            warn!("{err}; drawing placeholder instead");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_images_leave_sprites_unset() {
        let image = Image {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        };
        let mut platform = HeadlessPlatform::new().with_image(SHIP_SPRITE, image.clone());
        platform.register_image("bug3.png", image);

        let sprites = Sprites::load(&mut platform);
        assert!(sprites.ship.is_some());
        assert!(sprites.bullet.is_none());
        assert!(sprites.invader(2).is_some());
        assert!(sprites.invader(0).is_none());
        assert!(sprites.invader(99).is_none());
        assert_eq!(sprites.loaded_count(), 2);
    }
}
