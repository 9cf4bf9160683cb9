//! Game state and core simulation types
//!
//! Everything the frame tick mutates lives in `GameState`; the renderer only
//! reads it.

use glam::{Vec2, Vec4};
use log::{debug, warn};

use super::particles::{EmitterId, EmitterPool};
use super::pool::FixedPool;
use super::rng::LehmerRng;
use crate::consts::*;
use crate::error::{PoolError, PoolKind};
use crate::tuning::Tuning;

/// Behaviour phase of an invader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvaderState {
    /// Moving toward its target
    Seeking,
    /// Resting at its target
    Sleeping,
}

/// A wandering invader
#[derive(Debug, Clone, PartialEq)]
pub struct Invader {
    pub pos: Vec2,
    pub vel: Vec2,
    pub target: Vec2,
    /// Index into the invader sprite table
    pub sprite: usize,
    /// Negative while seeking, remaining rest time otherwise
    pub sleep_countdown: f32,
}

impl Invader {
    /// New invader above a freshly sampled target, already seeking it
    pub fn spawn(rng: &mut LehmerRng, tuning: &Tuning) -> Self {
        let sprite = (rng.next_u32() % INVADER_SPRITE_COUNT as u32) as usize;
        let target = Self::sample_target(rng, tuning);
        Self {
            pos: Vec2::new(target.x, tuning.invader_spawn_height),
            vel: Vec2::ZERO,
            target,
            sprite,
            sleep_countdown: -1.0,
        }
    }

    /// Random point in the target band (x drawn before y)
    pub fn sample_target(rng: &mut LehmerRng, tuning: &Tuning) -> Vec2 {
        let x = tuning.target_x().sample(rng);
        let y = tuning.target_y.sample(rng);
        Vec2::new(x, y)
    }

    pub fn state(&self) -> InvaderState {
        if self.sleep_countdown < 0.0 {
            InvaderState::Seeking
        } else {
            InvaderState::Sleeping
        }
    }

    /// Advance the seek/sleep cycle by `dt`
    pub fn update(&mut self, dt: f32, rng: &mut LehmerRng, tuning: &Tuning) {
        match self.state() {
            InvaderState::Seeking => {
                let dir = (self.target - self.pos).normalize_or_zero();
                self.vel = dir * tuning.invader_speed;
                self.pos += dir * (tuning.invader_speed * dt);

                if self.pos.distance(self.target) < tuning.arrival_epsilon {
                    self.vel = Vec2::ZERO;
                    self.sleep_countdown = tuning.invader_sleep.sample(rng);
                }
            }
            InvaderState::Sleeping => {
                self.sleep_countdown -= dt;
                if self.sleep_countdown < 0.0 {
                    self.target = Self::sample_target(rng, tuning);
                }
            }
        }
    }
}

/// A player projectile
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Vec4,
    /// Trail emitter; `None` when the emitter pool was full at fire time
    pub trail: Option<EmitterId>,
}

/// Why a bullet left play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletFate {
    LeftPlayfield,
    HitInvader,
}

/// Lifecycle consequences produced while stepping entities, applied afterwards
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// The bullet's trail must stop producing and fade out
    BulletDestroyed {
        trail: Option<EmitterId>,
        fate: BulletFate,
    },
    /// An explosion belongs at `pos`
    InvaderDestroyed { pos: Vec2 },
}

/// Directional keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Single source of gameplay randomness
    pub rng: LehmerRng,
    pub ship_pos: Vec2,
    pub keys: HeldKeys,
    pub invaders: FixedPool<Invader>,
    pub bullets: FixedPool<Bullet>,
    pub emitters: EmitterPool,
    pub shots_fired: u32,
    pub invaders_destroyed: u32,
    pub should_quit: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a new game state from tuning (seeds the RNG)
    pub fn new(tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        Self {
            rng: LehmerRng::new(tuning.seed),
            ship_pos: tuning.ship_start,
            keys: HeldKeys::default(),
            invaders: FixedPool::new(PoolKind::Invaders, MAX_INVADERS),
            bullets: FixedPool::new(PoolKind::Bullets, MAX_BULLETS),
            emitters: EmitterPool::new(MAX_EMITTERS),
            shots_fired: 0,
            invaders_destroyed: 0,
            should_quit: false,
            time_ticks: 0,
            tuning,
        }
    }

    /// Spawn one invader
    pub fn add_invader(&mut self) -> Result<&mut Invader, PoolError> {
        let invader = Invader::spawn(&mut self.rng, &self.tuning);
        self.invaders.push(invader)
    }

    /// Top the invader pool up to the desired count; returns how many spawned
    pub fn admit_invaders(&mut self) -> usize {
        let mut spawned = 0;
        while self.invaders.len() < self.tuning.desired_invaders {
            if let Err(err) = self.add_invader() {
                warn!("invader admission stopped: {err}");
                break;
            }
            spawned += 1;
        }
        spawned
    }

    /// Fire one bullet from the ship, attaching a trail when an emitter is free
    pub fn fire_bullet(&mut self) -> Result<&mut Bullet, PoolError> {
        if self.bullets.is_full() {
            return Err(PoolError::Exhausted {
                pool: PoolKind::Bullets,
                capacity: self.bullets.capacity(),
            });
        }

        let pos = self.ship_pos;
        let vel = Vec2::new(0.0, self.tuning.bullet_speed);
        let trail = match self.emitters.spawn(&self.tuning.trail, pos, vel) {
            Ok(id) => Some(id),
            Err(err) => {
                debug!("bullet fired without trail: {err}");
                None
            }
        };

        self.bullets.push(Bullet {
            pos,
            vel,
            color: Vec4::ONE,
            trail,
        })
    }

    /// Fire the twin shot, one bullet either side of the ship's centreline
    pub fn do_fire_bullets(&mut self) {
        let offset = self.tuning.bullet_offset;
        for dx in [-offset, offset] {
            match self.fire_bullet() {
                Ok(bullet) => {
                    bullet.pos.x += dx;
                    let (pos, vel, trail) = (bullet.pos, bullet.vel, bullet.trail);
                    if let Some(trail) = trail {
                        self.emitters.follow(trail, pos, vel);
                    }
                }
                Err(err) => warn!("shot dropped: {err}"),
            }
        }
        self.shots_fired += 1;
    }

    /// Move the ship by the held directional keys and keep it on the playfield
    pub fn move_ship(&mut self, dt: f32) {
        let dmove = self.tuning.ship_speed * dt;
        if self.keys.left {
            self.ship_pos.x -= dmove;
        }
        if self.keys.right {
            self.ship_pos.x += dmove;
        }
        if self.keys.down {
            self.ship_pos.y -= dmove;
        }
        if self.keys.up {
            self.ship_pos.y += dmove;
        }
        self.ship_pos.x = self.tuning.ship_x.clamp(self.ship_pos.x);
        self.ship_pos.y = self.tuning.ship_y.clamp(self.ship_pos.y);
    }

    /// Apply a deferred lifecycle event
    pub fn apply_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::BulletDestroyed { trail, .. } => {
                if let Some(trail) = trail {
                    self.emitters.stop(trail);
                }
            }
            GameEvent::InvaderDestroyed { pos } => {
                if let Err(err) = self.emitters.spawn(&self.tuning.explosion, pos, Vec2::ZERO) {
                    warn!("explosion dropped: {err}");
                }
                self.invaders_destroyed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::particles::EmitterConfig;

    fn tuning() -> Tuning {
        Tuning {
            seed: 12345,
            ..Tuning::default()
        }
    }

    #[test]
    fn test_spawned_invader_targets_band() {
        let mut state = GameState::new(tuning());
        let invader = state.add_invader().unwrap().clone();
        assert!(invader.target.x >= 0.05 && invader.target.x <= 0.95);
        assert!(invader.target.y >= 0.2 && invader.target.y <= 0.7);
        assert_eq!(invader.pos, Vec2::new(invader.target.x, 0.8));
        assert_eq!(invader.vel, Vec2::ZERO);
        assert_eq!(invader.state(), InvaderState::Seeking);
        assert!(invader.sprite < INVADER_SPRITE_COUNT);
    }

    #[test]
    fn test_admission_fills_to_desired() {
        let mut state = GameState::new(tuning());
        assert_eq!(state.admit_invaders(), 15);
        assert_eq!(state.admit_invaders(), 0);
        state.invaders.swap_remove(3);
        assert_eq!(state.admit_invaders(), 1);
        assert_eq!(state.invaders.len(), 15);
    }

    #[test]
    fn test_oversized_wave_clamped_to_pool() {
        let mut state = GameState::new(Tuning {
            desired_invaders: 10_000,
            ..tuning()
        });
        assert_eq!(state.tuning.desired_invaders, MAX_INVADERS);
        assert_eq!(state.admit_invaders(), MAX_INVADERS);
        // A full wave is satisfied, not an exhausted pool
        assert_eq!(state.admit_invaders(), 0);
        assert!(state.invaders.is_full());
    }

    #[test]
    fn test_seeking_invader_falls_asleep_on_arrival() {
        let tuning = tuning();
        let mut rng = LehmerRng::new(1);
        let mut invader = Invader {
            pos: Vec2::new(0.5, 0.5),
            vel: Vec2::ZERO,
            target: Vec2::new(0.5, 0.503),
            sprite: 0,
            sleep_countdown: -1.0,
        };
        invader.update(0.01, &mut rng, &tuning);
        assert_eq!(invader.state(), InvaderState::Sleeping);
        assert!(invader.sleep_countdown >= 0.1 && invader.sleep_countdown <= 1.5);
    }

    #[test]
    fn test_seeking_moves_at_fixed_speed() {
        let tuning = tuning();
        let mut rng = LehmerRng::new(1);
        let mut invader = Invader {
            pos: Vec2::new(0.1, 0.5),
            vel: Vec2::ZERO,
            target: Vec2::new(0.9, 0.5),
            sprite: 0,
            sleep_countdown: -1.0,
        };
        invader.update(0.1, &mut rng, &tuning);
        assert!((invader.pos.x - 0.13).abs() < 1e-6);
        assert!((invader.vel.x - 0.3).abs() < 1e-6);
        assert_eq!(invader.state(), InvaderState::Seeking);
    }

    #[test]
    fn test_sleeping_invader_wakes_with_new_target() {
        let tuning = tuning();
        let mut rng = LehmerRng::new(1);
        let mut invader = Invader {
            pos: Vec2::new(0.5, 0.5),
            vel: Vec2::ZERO,
            target: Vec2::new(0.5, 0.5),
            sprite: 0,
            sleep_countdown: 0.05,
        };
        invader.update(0.1, &mut rng, &tuning);
        assert_eq!(invader.state(), InvaderState::Seeking);
        assert_ne!(invader.target, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_twin_shot_offsets() {
        let mut state = GameState::new(tuning());
        state.ship_pos = Vec2::new(0.5, 0.1);
        state.do_fire_bullets();

        assert_eq!(state.shots_fired, 1);
        assert_eq!(state.bullets.len(), 2);
        let xs: Vec<f32> = state.bullets.iter().map(|b| b.pos.x).collect();
        assert!((xs[0] - (0.5 - 0.023)).abs() < 1e-6);
        assert!((xs[1] - (0.5 + 0.023)).abs() < 1e-6);
        for bullet in &state.bullets {
            assert_eq!(bullet.vel, Vec2::new(0.0, 0.4));
            let trail = state.emitters.get(bullet.trail.unwrap()).unwrap();
            assert_eq!(trail.pos, bullet.pos);
        }
    }

    #[test]
    fn test_bullet_without_trail_when_emitters_exhausted() {
        let mut state = GameState::new(tuning());
        for _ in 0..MAX_EMITTERS {
            state
                .emitters
                .spawn(&state.tuning.explosion, Vec2::ZERO, Vec2::ZERO)
                .unwrap();
        }
        let bullet = state.fire_bullet().unwrap();
        assert!(bullet.trail.is_none());
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_full_bullet_pool_still_counts_shot() {
        let mut state = GameState::new(tuning());
        while !state.bullets.is_full() {
            state.fire_bullet().unwrap();
        }
        state.do_fire_bullets();
        assert_eq!(state.bullets.len(), MAX_BULLETS);
        assert_eq!(state.shots_fired, 1);
    }

    #[test]
    fn test_bullet_destroyed_stops_trail() {
        let mut state = GameState::new(tuning());
        let trail = state.fire_bullet().unwrap().trail.unwrap();
        state.apply_event(GameEvent::BulletDestroyed {
            trail: Some(trail),
            fate: BulletFate::LeftPlayfield,
        });
        assert!(!state.emitters.get(trail).unwrap().is_producing());
    }

    #[test]
    fn test_invader_destroyed_spawns_explosion() {
        let mut state = GameState::new(tuning());
        state.apply_event(GameEvent::InvaderDestroyed {
            pos: Vec2::new(0.3, 0.4),
        });
        assert_eq!(state.invaders_destroyed, 1);
        assert_eq!(state.emitters.len(), 1);
        let (_, emitter) = state.emitters.iter().next().unwrap();
        assert_eq!(emitter.pos, Vec2::new(0.3, 0.4));
        assert_eq!(emitter.config(), &EmitterConfig::explosion());
    }

    #[test]
    fn test_ship_clamped_to_playfield() {
        let mut state = GameState::new(tuning());
        state.keys.left = true;
        state.keys.down = true;
        state.move_ship(100.0);
        assert_eq!(state.ship_pos, Vec2::new(0.01, 0.02));

        state.keys = HeldKeys {
            right: true,
            up: true,
            ..HeldKeys::default()
        };
        state.move_ship(100.0);
        assert_eq!(state.ship_pos, Vec2::new(0.99, 0.15));
    }
}
