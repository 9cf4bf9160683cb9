//! Per-frame simulation step
//!
//! Order within a tick: admission, input drain, ship movement, bullets,
//! invaders, emitters. Bullets record lifecycle events while the pools are
//! borrowed; those are applied before invaders and emitters step, so a fresh
//! explosion emitter ticks in the frame that spawned it.

use log::{debug, trace};

use super::collision::first_invader_hit;
use super::state::{BulletFate, GameEvent, GameState};
use crate::platform::input::{Event, EventQueue, KeyCode};

/// What the frame loop should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
}

/// Advance the game by `dt` seconds, consuming every pending input event
pub fn tick(state: &mut GameState, events: &mut EventQueue, dt: f32) -> TickOutcome {
    trace!("tick {} dt={dt:.4}", state.time_ticks);
    state.time_ticks += 1;

    state.admit_invaders();

    while let Some(event) = events.pop() {
        match event {
            Event::Quit => {
                debug!("quit requested by platform");
                state.should_quit = true;
                return TickOutcome::Quit;
            }
            Event::Key { code, pressed } => handle_key(state, code, pressed),
        }
    }

    state.move_ship(dt);

    for event in step_bullets(state, dt) {
        state.apply_event(event);
    }
    step_invaders(state, dt);

    let GameState { emitters, rng, .. } = state;
    emitters.step(dt, rng);

    if state.should_quit {
        TickOutcome::Quit
    } else {
        TickOutcome::Continue
    }
}

fn handle_key(state: &mut GameState, code: KeyCode, pressed: bool) {
    match code {
        KeyCode::Left => state.keys.left = pressed,
        KeyCode::Right => state.keys.right = pressed,
        KeyCode::Up => state.keys.up = pressed,
        KeyCode::Down => state.keys.down = pressed,
        // One-shot actions fire on the press edge only
        KeyCode::Fire if pressed => {
            debug!("fire at {:?}", state.ship_pos);
            state.do_fire_bullets();
        }
        KeyCode::Escape if pressed => {
            debug!("escape pressed");
            state.should_quit = true;
        }
        _ => {}
    }
}

/// Move bullets, drag their trails along and resolve hits.
///
/// Returns the lifecycle events to apply once the pools are released.
pub fn step_bullets(state: &mut GameState, dt: f32) -> Vec<GameEvent> {
    let GameState {
        tuning,
        bullets,
        invaders,
        emitters,
        ..
    } = state;
    let mut events = Vec::new();

    bullets.sweep(|bullet| {
        bullet.pos += bullet.vel * dt;
        if let Some(trail) = bullet.trail {
            emitters.follow(trail, bullet.pos, bullet.vel);
        }

        if !tuning.live_y.contains(bullet.pos.y) {
            events.push(GameEvent::BulletDestroyed {
                trail: bullet.trail,
                fate: BulletFate::LeftPlayfield,
            });
            return true;
        }

        match first_invader_hit(bullet.pos, invaders, tuning.invader_radius) {
            Some(hit) => {
                let victim = invaders.swap_remove(hit);
                events.push(GameEvent::InvaderDestroyed { pos: victim.pos });
                events.push(GameEvent::BulletDestroyed {
                    trail: bullet.trail,
                    fate: BulletFate::HitInvader,
                });
                true
            }
            None => false,
        }
    });

    events
}

/// Advance every invader's seek/sleep cycle
pub fn step_invaders(state: &mut GameState, dt: f32) {
    let GameState {
        tuning,
        rng,
        invaders,
        ..
    } = state;
    for invader in invaders.iter_mut() {
        invader.update(dt, rng, tuning);
    }
}
