use glam::{Vec2, Vec4};
use proptest::prelude::*;

use invaders::Tuning;
use invaders::consts::{MAX_BULLETS, MAX_INVADERS};
use invaders::platform::{Event, EventQueue, KeyCode};
use invaders::sim::{
    Bullet, EmitterConfig, EmitterPool, GameState, Invader, LehmerRng, TickOutcome, tick,
};

fn state_without_admission(seed: i32) -> GameState {
    GameState::new(Tuning {
        seed,
        desired_invaders: 0,
        ..Tuning::default()
    })
}

#[test]
fn spawned_invader_targets_the_band() {
    let mut state = state_without_admission(42);
    let invader = state.add_invader().unwrap();
    assert!((0.05..=0.95).contains(&invader.target.x));
    assert!((0.2..=0.7).contains(&invader.target.y));
}

#[test]
fn twin_shot_from_ship_start() {
    let mut state = state_without_admission(1);
    assert_eq!(state.ship_pos, Vec2::new(0.5, 0.1));

    let mut events = EventQueue::default();
    events.push(Event::press(KeyCode::Fire));
    tick(&mut state, &mut events, 0.0);

    let mut xs: Vec<f32> = state.bullets.iter().map(|b| b.pos.x).collect();
    xs.sort_by(f32::total_cmp);
    assert_eq!(xs.len(), 2);
    assert!((xs[0] - 0.477).abs() < 1e-6);
    assert!((xs[1] - 0.523).abs() < 1e-6);
    assert!(state.bullets.iter().all(|b| b.vel == Vec2::new(0.0, 0.4)));
}

#[test]
fn bullet_crossing_top_edge_is_destroyed() {
    let mut state = state_without_admission(1);
    state
        .bullets
        .push(Bullet {
            pos: Vec2::new(0.5, 0.95),
            vel: Vec2::new(0.0, 0.4),
            color: Vec4::ONE,
            trail: None,
        })
        .unwrap();

    let mut events = EventQueue::default();
    tick(&mut state, &mut events, 1.0);
    assert!(state.bullets.is_empty());
}

#[test]
fn bullet_below_top_edge_survives_until_crossing() {
    let mut state = state_without_admission(1);
    state
        .bullets
        .push(Bullet {
            pos: Vec2::new(0.5, 0.5),
            vel: Vec2::new(0.0, 0.4),
            color: Vec4::ONE,
            trail: None,
        })
        .unwrap();

    let mut events = EventQueue::default();
    // 0.5 -> 0.9, still live
    tick(&mut state, &mut events, 1.0);
    assert_eq!(state.bullets.len(), 1);
    // 0.9 -> 1.3, gone
    tick(&mut state, &mut events, 1.0);
    assert!(state.bullets.is_empty());
}

#[test]
fn bullet_crossing_bottom_edge_is_destroyed() {
    let mut state = state_without_admission(1);
    for y in [0.0, 0.5] {
        state
            .bullets
            .push(Bullet {
                pos: Vec2::new(0.5, y),
                vel: Vec2::new(0.0, -0.4),
                color: Vec4::ONE,
                trail: None,
            })
            .unwrap();
    }

    let mut events = EventQueue::default();
    // 0.0 -> -0.4 leaves the band, 0.5 -> 0.1 stays
    tick(&mut state, &mut events, 1.0);
    assert_eq!(state.bullets.len(), 1);
    assert!((state.bullets.as_slice()[0].pos.y - 0.1).abs() < 1e-6);
    // 0.1 -> -0.3, gone
    tick(&mut state, &mut events, 1.0);
    assert!(state.bullets.is_empty());
}

#[test]
fn hit_removes_exactly_one_of_each() {
    let mut state = state_without_admission(7);
    for x in [0.2, 0.5, 0.8] {
        state
            .invaders
            .push(Invader {
                pos: Vec2::new(x, 0.5),
                vel: Vec2::ZERO,
                target: Vec2::new(x, 0.5),
                sprite: 0,
                sleep_countdown: 5.0,
            })
            .unwrap();
    }
    for x in [0.5, 0.3] {
        state
            .bullets
            .push(Bullet {
                pos: Vec2::new(x, 0.49),
                vel: Vec2::new(0.0, 0.4),
                color: Vec4::ONE,
                trail: None,
            })
            .unwrap();
    }

    let mut events = EventQueue::default();
    tick(&mut state, &mut events, 0.01);

    assert_eq!(state.invaders.len(), 2);
    assert_eq!(state.bullets.len(), 1);
    assert_eq!(state.invaders_destroyed, 1);
    assert!(state.invaders.iter().all(|i| (i.pos.x - 0.5).abs() > 0.1));
}

#[test]
fn expired_particles_are_reaped() {
    let mut rng = LehmerRng::new(99);
    let mut pool = EmitterPool::default();
    let id = pool
        .spawn(&EmitterConfig::explosion(), Vec2::new(0.5, 0.5), Vec2::ZERO)
        .unwrap();

    for _ in 0..200 {
        pool.step(0.01, &mut rng);
        if let Some(emitter) = pool.get(id) {
            assert!(
                emitter
                    .particles()
                    .iter()
                    .all(|p| p.elapsed <= p.lifetime)
            );
        }
    }
    // Production ended after 0.3s and every particle lives at most 1s
    assert!(!pool.contains(id));
    assert!(pool.is_empty());
}

#[test]
fn stopped_empty_emitter_is_reclaimed_in_one_step() {
    let mut rng = LehmerRng::new(3);
    let mut pool = EmitterPool::default();
    let config = EmitterConfig {
        particles_per_second: 0.0,
        ..EmitterConfig::default()
    };
    let id = pool.spawn(&config, Vec2::ZERO, Vec2::ZERO).unwrap();
    pool.step(0.01, &mut rng);
    assert!(pool.contains(id));

    assert!(pool.stop(id));
    pool.step(0.01, &mut rng);
    assert!(!pool.contains(id));
    // Stale handle resolves to nothing
    assert!(!pool.stop(id));
}

#[test]
fn pools_never_exceed_capacity() {
    let mut state = GameState::new(Tuning {
        desired_invaders: 10_000,
        ..Tuning::default()
    });
    assert_eq!(state.tuning.desired_invaders, MAX_INVADERS);
    state.admit_invaders();
    assert_eq!(state.invaders.len(), MAX_INVADERS);
    assert!(state.add_invader().is_err());

    for _ in 0..(MAX_BULLETS + 10) {
        state.do_fire_bullets();
    }
    assert_eq!(state.bullets.len(), MAX_BULLETS);
}

fn key_strategy() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        Just(KeyCode::Left),
        Just(KeyCode::Right),
        Just(KeyCode::Up),
        Just(KeyCode::Down),
    ]
}

proptest! {
    #[test]
    fn ship_stays_on_playfield(
        steps in prop::collection::vec((key_strategy(), any::<bool>(), 0.0f32..5.0), 1..60)
    ) {
        let mut state = state_without_admission(5);
        let mut events = EventQueue::default();
        for (key, pressed, dt) in steps {
            events.push(Event::Key { code: key, pressed });
            prop_assert_eq!(tick(&mut state, &mut events, dt), TickOutcome::Continue);
            prop_assert!(state.ship_pos.x >= 0.01 && state.ship_pos.x <= 0.99);
            prop_assert!(state.ship_pos.y >= 0.02 && state.ship_pos.y <= 0.15);
        }
    }
}
