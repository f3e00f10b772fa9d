use glam::Vec2;
use sky_chaser_core::{Command, Event, JumpKind, LevelIndex};
use sky_chaser_system_feedback::Feedback;
use sky_chaser_world::{self as world, query, World};

fn burst_sizes(commands: &[Command]) -> Vec<usize> {
    commands
        .iter()
        .map(|command| match command {
            Command::SpawnParticles { particles } => particles.len(),
            other => panic!("unexpected command {other:?}"),
        })
        .collect()
}

#[test]
fn same_seed_same_particles() {
    let events = [
        Event::Jumped {
            feet: Vec2::new(115.0, 200.0),
            kind: JumpKind::Ground,
        },
        Event::Jumped {
            feet: Vec2::new(115.0, 180.0),
            kind: JumpKind::Double,
        },
    ];

    let mut first = Vec::new();
    let mut second = Vec::new();
    Feedback::new(0x5eed).handle(&events, None, &mut first);
    Feedback::new(0x5eed).handle(&events, None, &mut second);
    assert_eq!(first, second);
    assert_eq!(burst_sizes(&first), vec![16]);

    let mut other = Vec::new();
    Feedback::new(0x5eee).handle(&events, None, &mut other);
    assert_ne!(first, other, "a different seed should scatter differently");
}

#[test]
fn celebration_needs_a_player_position() {
    let completed = [Event::LevelCompleted {
        level: LevelIndex::FIRST,
    }];
    let mut out = Vec::new();
    let mut feedback = Feedback::new(1);
    feedback.handle(&completed, None, &mut out);
    assert!(out.is_empty());

    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut events);
    let player = query::player(&world).expect("player spawned");
    feedback.handle(&completed, Some(&player), &mut out);
    assert_eq!(burst_sizes(&out), vec![24]);
}

#[test]
fn bursts_become_world_particles() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut events);

    let mut feedback = Feedback::new(9);
    let mut commands = Vec::new();
    feedback.handle(
        &[Event::PlayerDamaged {
            position: Vec2::new(300.0, 300.0),
            lives: 2,
            cause: sky_chaser_core::DamageCause::Enemy,
        }],
        None,
        &mut commands,
    );
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    assert_eq!(query::particles(&world).len(), 16);
}
